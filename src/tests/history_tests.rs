use super::{create_test_service_with_storage, receipt, seed};
use crate::core::history::{build_history, item_matches, receipt_matches};
use crate::core::models::receipt::{Receipt, ReceiptItem};

fn dated(id: &str, date: &str, store: &str, items: Vec<ReceiptItem>) -> Receipt {
    let mut r = receipt(id, "alice", 0.0, items);
    r.date = date.to_string();
    r.store_name = store.to_string();
    r
}

#[test]
fn test_query_tokens_contained_in_name() {
    let item = ReceiptItem::new("Organic Whole Milk 2L", 3.0);
    assert!(item_matches("whole milk", None, &item));
    assert!(!item_matches("oat milk", None, &item));
}

#[test]
fn test_name_tokens_contained_in_query() {
    let item = ReceiptItem::new("Milk", 3.0);
    assert!(item_matches("organic milk 2l", None, &item));
}

#[test]
fn test_generic_name_matching() {
    let item = ReceiptItem::new("KS 2% RF", 3.0).with_generic_name("Milk");
    assert!(item_matches("mil", None, &item));
    assert!(item_matches("dairy drink", Some(" MILK "), &item));
    assert!(!item_matches("dairy drink", Some("cream"), &item));
    assert!(!item_matches("dairy drink", Some(""), &item));
}

#[test]
fn test_blank_item_name_never_matches_by_reverse_containment() {
    let item = ReceiptItem::new("", 3.0);
    assert!(!item_matches("milk", None, &item));
    let item = ReceiptItem::new("   ", 3.0);
    assert!(!item_matches("milk", None, &item));
}

#[test]
fn test_history_sorted_newest_first_with_stats() {
    let receipts = vec![
        dated("a", "2024-01-15", "Corner Market", vec![ReceiptItem::new("Milk", 3.0)]),
        dated(
            "b",
            "2024-03-02",
            "Big Box",
            vec![
                ReceiptItem::new("Whole Milk", 4.0).with_quantity(2.0).with_unit("L"),
                ReceiptItem::new("Bread", 2.5),
            ],
        ),
        dated("c", "not a date", "Kiosk", vec![ReceiptItem::new("milk", 5.0)]),
        dated("d", "2024-02-10", "Corner Market", vec![ReceiptItem::new("Eggs", 6.0)]),
    ];

    let history = build_history("Milk", None, &receipts);

    assert_eq!(history.item_name, "Milk");
    let ids: Vec<&str> = history.entries.iter().map(|e| e.receipt_id.as_str()).collect();
    assert_eq!(ids, vec!["b", "a", "c"]);

    let latest = &history.entries[0];
    assert_eq!(latest.store_name, "Big Box");
    assert_eq!(latest.quantity, 2.0);
    assert_eq!(latest.unit.as_deref(), Some("L"));
    assert_eq!(latest.total, 4.0);

    let stats = history.stats.unwrap();
    assert_eq!(stats.count, 3);
    assert_eq!(stats.min, 2.0);
    assert_eq!(stats.max, 5.0);
    assert_eq!(stats.avg, 10.0 / 3.0);
    assert_eq!(stats.total_spent, 12.0);
}

#[test]
fn test_zero_quantity_counts_as_one() {
    let receipts = vec![dated(
        "a",
        "2024-01-15",
        "Corner Market",
        vec![ReceiptItem::new("Bananas", 1.8).with_quantity(0.0)],
    )];

    let history = build_history("bananas", None, &receipts);

    assert_eq!(history.entries[0].quantity, 1.0);
    assert_eq!(history.stats.unwrap().avg, 1.8);
}

#[test]
fn test_empty_query_yields_empty_history() {
    let receipts = vec![dated("a", "2024-01-15", "Corner Market", vec![ReceiptItem::new("Milk", 3.0)])];

    let history = build_history("   ", None, &receipts);

    assert!(history.entries.is_empty());
    assert!(history.stats.is_none());
}

#[test]
fn test_no_match_has_no_stats() {
    let receipts = vec![dated("a", "2024-01-15", "Corner Market", vec![ReceiptItem::new("Milk", 3.0)])];

    let history = build_history("Coffee", None, &receipts);

    assert!(history.entries.is_empty());
    assert!(history.stats.is_none());
}

#[test]
fn test_receipt_matches_store_item_and_category() {
    let r = dated(
        "a",
        "2024-01-15",
        "Trader Joe's",
        vec![ReceiptItem::new("Bananas", 1.8).with_category("Produce")],
    );

    assert!(receipt_matches("trader", &r));
    assert!(receipt_matches("banan", &r));
    assert!(receipt_matches("produce", &r));
    assert!(receipt_matches("groceries", &r));
    assert!(!receipt_matches("pharmacy", &r));
}

#[tokio::test]
async fn test_item_history_only_scans_own_receipts() {
    let (service, storage) = create_test_service_with_storage();
    seed(&storage, dated("mine", "2024-01-15", "Corner Market", vec![ReceiptItem::new("Milk", 3.0)])).await;
    let mut foreign = dated("theirs", "2024-02-15", "Corner Market", vec![ReceiptItem::new("Milk", 9.0)]);
    foreign.user_id = "bob".to_string();
    seed(&storage, foreign).await;

    let history = service.item_history("Milk", None, "alice").await.unwrap();

    assert_eq!(history.entries.len(), 1);
    assert_eq!(history.entries[0].receipt_id, "mine");
    assert!(service.item_history("Milk", None, "").await.unwrap_err().is_unauthorized());
}
