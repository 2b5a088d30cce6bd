use crate::core::errors::ReceiptError;
use crate::core::models::operation::ItemOperation;
use crate::core::models::receipt::ReceiptItem;
use crate::core::reconciler::{reconcile, recompute_total, round2, validate_index};

fn items() -> Vec<ReceiptItem> {
    vec![
        ReceiptItem::new("Bread", 5.0).with_category("Bakery"),
        ReceiptItem::new("Milk", 10.0).with_quantity(2.0),
        ReceiptItem::new("Apples", 3.5).with_quantity(0.0),
    ]
}

#[test]
fn test_batch_line_total_treats_small_quantities_as_one() {
    assert_eq!(ReceiptItem::new("Milk", 10.0).with_quantity(2.0).line_total(), 20.0);
    assert_eq!(ReceiptItem::new("Apples", 3.5).with_quantity(0.0).line_total(), 3.5);
    assert_eq!(ReceiptItem::new("Cheese", 4.0).with_quantity(0.4).line_total(), 4.0);
}

#[test]
fn test_extended_price_keeps_fractional_quantities() {
    assert_eq!(ReceiptItem::new("Milk", 10.0).with_quantity(2.0).extended_price(), 20.0);
    assert_eq!(ReceiptItem::new("Bananas", 4.0).with_quantity(0.5).extended_price(), 2.0);
    assert_eq!(ReceiptItem::new("Apples", 3.5).with_quantity(0.0).extended_price(), 3.5);
    assert_eq!(ReceiptItem::new("Apples", 3.5).with_quantity(f64::NAN).extended_price(), 3.5);
}

#[test]
fn test_round2() {
    assert_eq!(round2(6.669999), 6.67);
    assert_eq!(round2(0.1 + 0.2), 0.3);
}

#[test]
fn test_validate_index_bounds() {
    assert_eq!(validate_index(0, 3).unwrap(), 0);
    assert_eq!(validate_index(2, 3).unwrap(), 2);
    assert_eq!(
        validate_index(3, 3).unwrap_err(),
        ReceiptError::InvalidIndex { index: 3, len: 3 }
    );
    assert_eq!(
        validate_index(-1, 3).unwrap_err(),
        ReceiptError::InvalidIndex { index: -1, len: 3 }
    );
    assert_eq!(
        validate_index(0, 0).unwrap_err(),
        ReceiptError::InvalidIndex { index: 0, len: 0 }
    );
}

#[test]
fn test_delete_subtracts_line_total_from_stored_total() {
    let result = reconcile(&items(), &[ItemOperation::delete("r1", 1)]).unwrap();

    assert_eq!(result.items.len(), 2);
    assert_eq!(result.items[0].name, "Bread");
    assert_eq!(result.items[1].name, "Apples");
    assert_eq!(result.deleted, 1);
    assert_eq!(result.deleted_delta, 20.0);
    // Drift in the stored total is carried over
    assert_eq!(result.new_total(30.0), 10.0);
}

#[test]
fn test_recategorize_keeps_total() {
    let result = reconcile(&items(), &[ItemOperation::recategorize("r1", 0, "Dairy")]).unwrap();

    assert_eq!(result.items[0].category, "Dairy");
    assert_eq!(result.recategorized, 1);
    assert_eq!(result.deleted_delta, 0.0);
    assert_eq!(result.new_total(28.5), 28.5);
}

#[test]
fn test_delete_wins_over_recategorize_in_either_order() {
    let before = reconcile(
        &items(),
        &[
            ItemOperation::recategorize("r1", 0, "Dairy"),
            ItemOperation::delete("r1", 0),
        ],
    )
    .unwrap();
    let after = reconcile(
        &items(),
        &[
            ItemOperation::delete("r1", 0),
            ItemOperation::recategorize("r1", 0, "Dairy"),
        ],
    )
    .unwrap();

    for result in [before, after] {
        assert_eq!(result.items.len(), 2);
        assert!(result.items.iter().all(|i| i.name != "Bread"));
        assert_eq!(result.deleted_delta, 5.0);
        assert_eq!(result.recategorized, 0);
    }
}

#[test]
fn test_last_recategorize_wins() {
    let result = reconcile(
        &items(),
        &[
            ItemOperation::recategorize("r1", 1, "Dairy"),
            ItemOperation::recategorize("r1", 1, "Beverages"),
        ],
    )
    .unwrap();

    assert_eq!(result.items[1].category, "Beverages");
    assert_eq!(result.recategorized, 1);
}

#[test]
fn test_indices_refer_to_stored_positions() {
    // Deleting 0 must not shift the target of the second delete
    let result = reconcile(
        &items(),
        &[ItemOperation::delete("r1", 0), ItemOperation::delete("r1", 1)],
    )
    .unwrap();

    assert_eq!(result.items.len(), 1);
    assert_eq!(result.items[0].name, "Apples");
    assert_eq!(result.deleted_delta, 25.0);
}

#[test]
fn test_any_invalid_index_rejects_whole_group() {
    let err = reconcile(
        &items(),
        &[ItemOperation::delete("r1", 0), ItemOperation::delete("r1", 7)],
    )
    .unwrap_err();

    assert_eq!(err, ReceiptError::InvalidIndex { index: 7, len: 3 });
}

#[test]
fn test_empty_operations_need_no_update() {
    let result = reconcile(&items(), &[]).unwrap();
    assert!(!result.needs_update());
    assert_eq!(result.items, items());
}

#[test]
fn test_recompute_total_sums_extended_prices() {
    assert_eq!(recompute_total(&items()), 28.5);
    assert_eq!(
        recompute_total(&[
            ReceiptItem::new("Bread", 5.0),
            ReceiptItem::new("Cheese", 4.0).with_quantity(0.4),
        ]),
        6.6
    );
    assert_eq!(
        recompute_total(&[ReceiptItem::new("A", 3.33), ReceiptItem::new("B", 3.34)]),
        6.67
    );
    assert_eq!(recompute_total(&[]), 0.0);
}
