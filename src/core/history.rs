//! Purchase history of one product across a user's receipts, and the
//! free-text receipt filter used by search. Both are linear scans.

use chrono::NaiveDate;
use std::cmp::Ordering;

use crate::core::models::history::{HistoryStats, ItemHistory, ItemHistoryEntry};
use crate::core::models::receipt::{Receipt, ReceiptItem};

/// Bidirectional token containment between a lower-cased, trimmed query
/// and an item's name, or containment of the query in the item's generic
/// name.
pub fn item_matches(query: &str, query_generic: Option<&str>, item: &ReceiptItem) -> bool {
    let name = item.name.to_lowercase();
    let generic = item
        .generic_name
        .as_deref()
        .map(|g| g.trim().to_lowercase())
        .unwrap_or_default();

    let query_in_name = query.split_whitespace().all(|token| name.contains(token));
    let name_in_query = !name.trim().is_empty() && name.split_whitespace().all(|token| query.contains(token));
    let generic_match = !generic.is_empty() && generic.contains(query);
    let same_generic = match query_generic.map(|g| g.trim().to_lowercase()) {
        Some(g) => !g.is_empty() && g == generic,
        None => false,
    };

    query_in_name || name_in_query || generic_match || same_generic
}

fn parse_date(date: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(date.trim(), "%Y-%m-%d").ok()
}

/// Newest first; entries with an unreadable date go last in scan order.
fn by_date_desc(a: &ItemHistoryEntry, b: &ItemHistoryEntry) -> Ordering {
    match (parse_date(&a.date), parse_date(&b.date)) {
        (Some(x), Some(y)) => y.cmp(&x),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

pub fn summarize(entries: &[ItemHistoryEntry]) -> Option<HistoryStats> {
    if entries.is_empty() {
        return None;
    }
    let prices: Vec<f64> = entries.iter().map(ItemHistoryEntry::unit_price).collect();
    let min = prices.iter().copied().fold(f64::INFINITY, f64::min);
    let max = prices.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let avg = prices.iter().sum::<f64>() / prices.len() as f64;
    let total_spent = entries.iter().map(|e| e.total).sum();

    Some(HistoryStats {
        min,
        max,
        avg,
        total_spent,
        count: entries.len(),
    })
}

pub fn build_history(item_name: &str, generic_name: Option<&str>, receipts: &[Receipt]) -> ItemHistory {
    let query = item_name.trim().to_lowercase();
    if query.is_empty() {
        return ItemHistory {
            item_name: item_name.to_string(),
            ..Default::default()
        };
    }

    let query = query.as_str();
    let mut entries: Vec<ItemHistoryEntry> = receipts
        .iter()
        .flat_map(|receipt| {
            receipt
                .items
                .iter()
                .filter(move |item| item_matches(query, generic_name, item))
                .map(move |item| ItemHistoryEntry {
                    receipt_id: receipt.id.clone(),
                    date: receipt.date.clone(),
                    store_name: receipt.store_name.clone(),
                    item_name: item.name.clone(),
                    price: item.price,
                    quantity: if item.quantity > 0.0 { item.quantity } else { 1.0 },
                    unit: item.unit.clone(),
                    total: item.price,
                    image_url: receipt.image_url.clone(),
                })
        })
        .collect();
    entries.sort_by(by_date_desc);

    let stats = summarize(&entries);
    ItemHistory {
        item_name: item_name.to_string(),
        entries,
        stats,
    }
}

/// Case-insensitive substring match on store name, item names, item
/// categories and the receipt category. `query` must already be lower-cased.
pub fn receipt_matches(query: &str, receipt: &Receipt) -> bool {
    receipt.store_name.to_lowercase().contains(query)
        || receipt
            .items
            .iter()
            .any(|item| item.name.to_lowercase().contains(query) || item.category.to_lowercase().contains(query))
        || receipt.category.to_lowercase().contains(query)
}
