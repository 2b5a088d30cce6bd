//! Item-level reconciliation of a single receipt.
//!
//! Operations address items by their position in the *stored* list. All
//! indices of a group are checked before anything is applied, so a group
//! either applies completely or not at all.

use std::collections::HashMap;

use crate::core::errors::ReceiptError;
use crate::core::models::operation::{ItemAction, ItemOperation};
use crate::core::models::receipt::ReceiptItem;

/// Currency-scale rounding.
pub fn round2(amount: f64) -> f64 {
    (amount * 100.0).round() / 100.0
}

/// Sum of every extended price, rounded. Used by single-item delete, which
/// rebuilds the total instead of adjusting it.
pub fn recompute_total(items: &[ReceiptItem]) -> f64 {
    round2(items.iter().map(ReceiptItem::extended_price).sum())
}

pub fn validate_index(index: i64, len: usize) -> Result<usize, ReceiptError> {
    if index < 0 || index as u64 >= len as u64 {
        return Err(ReceiptError::InvalidIndex { index, len });
    }
    Ok(index as usize)
}

#[derive(Debug, Clone, PartialEq)]
pub struct Reconciliation {
    pub items: Vec<ReceiptItem>,
    pub deleted_delta: f64,
    pub deleted: usize,
    pub recategorized: usize,
}

impl Reconciliation {
    pub fn needs_update(&self) -> bool {
        self.deleted + self.recategorized > 0
    }

    /// Previous total minus the line totals of deleted items.
    pub fn new_total(&self, stored_total: f64) -> f64 {
        round2(stored_total - self.deleted_delta)
    }
}

/// One action per index. A delete anywhere in the group beats any
/// recategorize of the same index; among recategorizes the last one wins.
fn resolve_actions<'a>(ops: &[(usize, &'a ItemAction)]) -> HashMap<usize, &'a ItemAction> {
    let mut by_index: HashMap<usize, &'a ItemAction> = HashMap::new();
    for &(index, action) in ops {
        let deleted = by_index.get(&index).is_some_and(|existing| existing.is_delete());
        if !deleted {
            by_index.insert(index, action);
        }
    }
    by_index
}

/// Applies `ops` (all targeting the same receipt) to `items`.
pub fn reconcile(items: &[ReceiptItem], ops: &[ItemOperation]) -> Result<Reconciliation, ReceiptError> {
    let validated = ops
        .iter()
        .map(|op| validate_index(op.item_index, items.len()).map(|i| (i, &op.action)))
        .collect::<Result<Vec<_>, _>>()?;
    let by_index = resolve_actions(&validated);

    let mut result = Reconciliation {
        items: Vec::with_capacity(items.len()),
        deleted_delta: 0.0,
        deleted: 0,
        recategorized: 0,
    };

    for (i, item) in items.iter().enumerate() {
        match by_index.get(&i) {
            None => result.items.push(item.clone()),
            Some(ItemAction::Delete) => {
                result.deleted_delta += item.line_total();
                result.deleted += 1;
            }
            Some(ItemAction::Recategorize { category }) => {
                let mut updated = item.clone();
                updated.category = category.clone();
                result.items.push(updated);
                result.recategorized += 1;
            }
        }
    }

    Ok(result)
}
