use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// What to do with the addressed item.
#[derive(Clone, Debug, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum ItemAction {
    Delete,
    Recategorize { category: String },
}

impl ItemAction {
    pub fn is_delete(&self) -> bool {
        matches!(self, ItemAction::Delete)
    }
}

/// One item-level edit, addressed by position in the stored item list.
#[derive(Clone, Debug, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
pub struct ItemOperation {
    pub receipt_id: String,
    /// Zero-based index into the stored list at application time
    pub item_index: i64,
    #[serde(flatten)]
    pub action: ItemAction,
}

impl ItemOperation {
    pub fn delete(receipt_id: impl Into<String>, item_index: i64) -> Self {
        ItemOperation {
            receipt_id: receipt_id.into(),
            item_index,
            action: ItemAction::Delete,
        }
    }

    pub fn recategorize(receipt_id: impl Into<String>, item_index: i64, category: impl Into<String>) -> Self {
        ItemOperation {
            receipt_id: receipt_id.into(),
            item_index,
            action: ItemAction::Recategorize {
                category: category.into(),
            },
        }
    }
}
