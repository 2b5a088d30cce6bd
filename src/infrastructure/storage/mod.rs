use crate::core::errors::ReceiptError;
use crate::core::models::{category::CategorySet, receipt::Receipt, receipt::ReceiptItem};
use async_trait::async_trait;
use chrono::{DateTime, Utc};

/// Document store keyed by receipt id, plus per-user category documents.
///
/// Implementations report their own failures as `ReceiptError::UpstreamFailure`.
#[async_trait]
pub trait Storage: Send + Sync {
    /// Assigns an id and stores the receipt, returning the stored copy.
    async fn create_receipt(&self, receipt: Receipt) -> Result<Receipt, ReceiptError>;
    async fn get_receipt(&self, receipt_id: &str) -> Result<Option<Receipt>, ReceiptError>;
    /// Partial merge of the reconciled fields. No version check is made.
    async fn update_receipt_items(
        &self,
        receipt_id: &str,
        items: Vec<ReceiptItem>,
        total_amount: f64,
        updated_at: DateTime<Utc>,
    ) -> Result<(), ReceiptError>;
    async fn save_receipt(&self, receipt: Receipt) -> Result<(), ReceiptError>;
    async fn delete_receipt(&self, receipt_id: &str) -> Result<(), ReceiptError>;
    /// Receipts of `user_id`, newest `created_at` first.
    async fn list_receipts_by_owner(&self, user_id: &str, limit: Option<usize>) -> Result<Vec<Receipt>, ReceiptError>;

    async fn get_categories(&self, user_id: &str) -> Result<Option<CategorySet>, ReceiptError>;
    async fn save_categories(&self, user_id: &str, categories: CategorySet) -> Result<(), ReceiptError>;
    /// Union-insert into the user's set (seeded with the defaults when the
    /// user has none yet). Returns the names that were actually new.
    async fn add_categories(&self, user_id: &str, names: &[String]) -> Result<Vec<String>, ReceiptError>;
}

pub mod in_memory;
