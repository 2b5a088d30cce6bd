pub mod cache_keys;
pub mod in_memory;

use crate::core::errors::ReceiptError;
use crate::core::models::receipt::Receipt;
use async_trait::async_trait;

/// Cached read views of a user's receipts, keyed by view path.
#[async_trait]
pub trait Cache: Send + Sync {
    async fn get_view(&self, path: &str, user_id: &str) -> Result<Option<Vec<Receipt>>, ReceiptError>;
    async fn save_view(
        &self,
        path: &str,
        user_id: &str,
        receipts: &[Receipt],
        ttl: std::time::Duration,
    ) -> Result<(), ReceiptError>;
    /// Marks the view stale so the next read goes to storage.
    async fn invalidate_view(&self, path: &str, user_id: &str) -> Result<(), ReceiptError>;
}
