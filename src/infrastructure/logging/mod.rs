pub mod in_memory;

use crate::core::errors::ReceiptError;
use crate::core::models::audit::AppLog;
use async_trait::async_trait;

/// Per-user audit trail. Every entry belongs to the user who acted.
#[async_trait]
pub trait LoggingService: Send + Sync {
    async fn log_action(&self, user_id: &str, action: &str, details: serde_json::Value) -> Result<(), ReceiptError>;

    /// Entries recorded for `user_id`, oldest first. Other users' entries are
    /// never returned.
    async fn get_logs(&self, user_id: &str) -> Result<Vec<AppLog>, ReceiptError>;
}
