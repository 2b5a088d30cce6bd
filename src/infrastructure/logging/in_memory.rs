use crate::core::errors::ReceiptError;
use crate::core::models::audit::AppLog;
use crate::infrastructure::logging::LoggingService;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

/// Audit entries partitioned by acting user.
#[derive(Clone, Default)]
pub struct InMemoryLogging {
    trails: Arc<RwLock<HashMap<String, Vec<AppLog>>>>,
}

impl InMemoryLogging {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl LoggingService for InMemoryLogging {
    async fn log_action(&self, user_id: &str, action: &str, details: serde_json::Value) -> Result<(), ReceiptError> {
        let details = serde_json::from_value(details)
            .map_err(|e| ReceiptError::LoggingError(format!("Audit details for {} must be an object: {}", action, e)))?;
        let entry = AppLog {
            id: Uuid::new_v4().to_string(),
            action: action.to_string(),
            user_id: user_id.to_string(),
            details,
            timestamp: chrono::Utc::now(),
        };

        let mut trails = self.trails.write().await;
        trails.entry(user_id.to_string()).or_default().push(entry);
        Ok(())
    }

    async fn get_logs(&self, user_id: &str) -> Result<Vec<AppLog>, ReceiptError> {
        let trails = self.trails.read().await;
        Ok(trails.get(user_id).cloned().unwrap_or_default())
    }
}
