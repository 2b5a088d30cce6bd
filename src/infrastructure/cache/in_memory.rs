use crate::core::errors::ReceiptError;
use crate::core::models::receipt::Receipt;
use crate::infrastructure::cache::{Cache, cache_keys::view_key};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

#[derive(Clone, Default)]
pub struct InMemoryCache {
    cache: Arc<RwLock<HashMap<String, (Vec<Receipt>, chrono::DateTime<chrono::Utc>)>>>,
}

impl InMemoryCache {
    pub fn new() -> Self {
        InMemoryCache {
            cache: Arc::new(RwLock::new(HashMap::new())),
        }
    }
}

#[async_trait]
impl Cache for InMemoryCache {
    async fn get_view(&self, path: &str, user_id: &str) -> Result<Option<Vec<Receipt>>, ReceiptError> {
        let key = view_key(path, user_id);
        {
            let cache = self.cache.read().await;
            match cache.get(&key) {
                None => return Ok(None),
                Some((receipts, expiry)) if *expiry > chrono::Utc::now() => return Ok(Some(receipts.clone())),
                Some(_) => {}
            }
        }
        // Expired
        self.cache.write().await.remove(&key);
        Ok(None)
    }

    async fn save_view(
        &self,
        path: &str,
        user_id: &str,
        receipts: &[Receipt],
        ttl: std::time::Duration,
    ) -> Result<(), ReceiptError> {
        let expiry = chrono::Utc::now()
            + chrono::Duration::from_std(ttl)
                .map_err(|e| ReceiptError::CacheError(format!("Failed to convert TTL: {}", e)))?;
        let mut cache = self.cache.write().await;
        cache.insert(view_key(path, user_id), (receipts.to_vec(), expiry));
        Ok(())
    }

    async fn invalidate_view(&self, path: &str, user_id: &str) -> Result<(), ReceiptError> {
        let mut cache = self.cache.write().await;
        cache.remove(&view_key(path, user_id));
        Ok(())
    }
}
