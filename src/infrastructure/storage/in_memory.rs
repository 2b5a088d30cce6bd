use crate::core::errors::ReceiptError;
use crate::core::models::{category::CategorySet, receipt::Receipt, receipt::ReceiptItem};
use crate::infrastructure::storage::Storage;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

#[derive(Clone, Default)]
pub struct InMemoryStorage {
    receipts: Arc<RwLock<HashMap<String, Receipt>>>,
    categories: Arc<RwLock<HashMap<String, CategorySet>>>,
}

impl InMemoryStorage {
    pub fn new() -> Self {
        InMemoryStorage {
            receipts: Arc::new(RwLock::new(HashMap::new())),
            categories: Arc::new(RwLock::new(HashMap::new())),
        }
    }
}

#[async_trait]
impl Storage for InMemoryStorage {
    async fn create_receipt(&self, receipt: Receipt) -> Result<Receipt, ReceiptError> {
        let stored = Receipt {
            id: Uuid::new_v4().to_string(),
            ..receipt
        };
        let mut receipts = self.receipts.write().await;
        receipts.insert(stored.id.clone(), stored.clone());
        Ok(stored)
    }

    async fn get_receipt(&self, receipt_id: &str) -> Result<Option<Receipt>, ReceiptError> {
        let receipts = self.receipts.read().await;
        Ok(receipts.get(receipt_id).cloned())
    }

    async fn update_receipt_items(
        &self,
        receipt_id: &str,
        items: Vec<ReceiptItem>,
        total_amount: f64,
        updated_at: DateTime<Utc>,
    ) -> Result<(), ReceiptError> {
        let mut receipts = self.receipts.write().await;
        let receipt = receipts
            .get_mut(receipt_id)
            .ok_or_else(|| ReceiptError::ReceiptNotFound(receipt_id.to_string()))?;
        receipt.items = items;
        receipt.total_amount = total_amount;
        receipt.updated_at = updated_at;
        Ok(())
    }

    async fn save_receipt(&self, receipt: Receipt) -> Result<(), ReceiptError> {
        let mut receipts = self.receipts.write().await;
        receipts.insert(receipt.id.clone(), receipt);
        Ok(())
    }

    async fn delete_receipt(&self, receipt_id: &str) -> Result<(), ReceiptError> {
        let mut receipts = self.receipts.write().await;
        receipts.remove(receipt_id);
        Ok(())
    }

    async fn list_receipts_by_owner(&self, user_id: &str, limit: Option<usize>) -> Result<Vec<Receipt>, ReceiptError> {
        let receipts = self.receipts.read().await;
        let mut owned: Vec<Receipt> = receipts.values().filter(|r| r.user_id == user_id).cloned().collect();
        owned.sort_by(|a, b| b.created_at.cmp(&a.created_at).then_with(|| a.id.cmp(&b.id)));
        if let Some(limit) = limit {
            owned.truncate(limit);
        }
        Ok(owned)
    }

    async fn get_categories(&self, user_id: &str) -> Result<Option<CategorySet>, ReceiptError> {
        let categories = self.categories.read().await;
        Ok(categories.get(user_id).cloned())
    }

    async fn save_categories(&self, user_id: &str, categories: CategorySet) -> Result<(), ReceiptError> {
        let mut stored = self.categories.write().await;
        stored.insert(user_id.to_string(), categories);
        Ok(())
    }

    async fn add_categories(&self, user_id: &str, names: &[String]) -> Result<Vec<String>, ReceiptError> {
        let mut stored = self.categories.write().await;
        let set = stored
            .entry(user_id.to_string())
            .or_insert_with(CategorySet::with_defaults);
        Ok(names.iter().filter(|name| set.insert(name)).cloned().collect())
    }
}
