mod history_tests;
mod reconciler_tests;

use std::collections::HashSet;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::core::errors::ReceiptError;
use crate::core::models::category::CategorySet;
use crate::core::models::receipt::{Receipt, ReceiptItem};
use crate::core::services::{ReceiptService, ServiceSettings};
use crate::infrastructure::cache::in_memory::InMemoryCache;
use crate::infrastructure::logging::in_memory::InMemoryLogging;
use crate::infrastructure::storage::Storage;
use crate::infrastructure::storage::in_memory::InMemoryStorage;

pub const TEST_SECRET: &str = "test-secret";

pub type TestService = ReceiptService<InMemoryLogging, InMemoryStorage, InMemoryCache>;

pub fn create_test_service() -> TestService {
    create_test_service_with_storage().0
}

/// Also hands back the storage handle so tests can seed and inspect
/// documents directly.
pub fn create_test_service_with_storage() -> (TestService, InMemoryStorage) {
    let storage = InMemoryStorage::new();
    let logging = InMemoryLogging::new();
    let cache = InMemoryCache::new();
    let service = ReceiptService::new(
        storage.clone(),
        logging,
        cache,
        TEST_SECRET.to_string(),
        ServiceSettings::default(),
    );
    (service, storage)
}

pub fn receipt(id: &str, user_id: &str, total_amount: f64, items: Vec<ReceiptItem>) -> Receipt {
    let now = Utc::now();
    Receipt {
        id: id.to_string(),
        user_id: user_id.to_string(),
        store_name: "Corner Market".to_string(),
        date: "2024-06-01".to_string(),
        category: "Groceries".to_string(),
        total_amount,
        items,
        image_url: None,
        year_month: "2024-06".to_string(),
        created_at: now,
        updated_at: now,
    }
}

/// Items `[{5.00 x1}, {10.00 x2}]` with a stored total of 25.00.
pub fn two_item_receipt(id: &str, user_id: &str) -> Receipt {
    receipt(
        id,
        user_id,
        25.0,
        vec![
            ReceiptItem::new("Bread", 5.0).with_category("Bakery"),
            ReceiptItem::new("Milk", 10.0).with_quantity(2.0).with_category("Groceries"),
        ],
    )
}

pub async fn seed(storage: &impl Storage, receipt: Receipt) {
    storage.save_receipt(receipt).await.unwrap();
}

pub async fn stored(storage: &impl Storage, receipt_id: &str) -> Receipt {
    storage.get_receipt(receipt_id).await.unwrap().unwrap()
}

/// Storage whose item writes fail for selected receipts.
#[derive(Clone, Default)]
pub struct FailingStorage {
    pub inner: InMemoryStorage,
    failing: Arc<Mutex<HashSet<String>>>,
}

impl FailingStorage {
    pub fn fail_writes_for(&self, receipt_id: &str) {
        self.failing.lock().unwrap().insert(receipt_id.to_string());
    }

    fn check(&self, receipt_id: &str) -> Result<(), ReceiptError> {
        if self.failing.lock().unwrap().contains(receipt_id) {
            return Err(ReceiptError::UpstreamFailure(format!("write to {} rejected", receipt_id)));
        }
        Ok(())
    }
}

#[async_trait]
impl Storage for FailingStorage {
    async fn create_receipt(&self, receipt: Receipt) -> Result<Receipt, ReceiptError> {
        self.inner.create_receipt(receipt).await
    }

    async fn get_receipt(&self, receipt_id: &str) -> Result<Option<Receipt>, ReceiptError> {
        self.inner.get_receipt(receipt_id).await
    }

    async fn update_receipt_items(
        &self,
        receipt_id: &str,
        items: Vec<ReceiptItem>,
        total_amount: f64,
        updated_at: DateTime<Utc>,
    ) -> Result<(), ReceiptError> {
        self.check(receipt_id)?;
        self.inner
            .update_receipt_items(receipt_id, items, total_amount, updated_at)
            .await
    }

    async fn save_receipt(&self, receipt: Receipt) -> Result<(), ReceiptError> {
        self.inner.save_receipt(receipt).await
    }

    async fn delete_receipt(&self, receipt_id: &str) -> Result<(), ReceiptError> {
        self.inner.delete_receipt(receipt_id).await
    }

    async fn list_receipts_by_owner(&self, user_id: &str, limit: Option<usize>) -> Result<Vec<Receipt>, ReceiptError> {
        self.inner.list_receipts_by_owner(user_id, limit).await
    }

    async fn get_categories(&self, user_id: &str) -> Result<Option<CategorySet>, ReceiptError> {
        self.inner.get_categories(user_id).await
    }

    async fn save_categories(&self, user_id: &str, categories: CategorySet) -> Result<(), ReceiptError> {
        self.inner.save_categories(user_id, categories).await
    }

    async fn add_categories(&self, user_id: &str, names: &[String]) -> Result<Vec<String>, ReceiptError> {
        self.inner.add_categories(user_id, names).await
    }
}

pub fn create_failing_service() -> (ReceiptService<InMemoryLogging, FailingStorage, InMemoryCache>, FailingStorage) {
    let storage = FailingStorage::default();
    let service = ReceiptService::new(
        storage.clone(),
        InMemoryLogging::new(),
        InMemoryCache::new(),
        TEST_SECRET.to_string(),
        ServiceSettings::default(),
    );
    (service, storage)
}
