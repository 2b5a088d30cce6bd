use crate::auth::jwt::{Claims, JwtService};
use crate::config::Config;
use crate::constants::{
    CATEGORY_ADDED, DASHBOARD_PATH, ITEM_CATEGORY_UPDATED, ITEM_DELETED, ITEMS_BATCH_UPDATED, MAX_NAME_LENGTH,
    RECEIPT_CREATED, RECEIPT_DELETED, RECEIPT_UPDATED, RECEIPTS_SEARCHED,
};
use crate::core::category_style::styled;
use crate::core::errors::ReceiptError;
use crate::core::history::{build_history, receipt_matches};
use crate::core::models::{
    audit::AppLog,
    category::{CategorySet, StyledCategory},
    history::ItemHistory,
    operation::{ItemAction, ItemOperation},
    outcome::{BatchOutcome, GroupOutcome},
    receipt::{NewReceipt, Receipt, ReceiptPatch},
};
use crate::core::reconciler::{recompute_total, reconcile, validate_index};
use crate::infrastructure::cache::Cache;
use crate::infrastructure::logging::LoggingService;
use crate::infrastructure::storage::Storage;
use chrono::{NaiveDate, Utc};
use futures::future::join_all;
use serde_json::json;
use std::collections::HashMap;
use std::time::Duration;
use tracing::{error, info, warn};

#[derive(Debug, Clone)]
pub struct ServiceSettings {
    pub search_limit: usize,
    pub dashboard_cache_ttl: Duration,
}

impl Default for ServiceSettings {
    fn default() -> Self {
        ServiceSettings::from_config(&Config::default())
    }
}

impl ServiceSettings {
    pub fn from_config(config: &Config) -> Self {
        ServiceSettings {
            search_limit: config.search_limit,
            dashboard_cache_ttl: Duration::from_secs(config.dashboard_cache_ttl_secs),
        }
    }
}

/// Groups operations by receipt, keeping the order in which receipts first
/// appear.
fn group_by_receipt(operations: Vec<ItemOperation>) -> Vec<(String, Vec<ItemOperation>)> {
    let mut positions: HashMap<String, usize> = HashMap::new();
    let mut groups: Vec<(String, Vec<ItemOperation>)> = Vec::new();
    for op in operations {
        match positions.get(&op.receipt_id) {
            Some(&i) => groups[i].1.push(op),
            None => {
                positions.insert(op.receipt_id.clone(), groups.len());
                groups.push((op.receipt_id.clone(), vec![op]));
            }
        }
    }
    groups
}

pub struct ReceiptService<L: LoggingService, S: Storage, C: Cache> {
    storage: S,
    logging: L,
    cache: C,
    settings: ServiceSettings,
    jwt_service: JwtService,
}

impl<L: LoggingService, S: Storage, C: Cache> ReceiptService<L, S, C> {
    pub fn new(storage: S, logging: L, cache: C, jwt_secret: String, settings: ServiceSettings) -> Self {
        ReceiptService {
            storage,
            logging,
            cache,
            settings,
            jwt_service: JwtService::new(jwt_secret),
        }
    }

    pub fn validate_token(&self, token: &str) -> Result<Claims, ReceiptError> {
        self.jwt_service.validate_token(token)
    }

    pub fn issue_token(&self, user_id: &str) -> Result<String, ReceiptError> {
        self.jwt_service.generate_token(user_id)
    }

    fn require_user(&self, user_id: &str) -> Result<(), ReceiptError> {
        if user_id.trim().is_empty() {
            return Err(ReceiptError::Unauthorized("No acting user supplied".to_string()));
        }
        Ok(())
    }

    async fn load_owned(&self, receipt_id: &str, user_id: &str) -> Result<Receipt, ReceiptError> {
        let receipt = self
            .storage
            .get_receipt(receipt_id)
            .await?
            .ok_or_else(|| ReceiptError::ReceiptNotFound(receipt_id.to_string()))?;
        if !receipt.is_owned_by(user_id) {
            warn!("User {} attempted to access receipt {} owned by another user", user_id, receipt_id);
            return Err(ReceiptError::Unauthorized(format!(
                "User {} does not own receipt {}",
                user_id, receipt_id
            )));
        }
        Ok(receipt)
    }

    async fn log_action(
        &self,
        action: &str,
        details: serde_json::Value,
        user_id: &str,
    ) -> Result<(), ReceiptError> {
        self.logging.log_action(user_id, action, details).await
    }

    fn validate_string_input(&self, field: &str, value: &str, max_length: usize) -> Result<(), ReceiptError> {
        if value.trim().is_empty() {
            return Err(ReceiptError::invalid_input(
                field,
                format!("Invalid {}", field),
                format!("{} cannot be empty", field),
            ));
        }
        if value.len() > max_length {
            return Err(ReceiptError::invalid_input(
                field,
                format!("{} Too Long", field),
                format!("{} cannot exceed {} characters", field, max_length),
            ));
        }
        if value.chars().any(|c| c.is_control()) {
            return Err(ReceiptError::invalid_input(
                field,
                format!("Invalid {}", field),
                format!("{} contains invalid characters", field),
            ));
        }
        Ok(())
    }

    fn validate_date_input(&self, field: &str, value: &str) -> Result<NaiveDate, ReceiptError> {
        NaiveDate::parse_from_str(value, "%Y-%m-%d").map_err(|_| {
            ReceiptError::invalid_input(field, "Invalid Date", format!("{} must be formatted as YYYY-MM-DD", field))
        })
    }

    fn validate_amount_input(&self, field: &str, amount: f64) -> Result<(), ReceiptError> {
        if !amount.is_finite() {
            return Err(ReceiptError::invalid_input(
                field,
                "Invalid Amount",
                "Amount must be a finite number",
            ));
        }
        Ok(())
    }

    // RECONCILIATION

    /// Applies item edits that may span many receipts. Each receipt is read,
    /// reconciled and written independently and concurrently; a failing
    /// receipt never undoes another receipt's committed write.
    pub async fn apply_batch(
        &self,
        operations: Vec<ItemOperation>,
        acting_user_id: &str,
    ) -> Result<BatchOutcome, ReceiptError> {
        self.require_user(acting_user_id)?;
        if operations.is_empty() {
            return Ok(BatchOutcome::from_groups(Vec::new()));
        }

        let operation_count = operations.len();
        let groups = group_by_receipt(operations);
        info!(
            "Applying {} item operations across {} receipts for user {}",
            operation_count,
            groups.len(),
            acting_user_id
        );

        let outcomes = join_all(
            groups
                .iter()
                .map(|(receipt_id, ops)| self.apply_group(receipt_id, ops, acting_user_id)),
        )
        .await;
        let outcome = BatchOutcome::from_groups(outcomes);

        if outcome.committed_writes() > 0 {
            if let Err(e) = self.cache.invalidate_view(DASHBOARD_PATH, acting_user_id).await {
                warn!("Failed to invalidate {} for user {}: {}", DASHBOARD_PATH, acting_user_id, e);
            }
        }

        let audit = self
            .log_action(
                ITEMS_BATCH_UPDATED,
                json!({
                    "operations": operation_count,
                    "receipts": outcome.groups.len(),
                    "committed": outcome.committed_writes(),
                    "success": outcome.success,
                }),
                acting_user_id,
            )
            .await;
        if let Err(e) = audit {
            warn!("Failed to record batch audit entry: {}", e);
        }

        Ok(outcome)
    }

    async fn apply_group(&self, receipt_id: &str, ops: &[ItemOperation], user_id: &str) -> GroupOutcome {
        match self.try_apply_group(receipt_id, ops, user_id).await {
            Ok((updated, total)) => GroupOutcome::applied(receipt_id, updated, total),
            Err(e) => {
                match &e {
                    ReceiptError::UpstreamFailure(msg) => {
                        error!("Storage failure while reconciling receipt {}: {}", receipt_id, msg)
                    }
                    other => warn!("Rejected item operations for receipt {}: {}", receipt_id, other),
                }
                GroupOutcome::failed(receipt_id, e)
            }
        }
    }

    async fn try_apply_group(
        &self,
        receipt_id: &str,
        ops: &[ItemOperation],
        user_id: &str,
    ) -> Result<(bool, f64), ReceiptError> {
        for op in ops {
            if let ItemAction::Recategorize { category } = &op.action {
                self.validate_string_input("category", category, MAX_NAME_LENGTH)?;
            }
        }
        let receipt = self.load_owned(receipt_id, user_id).await?;
        let reconciliation = reconcile(&receipt.items, ops)?;
        if !reconciliation.needs_update() {
            return Ok((false, receipt.total_amount));
        }

        let new_total = reconciliation.new_total(receipt.total_amount);
        self.storage
            .update_receipt_items(receipt_id, reconciliation.items, new_total, Utc::now())
            .await?;
        Ok((true, new_total))
    }

    // SINGLE ITEM OPERATIONS

    /// Removes one item and rebuilds the total from the remaining lines.
    pub async fn delete_item(&self, receipt_id: &str, item_index: i64, user_id: &str) -> Result<Receipt, ReceiptError> {
        self.require_user(user_id)?;
        info!("Deleting item {} of receipt {} for user {}", item_index, receipt_id, user_id);
        let mut receipt = self.load_owned(receipt_id, user_id).await?;
        let index = validate_index(item_index, receipt.items.len())?;

        let removed = receipt.items.remove(index);
        receipt.total_amount = recompute_total(&receipt.items);
        receipt.updated_at = Utc::now();
        self.storage
            .update_receipt_items(receipt_id, receipt.items.clone(), receipt.total_amount, receipt.updated_at)
            .await?;
        self.cache.invalidate_view(DASHBOARD_PATH, user_id).await?;

        self.log_action(
            ITEM_DELETED,
            json!({
                "receipt_id": receipt_id,
                "item_index": index,
                "item_name": removed.name,
                "total_amount": receipt.total_amount
            }),
            user_id,
        )
        .await?;
        Ok(receipt)
    }

    /// Changes one item's category. The total is left as stored.
    pub async fn update_item_category(
        &self,
        receipt_id: &str,
        item_index: i64,
        category: &str,
        user_id: &str,
    ) -> Result<Receipt, ReceiptError> {
        self.require_user(user_id)?;
        self.validate_string_input("category", category, MAX_NAME_LENGTH)?;
        info!(
            "Updating category of item {} of receipt {} to '{}' for user {}",
            item_index, receipt_id, category, user_id
        );
        let mut receipt = self.load_owned(receipt_id, user_id).await?;
        let index = validate_index(item_index, receipt.items.len())?;

        receipt.items[index].category = category.to_string();
        receipt.updated_at = Utc::now();
        self.storage
            .update_receipt_items(receipt_id, receipt.items.clone(), receipt.total_amount, receipt.updated_at)
            .await?;
        self.cache.invalidate_view(DASHBOARD_PATH, user_id).await?;

        self.log_action(
            ITEM_CATEGORY_UPDATED,
            json!({ "receipt_id": receipt_id, "item_index": index, "category": category }),
            user_id,
        )
        .await?;
        Ok(receipt)
    }

    // RECEIPTS

    /// Stores extraction output as a new receipt and learns its categories.
    pub async fn create_receipt(&self, new_receipt: NewReceipt, user_id: &str) -> Result<Receipt, ReceiptError> {
        self.require_user(user_id)?;
        self.validate_string_input("store_name", &new_receipt.store_name, MAX_NAME_LENGTH)?;
        let purchased_on = self.validate_date_input("date", &new_receipt.date)?;
        self.validate_string_input("category", &new_receipt.category, MAX_NAME_LENGTH)?;
        self.validate_amount_input("total_amount", new_receipt.total_amount)?;
        for item in &new_receipt.items {
            self.validate_string_input("items.name", &item.name, MAX_NAME_LENGTH)?;
            self.validate_amount_input("items.price", item.price)?;
            self.validate_amount_input("items.quantity", item.quantity)?;
        }

        let now = Utc::now();
        let receipt = Receipt {
            id: String::new(),
            user_id: user_id.to_string(),
            year_month: purchased_on.format("%Y-%m").to_string(),
            store_name: new_receipt.store_name,
            date: new_receipt.date,
            category: new_receipt.category,
            total_amount: new_receipt.total_amount,
            items: new_receipt.items,
            image_url: new_receipt.image_url,
            created_at: now,
            updated_at: now,
        };
        let created = self.storage.create_receipt(receipt).await?;
        info!("Receipt {} created for user {}", created.id, user_id);

        let mut learned: Vec<String> = created.items.iter().map(|i| i.category.clone()).collect();
        learned.push(created.category.clone());
        let added = self.storage.add_categories(user_id, &learned).await?;
        self.cache.invalidate_view(DASHBOARD_PATH, user_id).await?;

        self.log_action(
            RECEIPT_CREATED,
            json!({
                "receipt_id": created.id,
                "store_name": created.store_name,
                "total_amount": created.total_amount,
                "items": created.items.len(),
                "new_categories": added
            }),
            user_id,
        )
        .await?;
        Ok(created)
    }

    pub async fn get_receipt(&self, receipt_id: &str, user_id: &str) -> Result<Receipt, ReceiptError> {
        self.require_user(user_id)?;
        self.load_owned(receipt_id, user_id).await
    }

    /// The dashboard view: every receipt of the user, newest first.
    pub async fn list_receipts(&self, user_id: &str) -> Result<Vec<Receipt>, ReceiptError> {
        self.require_user(user_id)?;
        if let Some(cached) = self.cache.get_view(DASHBOARD_PATH, user_id).await? {
            return Ok(cached);
        }
        let receipts = self.storage.list_receipts_by_owner(user_id, None).await?;
        self.cache
            .save_view(DASHBOARD_PATH, user_id, &receipts, self.settings.dashboard_cache_ttl)
            .await?;
        Ok(receipts)
    }

    /// Merges the scalar fields of `patch`. A supplied `total_amount` is an
    /// explicit override of the derived total.
    pub async fn update_receipt(
        &self,
        receipt_id: &str,
        user_id: &str,
        patch: ReceiptPatch,
    ) -> Result<Receipt, ReceiptError> {
        self.require_user(user_id)?;
        let mut receipt = self.load_owned(receipt_id, user_id).await?;
        if patch.is_empty() {
            return Ok(receipt);
        }

        if let Some(store_name) = patch.store_name {
            self.validate_string_input("store_name", &store_name, MAX_NAME_LENGTH)?;
            receipt.store_name = store_name;
        }
        if let Some(date) = patch.date {
            let purchased_on = self.validate_date_input("date", &date)?;
            receipt.year_month = purchased_on.format("%Y-%m").to_string();
            receipt.date = date;
        }
        if let Some(category) = patch.category {
            self.validate_string_input("category", &category, MAX_NAME_LENGTH)?;
            receipt.category = category;
        }
        if let Some(total_amount) = patch.total_amount {
            self.validate_amount_input("total_amount", total_amount)?;
            receipt.total_amount = total_amount;
        }
        receipt.updated_at = Utc::now();

        self.storage.save_receipt(receipt.clone()).await?;
        self.cache.invalidate_view(DASHBOARD_PATH, user_id).await?;

        self.log_action(
            RECEIPT_UPDATED,
            json!({
                "receipt_id": receipt_id,
                "store_name": receipt.store_name,
                "date": receipt.date,
                "category": receipt.category,
                "total_amount": receipt.total_amount
            }),
            user_id,
        )
        .await?;
        Ok(receipt)
    }

    pub async fn delete_receipt(&self, receipt_id: &str, user_id: &str) -> Result<(), ReceiptError> {
        self.require_user(user_id)?;
        let receipt = self.load_owned(receipt_id, user_id).await?;
        self.storage.delete_receipt(receipt_id).await?;
        self.cache.invalidate_view(DASHBOARD_PATH, user_id).await?;

        self.log_action(
            RECEIPT_DELETED,
            json!({ "receipt_id": receipt_id, "store_name": receipt.store_name }),
            user_id,
        )
        .await?;
        Ok(())
    }

    /// Free-text search over the newest receipts of the user.
    pub async fn search_receipts(&self, query: &str, user_id: &str) -> Result<Vec<Receipt>, ReceiptError> {
        self.require_user(user_id)?;
        let query = query.trim().to_lowercase();
        if query.is_empty() {
            return Ok(Vec::new());
        }

        let receipts = self
            .storage
            .list_receipts_by_owner(user_id, Some(self.settings.search_limit))
            .await?;
        let results: Vec<Receipt> = receipts.into_iter().filter(|r| receipt_matches(&query, r)).collect();

        self.log_action(
            RECEIPTS_SEARCHED,
            json!({ "query": query, "results": results.len() }),
            user_id,
        )
        .await?;
        Ok(results)
    }

    // ITEM HISTORY

    pub async fn item_history(
        &self,
        item_name: &str,
        generic_name: Option<&str>,
        user_id: &str,
    ) -> Result<ItemHistory, ReceiptError> {
        self.require_user(user_id)?;
        let receipts = self.storage.list_receipts_by_owner(user_id, None).await?;
        Ok(build_history(item_name, generic_name, &receipts))
    }

    // CATEGORIES

    pub async fn get_categories(&self, user_id: &str) -> Result<Vec<StyledCategory>, ReceiptError> {
        self.require_user(user_id)?;
        let set = match self.storage.get_categories(user_id).await? {
            Some(set) if !set.is_empty() => set,
            _ => {
                let defaults = CategorySet::with_defaults();
                self.storage.save_categories(user_id, defaults.clone()).await?;
                defaults
            }
        };
        Ok(styled(set.sorted()))
    }

    /// Returns `false` when the user already had the category (compared
    /// case-insensitively).
    pub async fn add_category(&self, user_id: &str, name: &str) -> Result<bool, ReceiptError> {
        self.require_user(user_id)?;
        let name = name.trim();
        self.validate_string_input("category", name, MAX_NAME_LENGTH)?;
        let added = self.storage.add_categories(user_id, &[name.to_string()]).await?;
        if added.is_empty() {
            return Ok(false);
        }

        self.log_action(CATEGORY_ADDED, json!({ "category": name }), user_id).await?;
        Ok(true)
    }

    /// Audit trail of the acting user only.
    pub async fn get_app_logs(&self, user_id: &str) -> Result<Vec<AppLog>, ReceiptError> {
        self.require_user(user_id)?;
        self.logging.get_logs(user_id).await
    }
}
