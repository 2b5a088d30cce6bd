use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

pub const DEFAULT_ITEM_CATEGORY: &str = "Other";

fn default_quantity() -> f64 {
    1.0
}

fn default_category() -> String {
    DEFAULT_ITEM_CATEGORY.to_string()
}

/// One purchased line on a receipt.
///
/// `price` is the effective (post-discount) amount of the line, not a unit
/// price.
#[derive(Clone, Debug, Serialize, Deserialize, ToSchema, PartialEq)]
pub struct ReceiptItem {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub generic_name: Option<String>,
    pub price: f64,
    #[serde(default = "default_quantity")]
    pub quantity: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,
    #[serde(default = "default_category")]
    pub category: String,
}

impl ReceiptItem {
    pub fn new(name: impl Into<String>, price: f64) -> Self {
        ReceiptItem {
            name: name.into(),
            generic_name: None,
            price,
            quantity: default_quantity(),
            unit: None,
            category: default_category(),
        }
    }

    pub fn with_quantity(mut self, quantity: f64) -> Self {
        self.quantity = quantity;
        self
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = category.into();
        self
    }

    pub fn with_generic_name(mut self, generic_name: impl Into<String>) -> Self {
        self.generic_name = Some(generic_name.into());
        self
    }

    pub fn with_unit(mut self, unit: impl Into<String>) -> Self {
        self.unit = Some(unit.into());
        self
    }

    /// Amount a batch delete takes off the stored total: `price * max(quantity, 1)`.
    pub fn line_total(&self) -> f64 {
        self.price * self.quantity.max(1.0)
    }

    /// Amount the line adds when a total is rebuilt from scratch. Quantity may
    /// be a weight; only a zero or unreadable quantity counts as one.
    pub fn extended_price(&self) -> f64 {
        let quantity = if self.quantity == 0.0 || self.quantity.is_nan() {
            1.0
        } else {
            self.quantity
        };
        self.price * quantity
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, ToSchema, PartialEq)]
pub struct Receipt {
    pub id: String,
    pub user_id: String,
    pub store_name: String,
    /// Purchase date, `YYYY-MM-DD`
    pub date: String,
    pub category: String,
    pub total_amount: f64,
    pub items: Vec<ReceiptItem>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    pub year_month: String,
    #[schema(value_type = String, example = "2024-06-01T12:34:56Z")]
    pub created_at: DateTime<Utc>,
    #[schema(value_type = String, example = "2024-06-01T12:34:56Z")]
    pub updated_at: DateTime<Utc>,
}

impl Receipt {
    pub fn is_owned_by(&self, user_id: &str) -> bool {
        self.user_id == user_id
    }
}

/// Extraction output handed over at ingestion time.
#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct NewReceipt {
    pub store_name: String,
    pub date: String,
    pub total_amount: f64,
    #[serde(default = "default_category")]
    pub category: String,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub items: Vec<ReceiptItem>,
}

/// Partial update of a receipt's scalar fields. `total_amount` is the
/// explicit user override of the derived total.
#[derive(Clone, Debug, Default, Serialize, Deserialize, ToSchema)]
pub struct ReceiptPatch {
    #[serde(default)]
    pub store_name: Option<String>,
    #[serde(default)]
    pub date: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub total_amount: Option<f64>,
}

impl ReceiptPatch {
    pub fn is_empty(&self) -> bool {
        self.store_name.is_none() && self.date.is_none() && self.category.is_none() && self.total_amount.is_none()
    }
}
