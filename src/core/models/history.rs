use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Clone, Debug, Serialize, Deserialize, ToSchema, PartialEq)]
pub struct ItemHistoryEntry {
    pub receipt_id: String,
    pub date: String,
    pub store_name: String,
    pub item_name: String,
    pub price: f64,
    pub quantity: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,
    /// Amount spent on the line, the effective price as recorded
    pub total: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
}

impl ItemHistoryEntry {
    pub fn unit_price(&self) -> f64 {
        let quantity = if self.quantity > 0.0 { self.quantity } else { 1.0 };
        self.price / quantity
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, ToSchema, PartialEq)]
pub struct HistoryStats {
    pub min: f64,
    pub max: f64,
    pub avg: f64,
    pub total_spent: f64,
    pub count: usize,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize, ToSchema, PartialEq)]
pub struct ItemHistory {
    pub item_name: String,
    pub entries: Vec<ItemHistoryEntry>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stats: Option<HistoryStats>,
}
