use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::core::errors::ReceiptError;

/// `{ success, message?, error? }` returned to callers of mutating operations.
#[derive(Clone, Debug, Serialize, Deserialize, ToSchema, PartialEq)]
pub struct ActionResult {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ActionResult {
    pub fn ok(message: impl Into<String>) -> Self {
        ActionResult {
            success: true,
            message: Some(message.into()),
            error: None,
        }
    }

    pub fn failure(error: impl Into<String>) -> Self {
        ActionResult {
            success: false,
            message: None,
            error: Some(error.into()),
        }
    }
}

/// Result of applying one receipt's share of a batch.
#[derive(Clone, Debug, Serialize, Deserialize, ToSchema, PartialEq)]
pub struct GroupOutcome {
    pub receipt_id: String,
    pub success: bool,
    /// Whether a write was committed for this receipt
    pub updated: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_amount: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip)]
    pub failure: Option<ReceiptError>,
}

impl GroupOutcome {
    pub fn applied(receipt_id: &str, updated: bool, total_amount: f64) -> Self {
        GroupOutcome {
            receipt_id: receipt_id.to_string(),
            success: true,
            updated,
            total_amount: Some(total_amount),
            error: None,
            failure: None,
        }
    }

    pub fn failed(receipt_id: &str, err: ReceiptError) -> Self {
        GroupOutcome {
            receipt_id: receipt_id.to_string(),
            success: false,
            updated: false,
            total_amount: None,
            error: Some(err.to_string()),
            failure: Some(err),
        }
    }
}

/// Outcome of a whole batch. Groups that succeeded stay committed even
/// when `success` is false.
#[derive(Clone, Debug, Serialize, Deserialize, ToSchema, PartialEq)]
pub struct BatchOutcome {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub groups: Vec<GroupOutcome>,
}

impl BatchOutcome {
    pub fn from_groups(groups: Vec<GroupOutcome>) -> Self {
        let errors: Vec<String> = groups
            .iter()
            .filter_map(|g| g.error.as_ref().map(|e| format!("{}: {}", g.receipt_id, e)))
            .collect();
        if errors.is_empty() {
            BatchOutcome {
                success: true,
                message: Some("Batch updates processed successfully".to_string()),
                error: None,
                groups,
            }
        } else {
            BatchOutcome {
                success: false,
                message: None,
                error: Some(errors.join("; ")),
                groups,
            }
        }
    }

    pub fn group(&self, receipt_id: &str) -> Option<&GroupOutcome> {
        self.groups.iter().find(|g| g.receipt_id == receipt_id)
    }

    pub fn committed_writes(&self) -> usize {
        self.groups.iter().filter(|g| g.updated).count()
    }
}
