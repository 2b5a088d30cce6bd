use axum::{Json, extract::rejection::PathRejection, http::StatusCode, response::IntoResponse};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::core::errors::ReceiptError;
use crate::core::models::{operation::ItemOperation, outcome::ActionResult};

// Request structs for JSON payloads
#[derive(Deserialize, ToSchema)]
pub struct BatchUpdateRequest {
    pub operations: Vec<ItemOperation>,
}

#[derive(Deserialize, ToSchema)]
pub struct UpdateItemCategoryRequest {
    pub category: String,
}

#[derive(Deserialize, ToSchema)]
pub struct AddCategoryRequest {
    pub name: String,
}

#[derive(Serialize, ToSchema)]
pub struct AddCategoryResponse {
    pub success: bool,
    pub added: bool,
}

#[derive(Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct SearchQuery {
    /// Free text matched against store, item and category names
    #[serde(default)]
    pub q: String,
}

#[derive(Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct HistoryQuery {
    /// Display name of the clicked item
    pub name: String,
    pub generic_name: Option<String>,
}

// Newtype wrapper for ReceiptError to implement IntoResponse
pub struct ApiError(pub ReceiptError);

impl From<ReceiptError> for ApiError {
    fn from(err: ReceiptError) -> Self {
        ApiError(err)
    }
}

// Malformed path segments, e.g. a non-numeric item index
impl From<PathRejection> for ApiError {
    fn from(rejection: PathRejection) -> Self {
        ApiError(ReceiptError::invalid_input("path", "Invalid Path", rejection.body_text()))
    }
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match &self.0 {
            ReceiptError::Unauthorized(_) => StatusCode::FORBIDDEN,
            ReceiptError::ReceiptNotFound(_) => StatusCode::NOT_FOUND,
            ReceiptError::InvalidIndex { .. } => StatusCode::BAD_REQUEST,
            ReceiptError::InvalidInput(_, _) => StatusCode::BAD_REQUEST,
            ReceiptError::UpstreamFailure(_) => StatusCode::BAD_GATEWAY,
            ReceiptError::CacheError(_) | ReceiptError::LoggingError(_) | ReceiptError::InternalServerError(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let status = self.status();
        (status, Json(ActionResult::failure(self.0.to_string()))).into_response()
    }
}
