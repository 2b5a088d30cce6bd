use utoipa::{
    Modify, OpenApi,
    openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
};

use crate::{
    api::models::{AddCategoryRequest, AddCategoryResponse, BatchUpdateRequest, UpdateItemCategoryRequest},
    core::models::{
        audit::AppLog,
        category::{CategoryStyle, StyledCategory},
        history::{HistoryStats, ItemHistory, ItemHistoryEntry},
        operation::{ItemAction, ItemOperation},
        outcome::{ActionResult, BatchOutcome, GroupOutcome},
        receipt::{NewReceipt, Receipt, ReceiptItem, ReceiptPatch},
    },
};

struct BearerAuth;

impl Modify for BearerAuth {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "Bearer",
                SecurityScheme::Http(HttpBuilder::new().scheme(HttpAuthScheme::Bearer).bearer_format("JWT").build()),
            );
        }
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        super::handlers::create_receipt,
        super::handlers::list_receipts,
        super::handlers::search_receipts,
        super::handlers::get_receipt,
        super::handlers::update_receipt,
        super::handlers::delete_receipt,
        super::handlers::batch_update_items,
        super::handlers::delete_item,
        super::handlers::update_item_category,
        super::handlers::item_history,
        super::handlers::get_categories,
        super::handlers::add_category,
        super::handlers::get_app_logs
    ),
    components(schemas(
        BatchUpdateRequest,
        UpdateItemCategoryRequest,
        AddCategoryRequest,
        AddCategoryResponse,
        ActionResult,
        BatchOutcome,
        GroupOutcome,
        ItemOperation,
        ItemAction,
        Receipt,
        ReceiptItem,
        NewReceipt,
        ReceiptPatch,
        ItemHistory,
        ItemHistoryEntry,
        HistoryStats,
        StyledCategory,
        CategoryStyle,
        AppLog
    )),
    modifiers(&BearerAuth),
    info(
        title = "Receiptbook API",
        description = "API for storing scanned receipts and reconciling their line items",
        version = "0.1.0"
    )
)]
pub struct ApiDoc;
