use crate::{
    api::models::*,
    auth::jwt::Claims,
    core::{
        models::{
            audit::AppLog,
            category::StyledCategory,
            history::ItemHistory,
            outcome::{ActionResult, BatchOutcome},
            receipt::{NewReceipt, Receipt, ReceiptPatch},
        },
        services::ReceiptService,
    },
    infrastructure::{
        cache::in_memory::InMemoryCache, logging::in_memory::InMemoryLogging, storage::in_memory::InMemoryStorage,
    },
};
use axum::{
    Extension, Json, Router,
    extract::{Path, Query, Request, State, rejection::PathRejection},
    http::StatusCode,
    middleware::{self, Next},
    response::IntoResponse,
};
use http::header;

use std::sync::Arc;

pub type AppService = ReceiptService<InMemoryLogging, InMemoryStorage, InMemoryCache>;

// Middleware to validate JWT; the `sub` claim is the acting user
async fn auth_middleware(
    State(service): State<Arc<AppService>>,
    mut req: Request<axum::body::Body>,
    next: Next,
) -> Result<impl IntoResponse, (StatusCode, Json<ActionResult>)> {
    let unauthorized = |msg: String| (StatusCode::UNAUTHORIZED, Json(ActionResult::failure(msg)));

    let auth_header = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .ok_or_else(|| unauthorized("Missing Authorization header".to_string()))?;

    let token = auth_header
        .strip_prefix("Bearer ")
        .ok_or_else(|| unauthorized("Invalid Authorization header".to_string()))?;

    let claims = service.validate_token(token).map_err(|e| unauthorized(e.to_string()))?;
    req.extensions_mut().insert(claims);
    Ok(next.run(req).await)
}

// Define API routes
pub fn api_routes(service: Arc<AppService>) -> Router {
    Router::new()
        .route(
            "/receipts",
            axum::routing::post(create_receipt).get(list_receipts),
        )
        .route("/receipts/search", axum::routing::get(search_receipts))
        .route("/receipts/items/batch", axum::routing::post(batch_update_items))
        .route(
            "/receipts/{receipt_id}",
            axum::routing::get(get_receipt)
                .patch(update_receipt)
                .delete(delete_receipt),
        )
        .route(
            "/receipts/{receipt_id}/items/{item_index}",
            axum::routing::delete(delete_item),
        )
        .route(
            "/receipts/{receipt_id}/items/{item_index}/category",
            axum::routing::put(update_item_category),
        )
        .route("/items/history", axum::routing::get(item_history))
        .route(
            "/categories",
            axum::routing::get(get_categories).post(add_category),
        )
        .route("/logs", axum::routing::get(get_app_logs))
        .route_layer(middleware::from_fn_with_state(service.clone(), auth_middleware))
        .with_state(service)
}

#[utoipa::path(
    post,
    path = "/api/receipts",
    request_body = NewReceipt,
    responses(
        (status = 201, description = "Receipt stored", body = Receipt),
        (status = 400, description = "Invalid extraction output", body = ActionResult),
        (status = 401, description = "Missing or invalid token", body = ActionResult),
        (status = 500, description = "Internal server error", body = ActionResult)
    ),
    security(("Bearer" = []))
)]
pub async fn create_receipt(
    State(service): State<Arc<AppService>>,
    Extension(claims): Extension<Claims>,
    Json(req): Json<NewReceipt>,
) -> Result<(StatusCode, Json<Receipt>), ApiError> {
    let receipt = service.create_receipt(req, &claims.sub).await?;
    Ok((StatusCode::CREATED, Json(receipt)))
}

#[utoipa::path(
    get,
    path = "/api/receipts",
    responses(
        (status = 200, description = "Receipts of the acting user, newest first", body = Vec<Receipt>),
        (status = 401, description = "Missing or invalid token", body = ActionResult)
    ),
    security(("Bearer" = []))
)]
pub async fn list_receipts(
    State(service): State<Arc<AppService>>,
    Extension(claims): Extension<Claims>,
) -> Result<Json<Vec<Receipt>>, ApiError> {
    Ok(Json(service.list_receipts(&claims.sub).await?))
}

#[utoipa::path(
    get,
    path = "/api/receipts/search",
    params(SearchQuery),
    responses(
        (status = 200, description = "Matching receipts", body = Vec<Receipt>),
        (status = 401, description = "Missing or invalid token", body = ActionResult)
    ),
    security(("Bearer" = []))
)]
pub async fn search_receipts(
    State(service): State<Arc<AppService>>,
    Extension(claims): Extension<Claims>,
    Query(query): Query<SearchQuery>,
) -> Result<Json<Vec<Receipt>>, ApiError> {
    Ok(Json(service.search_receipts(&query.q, &claims.sub).await?))
}

#[utoipa::path(
    get,
    path = "/api/receipts/{receipt_id}",
    params(
        ("receipt_id" = String, Path, description = "ID of the receipt")
    ),
    responses(
        (status = 200, description = "Receipt", body = Receipt),
        (status = 403, description = "Receipt owned by another user", body = ActionResult),
        (status = 404, description = "Receipt not found", body = ActionResult)
    ),
    security(("Bearer" = []))
)]
pub async fn get_receipt(
    State(service): State<Arc<AppService>>,
    Extension(claims): Extension<Claims>,
    Path(receipt_id): Path<String>,
) -> Result<Json<Receipt>, ApiError> {
    Ok(Json(service.get_receipt(&receipt_id, &claims.sub).await?))
}

#[utoipa::path(
    patch,
    path = "/api/receipts/{receipt_id}",
    request_body = ReceiptPatch,
    params(
        ("receipt_id" = String, Path, description = "ID of the receipt")
    ),
    responses(
        (status = 200, description = "Receipt updated", body = Receipt),
        (status = 400, description = "Invalid field value", body = ActionResult),
        (status = 403, description = "Receipt owned by another user", body = ActionResult),
        (status = 404, description = "Receipt not found", body = ActionResult)
    ),
    security(("Bearer" = []))
)]
pub async fn update_receipt(
    State(service): State<Arc<AppService>>,
    Extension(claims): Extension<Claims>,
    Path(receipt_id): Path<String>,
    Json(patch): Json<ReceiptPatch>,
) -> Result<Json<Receipt>, ApiError> {
    Ok(Json(service.update_receipt(&receipt_id, &claims.sub, patch).await?))
}

#[utoipa::path(
    delete,
    path = "/api/receipts/{receipt_id}",
    params(
        ("receipt_id" = String, Path, description = "ID of the receipt")
    ),
    responses(
        (status = 200, description = "Receipt deleted", body = ActionResult),
        (status = 403, description = "Receipt owned by another user", body = ActionResult),
        (status = 404, description = "Receipt not found", body = ActionResult)
    ),
    security(("Bearer" = []))
)]
pub async fn delete_receipt(
    State(service): State<Arc<AppService>>,
    Extension(claims): Extension<Claims>,
    Path(receipt_id): Path<String>,
) -> Result<Json<ActionResult>, ApiError> {
    service.delete_receipt(&receipt_id, &claims.sub).await?;
    Ok(Json(ActionResult::ok("Receipt deleted successfully")))
}

#[utoipa::path(
    post,
    path = "/api/receipts/items/batch",
    request_body = BatchUpdateRequest,
    responses(
        (status = 200, description = "Per-receipt outcome; `success` is false when any receipt failed", body = BatchOutcome),
        (status = 401, description = "Missing or invalid token", body = ActionResult)
    ),
    security(("Bearer" = []))
)]
pub async fn batch_update_items(
    State(service): State<Arc<AppService>>,
    Extension(claims): Extension<Claims>,
    Json(req): Json<BatchUpdateRequest>,
) -> Result<Json<BatchOutcome>, ApiError> {
    Ok(Json(service.apply_batch(req.operations, &claims.sub).await?))
}

#[utoipa::path(
    delete,
    path = "/api/receipts/{receipt_id}/items/{item_index}",
    params(
        ("receipt_id" = String, Path, description = "ID of the receipt"),
        ("item_index" = i64, Path, description = "Zero-based position of the item")
    ),
    responses(
        (status = 200, description = "Item deleted", body = ActionResult),
        (status = 400, description = "Invalid or non-numeric item index", body = ActionResult),
        (status = 403, description = "Receipt owned by another user", body = ActionResult),
        (status = 404, description = "Receipt not found", body = ActionResult)
    ),
    security(("Bearer" = []))
)]
pub async fn delete_item(
    State(service): State<Arc<AppService>>,
    Extension(claims): Extension<Claims>,
    path: Result<Path<(String, i64)>, PathRejection>,
) -> Result<Json<ActionResult>, ApiError> {
    let Path((receipt_id, item_index)) = path?;
    service.delete_item(&receipt_id, item_index, &claims.sub).await?;
    Ok(Json(ActionResult::ok("Item deleted successfully")))
}

#[utoipa::path(
    put,
    path = "/api/receipts/{receipt_id}/items/{item_index}/category",
    request_body = UpdateItemCategoryRequest,
    params(
        ("receipt_id" = String, Path, description = "ID of the receipt"),
        ("item_index" = i64, Path, description = "Zero-based position of the item")
    ),
    responses(
        (status = 200, description = "Item category updated", body = ActionResult),
        (status = 400, description = "Invalid or non-numeric item index, or invalid category", body = ActionResult),
        (status = 403, description = "Receipt owned by another user", body = ActionResult),
        (status = 404, description = "Receipt not found", body = ActionResult)
    ),
    security(("Bearer" = []))
)]
pub async fn update_item_category(
    State(service): State<Arc<AppService>>,
    Extension(claims): Extension<Claims>,
    path: Result<Path<(String, i64)>, PathRejection>,
    Json(req): Json<UpdateItemCategoryRequest>,
) -> Result<Json<ActionResult>, ApiError> {
    let Path((receipt_id, item_index)) = path?;
    service
        .update_item_category(&receipt_id, item_index, &req.category, &claims.sub)
        .await?;
    Ok(Json(ActionResult::ok("Item category updated successfully")))
}

#[utoipa::path(
    get,
    path = "/api/items/history",
    params(HistoryQuery),
    responses(
        (status = 200, description = "Purchase history of the item", body = ItemHistory),
        (status = 401, description = "Missing or invalid token", body = ActionResult)
    ),
    security(("Bearer" = []))
)]
pub async fn item_history(
    State(service): State<Arc<AppService>>,
    Extension(claims): Extension<Claims>,
    Query(query): Query<HistoryQuery>,
) -> Result<Json<ItemHistory>, ApiError> {
    let history = service
        .item_history(&query.name, query.generic_name.as_deref(), &claims.sub)
        .await?;
    Ok(Json(history))
}

#[utoipa::path(
    get,
    path = "/api/categories",
    responses(
        (status = 200, description = "Category taxonomy of the acting user", body = Vec<StyledCategory>),
        (status = 401, description = "Missing or invalid token", body = ActionResult)
    ),
    security(("Bearer" = []))
)]
pub async fn get_categories(
    State(service): State<Arc<AppService>>,
    Extension(claims): Extension<Claims>,
) -> Result<Json<Vec<StyledCategory>>, ApiError> {
    Ok(Json(service.get_categories(&claims.sub).await?))
}

#[utoipa::path(
    post,
    path = "/api/categories",
    request_body = AddCategoryRequest,
    responses(
        (status = 200, description = "`added` is false when the category already existed", body = AddCategoryResponse),
        (status = 400, description = "Invalid category name", body = ActionResult)
    ),
    security(("Bearer" = []))
)]
pub async fn add_category(
    State(service): State<Arc<AppService>>,
    Extension(claims): Extension<Claims>,
    Json(req): Json<AddCategoryRequest>,
) -> Result<Json<AddCategoryResponse>, ApiError> {
    let added = service.add_category(&claims.sub, &req.name).await?;
    Ok(Json(AddCategoryResponse { success: true, added }))
}

#[utoipa::path(
    get,
    path = "/api/logs",
    responses(
        (status = 200, description = "Audit entries of the acting user", body = Vec<AppLog>),
        (status = 401, description = "Missing or invalid token", body = ActionResult)
    ),
    security(("Bearer" = []))
)]
pub async fn get_app_logs(
    State(service): State<Arc<AppService>>,
    Extension(claims): Extension<Claims>,
) -> Result<Json<Vec<AppLog>>, ApiError> {
    Ok(Json(service.get_app_logs(&claims.sub).await?))
}
