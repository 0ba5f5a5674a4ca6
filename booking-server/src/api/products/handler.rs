//! Product API Handlers

use axum::{
    Json,
    extract::{Extension, Path, Query, State},
};
use serde::Deserialize;
use shared::models::{Product, ProductCreate, ProductUpdate, StockAdjustment};

use crate::audit::{AuditAction, create_delete_details, create_diff, create_snapshot};
use crate::audit_log;
use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::store::repository::product;
use crate::utils::validation::{
    MAX_NAME_LEN, MAX_NOTE_LEN, validate_optional_text, validate_price, validate_required_text,
};
use crate::utils::{AppError, AppResult};

const RESOURCE_PRODUCT: &str = "product";

#[derive(Debug, Default, Deserialize)]
pub struct ListQuery {
    #[serde(default)]
    pub include_inactive: bool,
}

// =============================================================================
// Product Handlers
// =============================================================================

/// GET /api/products - 获取所有商品
pub async fn list(
    State(state): State<ServerState>,
    Query(query): Query<ListQuery>,
) -> AppResult<Json<Vec<Product>>> {
    let products = product::find_all(&state.store, query.include_inactive).await;
    Ok(Json(products))
}

/// GET /api/products/low-stock - 库存不足的商品
pub async fn low_stock(State(state): State<ServerState>) -> AppResult<Json<Vec<Product>>> {
    Ok(Json(product::find_low_stock(&state.store).await))
}

/// GET /api/products/:id - 获取单个商品
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<Product>> {
    let p = state.store.products.require(id).await?;
    Ok(Json(p))
}

/// POST /api/products - 创建商品
pub async fn create(
    State(state): State<ServerState>,
    Extension(current_user): Extension<CurrentUser>,
    Json(payload): Json<ProductCreate>,
) -> AppResult<Json<Product>> {
    validate_required_text(&payload.name, "name", MAX_NAME_LEN)?;
    validate_optional_text(&payload.description, "description", MAX_NOTE_LEN)?;
    validate_price(payload.price, "price")?;

    let p = product::create(&state.store, payload).await?;
    let id = p.id.to_string();

    audit_log!(
        state.audit_service,
        AuditAction::ProductCreated,
        RESOURCE_PRODUCT, &id,
        operator_id = Some(current_user.id.to_string()),
        operator_name = Some(current_user.name.clone()),
        details = create_snapshot(&p, RESOURCE_PRODUCT)
    );

    state
        .broadcast_sync(RESOURCE_PRODUCT, "created", &id, Some(&p))
        .await;

    Ok(Json(p))
}

/// PUT /api/products/:id - 更新商品
pub async fn update(
    State(state): State<ServerState>,
    Extension(current_user): Extension<CurrentUser>,
    Path(id): Path<i64>,
    Json(payload): Json<ProductUpdate>,
) -> AppResult<Json<Product>> {
    if let Some(name) = &payload.name {
        validate_required_text(name, "name", MAX_NAME_LEN)?;
    }
    validate_optional_text(&payload.description, "description", MAX_NOTE_LEN)?;
    if let Some(price) = payload.price {
        validate_price(price, "price")?;
    }

    let (before, p) = product::update(&state.store, id, payload).await?;
    let id = p.id.to_string();

    audit_log!(
        state.audit_service,
        AuditAction::ProductUpdated,
        RESOURCE_PRODUCT, &id,
        operator_id = Some(current_user.id.to_string()),
        operator_name = Some(current_user.name.clone()),
        details = create_diff(&before, &p, RESOURCE_PRODUCT)
    );

    if before.price != p.price {
        audit_log!(
            state.audit_service,
            AuditAction::ProductPriceChanged,
            RESOURCE_PRODUCT, &id,
            operator_id = Some(current_user.id.to_string()),
            operator_name = Some(current_user.name.clone()),
            details = serde_json::json!({
                "name": &p.name,
                "from": before.price,
                "to": p.price,
            })
        );
    }

    state
        .broadcast_sync(RESOURCE_PRODUCT, "updated", &id, Some(&p))
        .await;

    Ok(Json(p))
}

/// POST /api/products/:id/stock - 调整库存 (结果不能为负)
pub async fn adjust_stock(
    State(state): State<ServerState>,
    Extension(current_user): Extension<CurrentUser>,
    Path(id): Path<i64>,
    Json(payload): Json<StockAdjustment>,
) -> AppResult<Json<Product>> {
    if payload.delta == 0 {
        return Err(AppError::validation("delta must not be zero"));
    }

    let p = product::adjust_stock(&state.store, id, payload.delta).await?;
    let id = p.id.to_string();

    audit_log!(
        state.audit_service,
        AuditAction::StockAdjusted,
        RESOURCE_PRODUCT, &id,
        operator_id = Some(current_user.id.to_string()),
        operator_name = Some(current_user.name.clone()),
        details = serde_json::json!({
            "name": &p.name,
            "delta": payload.delta,
            "stock": p.stock,
        })
    );

    if p.is_low_stock() {
        tracing::info!(product_id = p.id, stock = p.stock, min_stock = p.min_stock, "Product stock is low");
    }

    state
        .broadcast_sync(RESOURCE_PRODUCT, "updated", &id, Some(&p))
        .await;

    Ok(Json(p))
}

/// DELETE /api/products/:id - 删除商品
pub async fn delete(
    State(state): State<ServerState>,
    Extension(current_user): Extension<CurrentUser>,
    Path(id): Path<i64>,
) -> AppResult<Json<bool>> {
    let p = state.store.products.delete(id).await?;
    let id = p.id.to_string();

    audit_log!(
        state.audit_service,
        AuditAction::ProductDeleted,
        RESOURCE_PRODUCT, &id,
        operator_id = Some(current_user.id.to_string()),
        operator_name = Some(current_user.name.clone()),
        details = create_delete_details(&p.name)
    );

    state
        .broadcast_sync::<()>(RESOURCE_PRODUCT, "deleted", &id, None)
        .await;

    Ok(Json(true))
}
