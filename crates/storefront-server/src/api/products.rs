use axum::{
    extract::{rejection::JsonRejection, Path, Query, State},
    http::StatusCode,
    Extension, Json,
};
use chrono::Utc;
use serde::Serialize;
use storefront_commerce::catalog::{Product, ProductDraft};
use storefront_commerce::search::{query, FilterParams, FilterSpec, Pagination};
use storefront_commerce::ProductId;

use crate::middleware::{AdminUser, RequestId};
use crate::state::AppState;

use super::{map_store_error, parse_body, ApiError, ApiResponse, ResponseMeta};

/// One page of the catalog.
#[derive(Debug, Serialize)]
pub(super) struct ProductPage {
    data: Vec<Product>,
    pagination: Pagination,
    meta: ResponseMeta,
}

#[derive(Debug, Serialize)]
pub(super) struct Deleted {
    id: String,
}

/// Every stored product, oldest first.
pub(super) fn load_products(state: &AppState, request_id: &str) -> Result<Vec<Product>, ApiError> {
    let mut products = state
        .products
        .list()
        .map_err(|e| map_store_error(request_id, &e))?;
    products.sort_by(|a, b| {
        a.created_at
            .cmp(&b.created_at)
            .then_with(|| a.id.as_str().cmp(b.id.as_str()))
    });
    Ok(products)
}

pub(super) async fn list_products(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Query(params): Query<FilterParams>,
) -> Result<Json<ProductPage>, ApiError> {
    let spec = FilterSpec::try_from_params(&params)
        .map_err(|errors| ApiError::validation(&req_id.0, errors))?;
    let products = load_products(&state, &req_id.0)?;

    let result = query(&products, &spec);
    let pagination = result.pagination();
    tracing::debug!(
        total = pagination.total_items,
        page = pagination.page,
        "catalog query"
    );

    Ok(Json(ProductPage {
        data: result.items,
        pagination,
        meta: ResponseMeta::new(req_id.0),
    }))
}

fn find_product(state: &AppState, request_id: &str, id: &str) -> Result<Product, ApiError> {
    state
        .products
        .get(id)
        .map_err(|e| map_store_error(request_id, &e))?
        .ok_or_else(|| ApiError::new(request_id, "not_found", format!("product {id} not found")))
}

pub(super) async fn get_product(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<Product>>, ApiError> {
    let product = find_product(&state, &req_id.0, &id)?;
    Ok(Json(ApiResponse::new(product, req_id.0)))
}

pub(super) async fn create_product(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    AdminUser(admin): AdminUser,
    payload: Result<Json<ProductDraft>, JsonRejection>,
) -> Result<(StatusCode, Json<ApiResponse<Product>>), ApiError> {
    let draft = parse_body(&req_id.0, payload)?;
    let product = draft
        .into_product(ProductId::generate(), Utc::now())
        .map_err(|errors| ApiError::validation(&req_id.0, errors))?;

    let inserted = state
        .products
        .insert_new(product.id.as_str(), &product)
        .map_err(|e| map_store_error(&req_id.0, &e))?;
    if !inserted {
        return Err(ApiError::new(&req_id.0, "conflict", "product id already taken"));
    }

    tracing::info!(product_id = %product.id, admin = %admin.id, "product created");
    Ok((StatusCode::CREATED, Json(ApiResponse::new(product, req_id.0))))
}

pub(super) async fn update_product(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    AdminUser(admin): AdminUser,
    Path(id): Path<String>,
    payload: Result<Json<ProductDraft>, JsonRejection>,
) -> Result<Json<ApiResponse<Product>>, ApiError> {
    let draft = parse_body(&req_id.0, payload)?;
    let mut product = find_product(&state, &req_id.0, &id)?;
    draft
        .apply_to(&mut product)
        .map_err(|errors| ApiError::validation(&req_id.0, errors))?;

    state
        .products
        .put(&id, &product)
        .map_err(|e| map_store_error(&req_id.0, &e))?;

    tracing::info!(product_id = %id, admin = %admin.id, "product updated");
    Ok(Json(ApiResponse::new(product, req_id.0)))
}

pub(super) async fn delete_product(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    AdminUser(admin): AdminUser,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<Deleted>>, ApiError> {
    let existed = state
        .products
        .delete(&id)
        .map_err(|e| map_store_error(&req_id.0, &e))?;
    if !existed {
        return Err(ApiError::new(&req_id.0, "not_found", format!("product {id} not found")));
    }

    tracing::info!(product_id = %id, admin = %admin.id, "product deleted");
    Ok(Json(ApiResponse::new(Deleted { id }, req_id.0)))
}
