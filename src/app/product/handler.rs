//! 产品处理器

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    Extension,
};

use super::model::{ListQuery, Product, ProductPayload, ProductStats, SearchQuery};
use crate::app::AppState;
use crate::core::error::CoreError;
use crate::core::response::{DeletedResponse, PageResponse, Rejection};

pub async fn list_products(
    State(state): State<AppState>,
    Query(pairs): Query<Vec<(String, String)>>,
) -> Result<Json<PageResponse<Product>>, CoreError> {
    let query = ListQuery::from_pairs(&pairs);
    let page = state.product_service.list_products(&query)?;
    Ok(Json(page))
}

pub async fn search_products(
    State(state): State<AppState>,
    Query(pairs): Query<Vec<(String, String)>>,
) -> Result<Response, CoreError> {
    let query = SearchQuery::from_pairs(&pairs);
    let name = match query.name.as_deref() {
        Some(name) if !name.is_empty() => name,
        _ => return Ok(Rejection::missing_search_name().into_response()),
    };

    let results = state.product_service.search_by_name(name)?;
    Ok(Json(results).into_response())
}

pub async fn product_stats(
    State(state): State<AppState>,
) -> Result<Json<ProductStats>, CoreError> {
    Ok(Json(state.product_service.stats()?))
}

pub async fn get_product(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Product>, CoreError> {
    let product = state.product_service.get_product(&id)?;
    Ok(Json(product))
}

pub async fn create_product(
    State(state): State<AppState>,
    Extension(ProductPayload(fields)): Extension<ProductPayload>,
) -> Result<(StatusCode, Json<Product>), CoreError> {
    let product = state.product_service.create_product(fields)?;
    Ok((StatusCode::CREATED, Json(product)))
}

pub async fn update_product(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Extension(ProductPayload(fields)): Extension<ProductPayload>,
) -> Result<Json<Product>, CoreError> {
    let product = state.product_service.update_product(&id, fields)?;
    Ok(Json(product))
}

pub async fn delete_product(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<DeletedResponse<Product>>, CoreError> {
    let deleted = state.product_service.delete_product(&id)?;
    Ok(Json(DeletedResponse::new(deleted)))
}
