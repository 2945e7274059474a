//! Product CRUD, always scoped to the authenticated owner.

use crate::shiplog::{
    error::ApiError,
    handlers::Data,
    models::{Identity, Product},
    AppState,
};
use axum::{
    extract::{Path, State},
    Extension, Json,
};
use serde::Deserialize;
use tracing::instrument;
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Debug, Deserialize, ToSchema)]
pub struct ProductBody {
    pub name: String,
}

#[utoipa::path(
    get,
    path = "/api/product",
    responses(
        (status = 200, description = "Products owned by the caller", body = [Product]),
        (status = 404, description = "Caller's user row no longer exists"),
    ),
    security(("bearer" = [])),
    tag = "product"
)]
#[instrument(skip(state))]
pub async fn get_products(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
) -> Result<Json<Data<Vec<Product>>>, ApiError> {
    let products = state
        .store
        .products_for_user(identity.id)
        .await?
        .ok_or(ApiError::NotFound)?;

    Ok(Json(Data { data: products }))
}

#[utoipa::path(
    get,
    path = "/api/product/{id}",
    responses(
        (status = 200, description = "The product, or null when not owned by the caller", body = Product),
    ),
    security(("bearer" = [])),
    tag = "product"
)]
#[instrument(skip(state))]
pub async fn get_one_product(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    Path(id): Path<Uuid>,
) -> Result<Json<Data<Option<Product>>>, ApiError> {
    let product = state.store.product_for_owner(id, identity.id).await?;

    Ok(Json(Data { data: product }))
}

#[utoipa::path(
    post,
    path = "/api/product",
    request_body = ProductBody,
    responses(
        (status = 200, description = "Product created", body = Product),
        (status = 400, description = "Empty name"),
    ),
    security(("bearer" = [])),
    tag = "product"
)]
#[instrument(skip(state))]
pub async fn create_product(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    Json(body): Json<ProductBody>,
) -> Result<Json<Data<Product>>, ApiError> {
    if body.name.is_empty() {
        return Err(ApiError::Input);
    }

    let product = state.store.create_product(&body.name, identity.id).await?;

    Ok(Json(Data { data: product }))
}

#[utoipa::path(
    put,
    path = "/api/product/{id}",
    request_body = ProductBody,
    responses(
        (status = 200, description = "Product renamed", body = Product),
        (status = 404, description = "No such product owned by the caller"),
    ),
    security(("bearer" = [])),
    tag = "product"
)]
#[instrument(skip(state))]
pub async fn update_product(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    Path(id): Path<Uuid>,
    Json(body): Json<ProductBody>,
) -> Result<Json<Data<Product>>, ApiError> {
    if body.name.is_empty() {
        return Err(ApiError::Input);
    }

    let product = state
        .store
        .rename_product(id, identity.id, &body.name)
        .await?;

    Ok(Json(Data { data: product }))
}

#[utoipa::path(
    delete,
    path = "/api/product/{id}",
    responses(
        (status = 200, description = "Product deleted, its updates cascade", body = Product),
        (status = 404, description = "No such product owned by the caller"),
    ),
    security(("bearer" = [])),
    tag = "product"
)]
#[instrument(skip(state))]
pub async fn delete_product(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    Path(id): Path<Uuid>,
) -> Result<Json<Data<Product>>, ApiError> {
    let product = state.store.delete_product(id, identity.id).await?;

    Ok(Json(Data { data: product }))
}
