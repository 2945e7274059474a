//! Update CRUD. Mutations run through the ownership resolver; a miss is the
//! terminal `Rejected` state: `{"message":"nope"}`, no mutation performed.

use crate::shiplog::{
    error::ApiError,
    handlers::Data,
    models::{Identity, Update},
    ownership::OwnershipResolver,
    store::{NewUpdate, UpdatePatch},
    AppState,
};
use axum::{
    extract::{Path, State},
    Extension, Json,
};
use tracing::instrument;
use uuid::Uuid;

#[utoipa::path(
    get,
    path = "/api/update",
    responses(
        (status = 200, description = "Updates across all of the caller's products", body = [Update]),
    ),
    security(("bearer" = [])),
    tag = "update"
)]
#[instrument(skip(state))]
pub async fn get_updates(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
) -> Result<Json<Data<Vec<Update>>>, ApiError> {
    let resolver = OwnershipResolver::new(state.store.as_ref());
    let updates = resolver.updates_for_user(identity.id).await?;

    Ok(Json(Data { data: updates }))
}

#[utoipa::path(
    get,
    path = "/api/update/{id}",
    responses(
        (status = 200, description = "The update, or null. Not ownership-scoped", body = Update),
    ),
    security(("bearer" = [])),
    tag = "update"
)]
#[instrument(skip(state))]
pub async fn get_one_update(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Data<Option<Update>>>, ApiError> {
    let update = state.store.update_by_id(id).await?;

    Ok(Json(Data { data: update }))
}

#[utoipa::path(
    post,
    path = "/api/update",
    request_body = NewUpdate,
    responses(
        (status = 200, description = "Update created, or {\"message\":\"nope\"} when the product does not exist", body = Update),
    ),
    security(("bearer" = [])),
    tag = "update"
)]
#[instrument(skip(state))]
pub async fn create_update(
    State(state): State<AppState>,
    Json(new): Json<NewUpdate>,
) -> Result<Json<Data<Update>>, ApiError> {
    // Existence check only. The caller is NOT required to own the product;
    // ownership is enforced on mutation, not creation.
    if state.store.product_by_id(new.product_id).await?.is_none() {
        return Err(ApiError::Ownership);
    }

    let update = state.store.create_update(new).await?;

    Ok(Json(Data { data: update }))
}

#[utoipa::path(
    put,
    path = "/api/update/{id}",
    request_body = UpdatePatch,
    responses(
        (status = 200, description = "Update mutated, or {\"message\":\"nope\"} when outside the caller's ownership set", body = Update),
    ),
    security(("bearer" = [])),
    tag = "update"
)]
#[instrument(skip(state))]
pub async fn update_update(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    Path(id): Path<Uuid>,
    Json(patch): Json<UpdatePatch>,
) -> Result<Json<Data<Update>>, ApiError> {
    let resolver = OwnershipResolver::new(state.store.as_ref());

    if resolver.find_owned_update(identity.id, id).await?.is_none() {
        return Err(ApiError::Ownership);
    }

    let update = state.store.edit_update(id, patch).await?;

    Ok(Json(Data { data: update }))
}

#[utoipa::path(
    delete,
    path = "/api/update/{id}",
    responses(
        (status = 200, description = "Update deleted, or {\"message\":\"nope\"} when outside the caller's ownership set", body = Update),
    ),
    security(("bearer" = [])),
    tag = "update"
)]
#[instrument(skip(state))]
pub async fn delete_update(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    Path(id): Path<Uuid>,
) -> Result<Json<Data<Update>>, ApiError> {
    let resolver = OwnershipResolver::new(state.store.as_ref());

    if resolver.find_owned_update(identity.id, id).await?.is_none() {
        return Err(ApiError::Ownership);
    }

    let update = state.store.delete_update(id).await?;

    Ok(Json(Data { data: update }))
}
