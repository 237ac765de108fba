//! Actor handlers.
//!
//! - `GET /actors?page=N` - paginated listing (`get:actors`)
//! - `POST /actors` - create (`post:actors`)
//! - `PATCH /actors/{id}` - partial update (`patch:actors`)
//! - `DELETE /actors/{id}` - delete (`delete:actors`)

use crate::errors::ApiError;
use crate::handlers::{auth_header, paginate, PageQuery};
use crate::models::{
    ActorListResponse, ActorPatch, ActorResponse, DeletedResponse, NewActor,
};
use crate::routes::AppState;
use axum::{
    extract::{Path, Query, State},
    http::HeaderMap,
    Json,
};
use std::sync::Arc;
use tracing::{info, instrument};

/// Handler for `GET /actors`.
///
/// Requires the `get:actors` permission. Returns one page of actors; a
/// page beyond the data is a 404.
#[instrument(skip_all, name = "agency.handlers.actors.list")]
pub async fn list_actors(
    State(state): State<Arc<AppState>>,
    Query(query): Query<PageQuery>,
    headers: HeaderMap,
) -> Result<Json<ActorListResponse>, ApiError> {
    state
        .authorizer
        .authorize(auth_header(&headers), "get:actors")
        .await?;

    let rows = state.actors.list().await;
    let actors = paginate(&rows, query.page).ok_or(ApiError::NotFound)?;

    Ok(Json(ActorListResponse {
        success: true,
        actors,
    }))
}

/// Handler for `POST /actors`.
///
/// Requires the `post:actors` permission. All fields are required; a
/// missing or empty field is a 422.
#[instrument(skip_all, name = "agency.handlers.actors.create")]
pub async fn create_actor(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Json(body): Json<NewActor>,
) -> Result<Json<ActorResponse>, ApiError> {
    state
        .authorizer
        .authorize(auth_header(&headers), "post:actors")
        .await?;

    let (name, age, gender) = body.into_fields().ok_or(ApiError::Unprocessable)?;
    let actor = state.actors.insert(name, age, gender).await;

    info!(target: "agency.handlers.actors", actor_id = actor.id, "Actor created");

    Ok(Json(ActorResponse {
        success: true,
        actor,
    }))
}

/// Handler for `PATCH /actors/{id}`.
///
/// Requires the `patch:actors` permission. Only truthy body fields are
/// applied; an unknown id is a 404.
#[instrument(skip_all, name = "agency.handlers.actors.update", fields(actor_id = %id))]
pub async fn update_actor(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
    headers: HeaderMap,
    Json(body): Json<ActorPatch>,
) -> Result<Json<ActorResponse>, ApiError> {
    state
        .authorizer
        .authorize(auth_header(&headers), "patch:actors")
        .await?;

    let actor = state.actors.update(id, body).await.ok_or(ApiError::NotFound)?;

    info!(target: "agency.handlers.actors", actor_id = actor.id, "Actor updated");

    Ok(Json(ActorResponse {
        success: true,
        actor,
    }))
}

/// Handler for `DELETE /actors/{id}`.
///
/// Requires the `delete:actors` permission. An unknown id is a 404.
#[instrument(skip_all, name = "agency.handlers.actors.delete", fields(actor_id = %id))]
pub async fn delete_actor(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
    headers: HeaderMap,
) -> Result<Json<DeletedResponse>, ApiError> {
    state
        .authorizer
        .authorize(auth_header(&headers), "delete:actors")
        .await?;

    let deleted = state.actors.delete(id).await.ok_or(ApiError::NotFound)?;

    info!(target: "agency.handlers.actors", actor_id = deleted, "Actor deleted");

    Ok(Json(DeletedResponse {
        success: true,
        deleted,
    }))
}
