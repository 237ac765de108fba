//! Movie handlers.
//!
//! - `GET /movies?page=N` - paginated listing (`get:movies`)
//! - `POST /movies` - create (`post:movies`)
//! - `PATCH /movies/{id}` - partial update (`patch:movies`)
//! - `DELETE /movies/{id}` - delete (`delete:movies`)

use crate::errors::ApiError;
use crate::handlers::{auth_header, paginate, PageQuery};
use crate::models::{
    DeletedResponse, MovieListResponse, MoviePatch, MovieResponse, NewMovie,
};
use crate::routes::AppState;
use axum::{
    extract::{Path, Query, State},
    http::HeaderMap,
    Json,
};
use std::sync::Arc;
use tracing::{info, instrument};

/// Handler for `GET /movies`.
///
/// Requires the `get:movies` permission. Returns one page of movies; a
/// page beyond the data is a 404.
#[instrument(skip_all, name = "agency.handlers.movies.list")]
pub async fn list_movies(
    State(state): State<Arc<AppState>>,
    Query(query): Query<PageQuery>,
    headers: HeaderMap,
) -> Result<Json<MovieListResponse>, ApiError> {
    state
        .authorizer
        .authorize(auth_header(&headers), "get:movies")
        .await?;

    let rows = state.movies.list().await;
    let movies = paginate(&rows, query.page).ok_or(ApiError::NotFound)?;

    Ok(Json(MovieListResponse {
        success: true,
        movies,
    }))
}

/// Handler for `POST /movies`.
///
/// Requires the `post:movies` permission. All fields are required; a
/// missing or empty field is a 422.
#[instrument(skip_all, name = "agency.handlers.movies.create")]
pub async fn create_movie(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Json(body): Json<NewMovie>,
) -> Result<Json<MovieResponse>, ApiError> {
    state
        .authorizer
        .authorize(auth_header(&headers), "post:movies")
        .await?;

    let (title, release) = body.into_fields().ok_or(ApiError::Unprocessable)?;
    let movie = state.movies.insert(title, release).await;

    info!(target: "agency.handlers.movies", movie_id = movie.id, "Movie created");

    Ok(Json(MovieResponse {
        success: true,
        movie,
    }))
}

/// Handler for `PATCH /movies/{id}`.
///
/// Requires the `patch:movies` permission. Only truthy body fields are
/// applied; an unknown id is a 404.
#[instrument(skip_all, name = "agency.handlers.movies.update", fields(movie_id = %id))]
pub async fn update_movie(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
    headers: HeaderMap,
    Json(body): Json<MoviePatch>,
) -> Result<Json<MovieResponse>, ApiError> {
    state
        .authorizer
        .authorize(auth_header(&headers), "patch:movies")
        .await?;

    let movie = state.movies.update(id, body).await.ok_or(ApiError::NotFound)?;

    info!(target: "agency.handlers.movies", movie_id = movie.id, "Movie updated");

    Ok(Json(MovieResponse {
        success: true,
        movie,
    }))
}

/// Handler for `DELETE /movies/{id}`.
///
/// Requires the `delete:movies` permission. An unknown id is a 404.
#[instrument(skip_all, name = "agency.handlers.movies.delete", fields(movie_id = %id))]
pub async fn delete_movie(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
    headers: HeaderMap,
) -> Result<Json<DeletedResponse>, ApiError> {
    state
        .authorizer
        .authorize(auth_header(&headers), "delete:movies")
        .await?;

    let deleted = state.movies.delete(id).await.ok_or(ApiError::NotFound)?;

    info!(target: "agency.handlers.movies", movie_id = deleted, "Movie deleted");

    Ok(Json(DeletedResponse {
        success: true,
        deleted,
    }))
}
