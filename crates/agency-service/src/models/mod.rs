//! Casting agency data models.
//!
//! Domain records plus the request and response bodies of the HTTP API.

use serde::{Deserialize, Serialize};

/// An actor on the agency's books.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Actor {
    /// Unique actor identifier.
    pub id: i64,

    /// Actor name.
    pub name: String,

    /// Actor age in years.
    pub age: i32,

    /// Actor gender.
    pub gender: String,
}

/// A movie in the agency's catalogue.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Movie {
    /// Unique movie identifier.
    pub id: i64,

    /// Movie title.
    pub title: String,

    /// Release date or year, as supplied by the caller.
    pub release: String,
}

// ============================================================================
// Request bodies
// ============================================================================

/// Body of `POST /actors`. Every field is required; missing or empty
/// fields make the request unprocessable.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NewActor {
    #[serde(default)]
    pub name: Option<String>,

    #[serde(default)]
    pub age: Option<i32>,

    #[serde(default)]
    pub gender: Option<String>,
}

impl NewActor {
    /// Validate the body, yielding the field values or `None` if any
    /// required field is missing or empty.
    pub fn into_fields(self) -> Option<(String, i32, String)> {
        let name = self.name.filter(|n| !n.is_empty())?;
        let age = self.age?;
        let gender = self.gender.filter(|g| !g.is_empty())?;
        Some((name, age, gender))
    }
}

/// Body of `PATCH /actors/{id}`.
///
/// Only fields that are present and truthy are applied; an absent field,
/// an empty string, or a zero age leaves the stored value untouched.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ActorPatch {
    #[serde(default)]
    pub name: Option<String>,

    #[serde(default)]
    pub age: Option<i32>,

    #[serde(default)]
    pub gender: Option<String>,
}

/// Body of `POST /movies`. Every field is required; missing or empty
/// fields make the request unprocessable.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NewMovie {
    #[serde(default)]
    pub title: Option<String>,

    #[serde(default)]
    pub release: Option<String>,
}

impl NewMovie {
    /// Validate the body, yielding the field values or `None` if any
    /// required field is missing or empty.
    pub fn into_fields(self) -> Option<(String, String)> {
        let title = self.title.filter(|t| !t.is_empty())?;
        let release = self.release.filter(|r| !r.is_empty())?;
        Some((title, release))
    }
}

/// Body of `PATCH /movies/{id}`. Same truthy-merge semantics as
/// [`ActorPatch`].
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MoviePatch {
    #[serde(default)]
    pub title: Option<String>,

    #[serde(default)]
    pub release: Option<String>,
}

// ============================================================================
// Response bodies
// ============================================================================

/// Response for `GET /actors`.
#[derive(Debug, Clone, Serialize)]
pub struct ActorListResponse {
    pub success: bool,
    pub actors: Vec<Actor>,
}

/// Response for `POST /actors` and `PATCH /actors/{id}`.
#[derive(Debug, Clone, Serialize)]
pub struct ActorResponse {
    pub success: bool,
    pub actor: Actor,
}

/// Response for `GET /movies`.
#[derive(Debug, Clone, Serialize)]
pub struct MovieListResponse {
    pub success: bool,
    pub movies: Vec<Movie>,
}

/// Response for `POST /movies` and `PATCH /movies/{id}`.
#[derive(Debug, Clone, Serialize)]
pub struct MovieResponse {
    pub success: bool,
    pub movie: Movie,
}

/// Response for `DELETE /actors/{id}` and `DELETE /movies/{id}`.
#[derive(Debug, Clone, Serialize)]
pub struct DeletedResponse {
    pub success: bool,
    pub deleted: i64,
}

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Service health status ("healthy").
    pub status: String,
}
