//! HTTP request handlers.
//!
//! Every resource handler authorizes the caller first: the raw
//! `Authorization` header and the endpoint's declared permission string go
//! to the [`crate::auth::Authorizer`], and only a success proceeds to the
//! repository.

pub mod actors;
pub mod health;
pub mod metrics;
pub mod movies;

pub use actors::{create_actor, delete_actor, list_actors, update_actor};
pub use health::health_check;
pub use metrics::metrics_handler;
pub use movies::{create_movie, delete_movie, list_movies, update_movie};

use axum::http::{header, HeaderMap};
use serde::Deserialize;

/// Fixed page size for list endpoints.
pub const PAGE_SIZE: usize = 10;

/// Query parameters for paginated list endpoints.
#[derive(Debug, Clone, Deserialize)]
pub struct PageQuery {
    /// 1-based page number; defaults to the first page.
    #[serde(default = "default_page")]
    pub page: usize,
}

fn default_page() -> usize {
    1
}

/// The raw `Authorization` header value, if present and readable.
///
/// A header that is not valid visible-ASCII is treated as absent.
pub(crate) fn auth_header(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
}

/// Slice one page out of a full listing.
///
/// Pages are 1-based and [`PAGE_SIZE`] rows long; a page with no rows
/// (including page 1 of an empty listing) yields `None`.
pub(crate) fn paginate<T: Clone>(rows: &[T], page: usize) -> Option<Vec<T>> {
    let page = page.max(1);
    let start = page.checked_sub(1)?.checked_mul(PAGE_SIZE)?;
    if start >= rows.len() {
        return None;
    }

    let end = start.saturating_add(PAGE_SIZE).min(rows.len());
    rows.get(start..end).map(<[T]>::to_vec)
}
