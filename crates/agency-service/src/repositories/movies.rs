//! Movie repository.

use crate::models::{Movie, MoviePatch};
use std::collections::BTreeMap;
use tokio::sync::RwLock;

struct Inner {
    rows: BTreeMap<i64, Movie>,
    next_id: i64,
}

/// In-memory movie store.
///
/// Ids are allocated monotonically and never reused within a process
/// lifetime.
pub struct MovieRepository {
    inner: RwLock<Inner>,
}

impl MovieRepository {
    /// Create an empty repository.
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(Inner {
                rows: BTreeMap::new(),
                next_id: 1,
            }),
        }
    }

    /// Insert a new movie and return the stored record.
    pub async fn insert(&self, title: String, release: String) -> Movie {
        let mut inner = self.inner.write().await;
        let id = inner.next_id;
        inner.next_id += 1;

        let movie = Movie { id, title, release };
        inner.rows.insert(id, movie.clone());
        movie
    }

    /// List all movies in id order.
    pub async fn list(&self) -> Vec<Movie> {
        let inner = self.inner.read().await;
        inner.rows.values().cloned().collect()
    }

    /// Fetch one movie by id.
    pub async fn get(&self, id: i64) -> Option<Movie> {
        let inner = self.inner.read().await;
        inner.rows.get(&id).cloned()
    }

    /// Apply a partial update.
    ///
    /// Only truthy patch fields change the record: absent fields and empty
    /// strings leave the stored value untouched. Returns the updated
    /// record, or `None` if the id is unknown.
    pub async fn update(&self, id: i64, patch: MoviePatch) -> Option<Movie> {
        let mut inner = self.inner.write().await;
        let movie = inner.rows.get_mut(&id)?;

        if let Some(title) = patch.title.filter(|t| !t.is_empty()) {
            movie.title = title;
        }
        if let Some(release) = patch.release.filter(|r| !r.is_empty()) {
            movie.release = release;
        }

        Some(movie.clone())
    }

    /// Delete one movie by id. Returns the deleted id, or `None` if the
    /// id is unknown.
    pub async fn delete(&self, id: i64) -> Option<i64> {
        let mut inner = self.inner.write().await;
        inner.rows.remove(&id).map(|movie| movie.id)
    }
}

impl Default for MovieRepository {
    fn default() -> Self {
        Self::new()
    }
}
