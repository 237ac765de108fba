//! Actor repository.

use crate::models::{Actor, ActorPatch};
use std::collections::BTreeMap;
use tokio::sync::RwLock;

struct Inner {
    rows: BTreeMap<i64, Actor>,
    next_id: i64,
}

/// In-memory actor store.
///
/// Ids are allocated monotonically and never reused within a process
/// lifetime.
pub struct ActorRepository {
    inner: RwLock<Inner>,
}

impl ActorRepository {
    /// Create an empty repository.
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(Inner {
                rows: BTreeMap::new(),
                next_id: 1,
            }),
        }
    }

    /// Insert a new actor and return the stored record.
    pub async fn insert(&self, name: String, age: i32, gender: String) -> Actor {
        let mut inner = self.inner.write().await;
        let id = inner.next_id;
        inner.next_id += 1;

        let actor = Actor {
            id,
            name,
            age,
            gender,
        };
        inner.rows.insert(id, actor.clone());
        actor
    }

    /// List all actors in id order.
    pub async fn list(&self) -> Vec<Actor> {
        let inner = self.inner.read().await;
        inner.rows.values().cloned().collect()
    }

    /// Fetch one actor by id.
    pub async fn get(&self, id: i64) -> Option<Actor> {
        let inner = self.inner.read().await;
        inner.rows.get(&id).cloned()
    }

    /// Apply a partial update.
    ///
    /// Only truthy patch fields change the record: absent fields, empty
    /// strings, and a zero age leave the stored value untouched. Returns
    /// the updated record, or `None` if the id is unknown.
    pub async fn update(&self, id: i64, patch: ActorPatch) -> Option<Actor> {
        let mut inner = self.inner.write().await;
        let actor = inner.rows.get_mut(&id)?;

        if let Some(name) = patch.name.filter(|n| !n.is_empty()) {
            actor.name = name;
        }
        if let Some(age) = patch.age.filter(|a| *a != 0) {
            actor.age = age;
        }
        if let Some(gender) = patch.gender.filter(|g| !g.is_empty()) {
            actor.gender = gender;
        }

        Some(actor.clone())
    }

    /// Delete one actor by id. Returns the deleted id, or `None` if the
    /// id is unknown.
    pub async fn delete(&self, id: i64) -> Option<i64> {
        let mut inner = self.inner.write().await;
        inner.rows.remove(&id).map(|actor| actor.id)
    }
}

impl Default for ActorRepository {
    fn default() -> Self {
        Self::new()
    }
}
