//! Request-scoped memoization of lookups.
//!
//! [`install`] puts a fresh [`RequestMemo`] into every request's extensions;
//! it is dropped with the request. Handlers and access checks extract it and
//! route repeated lookups (project info, permission rows) through it, so one
//! request hits the database at most once per key.

use std::collections::HashMap;
use std::future::Future;
use std::hash::Hash;
use std::sync::{Arc, Mutex, PoisonError};

use amaxa_core::types::DbId;
use amaxa_db::models::project::ProjectInfo;
use amaxa_db::repositories::{PermissionRepo, ProjectRepo};
use amaxa_db::DbPool;
use axum::extract::{FromRequestParts, Request};
use axum::http::request::Parts;
use axum::middleware::Next;
use axum::response::Response;

/// A map from key to a loaded value.
///
/// Concurrent misses on the same key may each run the loader; the last
/// result wins. Errors are not cached.
#[derive(Debug)]
pub struct Memo<K, V> {
    entries: Mutex<HashMap<K, V>>,
}

impl<K, V> Default for Memo<K, V> {
    fn default() -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
        }
    }
}

impl<K, V> Memo<K, V>
where
    K: Eq + Hash,
    V: Clone,
{
    /// Return the cached value for `key`, or run `load` and cache its result.
    pub async fn get_or_try_load<F, Fut, E>(&self, key: K, load: F) -> Result<V, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<V, E>>,
    {
        let cached = self.lock().get(&key).cloned();
        if let Some(value) = cached {
            return Ok(value);
        }
        let value = load().await?;
        self.lock().insert(key, value.clone());
        Ok(value)
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<K, V>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[derive(Debug, Default)]
struct Lookups {
    projects: Memo<DbId, Option<ProjectInfo>>,
    permissions: Memo<(DbId, DbId), Option<String>>,
}

/// Per-request cache of project and permission lookups.
#[derive(Debug, Clone, Default)]
pub struct RequestMemo {
    inner: Arc<Lookups>,
}

impl RequestMemo {
    /// Project id and name, or `None` if the project does not exist.
    pub async fn project_info(
        &self,
        pool: &DbPool,
        project_id: &str,
    ) -> Result<Option<ProjectInfo>, sqlx::Error> {
        self.inner
            .projects
            .get_or_try_load(project_id.to_string(), || {
                ProjectRepo::find_info(pool, project_id)
            })
            .await
    }

    /// The permission level `user_id` holds on `project_id`, if any.
    pub async fn permission(
        &self,
        pool: &DbPool,
        user_id: &str,
        project_id: &str,
    ) -> Result<Option<String>, sqlx::Error> {
        self.inner
            .permissions
            .get_or_try_load((user_id.to_string(), project_id.to_string()), || {
                PermissionRepo::find_permission(pool, user_id, project_id)
            })
            .await
    }
}

/// Middleware: give each request its own empty [`RequestMemo`].
pub async fn install(mut req: Request, next: Next) -> Response {
    req.extensions_mut().insert(RequestMemo::default());
    next.run(req).await
}

impl<S> FromRequestParts<S> for RequestMemo
where
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    /// Falls back to a fresh memo when [`install`] is not layered.
    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(parts
            .extensions
            .get::<RequestMemo>()
            .cloned()
            .unwrap_or_default())
    }
}
