//! Template store client
//!
//! The store is the remote row-oriented persistence collaborator for
//! templates. [`TemplateStore`] captures its contract:
//!
//! - `list` returns every template, newest `created_at` first, or fails as a
//!   whole
//! - `create` and `update` return the row as persisted, not the input
//! - `update` fails with [`StoreError::NotFound`](crate::error::StoreError::NotFound)
//!   for an unknown identifier
//! - `delete` succeeds when the row is already gone
//!
//! No caching and no retries happen at this layer; a failed attempt reaches
//! the caller immediately.

mod memory;
mod rest;

use std::sync::Arc;

use async_trait::async_trait;

use crate::error::StoreResult;
use crate::models::{Template, TemplateFields, TemplateId};

pub use memory::{InMemoryTemplateStore, StoreOperation};
pub use rest::{DEFAULT_TABLE_NAME, DEFAULT_TIMEOUT_SECS, RestStoreConfig, RestTemplateStore};

/// Remote collection of templates addressable by identifier
#[async_trait]
pub trait TemplateStore: Send + Sync {
    /// Fetches all templates sorted descending by creation time
    async fn list(&self) -> StoreResult<Vec<Template>>;

    /// Inserts a new template; the store assigns `id` and `created_at`
    async fn create(&self, fields: &TemplateFields) -> StoreResult<Template>;

    /// Replaces title and text of the template with the given identifier
    async fn update(&self, id: &TemplateId, fields: &TemplateFields) -> StoreResult<Template>;

    /// Removes the template with the given identifier, if present
    async fn delete(&self, id: &TemplateId) -> StoreResult<()>;

    /// Short identifier used in logs
    fn backend_id(&self) -> &'static str;
}

#[async_trait]
impl<T: TemplateStore + ?Sized> TemplateStore for Arc<T> {
    async fn list(&self) -> StoreResult<Vec<Template>> {
        (**self).list().await
    }

    async fn create(&self, fields: &TemplateFields) -> StoreResult<Template> {
        (**self).create(fields).await
    }

    async fn update(&self, id: &TemplateId, fields: &TemplateFields) -> StoreResult<Template> {
        (**self).update(id, fields).await
    }

    async fn delete(&self, id: &TemplateId) -> StoreResult<()> {
        (**self).delete(id).await
    }

    fn backend_id(&self) -> &'static str {
        (**self).backend_id()
    }
}
