//! In-process template store
//!
//! Honours the full [`TemplateStore`] contract without a network: identifiers
//! are fresh UUIDs and creation timestamps strictly increase, so `list`
//! ordering is deterministic even for back-to-back inserts. Every call is
//! counted and a failure can be armed for the next call of a given kind,
//! which makes this store the test double for the session workflow.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use chrono::{DateTime, TimeDelta, Utc};
use uuid::Uuid;

use super::TemplateStore;
use crate::error::{StoreError, StoreResult};
use crate::models::{Template, TemplateFields, TemplateId};

/// Kinds of store calls, used for counting and failure injection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StoreOperation {
    /// `list`
    List,
    /// `create`
    Create,
    /// `update`
    Update,
    /// `delete`
    Delete,
}

#[derive(Debug, Default)]
struct Inner {
    rows: Vec<Template>,
    last_created_at: Option<DateTime<Utc>>,
    calls: HashMap<StoreOperation, usize>,
    armed_failures: HashMap<StoreOperation, String>,
}

impl Inner {
    /// Records the call and returns the armed failure, if any
    fn enter(&mut self, op: StoreOperation) -> StoreResult<()> {
        *self.calls.entry(op).or_default() += 1;
        match self.armed_failures.remove(&op) {
            Some(message) => Err(StoreError::Transport(message)),
            None => Ok(()),
        }
    }

    fn next_timestamp(&mut self) -> DateTime<Utc> {
        let now = Utc::now();
        let ts = match self.last_created_at {
            Some(last) if now <= last => last + TimeDelta::microseconds(1),
            _ => now,
        };
        self.last_created_at = Some(ts);
        ts
    }
}

/// Template store kept in memory
#[derive(Debug, Default)]
pub struct InMemoryTemplateStore {
    inner: Mutex<Inner>,
}

impl InMemoryTemplateStore {
    /// Creates an empty store
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store pre-populated with the given rows
    #[must_use]
    pub fn with_templates(templates: Vec<Template>) -> Self {
        let last_created_at = templates.iter().map(|t| t.created_at).max();
        Self {
            inner: Mutex::new(Inner {
                rows: templates,
                last_created_at,
                ..Inner::default()
            }),
        }
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Makes the next call of the given kind fail with a transport error
    pub fn fail_next(&self, op: StoreOperation, message: impl Into<String>) {
        self.lock().armed_failures.insert(op, message.into());
    }

    /// Number of calls of the given kind so far, failed ones included
    #[must_use]
    pub fn call_count(&self, op: StoreOperation) -> usize {
        self.lock().calls.get(&op).copied().unwrap_or(0)
    }

    /// Number of calls of any kind so far
    #[must_use]
    pub fn total_calls(&self) -> usize {
        self.lock().calls.values().sum()
    }

    /// Snapshot of the stored rows, newest first, without counting a call
    #[must_use]
    pub fn snapshot(&self) -> Vec<Template> {
        let mut rows = self.lock().rows.clone();
        rows.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        rows
    }
}

/// Mirrors the `NOT NULL` / non-empty checks on the remote table
fn check_constraints(fields: &TemplateFields) -> StoreResult<()> {
    fields.validate().map_err(|e| StoreError::Server {
        status: 400,
        message: e.to_string(),
    })
}

#[async_trait]
impl TemplateStore for InMemoryTemplateStore {
    async fn list(&self) -> StoreResult<Vec<Template>> {
        let mut inner = self.lock();
        inner.enter(StoreOperation::List)?;
        let mut rows = inner.rows.clone();
        rows.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(rows)
    }

    async fn create(&self, fields: &TemplateFields) -> StoreResult<Template> {
        let mut inner = self.lock();
        inner.enter(StoreOperation::Create)?;
        check_constraints(fields)?;

        let template = Template {
            id: TemplateId::new(Uuid::new_v4().to_string()),
            title: fields.title.clone(),
            text: fields.text.clone(),
            created_at: inner.next_timestamp(),
        };
        inner.rows.push(template.clone());
        Ok(template)
    }

    async fn update(&self, id: &TemplateId, fields: &TemplateFields) -> StoreResult<Template> {
        let mut inner = self.lock();
        inner.enter(StoreOperation::Update)?;
        check_constraints(fields)?;

        let row = inner
            .rows
            .iter_mut()
            .find(|t| &t.id == id)
            .ok_or_else(|| StoreError::NotFound(id.clone()))?;
        row.title.clone_from(&fields.title);
        row.text.clone_from(&fields.text);
        Ok(row.clone())
    }

    async fn delete(&self, id: &TemplateId) -> StoreResult<()> {
        let mut inner = self.lock();
        inner.enter(StoreOperation::Delete)?;
        inner.rows.retain(|t| &t.id != id);
        Ok(())
    }

    fn backend_id(&self) -> &'static str {
        "memory"
    }
}
