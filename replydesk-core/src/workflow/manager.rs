//! Session workflow driving the store and the assistant
//!
//! [`TemplateWorkflow`] owns a [`SessionState`] together with the two
//! collaborators injected at construction. It sequences the asynchronous
//! steps: save refetches the whole list, delete removes the row locally and
//! only refetches to reconcile after a failure.

use tracing::Instrument;

use super::state::{SaveRequest, SessionState};
use crate::assistant::ReplyAssistant;
use crate::error::WorkflowError;
use crate::models::{Screenshot, Template, TemplateId, TemplateValidationError};
use crate::search::SearchScope;
use crate::store::TemplateStore;
use crate::tracing::span_names;

/// Result of a save request
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SaveOutcome {
    /// A new template was stored
    Created(Template),
    /// An existing template was replaced
    Updated(Template),
    /// The draft was refused locally; nothing was sent
    Rejected(TemplateValidationError),
}

/// Operator session over a template store and a reply assistant
#[derive(Debug)]
pub struct TemplateWorkflow<S, A> {
    store: S,
    assistant: A,
    state: SessionState,
}

impl<S: TemplateStore, A: ReplyAssistant> TemplateWorkflow<S, A> {
    /// Creates a session with an empty list
    ///
    /// Call [`load`](Self::load) to fetch the initial list.
    #[must_use]
    pub fn new(store: S, assistant: A) -> Self {
        Self {
            store,
            assistant,
            state: SessionState::new(),
        }
    }

    /// Sets the initial search scope
    #[must_use]
    pub fn with_search_scope(mut self, scope: SearchScope) -> Self {
        self.state.set_search_scope(scope);
        self
    }

    /// Read access to the session state
    #[must_use]
    pub const fn state(&self) -> &SessionState {
        &self.state
    }

    /// Mutable access for the purely local transitions (select, search, draft edits)
    pub const fn state_mut(&mut self) -> &mut SessionState {
        &mut self.state
    }

    /// The injected store
    #[must_use]
    pub const fn store(&self) -> &S {
        &self.store
    }

    /// The injected assistant
    #[must_use]
    pub const fn assistant(&self) -> &A {
        &self.assistant
    }

    /// Fetches the initial list
    ///
    /// # Errors
    ///
    /// Returns [`WorkflowError::Fetch`] if the store cannot be listed; the
    /// same error is recorded in the state.
    pub async fn load(&mut self) -> Result<usize, WorkflowError> {
        tracing::debug!(store = self.store.backend_id(), "Loading templates");
        self.refresh().await
    }

    /// Replaces the list with the store's current contents
    ///
    /// The previous list stays in place while the request runs and after a
    /// failure.
    ///
    /// # Errors
    ///
    /// Returns [`WorkflowError::Fetch`] if listing fails.
    pub async fn refresh(&mut self) -> Result<usize, WorkflowError> {
        let span = crate::trace_operation!(span_names::WORKFLOW_REFRESH);
        async {
            self.state.begin_refresh();
            let result = self.store.list().await.map_err(|e| WorkflowError::fetch(&e));
            let outcome = result.as_ref().map(Vec::len).map_err(Clone::clone);
            match &outcome {
                Ok(count) => tracing::debug!(count, "Templates refreshed"),
                Err(err) => tracing::warn!(error = %err, "Refresh failed"),
            }
            self.state.finish_refresh(result);
            outcome
        }
        .instrument(span)
        .await
    }

    /// Saves the draft
    ///
    /// A blank title or text is refused without calling the store. An
    /// unbound draft is created and then cleared; a bound draft updates its
    /// template and stays loaded. Either way the list is refetched; a failed
    /// refetch is recorded in the state but does not undo the save.
    ///
    /// # Errors
    ///
    /// Returns [`WorkflowError::Save`] if the store rejects the write. The
    /// list and the draft are unchanged and no refetch happens.
    pub async fn save(&mut self) -> Result<SaveOutcome, WorkflowError> {
        let request = match self.state.prepare_save() {
            Ok(request) => request,
            Err(reason) => {
                tracing::debug!(%reason, "Draft refused");
                return Ok(SaveOutcome::Rejected(reason));
            }
        };

        let span =
            crate::trace_operation!(span_names::WORKFLOW_SAVE, create = request.is_create());
        let result = async {
            match &request {
                SaveRequest::Create(fields) => {
                    self.store.create(fields).await.map(SaveOutcome::Created)
                }
                SaveRequest::Update(id, fields) => {
                    self.store.update(id, fields).await.map(SaveOutcome::Updated)
                }
            }
        }
        .instrument(span)
        .await;

        match result {
            Ok(outcome) => {
                tracing::info!("Template saved");
                self.state.save_succeeded(&request);
                let _ = self.refresh().await;
                Ok(outcome)
            }
            Err(e) => {
                let err = WorkflowError::save(&e);
                tracing::warn!(error = %err, "Save failed");
                self.state.save_failed(err.clone());
                Err(err)
            }
        }
    }

    /// Asks for confirmation before deleting `id`
    pub fn request_delete(&mut self, id: TemplateId) {
        self.state.request_delete(id);
    }

    /// Drops the pending delete
    pub fn cancel_delete(&mut self) {
        self.state.cancel_delete();
    }

    /// Deletes the template awaiting confirmation
    ///
    /// Returns the removed identifier, or `None` when nothing was pending.
    /// On success the row is dropped from the list without a refetch.
    ///
    /// # Errors
    ///
    /// Returns [`WorkflowError::Delete`] if the store call fails. Exactly one
    /// refresh runs afterwards to reconcile the list.
    pub async fn confirm_delete(&mut self) -> Result<Option<TemplateId>, WorkflowError> {
        let Some(id) = self.state.take_pending_delete() else {
            return Ok(None);
        };

        let span = crate::trace_operation!(span_names::WORKFLOW_DELETE, id = %id);
        let result = self.store.delete(&id).instrument(span).await;

        match result {
            Ok(()) => {
                tracing::info!(%id, "Template deleted");
                self.state.delete_succeeded(&id);
                Ok(Some(id))
            }
            Err(e) => {
                let err = WorkflowError::delete(&e);
                tracing::warn!(%id, error = %err, "Delete failed, reconciling");
                self.state.delete_failed(err.clone());
                let _ = self.refresh().await;
                Err(err)
            }
        }
    }

    /// Rewrites the draft text with the assistant
    ///
    /// Returns false without calling the assistant when the text is blank.
    ///
    /// # Errors
    ///
    /// Returns [`WorkflowError::Enhance`] on failure; the draft is unchanged.
    pub async fn enhance_draft(&mut self) -> Result<bool, WorkflowError> {
        let Some(text) = self.state.begin_enhance() else {
            return Ok(false);
        };
        let result = self
            .assistant
            .rewrite(&text)
            .await
            .map_err(|e| WorkflowError::Enhance(e.to_string()));
        let outcome = result.as_ref().map(|_| true).map_err(Clone::clone);
        if let Err(err) = &outcome {
            tracing::warn!(error = %err, "Enhance failed");
        }
        self.state.finish_enhance(result);
        outcome
    }

    /// Fills the draft with a template generated for `topic`
    ///
    /// # Errors
    ///
    /// Returns [`WorkflowError::Generate`] on failure; the draft is unchanged.
    pub async fn generate_draft(&mut self, topic: &str) -> Result<(), WorkflowError> {
        self.state.clear_assist_error();
        let result = self.assistant.generate(topic).await;
        match result {
            Ok(generated) => {
                self.state.apply_generated(generated);
                Ok(())
            }
            Err(e) => Err(self.assist_failed(WorkflowError::Generate(e.to_string()))),
        }
    }

    /// Proposes a reply to the conversation in `screenshot`
    ///
    /// # Errors
    ///
    /// Returns [`WorkflowError::Suggest`] on failure.
    pub async fn suggest_reply(
        &mut self,
        screenshot: &Screenshot,
        context: &str,
    ) -> Result<String, WorkflowError> {
        self.state.clear_assist_error();
        let result = self.assistant.suggest_reply(screenshot, context).await;
        result.map_err(|e| self.assist_failed(WorkflowError::Suggest(e.to_string())))
    }

    /// Answers a free-form question
    ///
    /// # Errors
    ///
    /// Returns [`WorkflowError::Chat`] on failure.
    pub async fn ask(&mut self, question: &str) -> Result<String, WorkflowError> {
        self.state.clear_assist_error();
        let result = self.assistant.answer(question).await;
        result.map_err(|e| self.assist_failed(WorkflowError::Chat(e.to_string())))
    }

    /// Text of a loaded template, as it would be put on the clipboard
    #[must_use]
    pub fn copy_text(&self, id: &TemplateId) -> Option<&str> {
        self.state.template(id).map(|t| t.text.as_str())
    }

    fn assist_failed(&mut self, err: WorkflowError) -> WorkflowError {
        tracing::warn!(error = %err, "Assistant request failed");
        self.state.assist_failed(err.clone());
        err
    }
}
