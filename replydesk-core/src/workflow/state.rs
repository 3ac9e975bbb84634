//! Session state and its transitions
//!
//! [`SessionState`] holds everything one operator session sees: the loaded
//! list, the search box, the draft and the loading/error flags. Every change
//! goes through a method here, so the rules can be tested without a store,
//! an assistant or a runtime. Methods that start an asynchronous step
//! (`begin_*`, `prepare_save`, `take_pending_delete`) return what the step
//! needs; the matching `finish_*` or `*_succeeded`/`*_failed` method applies
//! the outcome.

use crate::error::WorkflowError;
use crate::models::{Draft, GeneratedTemplate, Template, TemplateFields, TemplateId, TemplateValidationError};
use crate::search::{SearchScope, filter_templates};

/// Store call a save resolves to
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SaveRequest {
    /// Insert a new row
    Create(TemplateFields),
    /// Replace title and text of an existing row
    Update(TemplateId, TemplateFields),
}

impl SaveRequest {
    /// Returns true for a create
    #[must_use]
    pub const fn is_create(&self) -> bool {
        matches!(self, Self::Create(_))
    }

    /// Payload sent to the store
    #[must_use]
    pub const fn fields(&self) -> &TemplateFields {
        match self {
            Self::Create(fields) | Self::Update(_, fields) => fields,
        }
    }
}

/// State of one operator session
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionState {
    templates: Vec<Template>,
    search_term: String,
    search_scope: SearchScope,
    draft: Draft,
    is_loading: bool,
    error: Option<WorkflowError>,
    pending_delete: Option<TemplateId>,
    is_enhancing: bool,
    assist_error: Option<WorkflowError>,
}

impl SessionState {
    /// Creates an empty session
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty session searching with the given scope
    #[must_use]
    pub fn with_search_scope(scope: SearchScope) -> Self {
        Self {
            search_scope: scope,
            ..Self::default()
        }
    }

    // ========== Accessors ==========

    /// Templates from the last successful fetch, newest first
    #[must_use]
    pub fn templates(&self) -> &[Template] {
        &self.templates
    }

    /// Looks up a loaded template
    #[must_use]
    pub fn template(&self, id: &TemplateId) -> Option<&Template> {
        self.templates.iter().find(|t| &t.id == id)
    }

    /// Current search term
    #[must_use]
    pub fn search_term(&self) -> &str {
        &self.search_term
    }

    /// Current search scope
    #[must_use]
    pub const fn search_scope(&self) -> SearchScope {
        self.search_scope
    }

    /// Current draft
    #[must_use]
    pub const fn draft(&self) -> &Draft {
        &self.draft
    }

    /// True while a fetch is in flight
    #[must_use]
    pub const fn is_loading(&self) -> bool {
        self.is_loading
    }

    /// Last store-related failure, if any
    #[must_use]
    pub const fn error(&self) -> Option<&WorkflowError> {
        self.error.as_ref()
    }

    /// Template awaiting delete confirmation
    #[must_use]
    pub const fn pending_delete(&self) -> Option<&TemplateId> {
        self.pending_delete.as_ref()
    }

    /// True while an assistant rewrite is in flight
    #[must_use]
    pub const fn is_enhancing(&self) -> bool {
        self.is_enhancing
    }

    /// Last assistant failure, if any
    #[must_use]
    pub const fn assist_error(&self) -> Option<&WorkflowError> {
        self.assist_error.as_ref()
    }

    /// Templates matching the search box, in list order
    #[must_use]
    pub fn visible_templates(&self) -> Vec<&Template> {
        filter_templates(&self.templates, &self.search_term, self.search_scope)
    }

    // ========== Draft ==========

    /// Loads a template into the draft for editing
    pub fn select(&mut self, template: &Template) {
        self.draft = Draft::from_template(template);
    }

    /// Loads the loaded template with `id` into the draft
    ///
    /// Returns false, leaving the draft alone, if no such template is loaded.
    pub fn select_by_id(&mut self, id: &TemplateId) -> bool {
        let Some(template) = self.template(id).cloned() else {
            return false;
        };
        self.select(&template);
        true
    }

    /// Resets the draft to an empty, unbound one
    pub fn clear_draft(&mut self) {
        self.draft = Draft::default();
    }

    /// Replaces the draft title
    pub fn set_draft_title(&mut self, title: impl Into<String>) {
        self.draft.title = title.into();
    }

    /// Replaces the draft text
    pub fn set_draft_text(&mut self, text: impl Into<String>) {
        self.draft.text = text.into();
    }

    // ========== Search ==========

    /// Replaces the search term
    pub fn set_search(&mut self, term: impl Into<String>) {
        self.search_term = term.into();
    }

    /// Replaces the search scope
    pub const fn set_search_scope(&mut self, scope: SearchScope) {
        self.search_scope = scope;
    }

    // ========== Refresh ==========

    /// Marks a fetch as started; the current list stays visible
    pub const fn begin_refresh(&mut self) {
        self.is_loading = true;
    }

    /// Applies the outcome of a fetch
    ///
    /// Success replaces the list and clears a previous fetch error. Failure
    /// keeps the list and records the error.
    pub fn finish_refresh(&mut self, result: Result<Vec<Template>, WorkflowError>) {
        self.is_loading = false;
        match result {
            Ok(templates) => {
                self.templates = templates;
                if matches!(self.error, Some(WorkflowError::Fetch(_))) {
                    self.error = None;
                }
            }
            Err(err) => self.error = Some(err),
        }
    }

    // ========== Save ==========

    /// Turns the draft into a store call
    ///
    /// # Errors
    ///
    /// Returns the validation failure when the title or the text is blank.
    /// The state is not touched in that case.
    pub fn prepare_save(&self) -> Result<SaveRequest, TemplateValidationError> {
        let fields = self.draft.to_fields();
        fields.validate()?;
        Ok(match &self.draft.editing_id {
            Some(id) => SaveRequest::Update(id.clone(), fields),
            None => SaveRequest::Create(fields),
        })
    }

    /// Applies a successful save; a create also clears the draft
    pub fn save_succeeded(&mut self, request: &SaveRequest) {
        self.error = None;
        if request.is_create() {
            self.clear_draft();
        }
    }

    /// Records a failed save; list and draft are left as they were
    pub fn save_failed(&mut self, err: WorkflowError) {
        self.error = Some(err);
    }

    // ========== Delete ==========

    /// Asks for confirmation before deleting `id`
    pub fn request_delete(&mut self, id: TemplateId) {
        self.pending_delete = Some(id);
    }

    /// Drops a pending delete without touching the store
    pub fn cancel_delete(&mut self) {
        self.pending_delete = None;
    }

    /// Confirms the pending delete, returning the identifier to remove
    pub const fn take_pending_delete(&mut self) -> Option<TemplateId> {
        self.pending_delete.take()
    }

    /// Removes a deleted template from the list without refetching
    ///
    /// A draft bound to the removed template keeps its text but becomes
    /// unbound, so saving it again creates a new template.
    pub fn delete_succeeded(&mut self, id: &TemplateId) {
        self.templates.retain(|t| &t.id != id);
        if self.draft.editing_id.as_ref() == Some(id) {
            self.draft.editing_id = None;
        }
        self.error = None;
    }

    /// Records a failed delete; the caller reconciles with a refresh
    pub fn delete_failed(&mut self, err: WorkflowError) {
        self.error = Some(err);
    }

    // ========== Assistant ==========

    /// Starts a rewrite of the draft text
    ///
    /// Returns the text to rewrite, or `None` (no state change) when the
    /// draft text is blank.
    pub fn begin_enhance(&mut self) -> Option<String> {
        if self.draft.text.trim().is_empty() {
            return None;
        }
        self.is_enhancing = true;
        self.assist_error = None;
        Some(self.draft.text.clone())
    }

    /// Applies the outcome of a rewrite
    pub fn finish_enhance(&mut self, result: Result<String, WorkflowError>) {
        self.is_enhancing = false;
        match result {
            Ok(text) => self.draft.text = text,
            Err(err) => self.assist_error = Some(err),
        }
    }

    /// Fills the draft from a generated template, keeping its binding
    pub fn apply_generated(&mut self, generated: GeneratedTemplate) {
        self.draft.title = generated.title;
        self.draft.text = generated.text;
        self.assist_error = None;
    }

    /// Clears a previous assistant failure before a new request
    pub fn clear_assist_error(&mut self) {
        self.assist_error = None;
    }

    /// Records an assistant failure
    pub fn assist_failed(&mut self, err: WorkflowError) {
        self.assist_error = Some(err);
    }
}
