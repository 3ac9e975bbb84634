//! Error types for `ReplyDesk`
//!
//! Each collaborator has its own error enum. [`WorkflowError`] is what the
//! session surfaces to the operator: one human-readable message per failed
//! action, derived from the underlying store or assistant error.

use thiserror::Error;

use crate::models::TemplateId;

/// Errors raised by the remote template store
#[derive(Debug, Error)]
pub enum StoreError {
    /// The request never produced an HTTP response
    #[error("Store request failed: {0}")]
    Transport(String),

    /// The store answered with a non-success status
    #[error("Store returned HTTP {status}: {message}")]
    Server {
        /// HTTP status code
        status: u16,
        /// Message reported by the store, or the canonical reason
        message: String,
    },

    /// No row matches the identifier (update only)
    #[error("Template {0} not found")]
    NotFound(TemplateId),

    /// The store response could not be decoded
    #[error("Invalid store response: {0}")]
    Decode(String),

    /// The store accepted the write but returned no row
    #[error("Store did not return the written template")]
    MissingRow,

    /// The configured store URL cannot be used
    #[error("Invalid store URL: {0}")]
    InvalidUrl(String),
}

/// Result type for store operations
pub type StoreResult<T> = Result<T, StoreError>;

/// Errors raised by the generative-text assistant
#[derive(Debug, Error)]
pub enum AssistantError {
    /// The request never produced an HTTP response
    #[error("Assistant request failed: {0}")]
    Transport(String),

    /// The API answered with a non-success status
    #[error("Assistant returned HTTP {status}: {message}")]
    Api {
        /// HTTP status code
        status: u16,
        /// Message reported by the API
        message: String,
    },

    /// The API produced no usable text
    #[error("Assistant returned an empty response")]
    EmptyResponse,

    /// The API response could not be decoded
    #[error("Invalid assistant response: {0}")]
    Decode(String),

    /// No API key was configured
    #[error("Assistant is not configured: {0}")]
    NotConfigured(String),
}

/// Result type for assistant operations
pub type AssistantResult<T> = Result<T, AssistantError>;

/// Configuration loading and validation errors
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read or write the configuration file
    #[error("Failed to access configuration: {0}")]
    Io(#[from] std::io::Error),

    /// The configuration file is not valid TOML
    #[error("Failed to parse configuration: {0}")]
    Parse(String),

    /// The configuration could not be serialized
    #[error("Failed to serialize configuration: {0}")]
    Serialize(String),

    /// A setting holds an unusable value
    #[error("Invalid value for {field}: {reason}")]
    Validation {
        /// Setting name
        field: String,
        /// Why the value was rejected
        reason: String,
    },

    /// No configuration directory could be determined
    #[error("Could not determine configuration directory")]
    NoConfigDir,

    /// A required setting is absent
    #[error("Missing required setting: {0}")]
    Missing(String),
}

/// Result type for configuration operations
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Failures surfaced to the operator by the session workflow
///
/// Each variant carries a ready-to-display message. A new failure replaces
/// the previous one; they are never queued.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WorkflowError {
    /// Listing templates failed; the previous list is retained
    #[error("Failed to fetch templates: {0}")]
    Fetch(String),

    /// Create or update failed; the draft is retained
    #[error("Save failed: {0}")]
    Save(String),

    /// Delete failed; the list is reconciled by a refresh
    #[error("Delete failed: {0}")]
    Delete(String),

    /// Rewriting the draft text failed
    #[error("Failed to enhance text with AI: {0}")]
    Enhance(String),

    /// Generating a template from a topic failed
    #[error("Failed to generate template with AI: {0}")]
    Generate(String),

    /// Suggesting a reply from a screenshot failed
    #[error("Failed to get AI suggestion: {0}")]
    Suggest(String),

    /// Answering a free-form question failed
    #[error("Failed to get a response from the chatbot: {0}")]
    Chat(String),
}

impl WorkflowError {
    /// Builds a fetch error from a store failure
    #[must_use]
    pub fn fetch(err: &StoreError) -> Self {
        Self::Fetch(err.to_string())
    }

    /// Builds a save error from a store failure
    #[must_use]
    pub fn save(err: &StoreError) -> Self {
        Self::Save(err.to_string())
    }

    /// Builds a delete error from a store failure
    #[must_use]
    pub fn delete(err: &StoreError) -> Self {
        Self::Delete(err.to_string())
    }

    /// Returns true for errors produced by the template store
    #[must_use]
    pub const fn is_store_error(&self) -> bool {
        matches!(self, Self::Fetch(_) | Self::Save(_) | Self::Delete(_))
    }
}

/// Top-level error for callers that mix collaborators
#[derive(Debug, Error)]
pub enum ReplyDeskError {
    /// Template store error
    #[error(transparent)]
    Store(#[from] StoreError),

    /// Assistant error
    #[error(transparent)]
    Assistant(#[from] AssistantError),

    /// Configuration error
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Workflow error
    #[error(transparent)]
    Workflow(#[from] WorkflowError),
}
