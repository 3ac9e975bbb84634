//! CLI error types and exit codes.

use replydesk_core::error::{AssistantError, ConfigError, StoreError, WorkflowError};

/// Exit codes for CLI operations
pub mod exit_codes {
    /// General error - configuration, validation, or lookup errors
    pub const GENERAL_ERROR: i32 = 1;
    /// Service failure - the template store or the assistant failed
    pub const SERVICE_FAILURE: i32 = 2;
}

/// CLI error type
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Template not found
    #[error("Template not found: {0}")]
    TemplateNotFound(String),

    /// Invalid input
    #[error("Invalid input: {0}")]
    Validation(String),

    /// Template store failure
    #[error("{0}")]
    Store(String),

    /// Assistant failure
    #[error("{0}")]
    Assistant(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<ConfigError> for CliError {
    fn from(err: ConfigError) -> Self {
        Self::Config(err.to_string())
    }
}

impl From<StoreError> for CliError {
    fn from(err: StoreError) -> Self {
        Self::Store(err.to_string())
    }
}

impl From<AssistantError> for CliError {
    fn from(err: AssistantError) -> Self {
        match err {
            AssistantError::NotConfigured(reason) => Self::Config(reason),
            other => Self::Assistant(other.to_string()),
        }
    }
}

impl From<WorkflowError> for CliError {
    fn from(err: WorkflowError) -> Self {
        if err.is_store_error() {
            Self::Store(err.to_string())
        } else {
            Self::Assistant(err.to_string())
        }
    }
}

impl CliError {
    /// Returns the appropriate exit code for this error type.
    ///
    /// Exit codes:
    /// - 0: Success (not an error)
    /// - 1: General error (configuration, validation, lookup, IO)
    /// - 2: Service failure (store or assistant request failed)
    #[must_use]
    pub const fn exit_code(&self) -> i32 {
        match self {
            Self::Store(_) | Self::Assistant(_) => exit_codes::SERVICE_FAILURE,
            Self::Config(_) | Self::TemplateNotFound(_) | Self::Validation(_) | Self::Io(_) => {
                exit_codes::GENERAL_ERROR
            }
        }
    }
}
