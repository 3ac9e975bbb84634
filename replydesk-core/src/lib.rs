//! `ReplyDesk` Core Library
//!
//! This crate provides the core functionality for the `ReplyDesk` support
//! template manager: a client for the remote template table, the session
//! workflow that keeps the operator's list and draft consistent with it, and
//! a generative-text assistant for writing and polishing replies.
//!
//! # Crate Structure
//!
//! - [`models`] - Template, draft and assistant payload types
//! - [`store`] - Template store trait, PostgREST client and in-memory store
//! - [`assistant`] - Reply assistant trait, Gemini client and static stub
//! - [`workflow`] - Session state container and the workflow driving it
//! - [`search`] - Local case-insensitive filtering
//! - [`config`] - TOML settings with environment overrides
//! - [`tracing`] - Structured logging setup

// Enable missing_docs warning for public API documentation
#![warn(missing_docs)]

pub mod assistant;
pub mod config;
pub mod error;
pub mod models;
pub mod search;
pub mod store;
pub mod tracing;
pub mod workflow;

pub use assistant::{GeminiAssistant, GeminiConfig, ReplyAssistant, StaticAssistant};
pub use config::{AppConfig, ConfigManager};
pub use error::{
    AssistantError, AssistantResult, ConfigError, ConfigResult, ReplyDeskError, StoreError,
    StoreResult, WorkflowError,
};
pub use models::{Draft, GeneratedTemplate, Screenshot, Template, TemplateFields, TemplateId};
pub use search::{SearchScope, filter_templates};
pub use store::{InMemoryTemplateStore, RestStoreConfig, RestTemplateStore, TemplateStore};
pub use tracing::{TracingConfig, TracingLevel, TracingOutput, init_tracing};
pub use workflow::{SaveOutcome, SessionState, TemplateWorkflow};
