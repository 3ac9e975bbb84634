//! Template manager workflow
//!
//! [`SessionState`] is the explicit state container with pure transitions;
//! [`TemplateWorkflow`] drives it against the injected store and assistant.

mod manager;
mod state;

pub use manager::{SaveOutcome, TemplateWorkflow};
pub use state::{SaveRequest, SessionState};
