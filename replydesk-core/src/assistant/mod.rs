//! Generative-text assistant
//!
//! [`ReplyAssistant`] is the capability interface to the text-completion
//! collaborator. It has four operating modes:
//!
//! - `generate`: topic to a structured `{title, text}` template
//! - `rewrite`: text to a friendlier version of the same text
//! - `answer`: free-form question to an answer
//! - `suggest_reply`: conversation screenshot plus context to a reply
//!
//! Failures come back as [`AssistantError`](crate::error::AssistantError);
//! nothing is retried at this layer.

mod gemini;
mod stub;

use std::sync::Arc;

use async_trait::async_trait;

use crate::error::{AssistantError, AssistantResult};
use crate::models::{GeneratedTemplate, Screenshot};

pub use gemini::{DEFAULT_BASE_URL, DEFAULT_MODEL, GeminiAssistant, GeminiConfig};
pub use stub::{AssistantCall, StaticAssistant};

/// Context used for a suggested reply when the operator gives none
pub const NO_CONTEXT_PLACEHOLDER: &str = "No additional context provided.";

/// Returns the context to send with a suggest-reply request
#[must_use]
pub fn effective_context(context: &str) -> &str {
    if context.trim().is_empty() {
        NO_CONTEXT_PLACEHOLDER
    } else {
        context
    }
}

/// Text-completion collaborator used for template authoring
#[async_trait]
pub trait ReplyAssistant: Send + Sync {
    /// Drafts a complete template about `topic`
    async fn generate(&self, topic: &str) -> AssistantResult<GeneratedTemplate>;

    /// Rewrites `text` to be friendlier while keeping its meaning
    async fn rewrite(&self, text: &str) -> AssistantResult<String>;

    /// Answers a free-form question
    async fn answer(&self, question: &str) -> AssistantResult<String>;

    /// Proposes a reply to the conversation shown in `screenshot`
    async fn suggest_reply(&self, screenshot: &Screenshot, context: &str)
    -> AssistantResult<String>;

    /// Short identifier used in logs
    fn backend_id(&self) -> &'static str;
}

#[async_trait]
impl<T: ReplyAssistant + ?Sized> ReplyAssistant for Arc<T> {
    async fn generate(&self, topic: &str) -> AssistantResult<GeneratedTemplate> {
        (**self).generate(topic).await
    }

    async fn rewrite(&self, text: &str) -> AssistantResult<String> {
        (**self).rewrite(text).await
    }

    async fn answer(&self, question: &str) -> AssistantResult<String> {
        (**self).answer(question).await
    }

    async fn suggest_reply(
        &self,
        screenshot: &Screenshot,
        context: &str,
    ) -> AssistantResult<String> {
        (**self).suggest_reply(screenshot, context).await
    }

    fn backend_id(&self) -> &'static str {
        (**self).backend_id()
    }
}

/// Assistant used when no API key is configured
///
/// Every request fails with [`AssistantError::NotConfigured`], so the store
/// side of a session keeps working without credentials for the assistant.
#[derive(Debug, Clone)]
pub struct UnconfiguredAssistant {
    reason: String,
}

impl UnconfiguredAssistant {
    /// Creates an assistant that reports `reason` on every call
    #[must_use]
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }

    fn fail<T>(&self) -> AssistantResult<T> {
        Err(AssistantError::NotConfigured(self.reason.clone()))
    }
}

#[async_trait]
impl ReplyAssistant for UnconfiguredAssistant {
    async fn generate(&self, _topic: &str) -> AssistantResult<GeneratedTemplate> {
        self.fail()
    }

    async fn rewrite(&self, _text: &str) -> AssistantResult<String> {
        self.fail()
    }

    async fn answer(&self, _question: &str) -> AssistantResult<String> {
        self.fail()
    }

    async fn suggest_reply(
        &self,
        _screenshot: &Screenshot,
        _context: &str,
    ) -> AssistantResult<String> {
        self.fail()
    }

    fn backend_id(&self) -> &'static str {
        "unconfigured"
    }
}
