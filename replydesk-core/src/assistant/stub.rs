//! Deterministic assistant
//!
//! Produces canned output derived from its input and records every call.
//! A failure can be armed for the next call.

use std::sync::{Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;

use super::{ReplyAssistant, effective_context};
use crate::error::{AssistantError, AssistantResult};
use crate::models::{GeneratedTemplate, Screenshot};

/// A call received by [`StaticAssistant`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AssistantCall {
    /// `generate(topic)`
    Generate(String),
    /// `rewrite(text)`
    Rewrite(String),
    /// `answer(question)`
    Answer(String),
    /// `suggest_reply`, with the image size and the effective context
    SuggestReply {
        /// Screenshot length in bytes
        image_bytes: usize,
        /// Context after placeholder substitution
        context: String,
    },
}

#[derive(Debug, Default)]
struct State {
    calls: Vec<AssistantCall>,
    armed_failure: Option<String>,
}

/// Assistant returning predictable text without any network access
#[derive(Debug, Default)]
pub struct StaticAssistant {
    state: Mutex<State>,
}

impl StaticAssistant {
    /// Creates a stub with no armed failure
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Makes the next call fail with an API error carrying `message`
    pub fn fail_next(&self, message: impl Into<String>) {
        self.lock().armed_failure = Some(message.into());
    }

    /// Calls received so far, oldest first
    #[must_use]
    pub fn calls(&self) -> Vec<AssistantCall> {
        self.lock().calls.clone()
    }

    fn record(&self, call: AssistantCall) -> AssistantResult<()> {
        let mut state = self.lock();
        state.calls.push(call);
        match state.armed_failure.take() {
            Some(message) => Err(AssistantError::Api {
                status: 503,
                message,
            }),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl ReplyAssistant for StaticAssistant {
    async fn generate(&self, topic: &str) -> AssistantResult<GeneratedTemplate> {
        self.record(AssistantCall::Generate(topic.to_string()))?;
        let topic = topic.trim();
        Ok(GeneratedTemplate {
            title: topic.to_string(),
            text: format!("Thank you for reaching out about {topic}."),
        })
    }

    async fn rewrite(&self, text: &str) -> AssistantResult<String> {
        self.record(AssistantCall::Rewrite(text.to_string()))?;
        Ok(format!("Enhanced: {}", text.trim()))
    }

    async fn answer(&self, question: &str) -> AssistantResult<String> {
        self.record(AssistantCall::Answer(question.to_string()))?;
        Ok(format!("Answer: {}", question.trim()))
    }

    async fn suggest_reply(
        &self,
        screenshot: &Screenshot,
        context: &str,
    ) -> AssistantResult<String> {
        let context = effective_context(context);
        self.record(AssistantCall::SuggestReply {
            image_bytes: screenshot.data.len(),
            context: context.to_string(),
        })?;
        Ok(format!("Suggested reply ({context})"))
    }

    fn backend_id(&self) -> &'static str {
        "static"
    }
}
