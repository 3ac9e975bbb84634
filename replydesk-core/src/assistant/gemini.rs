//! Gemini `generateContent` client

use std::time::Duration;

use async_trait::async_trait;
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use reqwest::Url;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use tracing::Instrument;

use super::{ReplyAssistant, effective_context};
use crate::error::{AssistantError, AssistantResult};
use crate::models::{GeneratedTemplate, Screenshot};
use crate::tracing::span_names;

/// Model used unless configured otherwise
pub const DEFAULT_MODEL: &str = "gemini-2.5-flash";

/// Public API root
pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

const REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

/// Connection settings for [`GeminiAssistant`]
#[derive(Debug, Clone)]
pub struct GeminiConfig {
    /// API key sent as `x-goog-api-key`
    pub api_key: SecretString,
    /// Model name, e.g. `gemini-2.5-flash`
    pub model: String,
    /// API root without the `/models/...` suffix
    pub base_url: String,
    /// Per-request timeout
    pub timeout: Duration,
}

impl GeminiConfig {
    /// Creates a configuration for the default model and endpoint
    #[must_use]
    pub fn new(api_key: SecretString) -> Self {
        Self {
            api_key,
            model: DEFAULT_MODEL.to_string(),
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: REQUEST_TIMEOUT,
        }
    }

    /// Sets the model name
    #[must_use]
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Sets the API root
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }
}

/// A single content part of a request
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
enum Part {
    Text(String),
    InlineData {
        #[serde(rename = "mimeType")]
        mime_type: String,
        data: String,
    },
}

#[derive(Debug, Serialize)]
struct Content {
    parts: Vec<Part>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateRequest {
    contents: Vec<Content>,
    #[serde(skip_serializing_if = "Option::is_none")]
    generation_config: Option<Value>,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Debug, Deserialize)]
struct CandidatePart {
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    error: ApiErrorDetail,
}

#[derive(Debug, Deserialize)]
struct ApiErrorDetail {
    message: String,
}

impl GenerateResponse {
    /// Concatenated text of the first candidate, trimmed
    fn text(self) -> AssistantResult<String> {
        let text: String = self
            .candidates
            .into_iter()
            .next()
            .and_then(|c| c.content)
            .map(|c| c.parts.into_iter().filter_map(|p| p.text).collect())
            .unwrap_or_default();

        let trimmed = text.trim();
        if trimmed.is_empty() {
            return Err(AssistantError::EmptyResponse);
        }
        Ok(trimmed.to_string())
    }
}

fn rewrite_prompt(text: &str) -> String {
    format!(
        "You are an expert in customer communication. Enhance the following text to be more \
         friendly, professional, and empathetic, while keeping the core message intact. Correct \
         any grammar or spelling mistakes. Return only the enhanced text. Text to enhance: \"{text}\""
    )
}

fn generate_prompt(topic: &str) -> String {
    format!(
        "You are an expert in customer communication. Write a reusable customer support reply \
         template about the following topic. Keep it friendly, professional, and empathetic. \
         Respond with a JSON object holding a short \"title\" and the reply \"text\". Topic: \"{topic}\""
    )
}

fn suggest_prompt(context: &str) -> String {
    format!(
        "You are a friendly and helpful customer support assistant. Analyze the attached \
         screenshot of a customer chat. Based on the conversation and the following context, \
         generate a warm, empathetic, and helpful reply to the customer. Context: \"{context}\". \
         Return only the suggested reply."
    )
}

fn template_schema() -> Value {
    json!({
        "responseMimeType": "application/json",
        "responseSchema": {
            "type": "OBJECT",
            "properties": {
                "title": { "type": "STRING" },
                "text": { "type": "STRING" }
            },
            "required": ["title", "text"]
        }
    })
}

/// Assistant backed by the Gemini REST API
pub struct GeminiAssistant {
    client: reqwest::Client,
    endpoint: Url,
    model: String,
    api_key: SecretString,
}

impl std::fmt::Debug for GeminiAssistant {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeminiAssistant")
            .field("endpoint", &self.endpoint.as_str())
            .field("model", &self.model)
            .finish_non_exhaustive()
    }
}

impl GeminiAssistant {
    /// Creates a client from its configuration
    ///
    /// # Errors
    ///
    /// Returns an error if the base URL is invalid or the HTTP client cannot
    /// be built.
    pub fn new(config: GeminiConfig) -> AssistantResult<Self> {
        let base = config.base_url.trim_end_matches('/');
        let endpoint = Url::parse(&format!(
            "{base}/models/{model}:generateContent",
            model = config.model
        ))
        .map_err(|e| AssistantError::NotConfigured(format!("{}: {e}", config.base_url)))?;

        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| AssistantError::Transport(e.to_string()))?;

        Ok(Self {
            client,
            endpoint,
            model: config.model,
            api_key: config.api_key,
        })
    }

    async fn generate_content(&self, request: &GenerateRequest) -> AssistantResult<String> {
        let response = self
            .client
            .post(self.endpoint.clone())
            .header("x-goog-api-key", self.api_key.expose_secret())
            .json(request)
            .send()
            .await
            .map_err(|e| AssistantError::Transport(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| AssistantError::Transport(e.to_string()))?;

        if !status.is_success() {
            let message = serde_json::from_str::<ApiErrorBody>(&body)
                .map(|b| b.error.message)
                .unwrap_or_else(|_| {
                    status
                        .canonical_reason()
                        .unwrap_or("Unknown error")
                        .to_string()
                });
            return Err(AssistantError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let parsed: GenerateResponse =
            serde_json::from_str(&body).map_err(|e| AssistantError::Decode(e.to_string()))?;
        parsed.text()
    }

    async fn prompt(&self, prompt: String) -> AssistantResult<String> {
        let request = GenerateRequest {
            contents: vec![Content {
                parts: vec![Part::Text(prompt)],
            }],
            generation_config: None,
        };
        self.generate_content(&request).await
    }
}

#[async_trait]
impl ReplyAssistant for GeminiAssistant {
    async fn generate(&self, topic: &str) -> AssistantResult<GeneratedTemplate> {
        let span = crate::trace_operation_debug!(span_names::ASSISTANT_GENERATE, model = %self.model);
        async {
            let request = GenerateRequest {
                contents: vec![Content {
                    parts: vec![Part::Text(generate_prompt(topic))],
                }],
                generation_config: Some(template_schema()),
            };
            let raw = self.generate_content(&request).await?;
            let generated: GeneratedTemplate =
                serde_json::from_str(&raw).map_err(|e| AssistantError::Decode(e.to_string()))?;
            if generated.title.trim().is_empty() || generated.text.trim().is_empty() {
                return Err(AssistantError::EmptyResponse);
            }
            Ok(GeneratedTemplate {
                title: generated.title.trim().to_string(),
                text: generated.text.trim().to_string(),
            })
        }
        .instrument(span)
        .await
    }

    async fn rewrite(&self, text: &str) -> AssistantResult<String> {
        let span = crate::trace_operation_debug!(span_names::ASSISTANT_REWRITE, model = %self.model);
        self.prompt(rewrite_prompt(text)).instrument(span).await
    }

    async fn answer(&self, question: &str) -> AssistantResult<String> {
        let span = crate::trace_operation_debug!(span_names::ASSISTANT_ANSWER, model = %self.model);
        self.prompt(question.to_string()).instrument(span).await
    }

    async fn suggest_reply(
        &self,
        screenshot: &Screenshot,
        context: &str,
    ) -> AssistantResult<String> {
        let span = crate::trace_operation_debug!(
            span_names::ASSISTANT_SUGGEST,
            model = %self.model,
            image_bytes = screenshot.data.len()
        );
        let request = GenerateRequest {
            contents: vec![Content {
                parts: vec![
                    Part::InlineData {
                        mime_type: screenshot.mime_type.clone(),
                        data: STANDARD.encode(&screenshot.data),
                    },
                    Part::Text(suggest_prompt(effective_context(context))),
                ],
            }],
            generation_config: None,
        };
        self.generate_content(&request).instrument(span).await
    }

    fn backend_id(&self) -> &'static str {
        "gemini"
    }
}
