//! PostgREST-backed template store
//!
//! Talks to the REST interface of a hosted Postgres backend (the
//! `/rest/v1/{table}` endpoints of a Supabase project). Rows are filtered with
//! PostgREST operators (`id=eq.{id}`) and writes ask for the stored row back
//! with `Prefer: return=representation`.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Method, RequestBuilder, Response, Url};
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use tracing::Instrument;

use super::TemplateStore;
use crate::error::{StoreError, StoreResult};
use crate::models::{Template, TemplateFields, TemplateId};
use crate::tracing::span_names;

/// Table holding the templates unless configured otherwise
pub const DEFAULT_TABLE_NAME: &str = "templates";

/// Default request timeout in seconds
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Connection settings for [`RestTemplateStore`]
#[derive(Debug, Clone)]
pub struct RestStoreConfig {
    /// Project base URL, e.g. `https://abc.supabase.co`
    pub base_url: String,
    /// API key sent as `apikey` and bearer token
    pub api_key: SecretString,
    /// Table name
    pub table: String,
    /// Per-request timeout
    pub timeout: Duration,
}

impl RestStoreConfig {
    /// Creates a configuration for the default table
    #[must_use]
    pub fn new(base_url: impl Into<String>, api_key: SecretString) -> Self {
        Self {
            base_url: base_url.into(),
            api_key,
            table: DEFAULT_TABLE_NAME.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }

    /// Sets the table name
    #[must_use]
    pub fn with_table(mut self, table: impl Into<String>) -> Self {
        self.table = table.into();
        self
    }

    /// Sets the request timeout
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

/// Error body returned by PostgREST
#[derive(Debug, Deserialize)]
struct PostgrestError {
    message: Option<String>,
    details: Option<String>,
}

/// Template store speaking the PostgREST protocol over HTTP
pub struct RestTemplateStore {
    client: reqwest::Client,
    endpoint: Url,
    table: String,
    api_key: SecretString,
}

impl std::fmt::Debug for RestTemplateStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RestTemplateStore")
            .field("endpoint", &self.endpoint.as_str())
            .field("table", &self.table)
            .finish_non_exhaustive()
    }
}

impl RestTemplateStore {
    /// Creates a store client from its configuration
    ///
    /// # Errors
    ///
    /// Returns an error if the base URL is not an absolute http(s) URL or
    /// the HTTP client cannot be built.
    pub fn new(config: RestStoreConfig) -> StoreResult<Self> {
        let endpoint = Self::endpoint_url(&config.base_url, &config.table)?;
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| StoreError::Transport(e.to_string()))?;

        Ok(Self {
            client,
            endpoint,
            table: config.table,
            api_key: config.api_key,
        })
    }

    /// Builds `{base}/rest/v1/{table}`
    fn endpoint_url(base_url: &str, table: &str) -> StoreResult<Url> {
        let base = base_url.trim_end_matches('/');
        let url = Url::parse(&format!("{base}/rest/v1/{table}"))
            .map_err(|e| StoreError::InvalidUrl(format!("{base_url}: {e}")))?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(StoreError::InvalidUrl(format!(
                "{base_url}: scheme must be http or https"
            )));
        }
        Ok(url)
    }

    /// Endpoint URL filtered to a single row
    fn row_url(&self, id: &TemplateId) -> Url {
        let mut url = self.endpoint.clone();
        url.query_pairs_mut()
            .append_pair("id", &format!("eq.{}", id.as_str()));
        url
    }

    /// Starts a request carrying the API key headers
    fn request(&self, method: Method, url: Url) -> RequestBuilder {
        let key = self.api_key.expose_secret();
        self.client
            .request(method, url)
            .header("apikey", key)
            .bearer_auth(key)
    }

    /// Sends a request and maps transport and status failures
    async fn send(request: RequestBuilder) -> StoreResult<Response> {
        let response = request
            .send()
            .await
            .map_err(|e| StoreError::Transport(e.to_string()))?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        let message = serde_json::from_str::<PostgrestError>(&body)
            .ok()
            .and_then(|e| match (e.message, e.details) {
                (Some(message), Some(details)) => Some(format!("{message} ({details})")),
                (message, _) => message,
            })
            .unwrap_or_else(|| {
                status
                    .canonical_reason()
                    .unwrap_or("Unknown error")
                    .to_string()
            });

        Err(StoreError::Server {
            status: status.as_u16(),
            message,
        })
    }

    /// Reads and decodes a JSON body
    async fn decode<T: DeserializeOwned>(response: Response) -> StoreResult<T> {
        let body = response
            .text()
            .await
            .map_err(|e| StoreError::Transport(e.to_string()))?;
        serde_json::from_str(&body).map_err(|e| StoreError::Decode(e.to_string()))
    }
}

#[async_trait]
impl TemplateStore for RestTemplateStore {
    async fn list(&self) -> StoreResult<Vec<Template>> {
        let span = crate::trace_operation_debug!(span_names::STORE_LIST, table = %self.table);
        async {
            let mut url = self.endpoint.clone();
            url.query_pairs_mut()
                .append_pair("select", "*")
                .append_pair("order", "created_at.desc");

            let response = Self::send(self.request(Method::GET, url)).await?;
            let templates: Vec<Template> = Self::decode(response).await?;
            tracing::debug!(count = templates.len(), "Fetched templates");
            Ok(templates)
        }
        .instrument(span)
        .await
    }

    async fn create(&self, fields: &TemplateFields) -> StoreResult<Template> {
        let span = crate::trace_operation_debug!(span_names::STORE_CREATE, table = %self.table);
        async {
            let request = self
                .request(Method::POST, self.endpoint.clone())
                .header("Prefer", "return=representation")
                .json(&[fields]);

            let response = Self::send(request).await?;
            let rows: Vec<Template> = Self::decode(response).await?;
            let created = rows.into_iter().next().ok_or(StoreError::MissingRow)?;
            tracing::debug!(id = %created.id, "Created template");
            Ok(created)
        }
        .instrument(span)
        .await
    }

    async fn update(&self, id: &TemplateId, fields: &TemplateFields) -> StoreResult<Template> {
        let span = crate::trace_operation_debug!(span_names::STORE_UPDATE, id = %id);
        async {
            let request = self
                .request(Method::PATCH, self.row_url(id))
                .header("Prefer", "return=representation")
                .json(fields);

            let response = Self::send(request).await?;
            let rows: Vec<Template> = Self::decode(response).await?;
            rows.into_iter()
                .next()
                .ok_or_else(|| StoreError::NotFound(id.clone()))
        }
        .instrument(span)
        .await
    }

    async fn delete(&self, id: &TemplateId) -> StoreResult<()> {
        let span = crate::trace_operation_debug!(span_names::STORE_DELETE, id = %id);
        async {
            Self::send(self.request(Method::DELETE, self.row_url(id))).await?;
            tracing::debug!("Deleted template");
            Ok(())
        }
        .instrument(span)
        .await
    }

    fn backend_id(&self) -> &'static str {
        "postgrest"
    }
}
