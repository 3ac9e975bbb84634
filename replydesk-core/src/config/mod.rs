//! Configuration management for `ReplyDesk`
//!
//! Settings live in `{config_dir}/replydesk/config.toml`. Environment
//! variables override individual settings after the file is read, so
//! credentials can stay out of the file entirely. API keys are held as
//! [`SecretString`] once loaded and never appear in `Debug` output.

use std::path::{Path, PathBuf};
use std::time::Duration;

use reqwest::Url;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};

use crate::assistant::{DEFAULT_BASE_URL, DEFAULT_MODEL, GeminiConfig};
use crate::error::{ConfigError, ConfigResult};
use crate::search::SearchScope;
use crate::store::{DEFAULT_TABLE_NAME, DEFAULT_TIMEOUT_SECS, RestStoreConfig};
use crate::tracing::span_names;

/// Overrides the configuration directory
pub const ENV_CONFIG_DIR: &str = "REPLYDESK_CONFIG_DIR";
/// Overrides `store.url`
pub const ENV_STORE_URL: &str = "REPLYDESK_STORE_URL";
/// Overrides `store.api_key`
pub const ENV_STORE_KEY: &str = "REPLYDESK_STORE_KEY";
/// Overrides `store.table`
pub const ENV_STORE_TABLE: &str = "REPLYDESK_STORE_TABLE";
/// Overrides `assistant.api_key`
pub const ENV_ASSISTANT_KEY: &str = "REPLYDESK_ASSISTANT_KEY";
/// Overrides `assistant.model`
pub const ENV_MODEL: &str = "REPLYDESK_MODEL";

const CONFIG_FILE_NAME: &str = "config.toml";

/// Template store settings
#[derive(Debug, Clone)]
pub struct StoreSettings {
    /// Project base URL
    pub url: Option<String>,
    /// API key
    pub api_key: Option<SecretString>,
    /// Table name
    pub table: String,
    /// Per-request timeout in seconds
    pub request_timeout_secs: u64,
}

impl Default for StoreSettings {
    fn default() -> Self {
        Self {
            url: None,
            api_key: None,
            table: DEFAULT_TABLE_NAME.to_string(),
            request_timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

/// Reply assistant settings
#[derive(Debug, Clone)]
pub struct AssistantSettings {
    /// API key
    pub api_key: Option<SecretString>,
    /// Model name
    pub model: String,
    /// API root
    pub base_url: String,
}

impl Default for AssistantSettings {
    fn default() -> Self {
        Self {
            api_key: None,
            model: DEFAULT_MODEL.to_string(),
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }
}

/// Search settings
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchSettings {
    /// Fields the search box matches against
    #[serde(default)]
    pub scope: SearchScope,
}

/// Complete application configuration
#[derive(Debug, Clone, Default)]
pub struct AppConfig {
    /// Template store
    pub store: StoreSettings,
    /// Reply assistant
    pub assistant: AssistantSettings,
    /// Search
    pub search: SearchSettings,
}

impl AppConfig {
    /// Builds the store client configuration
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Missing`] if the URL or key is not set, or
    /// [`ConfigError::Validation`] if the URL is not http(s).
    pub fn store_config(&self) -> ConfigResult<RestStoreConfig> {
        let url = self
            .store
            .url
            .as_deref()
            .ok_or_else(|| ConfigError::Missing(format!("store.url (or {ENV_STORE_URL})")))?;
        validate_http_url("store.url", url)?;
        let api_key = self
            .store
            .api_key
            .clone()
            .ok_or_else(|| ConfigError::Missing(format!("store.api_key (or {ENV_STORE_KEY})")))?;

        Ok(RestStoreConfig::new(url, api_key)
            .with_table(self.store.table.clone())
            .with_timeout(Duration::from_secs(self.store.request_timeout_secs)))
    }

    /// Builds the assistant client configuration
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Missing`] if no API key is set.
    pub fn assistant_config(&self) -> ConfigResult<GeminiConfig> {
        let api_key = self.assistant.api_key.clone().ok_or_else(|| {
            ConfigError::Missing(format!("assistant.api_key (or {ENV_ASSISTANT_KEY})"))
        })?;
        Ok(GeminiConfig::new(api_key)
            .with_model(self.assistant.model.clone())
            .with_base_url(self.assistant.base_url.clone()))
    }

    /// Applies environment overrides read through `lookup`
    ///
    /// Empty values are ignored.
    pub fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        if let Some(url) = get(ENV_STORE_URL) {
            self.store.url = Some(url);
        }
        if let Some(key) = get(ENV_STORE_KEY) {
            self.store.api_key = Some(SecretString::from(key));
        }
        if let Some(table) = get(ENV_STORE_TABLE) {
            self.store.table = table;
        }
        if let Some(key) = get(ENV_ASSISTANT_KEY) {
            self.assistant.api_key = Some(SecretString::from(key));
        }
        if let Some(model) = get(ENV_MODEL) {
            self.assistant.model = model;
        }
    }

    /// Checks the settings that are present
    ///
    /// Missing credentials are not an error here; they are reported when a
    /// client is built.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Validation`] for the first unusable value.
    pub fn validate(&self) -> ConfigResult<()> {
        if let Some(url) = &self.store.url {
            validate_http_url("store.url", url)?;
        }
        if self.store.table.trim().is_empty() {
            return Err(ConfigError::Validation {
                field: "store.table".to_string(),
                reason: "must not be empty".to_string(),
            });
        }
        if self.store.request_timeout_secs == 0 {
            return Err(ConfigError::Validation {
                field: "store.request_timeout_secs".to_string(),
                reason: "must be greater than zero".to_string(),
            });
        }
        if self.assistant.model.trim().is_empty() {
            return Err(ConfigError::Validation {
                field: "assistant.model".to_string(),
                reason: "must not be empty".to_string(),
            });
        }
        validate_http_url("assistant.base_url", &self.assistant.base_url)
    }
}

fn validate_http_url(field: &str, value: &str) -> ConfigResult<()> {
    let url = Url::parse(value).map_err(|e| ConfigError::Validation {
        field: field.to_string(),
        reason: e.to_string(),
    })?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(ConfigError::Validation {
            field: field.to_string(),
            reason: format!("scheme must be http or https, got '{}'", url.scheme()),
        });
    }
    Ok(())
}

// On-disk shape. Keys are plain strings only while (de)serializing.

#[derive(Debug, Default, Serialize, Deserialize)]
struct ConfigFile {
    #[serde(default)]
    store: StoreSection,
    #[serde(default)]
    assistant: AssistantSection,
    #[serde(default)]
    search: SearchSettings,
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct StoreSection {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    api_key: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    table: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    request_timeout_secs: Option<u64>,
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct AssistantSection {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    api_key: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    model: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    base_url: Option<String>,
}

impl From<ConfigFile> for AppConfig {
    fn from(file: ConfigFile) -> Self {
        let store = StoreSettings::default();
        let assistant = AssistantSettings::default();
        Self {
            store: StoreSettings {
                url: file.store.url,
                api_key: file.store.api_key.map(SecretString::from),
                table: file.store.table.unwrap_or(store.table),
                request_timeout_secs: file
                    .store
                    .request_timeout_secs
                    .unwrap_or(store.request_timeout_secs),
            },
            assistant: AssistantSettings {
                api_key: file.assistant.api_key.map(SecretString::from),
                model: file.assistant.model.unwrap_or(assistant.model),
                base_url: file.assistant.base_url.unwrap_or(assistant.base_url),
            },
            search: file.search,
        }
    }
}

impl From<&AppConfig> for ConfigFile {
    fn from(config: &AppConfig) -> Self {
        Self {
            store: StoreSection {
                url: config.store.url.clone(),
                api_key: config
                    .store
                    .api_key
                    .as_ref()
                    .map(|k| k.expose_secret().to_string()),
                table: Some(config.store.table.clone()),
                request_timeout_secs: Some(config.store.request_timeout_secs),
            },
            assistant: AssistantSection {
                api_key: config
                    .assistant
                    .api_key
                    .as_ref()
                    .map(|k| k.expose_secret().to_string()),
                model: Some(config.assistant.model.clone()),
                base_url: Some(config.assistant.base_url.clone()),
            },
            search: config.search,
        }
    }
}

/// Loads and saves the configuration file
#[derive(Debug, Clone)]
pub struct ConfigManager {
    config_dir: PathBuf,
}

impl ConfigManager {
    /// Creates a manager for the default directory
    ///
    /// Uses `$REPLYDESK_CONFIG_DIR` when set, otherwise
    /// `{config_dir}/replydesk`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::NoConfigDir`] if no configuration directory
    /// can be determined.
    pub fn new() -> ConfigResult<Self> {
        if let Some(dir) = std::env::var_os(ENV_CONFIG_DIR).filter(|d| !d.is_empty()) {
            return Ok(Self::with_config_dir(PathBuf::from(dir)));
        }
        let base = dirs::config_dir().ok_or(ConfigError::NoConfigDir)?;
        Ok(Self::with_config_dir(base.join("replydesk")))
    }

    /// Creates a manager for an explicit directory
    #[must_use]
    pub const fn with_config_dir(config_dir: PathBuf) -> Self {
        Self { config_dir }
    }

    /// Directory holding the configuration file
    #[must_use]
    pub fn config_dir(&self) -> &Path {
        &self.config_dir
    }

    /// Full path of the configuration file
    #[must_use]
    pub fn config_path(&self) -> PathBuf {
        self.config_dir.join(CONFIG_FILE_NAME)
    }

    /// Reads the file without environment overrides
    ///
    /// A missing file yields the defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed, or
    /// holds an invalid value.
    pub fn load_file(&self) -> ConfigResult<AppConfig> {
        let _span = crate::trace_operation_debug!(span_names::CONFIG_LOAD).entered();
        let path = self.config_path();
        let file = match std::fs::read_to_string(&path) {
            Ok(content) => toml::from_str::<ConfigFile>(&content)
                .map_err(|e| ConfigError::Parse(e.to_string()))?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "No configuration file, using defaults");
                ConfigFile::default()
            }
            Err(e) => return Err(ConfigError::Io(e)),
        };

        let config = AppConfig::from(file);
        config.validate()?;
        Ok(config)
    }

    /// Reads the file and applies the process environment on top
    ///
    /// # Errors
    ///
    /// See [`load_file`](Self::load_file); the overridden configuration is
    /// validated again.
    pub fn load(&self) -> ConfigResult<AppConfig> {
        let mut config = self.load_file()?;
        config.apply_overrides(|name| std::env::var(name).ok());
        config.validate()?;
        Ok(config)
    }

    /// Writes the configuration file, creating the directory if needed
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration cannot be serialized or written.
    pub fn save(&self, config: &AppConfig) -> ConfigResult<()> {
        config.validate()?;
        std::fs::create_dir_all(&self.config_dir)?;
        let content = toml::to_string_pretty(&ConfigFile::from(config))
            .map_err(|e| ConfigError::Serialize(e.to_string()))?;
        std::fs::write(self.config_path(), content)?;
        Ok(())
    }
}
