//! Shared utility functions used across command modules.

use std::path::Path;
use std::sync::Arc;

use replydesk_core::assistant::{GeminiAssistant, ReplyAssistant, UnconfiguredAssistant};
use replydesk_core::config::{AppConfig, ConfigManager};
use replydesk_core::models::Template;
use replydesk_core::store::RestTemplateStore;
use replydesk_core::TemplateWorkflow;

use crate::error::CliError;

/// Assistant handle shared by the command modules
pub type SharedAssistant = Arc<dyn ReplyAssistant>;

/// Workflow over the configured remote store
pub type CliWorkflow = TemplateWorkflow<RestTemplateStore, SharedAssistant>;

/// Creates a `ConfigManager` using the optional custom config directory
/// from CLI args.
pub fn create_config_manager(config_path: Option<&Path>) -> Result<ConfigManager, CliError> {
    match config_path {
        Some(path) => Ok(ConfigManager::with_config_dir(path.to_path_buf())),
        None => ConfigManager::new()
            .map_err(|e| CliError::Config(format!("Failed to initialize config: {e}"))),
    }
}

/// Loads the configuration file with environment overrides applied
pub fn load_config(config_path: Option<&Path>) -> Result<AppConfig, CliError> {
    let config_manager = create_config_manager(config_path)?;
    let config = config_manager.load()?;
    tracing::debug!(dir = %config_manager.config_dir().display(), "Configuration loaded");
    Ok(config)
}

/// Creates the runtime that drives the async core from synchronous commands
pub fn runtime() -> Result<tokio::runtime::Runtime, CliError> {
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(CliError::Io)
}

/// Opens the remote template store described by `config`
pub fn open_store(config: &AppConfig) -> Result<RestTemplateStore, CliError> {
    let store_config = config.store_config()?;
    Ok(RestTemplateStore::new(store_config)?)
}

/// Builds the assistant, failing if no API key is configured
pub fn build_assistant(config: &AppConfig) -> Result<SharedAssistant, CliError> {
    let assistant_config = config.assistant_config()?;
    Ok(Arc::new(GeminiAssistant::new(assistant_config)?))
}

/// Builds the assistant, or a placeholder that refuses every request
///
/// Store-only commands use this so that a missing assistant key does not
/// stop them from running.
pub fn build_assistant_lenient(config: &AppConfig) -> SharedAssistant {
    match build_assistant(config) {
        Ok(assistant) => assistant,
        Err(e) => Arc::new(UnconfiguredAssistant::new(e.to_string())),
    }
}

/// Opens a workflow over the configured store
pub fn open_workflow(config: &AppConfig, assistant: SharedAssistant) -> Result<CliWorkflow, CliError> {
    let store = open_store(config)?;
    Ok(TemplateWorkflow::new(store, assistant).with_search_scope(config.search.scope))
}

/// Find a template by title or ID
pub fn find_template<'a>(
    templates: &'a [Template],
    name_or_id: &str,
) -> Result<&'a Template, CliError> {
    // First try to find by exact title match
    if let Some(template) = templates.iter().find(|t| t.title == name_or_id) {
        return Ok(template);
    }

    if let Some(template) = templates.iter().find(|t| t.id.as_str() == name_or_id) {
        return Ok(template);
    }

    // Try case-insensitive title match
    if let Some(template) = templates
        .iter()
        .find(|t| t.title.eq_ignore_ascii_case(name_or_id))
    {
        return Ok(template);
    }

    // Try partial title match (prefix)
    let prefix = name_or_id.to_lowercase();
    let matches: Vec<_> = templates
        .iter()
        .filter(|t| t.title.to_lowercase().starts_with(&prefix))
        .collect();

    match matches.len() {
        0 => Err(CliError::TemplateNotFound(name_or_id.to_string())),
        1 => Ok(matches[0]),
        _ => {
            let titles: Vec<_> = matches.iter().map(|t| t.title.as_str()).collect();
            Err(CliError::Validation(format!(
                "Ambiguous template name '{}'. Matches: {}",
                name_or_id,
                titles.join(", ")
            )))
        }
    }
}
