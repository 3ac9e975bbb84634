//! Suggest reply command.

use std::path::Path;

use replydesk_core::assistant::ReplyAssistant;
use replydesk_core::models::Screenshot;

use crate::error::CliError;
use crate::util::{build_assistant, load_config, runtime};

/// Suggests a reply to the conversation shown in a screenshot
pub fn cmd_suggest(
    config_path: Option<&Path>,
    image: &Path,
    context: Option<&str>,
) -> Result<(), CliError> {
    let screenshot = read_screenshot(image)?;

    let config = load_config(config_path)?;
    let assistant = build_assistant(&config)?;
    let reply = runtime()?.block_on(assistant.suggest_reply(&screenshot, context.unwrap_or("")))?;
    println!("{reply}");

    Ok(())
}

/// Reads an image file, inferring its media type from the extension
fn read_screenshot(path: &Path) -> Result<Screenshot, CliError> {
    let data = std::fs::read(path)?;
    if data.is_empty() {
        return Err(CliError::Validation(format!(
            "Image file is empty: {}",
            path.display()
        )));
    }
    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .unwrap_or_default();
    let mime_type = Screenshot::mime_type_for_extension(extension);
    tracing::debug!(bytes = data.len(), mime_type, "Screenshot loaded");
    Ok(Screenshot::new(mime_type, data))
}
