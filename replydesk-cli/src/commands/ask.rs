//! Ask the assistant command.

use std::path::Path;

use replydesk_core::assistant::ReplyAssistant;

use crate::error::CliError;
use crate::util::{build_assistant, load_config, runtime};

/// Sends a free-form question to the assistant and prints the answer
pub fn cmd_ask(config_path: Option<&Path>, question: &str) -> Result<(), CliError> {
    if question.trim().is_empty() {
        return Err(CliError::Validation("Question must not be empty".to_string()));
    }

    let config = load_config(config_path)?;
    let assistant = build_assistant(&config)?;
    let answer = runtime()?.block_on(assistant.answer(question))?;
    println!("{answer}");

    Ok(())
}
