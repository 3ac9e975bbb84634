//! Generate template command.

use std::path::Path;

use replydesk_core::assistant::ReplyAssistant;

use crate::commands::add::save_and_report;
use crate::error::CliError;
use crate::util::{build_assistant, load_config, open_workflow, runtime};

/// Drafts a template about `topic`, storing it when `save` is set
///
/// Without `save` only the assistant is contacted, so no store settings are
/// needed.
pub fn cmd_generate(config_path: Option<&Path>, topic: &str, save: bool) -> Result<(), CliError> {
    if topic.trim().is_empty() {
        return Err(CliError::Validation("Topic must not be empty".to_string()));
    }

    let config = load_config(config_path)?;
    let assistant = build_assistant(&config)?;
    let rt = runtime()?;

    if !save {
        let generated = rt.block_on(assistant.generate(topic))?;
        println!("{}", generated.title);
        println!();
        println!("{}", generated.text);
        return Ok(());
    }

    let mut workflow = open_workflow(&config, assistant)?;
    rt.block_on(workflow.generate_draft(topic))?;
    let draft = workflow.state().draft();
    tracing::debug!(title = %draft.title, "Generated draft");
    println!("{}", draft.title);
    println!();
    println!("{}", draft.text);
    println!();

    save_and_report(&rt, &mut workflow)
}
