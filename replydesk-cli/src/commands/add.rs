//! Add template command.

use std::path::Path;

use replydesk_core::SaveOutcome;
use tokio::runtime::Runtime;

use crate::error::CliError;
use crate::util::{CliWorkflow, build_assistant_lenient, load_config, open_workflow, runtime};

/// Add template command handler
pub fn cmd_add(config_path: Option<&Path>, title: &str, text: &str) -> Result<(), CliError> {
    let config = load_config(config_path)?;
    let mut workflow = open_workflow(&config, build_assistant_lenient(&config))?;
    let rt = runtime()?;
    rt.block_on(workflow.load())?;

    let state = workflow.state_mut();
    state.clear_draft();
    state.set_draft_title(title);
    state.set_draft_text(text);

    save_and_report(&rt, &mut workflow)
}

/// Saves the current draft and prints what happened
///
/// `rt` must be the runtime that drove the workflow's earlier calls, since
/// pooled store connections are bound to it.
///
/// # Errors
///
/// Returns `CliError::Validation` for a blank title or text and
/// `CliError::Store` if the store rejects the write.
pub fn save_and_report(rt: &Runtime, workflow: &mut CliWorkflow) -> Result<(), CliError> {
    let outcome = rt.block_on(workflow.save())?;
    match outcome {
        SaveOutcome::Created(template) => {
            println!("Added template '{}' (ID: {})", template.title, template.id);
        }
        SaveOutcome::Updated(template) => {
            println!("Updated template '{}' (ID: {})", template.title, template.id);
        }
        SaveOutcome::Rejected(reason) => return Err(CliError::Validation(reason.to_string())),
    }

    if let Some(err) = workflow.state().error() {
        tracing::warn!(error = %err, "Saved, but the list could not be refreshed");
    }
    Ok(())
}
