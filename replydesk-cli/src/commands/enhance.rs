//! Enhance template command.

use std::path::Path;

use crate::commands::add::save_and_report;
use crate::error::CliError;
use crate::util::{build_assistant, find_template, load_config, open_workflow, runtime};

/// Rewrites a stored template with the assistant, optionally saving the result
pub fn cmd_enhance(config_path: Option<&Path>, name: &str, save: bool) -> Result<(), CliError> {
    let config = load_config(config_path)?;
    let assistant = build_assistant(&config)?;
    let mut workflow = open_workflow(&config, assistant)?;
    let rt = runtime()?;
    rt.block_on(workflow.load())?;

    let id = find_template(workflow.state().templates(), name)?.id.clone();
    workflow.state_mut().select_by_id(&id);

    if !rt.block_on(workflow.enhance_draft())? {
        return Err(CliError::Validation(
            "Template text is empty, nothing to enhance".to_string(),
        ));
    }
    println!("{}", workflow.state().draft().text);

    if save {
        save_and_report(&rt, &mut workflow)?;
    }
    Ok(())
}
