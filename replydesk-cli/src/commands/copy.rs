//! Copy template text command.

use std::path::Path;

use crate::error::CliError;
use crate::util::{build_assistant_lenient, find_template, load_config, open_workflow, runtime};

/// Prints exactly the text of a template so it can be piped to a clipboard tool
pub fn cmd_copy(config_path: Option<&Path>, name: &str) -> Result<(), CliError> {
    let config = load_config(config_path)?;
    let mut workflow = open_workflow(&config, build_assistant_lenient(&config))?;
    runtime()?.block_on(workflow.load())?;

    let id = find_template(workflow.state().templates(), name)?.id.clone();
    let text = workflow
        .copy_text(&id)
        .ok_or_else(|| CliError::TemplateNotFound(name.to_string()))?;
    println!("{text}");

    Ok(())
}
