//! Delete template command.

use std::io::{self, BufRead, Write};
use std::path::Path;

use crate::error::CliError;
use crate::util::{build_assistant_lenient, find_template, load_config, open_workflow, runtime};

/// Delete template command handler
///
/// Asks for confirmation on stdin unless `yes` is set.
pub fn cmd_delete(config_path: Option<&Path>, name: &str, yes: bool) -> Result<(), CliError> {
    let config = load_config(config_path)?;
    let mut workflow = open_workflow(&config, build_assistant_lenient(&config))?;
    let rt = runtime()?;
    rt.block_on(workflow.load())?;

    let template = find_template(workflow.state().templates(), name)?;
    let id = template.id.clone();
    let title = template.title.clone();

    workflow.request_delete(id);
    if !yes && !confirm(&format!("Delete template '{title}'?"))? {
        workflow.cancel_delete();
        println!("Cancelled");
        return Ok(());
    }

    if let Some(id) = rt.block_on(workflow.confirm_delete())? {
        println!("Deleted template '{title}' (ID: {id})");
    }

    Ok(())
}

fn confirm(question: &str) -> Result<bool, CliError> {
    let mut stderr = io::stderr();
    write!(stderr, "{question} [y/N] ")?;
    stderr.flush()?;

    let mut answer = String::new();
    io::stdin().lock().read_line(&mut answer)?;
    Ok(is_yes(&answer))
}

fn is_yes(answer: &str) -> bool {
    matches!(answer.trim().to_lowercase().as_str(), "y" | "yes")
}
