//! Update template command.

use std::path::Path;

use crate::commands::add::save_and_report;
use crate::error::CliError;
use crate::util::{build_assistant_lenient, find_template, load_config, open_workflow, runtime};

/// Update template command handler
pub fn cmd_update(
    config_path: Option<&Path>,
    name: &str,
    title: Option<&str>,
    text: Option<&str>,
) -> Result<(), CliError> {
    if title.is_none() && text.is_none() {
        return Err(CliError::Validation(
            "Nothing to update: pass --title and/or --text".to_string(),
        ));
    }

    let config = load_config(config_path)?;
    let mut workflow = open_workflow(&config, build_assistant_lenient(&config))?;
    let rt = runtime()?;
    rt.block_on(workflow.load())?;

    let id = find_template(workflow.state().templates(), name)?.id.clone();
    let state = workflow.state_mut();
    state.select_by_id(&id);
    if let Some(title) = title {
        state.set_draft_title(title);
    }
    if let Some(text) = text {
        state.set_draft_text(text);
    }

    save_and_report(&rt, &mut workflow)
}
