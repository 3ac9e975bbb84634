//! Show template details command.

use std::path::Path;

use chrono::Local;

use crate::error::CliError;
use crate::util::{build_assistant_lenient, find_template, load_config, open_workflow, runtime};

/// Show template details command handler
pub fn cmd_show(config_path: Option<&Path>, name: &str) -> Result<(), CliError> {
    let config = load_config(config_path)?;
    let mut workflow = open_workflow(&config, build_assistant_lenient(&config))?;
    runtime()?.block_on(workflow.load())?;

    let template = find_template(workflow.state().templates(), name)?;
    let created = template.created_at.with_timezone(&Local);

    println!("Template Details:");
    println!("  ID:      {}", template.id);
    println!("  Title:   {}", template.title);
    println!("  Created: {}", created.format("%Y-%m-%d %H:%M:%S %Z"));
    println!();
    for line in template.text.lines() {
        println!("  {line}");
    }

    Ok(())
}
