//! List templates command.

use std::fmt::Write as _;
use std::path::Path;

use chrono::Local;
use replydesk_core::models::Template;
use replydesk_core::search::SearchScope;

use crate::cli::OutputFormat;
use crate::error::CliError;
use crate::format::{escape_csv_field, preview};
use crate::util::{build_assistant_lenient, load_config, open_workflow, runtime};

const PREVIEW_CHARS: usize = 48;

/// List templates command handler
pub fn cmd_list(
    config_path: Option<&Path>,
    format: OutputFormat,
    search: Option<&str>,
    content: bool,
) -> Result<(), CliError> {
    let config = load_config(config_path)?;
    let assistant = build_assistant_lenient(&config);
    let mut workflow = open_workflow(&config, assistant)?;

    let rt = runtime()?;
    let count = rt.block_on(workflow.load())?;
    tracing::debug!(count, "Templates fetched");

    if content {
        workflow.state_mut().set_search_scope(SearchScope::Content);
    }
    if let Some(term) = search {
        workflow.state_mut().set_search(term);
    }
    let visible = workflow.state().visible_templates();

    match format {
        OutputFormat::Table => println!("{}", format_table(&visible)),
        OutputFormat::Json => println!("{}", format_json(&visible)?),
        OutputFormat::Csv => println!("{}", format_csv(&visible)),
    }

    Ok(())
}

/// Format templates as a table string
#[must_use]
pub fn format_table(templates: &[&Template]) -> String {
    if templates.is_empty() {
        return "No templates found.".to_string();
    }

    let mut output = String::new();

    let id_width = templates
        .iter()
        .map(|t| t.id.as_str().len())
        .max()
        .unwrap_or(2)
        .max(2);
    let title_width = templates
        .iter()
        .map(|t| t.title.chars().count())
        .max()
        .unwrap_or(5)
        .max(5);
    let created_width = 16;

    let _ = writeln!(
        output,
        "{:<id_width$}  {:<title_width$}  {:<created_width$}  TEXT",
        "ID", "TITLE", "CREATED"
    );
    let _ = writeln!(
        output,
        "{:-<id_width$}  {:-<title_width$}  {:-<created_width$}  {:-<4}",
        "", "", "", ""
    );

    for template in templates {
        let created = template
            .created_at
            .with_timezone(&Local)
            .format("%Y-%m-%d %H:%M");
        let _ = writeln!(
            output,
            "{:<id_width$}  {:<title_width$}  {:<created_width$}  {}",
            template.id.as_str(),
            template.title,
            created.to_string(),
            preview(&template.text, PREVIEW_CHARS)
        );
    }

    output.trim_end().to_string()
}

/// Format templates as JSON string
///
/// # Errors
///
/// Returns `CliError::Validation` if JSON serialization fails.
pub fn format_json(templates: &[&Template]) -> Result<String, CliError> {
    serde_json::to_string_pretty(templates)
        .map_err(|e| CliError::Validation(format!("Failed to serialize to JSON: {e}")))
}

/// Format templates as CSV string
#[must_use]
pub fn format_csv(templates: &[&Template]) -> String {
    let mut output = String::new();

    output.push_str("id,title,text,created_at\n");

    for template in templates {
        let _ = writeln!(
            output,
            "{},{},{},{}",
            escape_csv_field(template.id.as_str()),
            escape_csv_field(&template.title),
            escape_csv_field(&template.text),
            template.created_at.to_rfc3339()
        );
    }

    output.trim_end().to_string()
}
