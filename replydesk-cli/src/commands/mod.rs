//! Command handler modules for the CLI.

mod add;
mod ask;
mod completions;
mod copy;
mod delete;
mod enhance;
mod generate;
mod list;
mod manpage;
mod show;
mod suggest;
mod update;

use std::path::Path;

use crate::cli::Commands;
use crate::error::CliError;

/// Dispatch a CLI command to the appropriate handler.
pub fn dispatch(config_path: Option<&Path>, command: Commands) -> Result<(), CliError> {
    match command {
        Commands::List {
            format,
            search,
            content,
        } => list::cmd_list(config_path, format, search.as_deref(), content),
        Commands::Show { name } => show::cmd_show(config_path, &name),
        Commands::Copy { name } => copy::cmd_copy(config_path, &name),
        Commands::Add { title, text } => add::cmd_add(config_path, &title, &text),
        Commands::Update { name, title, text } => {
            update::cmd_update(config_path, &name, title.as_deref(), text.as_deref())
        }
        Commands::Delete { name, yes } => delete::cmd_delete(config_path, &name, yes),
        Commands::Enhance { name, save } => enhance::cmd_enhance(config_path, &name, save),
        Commands::Generate { topic, save } => generate::cmd_generate(config_path, &topic, save),
        Commands::Ask { question } => ask::cmd_ask(config_path, &question),
        Commands::Suggest { image, context } => {
            suggest::cmd_suggest(config_path, &image, context.as_deref())
        }
        Commands::Completions { shell } => completions::cmd_completions(shell),
        Commands::Man => manpage::cmd_manpage(),
    }
}
