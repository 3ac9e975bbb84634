//! CLI argument parsing types using `clap`.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use clap_complete::Shell;

/// `ReplyDesk` command-line interface for managing support reply templates
#[derive(Parser)]
#[command(name = "replydesk")]
#[command(author, version, about = "ReplyDesk command-line interface")]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to the configuration directory
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Increase output verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Write log output to this file instead of stderr
    #[arg(long, global = true, value_name = "PATH")]
    pub log_file: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available CLI commands
#[derive(Subcommand)]
pub enum Commands {
    /// List templates, newest first
    #[command(about = "List all templates in the store")]
    List {
        /// Output format for the template list
        #[arg(short, long, default_value = "table", value_enum)]
        format: OutputFormat,

        /// Only show templates whose title contains this text
        #[arg(short, long)]
        search: Option<String>,

        /// Match the search text against template bodies as well
        #[arg(long)]
        content: bool,
    },

    /// Show a template
    #[command(about = "Show the details of a template")]
    Show {
        /// Template title or ID
        name: String,
    },

    /// Print a template's text for pasting
    #[command(about = "Print only the text of a template")]
    Copy {
        /// Template title or ID
        name: String,
    },

    /// Add a new template
    #[command(about = "Add a new template to the store")]
    Add {
        /// Title for the new template
        #[arg(short, long)]
        title: String,

        /// Reply text
        #[arg(short = 'x', long)]
        text: String,
    },

    /// Update an existing template
    #[command(about = "Change the title or text of a template")]
    Update {
        /// Template title or ID
        name: String,

        /// New title
        #[arg(short, long)]
        title: Option<String>,

        /// New reply text
        #[arg(short = 'x', long)]
        text: Option<String>,
    },

    /// Delete a template
    #[command(about = "Delete a template from the store")]
    Delete {
        /// Template title or ID
        name: String,

        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },

    /// Rewrite a template's text with the assistant
    #[command(about = "Make a template friendlier with the AI assistant")]
    Enhance {
        /// Template title or ID
        name: String,

        /// Store the rewritten text instead of only printing it
        #[arg(long)]
        save: bool,
    },

    /// Generate a template about a topic
    #[command(about = "Draft a new template with the AI assistant")]
    Generate {
        /// What the template should be about
        topic: String,

        /// Store the generated template instead of only printing it
        #[arg(long)]
        save: bool,
    },

    /// Ask the assistant a question
    #[command(about = "Ask the AI assistant a free-form question")]
    Ask {
        /// The question
        question: String,
    },

    /// Suggest a reply to a chat screenshot
    #[command(about = "Suggest a reply to the conversation in a screenshot")]
    Suggest {
        /// Screenshot of the customer conversation (PNG, JPEG, WebP or GIF)
        #[arg(short, long)]
        image: PathBuf,

        /// Extra context for the reply, e.g. order status
        #[arg(short = 'C', long)]
        context: Option<String>,
    },

    /// Generate shell completions
    #[command(about = "Generate shell completion scripts")]
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },

    /// Generate a man page
    #[command(about = "Print the man page to stdout")]
    Man,
}

/// Output format for the list command
#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum OutputFormat {
    /// Display as formatted table
    Table,
    /// Output as JSON
    Json,
    /// Output as CSV
    Csv,
}
