//! CLI command definitions and argument parsing.

use clap::{ArgGroup, Args, Parser, Subcommand};
use std::path::PathBuf;

/// Rapport CLI - Turn free-text descriptions of people into stored profiles.
#[derive(Debug, Parser)]
#[command(name = "rapport")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Output format
    #[arg(short, long, value_enum, global = true)]
    pub format: Option<CliFormat>,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Configuration file path
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// SQLite database file
    #[arg(long, env = "RAPPORT_DATABASE", global = true)]
    pub database: Option<PathBuf>,

    /// Text service endpoint (e.g., http://localhost:11434)
    #[arg(long, env = "RAPPORT_LLM_ENDPOINT", global = true)]
    pub endpoint: Option<String>,

    /// Text service model name
    #[arg(long, env = "RAPPORT_LLM_MODEL", global = true)]
    pub model: Option<String>,

    /// Text service API key
    #[arg(long, env = "RAPPORT_LLM_API_KEY", global = true, hide_env_values = true)]
    pub api_key: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

/// Output format options.
#[derive(Debug, Clone, Copy, clap::ValueEnum)]
pub enum CliFormat {
    /// Human-readable text (default)
    Text,
    /// JSON format
    Json,
}

/// CLI commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Extract people from text and store them
    Ingest(InputArgs),

    /// Show stored people by id
    Show(ShowArgs),

    /// Print the JSON schema the text service must answer with
    Schema,

    /// Print the prompt that would be sent for a text, without sending it
    Prompt(InputArgs),
}

/// Where to read the input text from.
#[derive(Debug, Args)]
#[command(group(ArgGroup::new("source").required(true).args(["text", "file", "stdin"])))]
pub struct InputArgs {
    /// Text to analyze
    #[arg(short, long)]
    pub text: Option<String>,

    /// Read the text from a file
    #[arg(long)]
    pub file: Option<PathBuf>,

    /// Read the text from stdin
    #[arg(long)]
    pub stdin: bool,
}

/// Arguments for the show command.
#[derive(Debug, Args)]
pub struct ShowArgs {
    /// Row ids to show
    #[arg(required = true)]
    pub ids: Vec<i64>,
}

impl From<CliFormat> for crate::config::OutputFormat {
    fn from(format: CliFormat) -> Self {
        match format {
            CliFormat::Text => crate::config::OutputFormat::Text,
            CliFormat::Json => crate::config::OutputFormat::Json,
        }
    }
}
