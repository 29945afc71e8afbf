//! Rapport CLI - Turn free-text descriptions of people into stored profiles.

use clap::Parser;
use rapport_cli::commands;
use rapport_cli::config::OutputFormat;
use rapport_cli::{Cli, Command, Config, Formatter};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    // Logs go to stderr so stdout stays machine-readable
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    // Config may be what failed, so errors only honor the flag
    let errors = Formatter::new(OutputFormat::Text, !cli.no_color);

    if let Err(e) = run(cli).await {
        eprintln!("{}", errors.error(&e.to_string()));
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> rapport_cli::Result<()> {
    // Load config, then let flags and env vars win
    let mut config = Config::load(cli.config.as_deref())?;
    config.apply_overrides(&cli);
    config.validate()?;

    let formatter = Formatter::new(config.settings.format, config.settings.color);

    // The core never reads the clock; today's date is injected here
    let today = chrono::Local::now().date_naive();

    match cli.command {
        Command::Ingest(args) => {
            commands::execute_ingest(args, &config, &formatter, today).await?;
        }
        Command::Show(args) => {
            commands::execute_show(args, &config, &formatter, today)?;
        }
        Command::Schema => {
            commands::execute_schema(&formatter)?;
        }
        Command::Prompt(args) => {
            commands::execute_prompt(args, today)?;
        }
    }

    Ok(())
}
