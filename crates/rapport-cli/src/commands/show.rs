//! Show command implementation.

use crate::cli::ShowArgs;
use crate::config::Config;
use crate::error::{CliError, Result};
use crate::output::Formatter;
use chrono::NaiveDate;
use rapport_store::SqliteStore;
use std::time::Duration;

/// Execute the show command.
pub fn execute_show(
    args: ShowArgs,
    config: &Config,
    formatter: &Formatter,
    today: NaiveDate,
) -> Result<()> {
    // Opening would create an empty database at a mistyped path
    let database = &config.storage.database;
    if !database.is_file() {
        return Err(CliError::InvalidInput(format!(
            "Database not found: {}",
            database.display()
        )));
    }

    let store = SqliteStore::open(database)?
        .with_busy_timeout(Duration::from_millis(config.storage.busy_timeout_ms));

    let friends = store.list_friends(&args.ids)?;

    let missing: Vec<String> = args
        .ids
        .iter()
        .filter(|id| !friends.iter().any(|f| f.id == **id))
        .map(|id| id.to_string())
        .collect();
    if !missing.is_empty() {
        eprintln!("{}", formatter.warning(&format!("Not found: {}", missing.join(", "))));
    }

    println!("{}", formatter.friends(&friends, today)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::OutputFormat;
    use tempfile::TempDir;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, 19).unwrap()
    }

    #[test]
    fn test_missing_database_is_not_created() {
        let dir = TempDir::new().unwrap();
        let mut config = Config::default();
        config.storage.database = dir.path().join("rapprot.db");
        let formatter = Formatter::new(OutputFormat::Text, false);

        let result = execute_show(ShowArgs { ids: vec![1] }, &config, &formatter, today());

        match result {
            Err(CliError::InvalidInput(msg)) => assert!(msg.contains("rapprot.db")),
            other => panic!("Expected InvalidInput, got {:?}", other),
        }
        assert!(!config.storage.database.exists());
    }

    #[test]
    fn test_existing_database_is_read() {
        let dir = TempDir::new().unwrap();
        let mut config = Config::default();
        config.storage.database = dir.path().join("rapport.db");
        SqliteStore::open(&config.storage.database).unwrap();
        let formatter = Formatter::new(OutputFormat::Json, false);

        assert!(execute_show(ShowArgs { ids: vec![1] }, &config, &formatter, today()).is_ok());
    }
}
