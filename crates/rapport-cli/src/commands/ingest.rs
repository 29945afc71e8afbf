//! Ingest command implementation.

use crate::cli::InputArgs;
use crate::commands::read_input;
use crate::config::Config;
use crate::error::Result;
use crate::output::Formatter;
use chrono::NaiveDate;
use rapport_extractor::{Pipeline, PipelineError};
use rapport_llm::OllamaProvider;
use rapport_store::SqliteStore;
use std::fs;
use std::time::Duration;
use tracing::{debug, error};

/// Execute the ingest command.
pub async fn execute_ingest(
    args: InputArgs,
    config: &Config,
    formatter: &Formatter,
    today: NaiveDate,
) -> Result<()> {
    let text = read_input(&args)?;

    let pipeline = build_pipeline(config)?.with_reference_date(today);

    let result = pipeline.process_text(&text).await.inspect_err(|e| {
        error!(kind = e.kind(), retryable = e.is_retryable(), "Ingest failed");
        if let PipelineError::SchemaViolation { payload, .. } = e {
            debug!("Rejected payload: {}", payload);
        }
    })?;

    println!("{}", formatter.batch_result(&result)?);
    Ok(())
}

fn build_pipeline(config: &Config) -> Result<Pipeline<OllamaProvider, SqliteStore>> {
    let llm_settings = &config.llm;
    let mut llm = OllamaProvider::new(&llm_settings.endpoint, &llm_settings.model)
        .with_timeout(Duration::from_secs(llm_settings.timeout_secs))
        .with_max_retries(llm_settings.max_retries);
    if let Some(key) = &llm_settings.api_key {
        llm = llm.with_api_key(key);
    }

    let database = &config.storage.database;
    if let Some(parent) = database.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    let store = SqliteStore::open(database)?
        .with_busy_timeout(Duration::from_millis(config.storage.busy_timeout_ms));

    debug!(
        model = %llm_settings.model,
        database = %database.display(),
        "Pipeline ready"
    );

    Ok(Pipeline::new(llm, store, config.extractor.clone()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_build_pipeline_creates_database_directory() {
        let dir = TempDir::new().unwrap();
        let mut config = Config::default();
        config.storage.database = dir.path().join("nested").join("rapport.db");

        let pipeline = build_pipeline(&config).unwrap();

        assert!(config.storage.database.exists());
        assert_eq!(pipeline.persister().store().count_friends().unwrap(), 0);
    }

    #[tokio::test]
    async fn test_blank_input_needs_no_service() {
        let dir = TempDir::new().unwrap();
        let mut config = Config::default();
        config.storage.database = dir.path().join("rapport.db");
        // Nothing listens here; a service call would fail
        config.llm.endpoint = "http://127.0.0.1:9".to_string();

        let pipeline = build_pipeline(&config).unwrap();
        let result = pipeline.process_text("   ").await.unwrap();
        assert!(result.is_empty());
    }
}
