//! End-to-end `process_text`: extract, validate, normalize, persist

use crate::config::ExtractorConfig;
use crate::error::PipelineError;
use crate::extractor::Extractor;
use crate::persister::BatchPersister;
use chrono::NaiveDate;
use rapport_domain::traits::{FriendStore, LlmProvider};
use rapport_domain::PersistedBatchResult;
use tracing::{info, instrument};

/// Text in, stored ids out
///
/// A run either stores the whole batch or stores nothing. Independent runs
/// may proceed concurrently; each uses its own storage session.
pub struct Pipeline<L, S>
where
    L: LlmProvider,
{
    extractor: Extractor<L>,
    persister: BatchPersister<S>,
}

impl<L, S> Pipeline<L, S>
where
    L: LlmProvider + Send + Sync + 'static,
    L::Error: std::fmt::Display,
    S: FriendStore + Send + Sync + 'static,
    S::Error: std::fmt::Display,
{
    /// Create a pipeline from a text service, a store and a configuration
    pub fn new(llm_provider: L, store: S, config: ExtractorConfig) -> Self {
        Self {
            extractor: Extractor::new(llm_provider, config),
            persister: BatchPersister::new(store),
        }
    }

    /// Anchor birth-date estimates on `date`
    pub fn with_reference_date(mut self, date: NaiveDate) -> Self {
        self.extractor = self.extractor.with_reference_date(date);
        self
    }

    /// The extraction stage
    pub fn extractor(&self) -> &Extractor<L> {
        &self.extractor
    }

    /// The persistence stage
    pub fn persister(&self) -> &BatchPersister<S> {
        &self.persister
    }

    /// Extract every person described in `text` and store them
    ///
    /// Returns the number of rows stored and their contiguous ids, in the
    /// order the service reported the people.
    #[instrument(skip_all, fields(text_len = text.len()))]
    pub async fn process_text(&self, text: &str) -> Result<PersistedBatchResult, PipelineError> {
        let records = self.extractor.extract(text).await?;

        if records.is_empty() {
            info!("No people found, nothing stored");
            return Ok(PersistedBatchResult::empty());
        }

        let persister = self.persister.clone();

        // Storage calls block, keep them off the async workers
        let result = tokio::task::spawn_blocking(move || persister.persist(records))
            .await
            .map_err(|e| PipelineError::PersistenceFailure(format!("Task join error: {}", e)))??;

        info!("Stored {} records: {:?}", result.count, result.insert_ids);
        Ok(result)
    }
}
