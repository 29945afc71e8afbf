//! Batch Persister: one session, one statement, contiguous ids

use crate::error::PipelineError;
use crate::normalizer::normalize;
use rapport_domain::traits::{FriendStore, StoreSession};
use rapport_domain::{ExtractedRecord, FriendRow, PersistedBatchResult};
use std::sync::Arc;
use tracing::{debug, info};

/// Writes a validated batch to the `friends` table
pub struct BatchPersister<S> {
    store: Arc<S>,
}

impl<S> Clone for BatchPersister<S> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
        }
    }
}

impl<S> BatchPersister<S>
where
    S: FriendStore,
    S::Error: std::fmt::Display,
{
    /// Create a persister over `store`
    pub fn new(store: S) -> Self {
        Self {
            store: Arc::new(store),
        }
    }

    /// The underlying store
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Normalize and store a batch
    ///
    /// An empty batch returns `{count: 0, insertIds: []}` without opening a
    /// session.
    pub fn persist(
        &self,
        records: Vec<ExtractedRecord>,
    ) -> Result<PersistedBatchResult, PipelineError> {
        let rows = normalize(records)?;
        self.persist_rows(&rows)
    }

    /// Store rows that are already normalized
    pub fn persist_rows(&self, rows: &[FriendRow]) -> Result<PersistedBatchResult, PipelineError> {
        if rows.is_empty() {
            debug!("Empty batch, nothing to persist");
            return Ok(PersistedBatchResult::empty());
        }

        // The session is dropped, and so released, on every return path
        let mut session = self
            .store
            .open_session()
            .map_err(|e| PipelineError::PersistenceFailure(e.to_string()))?;

        // A session reports success only once every row is committed
        let outcome = session
            .insert_friends(rows)
            .map_err(|e| PipelineError::PersistenceFailure(e.to_string()))?;

        let result = PersistedBatchResult::from_outcome(outcome);
        info!(
            "Persisted {} records, first id {}",
            result.count, outcome.first_id
        );
        Ok(result)
    }
}
