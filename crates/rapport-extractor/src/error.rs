//! Error types for the extraction pipeline

use crate::schema::ValidationError;
use thiserror::Error;

/// Errors that abort a `process_text` run
///
/// No variant carries partial results: a failed run stores nothing.
#[derive(Error, Debug)]
pub enum PipelineError {
    /// The text service call did not complete (transport, auth, timeout)
    #[error("Extraction failed: {0}")]
    ExtractionFailure(String),

    /// The service answered but its payload does not fit the record schema
    #[error("Schema violation: {source}")]
    SchemaViolation {
        /// What was wrong with the payload
        #[source]
        source: ValidationError,

        /// The raw payload, for diagnosis
        payload: String,
    },

    /// A required field reached the normalizer empty
    #[error("Incomplete record {index}: required field '{field}' is empty")]
    IncompleteRecord {
        /// Position of the record in the batch
        index: usize,

        /// Name of the empty field
        field: &'static str,
    },

    /// The storage statement failed
    #[error("Persistence failed: {0}")]
    PersistenceFailure(String),
}

impl PipelineError {
    /// Whether re-running the same input may succeed
    ///
    /// Only service-call failures are transient. A schema violation needs a
    /// prompt or model change; storage failures are reported as-is.
    pub fn is_retryable(&self) -> bool {
        matches!(self, PipelineError::ExtractionFailure(_))
    }

    /// Stable name of the error kind, for logs and machine output
    pub fn kind(&self) -> &'static str {
        match self {
            PipelineError::ExtractionFailure(_) => "extraction_failure",
            PipelineError::SchemaViolation { .. } => "schema_violation",
            PipelineError::IncompleteRecord { .. } => "incomplete_record",
            PipelineError::PersistenceFailure(_) => "persistence_failure",
        }
    }

    /// The offending payload of a schema violation
    pub fn payload(&self) -> Option<&str> {
        match self {
            PipelineError::SchemaViolation { payload, .. } => Some(payload),
            _ => None,
        }
    }
}
