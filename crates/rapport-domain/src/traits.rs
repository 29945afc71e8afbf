//! Trait definitions for external interactions
//!
//! These traits define the boundaries between domain logic and infrastructure.
//! Infrastructure implementations live in other crates.

use crate::{FriendRow, InsertOutcome};

/// Trait for the text-understanding service
///
/// Implemented by the infrastructure layer (rapport-llm)
pub trait LlmProvider {
    /// Error type for LLM operations
    type Error;

    /// Generate text completion
    fn generate(&self, prompt: &str) -> Result<String, Self::Error>;

    /// Generate output constrained to a JSON Schema
    ///
    /// `schema` is a serialized JSON Schema document. Implementations pass
    /// it to the service as an output constraint; the caller still
    /// validates what comes back.
    fn generate_structured(&self, prompt: &str, schema: &str) -> Result<String, Self::Error>;
}

/// Trait for a store that holds the `friends` table
///
/// Implemented by the infrastructure layer (rapport-store)
pub trait FriendStore {
    /// Error type for store operations
    type Error;

    /// Session type handed out by this store
    type Session: StoreSession<Error = Self::Error>;

    /// Acquire a storage session
    ///
    /// The session is released when it is dropped.
    fn open_session(&self) -> Result<Self::Session, Self::Error>;
}

/// A scoped storage session
pub trait StoreSession {
    /// Error type for session operations
    type Error;

    /// Insert all rows with a single multi-row statement
    ///
    /// Either every row lands or none does; on success `affected_rows`
    /// equals `rows.len()`.
    fn insert_friends(&mut self, rows: &[FriendRow]) -> Result<InsertOutcome, Self::Error>;
}
