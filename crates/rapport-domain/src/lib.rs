//! Rapport Domain Layer
//!
//! Core types and trait interfaces for turning free-text descriptions of
//! people into stored `friends` rows. This crate performs no I/O; the text
//! service and the relational store are reached only through the traits in
//! [`traits`].
//!
//! ## Key Concepts
//!
//! - **ExtractedRecord**: one person's validated profile
//! - **FriendRow**: the same profile in storage-layer shape (absent = NULL)
//! - **InsertOutcome**: affected rows and first id reported by one insert
//! - **PersistedBatchResult**: the contiguous ids handed back to the caller

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod batch;
pub mod friend;
pub mod gender;
pub mod record;
pub mod traits;

// Re-exports for convenience
pub use batch::{InsertOutcome, PersistedBatchResult};
pub use friend::{FriendRow, StoredFriend, FRIEND_COLUMNS};
pub use gender::Gender;
pub use record::ExtractedRecord;
