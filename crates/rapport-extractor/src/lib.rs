//! Rapport Extractor
//!
//! Turns a free-text description of one or more people into rows of the
//! `friends` table.
//!
//! # Architecture
//!
//! ```text
//! Text → PromptBuilder → LLM (schema-constrained) → parser/schema
//!      → normalizer → BatchPersister → FriendStore
//! ```
//!
//! The text service is called exactly once per non-blank input. Its output
//! is validated in full before anything is written, and the batch is stored
//! with a single multi-row insert, so a run stores every record or none.
//!
//! # Example Usage
//!
//! ```no_run
//! use rapport_extractor::{ExtractorConfig, Pipeline};
//! use rapport_llm::MockProvider;
//! use rapport_store::SqliteStore;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let llm = MockProvider::new("[]");
//! let store = SqliteStore::open("rapport.db")?;
//! let pipeline = Pipeline::new(llm, store, ExtractorConfig::default());
//!
//! let result = pipeline
//!     .process_text("张三, male, about 30, works at Acme as Engineer")
//!     .await?;
//!
//! println!("Stored {} rows: {:?}", result.count, result.insert_ids);
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]

mod config;
mod error;
mod extractor;
mod normalizer;
mod parser;
mod persister;
mod pipeline;
mod prompt;
pub mod schema;


pub use config::ExtractorConfig;
pub use error::PipelineError;
pub use extractor::Extractor;
pub use normalizer::normalize;
pub use parser::parse_response;
pub use persister::BatchPersister;
pub use pipeline::Pipeline;
pub use prompt::{build_prompt, PromptBuilder};
pub use schema::{response_schema, validate, validate_sequence, FieldKind, FieldSpec, ValidationError, FIELDS};
