//! Map validated records to storage rows
//!
//! This is the last gate before durable storage: required fields are
//! checked again, and absent optional fields become `None` (SQL `NULL`).

use crate::error::PipelineError;
use rapport_domain::{ExtractedRecord, FriendRow};

/// Convert a validated batch into rows for the `friends` table
///
/// Empty optional strings are kept as empty strings; only absent values map
/// to `None`. A present `wechat` is non-empty by the time it gets here.
pub fn normalize(records: Vec<ExtractedRecord>) -> Result<Vec<FriendRow>, PipelineError> {
    records
        .into_iter()
        .enumerate()
        .map(|(index, record)| normalize_record(index, record))
        .collect()
}

fn normalize_record(index: usize, record: ExtractedRecord) -> Result<FriendRow, PipelineError> {
    let name = record.name.trim();
    if name.is_empty() {
        return Err(PipelineError::IncompleteRecord {
            index,
            field: "name",
        });
    }

    Ok(FriendRow {
        name: name.to_string(),
        gender: record.gender.as_str().to_string(),
        birth_date: record.birth_date,
        company: record.company,
        title: record.title,
        phone: record.phone,
        wechat: record.wechat,
    })
}
