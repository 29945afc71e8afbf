//! Batch results - what a multi-row insert reports and what the caller gets back

use serde::{Deserialize, Serialize};

/// Raw outcome of one multi-row insert statement
///
/// `first_id` is the identifier assigned to the first row of the statement.
/// Deriving the remaining identifiers as `first_id..first_id + affected_rows`
/// is only sound when the engine assigns identifiers contiguously within a
/// single statement and no other writer interleaves on the same table. The
/// SQLite store satisfies this (one connection, one statement); any other
/// engine must be checked before relying on it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InsertOutcome {
    /// Number of rows the statement inserted
    pub affected_rows: u64,

    /// Identifier assigned to the first inserted row
    pub first_id: i64,
}

/// Result of persisting one extraction batch
///
/// `insert_ids` always has exactly `count` elements, ascending and
/// without gaps.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PersistedBatchResult {
    /// Number of rows stored
    pub count: usize,

    /// Identifiers assigned to the stored rows, in insert order
    #[serde(rename = "insertIds")]
    pub insert_ids: Vec<i64>,
}

impl PersistedBatchResult {
    /// Result for a batch with nothing to store
    pub fn empty() -> Self {
        Self::default()
    }

    /// Expand an insert outcome into the contiguous identifier range
    ///
    /// # Examples
    ///
    /// ```
    /// use rapport_domain::{InsertOutcome, PersistedBatchResult};
    ///
    /// let result = PersistedBatchResult::from_outcome(InsertOutcome {
    ///     affected_rows: 3,
    ///     first_id: 41,
    /// });
    /// assert_eq!(result.count, 3);
    /// assert_eq!(result.insert_ids, vec![41, 42, 43]);
    /// ```
    pub fn from_outcome(outcome: InsertOutcome) -> Self {
        let insert_ids: Vec<i64> = (0..outcome.affected_rows)
            .map(|offset| outcome.first_id + offset as i64)
            .collect();

        Self {
            count: insert_ids.len(),
            insert_ids,
        }
    }

    /// Whether nothing was stored
    pub fn is_empty(&self) -> bool {
        self.count == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_result() {
        let result = PersistedBatchResult::empty();
        assert_eq!(result.count, 0);
        assert!(result.insert_ids.is_empty());
        assert!(result.is_empty());
    }

    #[test]
    fn test_from_outcome_single_row() {
        let result = PersistedBatchResult::from_outcome(InsertOutcome {
            affected_rows: 1,
            first_id: 7,
        });
        assert_eq!(result.count, 1);
        assert_eq!(result.insert_ids, vec![7]);
    }

    #[test]
    fn test_from_outcome_zero_rows() {
        let result = PersistedBatchResult::from_outcome(InsertOutcome {
            affected_rows: 0,
            first_id: 100,
        });
        assert!(result.is_empty());
    }

    #[test]
    fn test_serializes_with_insert_ids_key() {
        let result = PersistedBatchResult::from_outcome(InsertOutcome {
            affected_rows: 2,
            first_id: 1,
        });
        let json = serde_json::to_string(&result).unwrap();
        assert_eq!(json, r#"{"count":2,"insertIds":[1,2]}"#);
    }
}
