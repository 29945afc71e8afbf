//! Output formatting for the CLI.

use crate::config::OutputFormat;
use crate::error::Result;
use chrono::NaiveDate;
use colored::*;
use rapport_domain::{PersistedBatchResult, StoredFriend};
use serde_json::Value;

/// Output formatter.
pub struct Formatter {
    format: OutputFormat,
    color_enabled: bool,
}

impl Formatter {
    /// Create a new formatter.
    pub fn new(format: OutputFormat, color_enabled: bool) -> Self {
        Self {
            format,
            color_enabled,
        }
    }

    /// Format the result of an ingest run.
    pub fn batch_result(&self, result: &PersistedBatchResult) -> Result<String> {
        match self.format {
            OutputFormat::Json => Ok(serde_json::to_string(result)?),
            OutputFormat::Text => Ok(self.batch_result_text(result)),
        }
    }

    fn batch_result_text(&self, result: &PersistedBatchResult) -> String {
        if result.is_empty() {
            return self.warning("No people found in the text.");
        }

        let ids: Vec<String> = result.insert_ids.iter().map(|id| id.to_string()).collect();
        self.success(&format!(
            "Stored {} {} (ids: {})",
            result.count,
            if result.count == 1 { "person" } else { "people" },
            ids.join(", ")
        ))
    }

    /// Format stored friends; `today` anchors the displayed ages.
    pub fn friends(&self, friends: &[StoredFriend], today: NaiveDate) -> Result<String> {
        match self.format {
            OutputFormat::Json => Ok(serde_json::to_string_pretty(friends)?),
            OutputFormat::Text => Ok(self.friends_text(friends, today)),
        }
    }

    fn friends_text(&self, friends: &[StoredFriend], today: NaiveDate) -> String {
        if friends.is_empty() {
            return self.warning("No matching rows.");
        }

        let blocks: Vec<String> = friends
            .iter()
            .map(|friend| self.friend_text(friend, today))
            .collect();
        blocks.join("\n\n")
    }

    fn friend_text(&self, friend: &StoredFriend, today: NaiveDate) -> String {
        let row = &friend.row;
        let age = row
            .age_on(today)
            .map(|age| format!(", age {}", age))
            .unwrap_or_default();

        let mut lines = vec![format!(
            "{} {} ({}, born {}{})",
            self.colorize(&format!("#{}", friend.id), "cyan"),
            self.bold(&row.name),
            row.gender,
            row.birth_date.format("%Y-%m-%d"),
            age
        )];

        let optional = [
            ("company", &row.company),
            ("title", &row.title),
            ("phone", &row.phone),
            ("wechat", &row.wechat),
        ];
        for (label, value) in optional {
            if let Some(value) = value {
                lines.push(format!("  {}: {}", label, value));
            }
        }

        lines.join("\n")
    }

    /// Format a JSON document (schema output).
    pub fn json(&self, value: &Value) -> Result<String> {
        Ok(serde_json::to_string_pretty(value)?)
    }

    /// Format a success message.
    pub fn success(&self, message: &str) -> String {
        self.colorize(&format!("✓ {}", message), "green")
    }

    /// Format an error message.
    pub fn error(&self, message: &str) -> String {
        self.colorize(&format!("✗ {}", message), "red")
    }

    /// Format a warning message.
    pub fn warning(&self, message: &str) -> String {
        self.colorize(&format!("⚠ {}", message), "yellow")
    }

    fn bold(&self, text: &str) -> String {
        if self.color_enabled {
            text.bold().to_string()
        } else {
            text.to_string()
        }
    }

    /// Colorize text if color is enabled.
    fn colorize(&self, text: &str, color: &str) -> String {
        if !self.color_enabled {
            return text.to_string();
        }

        match color {
            "red" => text.red().to_string(),
            "green" => text.green().to_string(),
            "yellow" => text.yellow().to_string(),
            "cyan" => text.cyan().to_string(),
            _ => text.to_string(),
        }
    }
}
