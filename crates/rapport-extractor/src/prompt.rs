//! LLM prompt engineering for profile extraction

use crate::schema::FIELDS;
use chrono::NaiveDate;
use std::fmt::Write;

/// Builds prompts for the LLM to extract people
///
/// `build` is a pure function of the builder and the input text: the same
/// text always renders the same prompt. The reference date used for age
/// estimation is injected rather than read from the clock.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PromptBuilder {
    reference_date: Option<NaiveDate>,
}

impl PromptBuilder {
    /// Create a new prompt builder
    pub fn new() -> Self {
        Self::default()
    }

    /// Anchor age-to-birth-date estimates on `date`
    pub fn with_reference_date(mut self, date: NaiveDate) -> Self {
        self.reference_date = Some(date);
        self
    }

    /// Reference date in use, if any
    pub fn reference_date(&self) -> Option<NaiveDate> {
        self.reference_date
    }

    /// Build the complete extraction prompt for `text`
    pub fn build(&self, text: &str) -> String {
        let mut prompt = String::new();

        // 1. Task and output shape
        prompt.push_str(EXTRACTION_INSTRUCTIONS);
        prompt.push_str("\n\n");

        // 2. Field list, straight from the schema
        prompt.push_str("Fields (use exactly these JSON keys):\n");
        for field in FIELDS.iter() {
            let _ = writeln!(
                prompt,
                "- {} ({}): {}",
                field.key,
                if field.required { "required" } else { "optional" },
                field.description
            );
        }
        prompt.push('\n');

        // 3. Rules, including how to turn an age into a date
        prompt.push_str(EXTRACTION_RULES);
        prompt.push('\n');
        match self.reference_date {
            Some(date) => {
                let _ = writeln!(
                    prompt,
                    "- Today's date is {}. Compute estimated birth dates relative to it.",
                    date.format("%Y-%m-%d")
                );
            }
            None => {
                prompt.push_str("- Compute estimated birth dates relative to the current year.\n");
            }
        }
        prompt.push('\n');

        // 4. One worked example
        prompt.push_str(EXAMPLE);
        prompt.push_str("\n\n");

        // 5. The text to analyze, verbatim
        prompt.push_str("Text to analyze:\n");
        prompt.push_str("---\n");
        prompt.push_str(text);
        prompt.push_str("\n---\n\n");

        // 6. Output format reminder
        prompt.push_str(OUTPUT_FORMAT_REMINDER);

        prompt
    }
}

/// Build a prompt with default settings
pub fn build_prompt(text: &str) -> String {
    PromptBuilder::default().build(text)
}

const EXTRACTION_INSTRUCTIONS: &str = "Extract a structured profile for every person described in the following text.
Return a JSON array with one object per person. Return an array even when the text
describes a single person, and return [] when no person can be identified.";

const EXTRACTION_RULES: &str = r#"Rules:
- Optional fields the text does not mention must be null. Do not invent values.
- gender must be exactly "male" or "female".
- birth_date must be a calendar date in YYYY-MM-DD format.
- If the text gives only an age, estimate birth_date as January 1 of the birth year implied by that age.
- If the text gives an age range, use the middle of the range."#;

const EXAMPLE: &str = r#"Example:
Text: 李四，女，1990年5月12日出生，在Example Co当产品经理，电话13800000000。
Output:
[
  {
    "name": "李四",
    "gender": "female",
    "birth_date": "1990-05-12",
    "company": "Example Co",
    "title": "产品经理",
    "phone": "13800000000",
    "wechat": null
  }
]"#;

const OUTPUT_FORMAT_REMINDER: &str =
    "Remember: Return ONLY the JSON array, no markdown code blocks, no explanations.";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prompt_includes_text_verbatim() {
        let text = "张三, male, about 30, works at Acme as Engineer, phone 13900000000";
        let prompt = build_prompt(text);
        assert!(prompt.contains(text));
    }

    #[test]
    fn test_prompt_is_deterministic() {
        let text = "Alice is a nurse at St. Mary's.";
        let builder = PromptBuilder::new();
        assert_eq!(builder.build(text), builder.build(text));
        assert_eq!(build_prompt(text), build_prompt(text));
    }

    #[test]
    fn test_prompt_lists_every_field() {
        let prompt = build_prompt("text");
        for field in FIELDS.iter() {
            assert!(
                prompt.contains(&format!("- {} (", field.key)),
                "missing field {}",
                field.key
            );
        }
        assert!(prompt.contains("- name (required)"));
        assert!(prompt.contains("- wechat (optional)"));
    }

    #[test]
    fn test_example_uses_every_key() {
        for field in FIELDS.iter() {
            assert!(EXAMPLE.contains(&format!("\"{}\":", field.key)));
        }
    }

    #[test]
    fn test_prompt_asks_for_array() {
        let prompt = build_prompt("text");
        assert!(prompt.contains("JSON array"));
        assert!(prompt.contains("return []"));
    }

    #[test]
    fn test_reference_date_in_prompt() {
        let date = NaiveDate::from_ymd_opt(2026, 10, 19).unwrap();
        let prompt = PromptBuilder::new().with_reference_date(date).build("text");
        assert!(prompt.contains("Today's date is 2026-10-19."));
        assert!(!build_prompt("text").contains("Today's date"));
    }

    #[test]
    fn test_text_comes_after_instructions() {
        let prompt = build_prompt("UNIQUE_MARKER");
        let text_pos = prompt.find("UNIQUE_MARKER").unwrap();
        let example_pos = prompt.find("Example:").unwrap();
        assert!(example_pos < text_pos);
        assert!(prompt.ends_with(OUTPUT_FORMAT_REMINDER));
    }
}
