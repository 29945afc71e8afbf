//! Prompt command implementation.

use crate::cli::InputArgs;
use crate::commands::read_input;
use crate::error::Result;
use chrono::NaiveDate;
use rapport_extractor::PromptBuilder;

/// Print the prompt that `ingest` would send, without contacting anything.
pub fn execute_prompt(args: InputArgs, today: NaiveDate) -> Result<()> {
    let text = read_input(&args)?;
    let prompt = PromptBuilder::new().with_reference_date(today).build(&text);
    println!("{}", prompt);
    Ok(())
}
