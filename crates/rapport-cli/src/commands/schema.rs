//! Schema command implementation.

use crate::error::Result;
use crate::output::Formatter;

/// Print the JSON schema the text service is asked to follow.
pub fn execute_schema(formatter: &Formatter) -> Result<()> {
    println!("{}", formatter.json(&rapport_extractor::response_schema())?);
    Ok(())
}
