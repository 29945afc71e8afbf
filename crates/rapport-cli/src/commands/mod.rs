//! Command implementations.

pub mod ingest;
pub mod prompt;
pub mod schema;
pub mod show;

pub use self::ingest::execute_ingest;
pub use self::prompt::execute_prompt;
pub use self::schema::execute_schema;
pub use self::show::execute_show;

use crate::cli::InputArgs;
use crate::error::{CliError, Result};
use std::fs;
use std::io::{self, Read};

/// Read the input text from whichever source was given.
pub(crate) fn read_input(args: &InputArgs) -> Result<String> {
    if args.stdin {
        let mut buffer = String::new();
        io::stdin().read_to_string(&mut buffer)?;
        Ok(buffer)
    } else if let Some(file_path) = &args.file {
        Ok(fs::read_to_string(file_path)?)
    } else if let Some(text) = &args.text {
        Ok(text.clone())
    } else {
        Err(CliError::InvalidInput(
            "Must specify one of --text, --file or --stdin".to_string(),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_read_text_argument() {
        let args = InputArgs {
            text: Some("Alice".to_string()),
            file: None,
            stdin: false,
        };
        assert_eq!(read_input(&args).unwrap(), "Alice");
    }

    #[test]
    fn test_read_file() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "张三，男，30岁").unwrap();

        let args = InputArgs {
            text: None,
            file: Some(file.path().to_path_buf()),
            stdin: false,
        };
        assert_eq!(read_input(&args).unwrap(), "张三，男，30岁");
    }

    #[test]
    fn test_no_source() {
        let args = InputArgs {
            text: None,
            file: None,
            stdin: false,
        };
        assert!(matches!(read_input(&args), Err(CliError::InvalidInput(_))));
    }
}
