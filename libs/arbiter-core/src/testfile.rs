//! Line-oriented test file parsing.
//!
//! One line per test case, whitespace-delimited: every token but the last,
//! rejoined with single spaces, forms the input; the last token is the
//! expected output. The format cannot represent inputs with embedded
//! multi-space runs - a known fragility of the format, not of this parser.

use std::fmt;
use std::path::Path;

use tracing::error;

use crate::types::TestCase;

#[derive(Debug)]
pub enum TestFileError {
    /// A line with no tokens; carries the 1-based line number.
    MalformedLine { line: usize },
    Io(std::io::Error),
}

impl fmt::Display for TestFileError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TestFileError::MalformedLine { line } => {
                write!(f, "Malformed test file: no tokens on line {}", line)
            }
            TestFileError::Io(e) => write!(f, "Failed to read test file: {}", e),
        }
    }
}

impl std::error::Error for TestFileError {}

impl From<std::io::Error> for TestFileError {
    fn from(e: std::io::Error) -> Self {
        TestFileError::Io(e)
    }
}

/// Parse test file content into ordered test cases.
pub fn parse(content: &str) -> Result<Vec<TestCase>, TestFileError> {
    let mut cases = Vec::new();

    for (idx, line) in content.lines().enumerate() {
        let tokens: Vec<&str> = line.split_whitespace().collect();
        let Some((expected, input_tokens)) = tokens.split_last() else {
            return Err(TestFileError::MalformedLine { line: idx + 1 });
        };

        cases.push(TestCase {
            input: input_tokens.join(" "),
            expected_output: expected.to_string(),
        });
    }

    Ok(cases)
}

/// Load and parse a test file from disk.
pub async fn load(path: &Path) -> Result<Vec<TestCase>, TestFileError> {
    let content = tokio::fs::read_to_string(path).await?;
    parse(&content)
}

/// List test file names in a directory. Failures are logged and yield an
/// empty list rather than an error, so the listing surface never breaks.
pub async fn available_tests(dir: &Path) -> Vec<String> {
    let mut names = Vec::new();

    let mut entries = match tokio::fs::read_dir(dir).await {
        Ok(entries) => entries,
        Err(e) => {
            error!(dir = %dir.display(), error = %e, "Failed to list test files");
            return names;
        }
    };

    while let Ok(Some(entry)) = entries.next_entry().await {
        let is_file = entry
            .file_type()
            .await
            .map(|t| t.is_file())
            .unwrap_or(false);
        if is_file {
            names.push(entry.file_name().to_string_lossy().into_owned());
        }
    }

    names.sort();
    names
}
