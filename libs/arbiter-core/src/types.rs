use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Exit code reported when a process never produced one: launch failure,
/// timeout kill, or termination by signal.
pub const FAILURE_EXIT_CODE: i32 = -1;

/// Supported language runtimes.
///
/// Adding a language means adding a variant and satisfying the exhaustive
/// matches in `runner` - there is no string-match fallthrough.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    Python,
    Cpp,
    Java,
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Language::Python => write!(f, "python"),
            Language::Cpp => write!(f, "cpp"),
            Language::Java => write!(f, "java"),
        }
    }
}

impl FromStr for Language {
    type Err = UnsupportedLanguage;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "python" => Ok(Language::Python),
            "cpp" => Ok(Language::Cpp),
            "java" => Ok(Language::Java),
            other => Err(UnsupportedLanguage(other.to_string())),
        }
    }
}

/// Rejection for a language tag outside the supported set. Surfaces at
/// intake, before any job exists.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnsupportedLanguage(pub String);

impl fmt::Display for UnsupportedLanguage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Language '{}' is not supported (expected python, cpp, or java)",
            self.0
        )
    }
}

impl std::error::Error for UnsupportedLanguage {}

/// One (input, expected output) pair. Order within a submission is
/// significant; the 1-based index becomes part of the reported identity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TestCase {
    pub input: String,
    pub expected_output: String,
}

/// Raw outcome of one compile-and-run attempt, produced by the executor
/// (compile time filled in by the engine). Immutable once produced; a
/// nonzero exit code is data here, not a failure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExecutionResult {
    pub stdout: String,
    pub stderr: String,
    /// Wall time of the run phase, seconds.
    pub time_secs: f64,
    /// Zero for interpreted languages.
    pub compile_time_secs: f64,
    /// Peak sampled resident memory, megabytes. Best effort; 0 when the
    /// process was gone before the first sample.
    pub memory_mb: f64,
    pub exit_code: i32,
}

impl ExecutionResult {
    /// Terminal result for a process that could not be started or spoken
    /// to. Carries the failure description; never propagated as an error.
    pub fn launch_failure(description: impl Into<String>) -> Self {
        Self {
            stdout: String::new(),
            stderr: description.into(),
            time_secs: 0.0,
            compile_time_secs: 0.0,
            memory_mb: 0.0,
            exit_code: FAILURE_EXIT_CODE,
        }
    }
}

/// Per-test verdict.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Verdict {
    Passed,
    Failed,
    #[serde(rename = "Runtime Error")]
    RuntimeError,
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Verdict::Passed => write!(f, "Passed"),
            Verdict::Failed => write!(f, "Failed"),
            Verdict::RuntimeError => write!(f, "Runtime Error"),
        }
    }
}

/// One judged test case as published to pollers.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TestRecord {
    /// 1-based test index.
    pub test: usize,
    pub status: Verdict,
    pub output: String,
    pub expected: String,
    pub time: f64,
    pub compilation_time: f64,
    pub memory: f64,
    pub error: String,
}

/// Acceptance-time shape of a job, before the first record lands.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProgressInfo {
    pub current: usize,
    pub total: usize,
    pub progress: u8,
    pub created_at: DateTime<Utc>,
}

impl ProgressInfo {
    pub fn new(total: usize) -> Self {
        Self {
            current: 0,
            total,
            progress: 0,
            created_at: Utc::now(),
        }
    }
}

/// Progress-store entry for one task identifier.
///
/// A job starts as `Pending` and is overwritten with `Records` after every
/// judged test; it is complete exactly when the record count equals the
/// submitted test count. There is no separate completion flag.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Job {
    Records(Vec<TestRecord>),
    Pending(ProgressInfo),
}

impl Job {
    pub fn records(&self) -> Option<&[TestRecord]> {
        match self {
            Job::Records(records) => Some(records),
            Job::Pending(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_language_round_trip() {
        for tag in ["python", "cpp", "java"] {
            let lang: Language = tag.parse().unwrap();
            assert_eq!(lang.to_string(), tag);
        }
    }

    #[test]
    fn test_language_case_insensitive() {
        assert_eq!("Python".parse::<Language>().unwrap(), Language::Python);
        assert_eq!("CPP".parse::<Language>().unwrap(), Language::Cpp);
    }

    #[test]
    fn test_unsupported_language_rejected() {
        let err = "ruby".parse::<Language>().unwrap_err();
        assert_eq!(err, UnsupportedLanguage("ruby".to_string()));
        assert!(err.to_string().contains("ruby"));
    }

    #[test]
    fn test_verdict_wire_names() {
        assert_eq!(
            serde_json::to_string(&Verdict::RuntimeError).unwrap(),
            "\"Runtime Error\""
        );
        assert_eq!(serde_json::to_string(&Verdict::Passed).unwrap(), "\"Passed\"");
    }

    #[test]
    fn test_job_serializes_untagged() {
        let pending = Job::Pending(ProgressInfo::new(3));
        let value = serde_json::to_value(&pending).unwrap();
        assert_eq!(value["total"], 3);
        assert_eq!(value["current"], 0);

        let records = Job::Records(vec![]);
        let value = serde_json::to_value(&records).unwrap();
        assert!(value.is_array());
    }
}
