// Runtime configuration, read from environment variables with defaults.

use std::path::PathBuf;
use std::time::Duration;

use crate::executor::ExecutionLimits;

const DEFAULT_TIMEOUT_MS: u64 = 2000;
const DEFAULT_MEMORY_LIMIT_MB: f64 = 256.0;

#[derive(Debug, Clone)]
pub struct JudgeConfig {
    /// Wall-clock timeout applied per test-case run, not per job.
    pub timeout: Duration,
    /// Reporting ceiling for timed-out runs, megabytes. Not an enforced cap.
    pub memory_limit_mb: f64,
    /// Directory holding already-persisted code artifacts.
    pub submissions_dir: PathBuf,
    /// Directory holding test files.
    pub tests_dir: PathBuf,
    /// HTTP listen address for the server binary.
    pub listen_addr: String,
}

impl JudgeConfig {
    pub fn from_env() -> Self {
        let timeout_ms = env_parsed("ARBITER_TIMEOUT_MS", DEFAULT_TIMEOUT_MS);
        let memory_limit_mb = env_parsed("ARBITER_MEMORY_LIMIT_MB", DEFAULT_MEMORY_LIMIT_MB);

        Self {
            timeout: Duration::from_millis(timeout_ms),
            memory_limit_mb,
            submissions_dir: PathBuf::from(env_or(
                "ARBITER_SUBMISSIONS_DIR",
                "./code_submissions",
            )),
            tests_dir: PathBuf::from(env_or("ARBITER_TESTS_DIR", "./test_cases")),
            listen_addr: env_or("ARBITER_LISTEN_ADDR", "0.0.0.0:3000"),
        }
    }

    pub fn execution_limits(&self) -> ExecutionLimits {
        ExecutionLimits {
            timeout: self.timeout,
            memory_ceiling_mb: self.memory_limit_mb,
        }
    }
}

impl Default for JudgeConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_millis(DEFAULT_TIMEOUT_MS),
            memory_limit_mb: DEFAULT_MEMORY_LIMIT_MB,
            submissions_dir: PathBuf::from("./code_submissions"),
            tests_dir: PathBuf::from("./test_cases"),
            listen_addr: "0.0.0.0:3000".to_string(),
        }
    }
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

fn env_parsed<T: std::str::FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = JudgeConfig::default();
        assert_eq!(config.timeout, Duration::from_secs(2));
        assert_eq!(config.memory_limit_mb, 256.0);

        let limits = config.execution_limits();
        assert_eq!(limits.timeout, config.timeout);
        assert_eq!(limits.memory_ceiling_mb, config.memory_limit_mb);
    }
}
