//! Bounded process executor.
//!
//! Runs exactly one child process per invocation: feeds the test input to
//! its stdin, captures stdout/stderr, enforces a wall-clock timeout, and
//! samples resident memory while the child runs. Every failure mode is
//! converted into an `ExecutionResult` - nothing below this boundary
//! propagates as an error.

use std::process::Stdio;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use sysinfo::{Pid, System};
use tokio::io::AsyncWriteExt;
use tokio::process::Command;
use tokio::time::timeout;
use tracing::{error, info, warn};

use crate::runner::LaunchCommand;
use crate::types::{ExecutionResult, FAILURE_EXIT_CODE};

/// Interval between RSS samples of the running child.
const MEMORY_SAMPLE_INTERVAL: Duration = Duration::from_millis(50);

/// Error text reported for a timed-out run.
pub const TIMEOUT_ERROR: &str = "Timeout expired";

#[derive(Debug, Clone, Copy)]
pub struct ExecutionLimits {
    /// Wall-clock bound for one run, re-applied fully per test case.
    pub timeout: Duration,
    /// Reported as the memory value of a timed-out run. Not enforced.
    pub memory_ceiling_mb: f64,
}

/// Run one command to completion or timeout.
///
/// On timeout the child is force-killed and the result carries the
/// configured timeout as its time and the memory ceiling as its memory
/// value. A nonzero exit code on a completed run is surfaced as data for
/// the engine to classify, not treated as a failure here.
pub async fn execute(
    command: &LaunchCommand,
    input: &str,
    limits: &ExecutionLimits,
) -> ExecutionResult {
    info!(command = %command, timeout_ms = limits.timeout.as_millis() as u64, "Starting run");

    let mut child = match Command::new(&command.program)
        .args(&command.args)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true)
        .spawn()
    {
        Ok(child) => child,
        Err(e) => {
            error!(command = %command, error = %e, "Failed to start process");
            return ExecutionResult::launch_failure(format!("Failed to start process: {}", e));
        }
    };

    // Feed the full input concurrently with the wait below, then close
    // stdin. The write must not sit on the caller's path: a child that
    // never reads stdin would otherwise block us past the timeout once
    // the input outgrows the pipe buffer. A child that exits (or is
    // killed) without reading produces a broken pipe; that is tolerated,
    // not an error.
    let writer = child.stdin.take().map(|mut stdin| {
        let input = input.as_bytes().to_vec();
        tokio::spawn(async move {
            let _ = stdin.write_all(&input).await;
            let _ = stdin.shutdown().await;
        })
    });

    // Best-effort RSS sampling while the child runs. A child gone before
    // the first sample reports 0.
    let peak_rss_kb = Arc::new(AtomicU64::new(0));
    let sampler = child.id().map(|pid| {
        let peak = Arc::clone(&peak_rss_kb);
        tokio::spawn(sample_memory(pid, peak))
    });

    let started = Instant::now();
    let outcome = timeout(limits.timeout, child.wait_with_output()).await;

    if let Some(sampler) = sampler {
        sampler.abort();
    }
    if let Some(writer) = writer {
        // Killing the child broke the pipe; the writer is done or about
        // to fail out.
        writer.abort();
    }

    match outcome {
        Ok(Ok(output)) => {
            let time_secs = started.elapsed().as_secs_f64();
            let exit_code = output.status.code().unwrap_or(FAILURE_EXIT_CODE);
            let memory_mb = peak_rss_kb.load(Ordering::Relaxed) as f64 / 1024.0;
            let stderr = String::from_utf8_lossy(&output.stderr).into_owned();

            if exit_code != 0 {
                warn!(command = %command, exit_code, stderr = %stderr, "Run exited nonzero");
            } else {
                info!(command = %command, time_secs, memory_mb, "Run completed");
            }

            ExecutionResult {
                stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
                stderr,
                time_secs,
                compile_time_secs: 0.0,
                memory_mb,
                exit_code,
            }
        }
        Ok(Err(e)) => {
            error!(command = %command, error = %e, "Failed to communicate with process");
            ExecutionResult::launch_failure(format!("Failed to communicate with process: {}", e))
        }
        Err(_) => {
            // The in-flight wait future is dropped here; kill_on_drop
            // reaps the child.
            error!(
                command = %command,
                timeout_ms = limits.timeout.as_millis() as u64,
                "Run exceeded time limit"
            );
            ExecutionResult {
                stdout: String::new(),
                stderr: TIMEOUT_ERROR.to_string(),
                time_secs: limits.timeout.as_secs_f64(),
                compile_time_secs: 0.0,
                memory_mb: limits.memory_ceiling_mb,
                exit_code: FAILURE_EXIT_CODE,
            }
        }
    }
}

/// Periodically sample the child's RSS, tracking the peak in kilobytes.
/// Stops on its own once the process disappears; aborted by the caller
/// otherwise.
async fn sample_memory(pid: u32, peak_kb: Arc<AtomicU64>) {
    let pid = Pid::from_u32(pid);
    let mut system = System::new();

    loop {
        if !system.refresh_process(pid) {
            break;
        }
        match system.process(pid) {
            Some(process) => {
                peak_kb.fetch_max(process.memory() / 1024, Ordering::Relaxed);
            }
            None => break,
        }
        tokio::time::sleep(MEMORY_SAMPLE_INTERVAL).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sh(script: &str) -> LaunchCommand {
        LaunchCommand::new("sh", vec!["-c".to_string(), script.to_string()])
    }

    fn limits(timeout_ms: u64) -> ExecutionLimits {
        ExecutionLimits {
            timeout: Duration::from_millis(timeout_ms),
            memory_ceiling_mb: 256.0,
        }
    }

    #[tokio::test]
    async fn test_captures_stdout_and_exit_code() {
        let result = execute(&sh("echo hello"), "", &limits(2000)).await;
        assert_eq!(result.exit_code, 0);
        assert_eq!(result.stdout.trim(), "hello");
        assert!(result.stderr.is_empty());
    }

    #[tokio::test]
    async fn test_input_is_piped_to_stdin() {
        let result = execute(&sh("cat"), "2 3\n", &limits(2000)).await;
        assert_eq!(result.exit_code, 0);
        assert_eq!(result.stdout, "2 3\n");
    }

    #[tokio::test]
    async fn test_nonzero_exit_is_data_not_failure() {
        let result = execute(&sh("echo out; echo oops >&2; exit 3"), "", &limits(2000)).await;
        assert_eq!(result.exit_code, 3);
        assert_eq!(result.stdout.trim(), "out");
        assert_eq!(result.stderr.trim(), "oops");
    }

    #[tokio::test]
    async fn test_timeout_kills_and_reports_sentinels() {
        let started = Instant::now();
        let result = execute(&sh("sleep 30"), "", &limits(300)).await;

        assert!(started.elapsed() < Duration::from_secs(5));
        assert_eq!(result.exit_code, FAILURE_EXIT_CODE);
        assert_eq!(result.stderr, TIMEOUT_ERROR);
        assert!(result.stdout.is_empty());
        assert_eq!(result.time_secs, 0.3);
        assert_eq!(result.memory_mb, 256.0);
    }

    #[tokio::test]
    async fn test_timeout_holds_when_child_never_reads_large_input() {
        // Input far beyond the OS pipe buffer, fed to a child that never
        // touches stdin. The stdin write must not extend the wall-clock
        // bound.
        let input = "x".repeat(4 * 1024 * 1024);
        let started = Instant::now();
        let result = execute(&sh("sleep 30"), &input, &limits(300)).await;

        assert!(
            started.elapsed() < Duration::from_secs(5),
            "run was not released at the configured timeout"
        );
        assert_eq!(result.exit_code, FAILURE_EXIT_CODE);
        assert_eq!(result.stderr, TIMEOUT_ERROR);
        assert_eq!(result.time_secs, 0.3);
    }

    #[tokio::test]
    async fn test_launch_failure_becomes_result() {
        let command = LaunchCommand::new("definitely-not-a-real-binary-4a1f", vec![]);
        let result = execute(&command, "", &limits(2000)).await;

        assert_eq!(result.exit_code, FAILURE_EXIT_CODE);
        assert!(result.stderr.contains("Failed to start process"));
        assert_eq!(result.time_secs, 0.0);
        assert_eq!(result.memory_mb, 0.0);
    }

    #[tokio::test]
    async fn test_child_ignoring_stdin_is_tolerated() {
        // The child exits without reading; the broken pipe must not
        // surface as a failure.
        let result = execute(&sh("exit 0"), "unread input\n", &limits(2000)).await;
        assert_eq!(result.exit_code, 0);
    }
}
