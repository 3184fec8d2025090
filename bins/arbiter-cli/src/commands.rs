// CLI commands: local judging and test-file inspection
use std::path::Path;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use arbiter_core::engine;
use arbiter_core::executor::ExecutionLimits;
use arbiter_core::progress::ProgressStore;
use arbiter_core::task;
use arbiter_core::testfile;
use arbiter_core::types::{Language, Verdict};

/// Judge a local source file synchronously and print results. Returns
/// whether every test passed.
pub async fn judge(
    language: &str,
    source: &Path,
    tests: &Path,
    timeout_ms: u64,
    memory_limit_mb: u64,
    json: bool,
) -> Result<bool> {
    let language: Language = language.parse()?;

    if !source.exists() {
        bail!("Source file not found: {}", source.display());
    }

    let test_cases = testfile::load(tests)
        .await
        .with_context(|| format!("Failed to load test file {}", tests.display()))?;

    if test_cases.is_empty() {
        bail!("Test file {} defines no test cases", tests.display());
    }

    let limits = ExecutionLimits {
        timeout: Duration::from_millis(timeout_ms),
        memory_ceiling_mb: memory_limit_mb as f64,
    };

    // The CLI runs the engine in place; the store still receives
    // snapshots, same as the server path.
    let store = ProgressStore::new();
    let task_id = task::new_task_id();

    println!("→ Judging {} ({})", source.display(), language);
    println!("  Test cases: {}", test_cases.len());
    println!("  Timeout per test: {}ms", timeout_ms);
    println!();

    let (records, all_passed) =
        engine::judge(&store, &task_id, language, source, &test_cases, &limits).await;

    if json {
        println!("{}", serde_json::to_string_pretty(&records)?);
    } else {
        for record in &records {
            let mark = match record.status {
                Verdict::Passed => "✓",
                Verdict::Failed | Verdict::RuntimeError => "✗",
            };
            println!(
                "  {} Test {}: {} ({:.3}s, {:.1} MB)",
                mark, record.test, record.status, record.time, record.memory
            );
            if record.status == Verdict::Failed {
                println!("      Expected: \"{}\"", record.expected.trim());
                println!("      Got:      \"{}\"", record.output.trim());
            }
            if record.status == Verdict::RuntimeError && !record.error.is_empty() {
                println!(
                    "      Error: {}",
                    record.error.lines().next().unwrap_or("")
                );
            }
        }
        println!();
        let passed = records
            .iter()
            .filter(|r| r.status == Verdict::Passed)
            .count();
        println!("→ {} / {} tests passed", passed, records.len());
    }

    Ok(all_passed)
}

/// Parse a test file and print the cases it defines.
pub async fn check_tests(file: &Path) -> Result<()> {
    let cases = testfile::load(file)
        .await
        .with_context(|| format!("Failed to load test file {}", file.display()))?;

    println!("→ {} defines {} test case(s)", file.display(), cases.len());
    for (idx, case) in cases.iter().enumerate() {
        println!(
            "  {}. input: \"{}\"  expected: \"{}\"",
            idx + 1,
            case.input,
            case.expected_output
        );
    }

    Ok(())
}
