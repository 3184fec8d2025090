//! Judging engine - the per-submission test loop.
//!
//! Runs every test case in order, strictly sequentially: runner produces
//! the launch command (compiling if needed), the executor runs it bounded
//! by the wall-clock timeout, and the verdict is classified from the exit
//! code and output comparison. After each test the progress store entry is
//! overwritten with the full accumulated record list, so pollers always
//! see a self-consistent, monotonically growing snapshot.
//!
//! No per-test fault aborts the loop: runner and executor failures are
//! converted into RuntimeError-classified records and judging proceeds
//! through all N cases.

use std::path::Path;

use tracing::{error, info};

use crate::compare::outputs_match;
use crate::executor::{self, ExecutionLimits};
use crate::progress::ProgressStore;
use crate::runner;
use crate::types::{ExecutionResult, Job, Language, TestCase, TestRecord, Verdict};

/// Judge a submission to completion, publishing incremental results under
/// `task_id`. Returns the final record list and whether every test passed.
pub async fn judge(
    store: &ProgressStore,
    task_id: &str,
    language: Language,
    source: &Path,
    test_cases: &[TestCase],
    limits: &ExecutionLimits,
) -> (Vec<TestRecord>, bool) {
    let total = test_cases.len();
    let mut records: Vec<TestRecord> = Vec::with_capacity(total);

    for (idx, case) in test_cases.iter().enumerate() {
        let test = idx + 1;
        let result = run_case(language, source, &case.input, limits).await;
        let status = classify(&result, &case.expected_output);

        info!(
            task_id = %task_id,
            test,
            total,
            status = %status,
            time_secs = result.time_secs,
            memory_mb = result.memory_mb,
            "Test judged"
        );

        records.push(TestRecord {
            test,
            status,
            output: result.stdout,
            expected: case.expected_output.clone(),
            time: result.time_secs,
            compilation_time: result.compile_time_secs,
            memory: result.memory_mb,
            error: result.stderr,
        });

        store.put(task_id, Job::Records(records.clone()));
    }

    let all_passed = records.iter().all(|r| r.status == Verdict::Passed);
    info!(task_id = %task_id, total, all_passed, "Judging complete");

    (records, all_passed)
}

/// Compile (if needed) and execute one test case. Runner failures become
/// terminal results rather than errors, so the caller always gets a record.
async fn run_case(
    language: Language,
    source: &Path,
    input: &str,
    limits: &ExecutionLimits,
) -> ExecutionResult {
    match runner::prepare(language, source).await {
        Ok(prepared) => {
            let mut result = executor::execute(&prepared.command, input, limits).await;
            result.compile_time_secs = prepared.compile_time_secs;
            result
        }
        Err(e) => {
            error!(language = %language, source = %source.display(), error = %e, "Run preparation failed");
            ExecutionResult::launch_failure(e.to_string())
        }
    }
}

/// Verdict rule: nonzero exit wins, then output comparison.
fn classify(result: &ExecutionResult, expected: &str) -> Verdict {
    if result.exit_code != 0 {
        Verdict::RuntimeError
    } else if outputs_match(&result.stdout, expected) {
        Verdict::Passed
    } else {
        Verdict::Failed
    }
}
