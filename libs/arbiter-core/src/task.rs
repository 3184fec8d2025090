//! Background judging tasks.
//!
//! One spawned task per accepted submission; that task is the only writer
//! for its task identifier in the progress store. Task ids are random
//! UUIDs, so concurrent submissions can never collide. There is no
//! cancellation path: once spawned, a task judges every test case.

use std::path::PathBuf;

use tokio::task::JoinHandle;
use tracing::info;
use uuid::Uuid;

use crate::engine;
use crate::executor::ExecutionLimits;
use crate::progress::ProgressStore;
use crate::types::{Job, Language, ProgressInfo, TestCase, TestRecord};

/// Handle for one in-flight judging job. Awaitable; dropping it detaches
/// the task without stopping it.
pub struct JudgeTask {
    pub id: String,
    pub handle: JoinHandle<(Vec<TestRecord>, bool)>,
}

pub fn new_task_id() -> String {
    Uuid::new_v4().to_string()
}

/// Register an in-progress job and spawn its judging task. The initial
/// `Pending` entry is visible to pollers before the first test finishes.
pub fn spawn_judge(
    store: ProgressStore,
    language: Language,
    source: PathBuf,
    test_cases: Vec<TestCase>,
    limits: ExecutionLimits,
) -> JudgeTask {
    let id = new_task_id();
    store.put(&id, Job::Pending(ProgressInfo::new(test_cases.len())));

    info!(
        task_id = %id,
        language = %language,
        source = %source.display(),
        test_cases = test_cases.len(),
        "Judging task spawned"
    );

    let task_id = id.clone();
    let handle = tokio::spawn(async move {
        engine::judge(&store, &task_id, language, &source, &test_cases, &limits).await
    });

    JudgeTask { id, handle }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Verdict;
    use std::time::Duration;

    fn limits() -> ExecutionLimits {
        ExecutionLimits {
            timeout: Duration::from_secs(2),
            memory_ceiling_mb: 256.0,
        }
    }

    #[test]
    fn test_task_ids_are_unique() {
        let a = new_task_id();
        let b = new_task_id();
        assert_ne!(a, b);
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_concurrent_jobs_do_not_cross_contaminate() {
        // K submissions with distinct outputs, judged in parallel, each
        // polled to completion through the shared store.
        let store = ProgressStore::new();
        let mut tasks = Vec::new();
        let mut sources = Vec::new();

        for k in 0..4 {
            let source = std::env::temp_dir()
                .join(format!("arbiter_conc_{}_{}.py", k, Uuid::new_v4()));
            tokio::fs::write(&source, format!("print({})\n", k))
                .await
                .unwrap();
            sources.push(source.clone());

            let cases = vec![
                TestCase {
                    input: String::new(),
                    expected_output: k.to_string(),
                },
                TestCase {
                    input: String::new(),
                    expected_output: k.to_string(),
                },
            ];
            tasks.push((k, spawn_judge(store.clone(), Language::Python, source, cases, limits())));
        }

        for (k, task) in tasks {
            let id = task.id.clone();

            // Poll like an external caller would, comparing lengths.
            loop {
                if let Some(job) = store.get(&id) {
                    if job.records().map(|r| r.len()) == Some(2) {
                        break;
                    }
                }
                tokio::time::sleep(Duration::from_millis(20)).await;
            }

            let (records, all_passed) = task.handle.await.unwrap();
            assert!(all_passed, "job {} should pass", k);
            assert_eq!(records.len(), 2);
            for record in &records {
                assert_eq!(record.status, Verdict::Passed);
                assert_eq!(record.output.trim(), k.to_string());
                assert_eq!(record.expected, k.to_string());
            }
        }

        for source in sources {
            let _ = tokio::fs::remove_file(&source).await;
        }
    }
}
