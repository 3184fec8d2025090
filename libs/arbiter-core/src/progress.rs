//! Process-wide progress store.
//!
//! Keyed by opaque task identifier. Each key has exactly one writer (the
//! judging task that owns it) and any number of concurrent readers. Values
//! are swapped whole as `Arc<Job>` snapshots under a coarse lock, so a
//! reader can never observe a partially written record list. Entries are
//! never deleted; retention is process-lifetime.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use crate::types::Job;

#[derive(Debug, Clone, Default)]
pub struct ProgressStore {
    jobs: Arc<RwLock<HashMap<String, Arc<Job>>>>,
}

impl ProgressStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Full overwrite of the job state for a task identifier.
    pub fn put(&self, task_id: &str, job: Job) {
        let mut jobs = self.jobs.write().expect("progress store lock poisoned");
        jobs.insert(task_id.to_string(), Arc::new(job));
    }

    /// Current snapshot for a task identifier; `None` for unknown ids.
    /// Never fails.
    pub fn get(&self, task_id: &str) -> Option<Arc<Job>> {
        let jobs = self.jobs.read().expect("progress store lock poisoned");
        jobs.get(task_id).cloned()
    }
}
