// HTTP route handlers for the Arbiter server

use std::sync::Arc;

use arbiter_core::task;
use arbiter_core::testfile;
use arbiter_core::types::Language;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Json},
};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct SubmitRequest {
    /// Code artifact file name, already persisted by the upload layer and
    /// resolved against the configured submissions directory.
    pub code_file: String,
    /// Test file name, resolved against the configured tests directory.
    pub test_file: String,
    pub language: String,
}

#[derive(Debug, Serialize)]
pub struct SubmitResponse {
    pub task_id: String,
}

fn reject(status: StatusCode, message: String) -> axum::response::Response {
    warn!(error = %message, "Submission rejected");
    (status, Json(serde_json::json!({ "error": message }))).into_response()
}

/// Bare file name check; submissions and tests are selected by name, not
/// by path.
fn is_plain_file_name(name: &str) -> bool {
    !name.is_empty() && !name.contains('/') && !name.contains('\\') && name != "." && name != ".."
}

/// POST /submissions - accept a submission and spawn its judging task.
///
/// Intake validation failures come back as rejected submissions; once a
/// task id is issued, the job always runs to a complete record set.
pub async fn submit(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<SubmitRequest>,
) -> impl IntoResponse {
    let language: Language = match payload.language.parse() {
        Ok(language) => language,
        Err(e) => return reject(StatusCode::BAD_REQUEST, e.to_string()),
    };

    if !is_plain_file_name(&payload.code_file) || !is_plain_file_name(&payload.test_file) {
        return reject(
            StatusCode::BAD_REQUEST,
            "File names must be plain names without path separators".to_string(),
        );
    }

    let source = state.config.submissions_dir.join(&payload.code_file);
    if tokio::fs::metadata(&source).await.is_err() {
        return reject(
            StatusCode::BAD_REQUEST,
            format!("Code file not found: {}", payload.code_file),
        );
    }

    let test_path = state.config.tests_dir.join(&payload.test_file);
    let test_cases = match testfile::load(&test_path).await {
        Ok(cases) => cases,
        Err(e) => return reject(StatusCode::UNPROCESSABLE_ENTITY, e.to_string()),
    };

    let judge_task = task::spawn_judge(
        state.store.clone(),
        language,
        source,
        test_cases,
        state.config.execution_limits(),
    );

    info!(
        task_id = %judge_task.id,
        language = %language,
        code_file = %payload.code_file,
        test_file = %payload.test_file,
        "Submission accepted"
    );

    (
        StatusCode::ACCEPTED,
        Json(SubmitResponse {
            task_id: judge_task.id,
        }),
    )
        .into_response()
}

/// GET /progress/{task_id} - current job snapshot.
///
/// An unknown id yields an empty document, never an error; completion is
/// detected by callers comparing the record count to the submitted total.
pub async fn progress(
    State(state): State<Arc<AppState>>,
    Path(task_id): Path<String>,
) -> impl IntoResponse {
    match state.store.get(&task_id) {
        Some(job) => {
            info!(task_id = %task_id, "Progress snapshot served");
            Json(serde_json::to_value(&*job).unwrap_or_default())
        }
        None => {
            info!(task_id = %task_id, "Progress requested for unknown task");
            Json(serde_json::json!({}))
        }
    }
}

/// GET /tests - available test file names.
pub async fn list_tests(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    Json(testfile::available_tests(&state.config.tests_dir).await)
}

/// GET /status - health check endpoint.
pub async fn health_check() -> impl IntoResponse {
    (StatusCode::OK, "OK")
}
