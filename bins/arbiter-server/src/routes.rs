use std::sync::Arc;

use axum::routing::{get, post};
use axum::Router;

use crate::handlers;
use crate::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/submissions", post(handlers::submit))
        .route("/progress/:task_id", get(handlers::progress))
        .route("/tests", get(handlers::list_tests))
        .route("/status", get(handlers::health_check))
}
