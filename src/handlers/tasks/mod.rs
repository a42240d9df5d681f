//! Submission execution and result retrieval handlers.

pub mod handler;
pub mod request;
pub mod response;

use axum::routing::{get, post};
use axum::Router;

use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/execute", post(handler::execute))
        .route("/results/{task_id}", get(handler::get_result))
        .route("/status", get(handler::get_status))
}
