//! HTTP Request Handlers
//!
//! This module contains all HTTP request handlers organized by domain.

pub mod health;
pub mod tasks;

use axum::response::Redirect;
use axum::routing::get;
use axum::Router;

use crate::{constants::PROJECT_HOME_URL, state::AppState};

/// Create all API routes
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(root_redirect))
        .merge(health::routes())
        .merge(tasks::routes())
}

/// Mirrors the source's Flask `index()` route: a bare redirect to the
/// project's home page, not a landing page of its own.
async fn root_redirect() -> Redirect {
    Redirect::found(PROJECT_HOME_URL)
}
