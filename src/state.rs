//! Application state management
//!
//! This module contains the shared application state that is passed
//! to all request handlers via Axum's State extractor.

use std::sync::Arc;

use crate::config::Config;
use crate::scheduler::Scheduler;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

/// Inner state (wrapped in Arc for cheap cloning)
struct AppStateInner {
    /// Submit/poll façade over the queue, cache, and worker pool
    pub scheduler: Arc<Scheduler>,

    /// Application configuration
    pub config: Config,
}

impl AppState {
    /// Create a new application state
    pub fn new(scheduler: Arc<Scheduler>, config: Config) -> Self {
        Self {
            inner: Arc::new(AppStateInner { scheduler, config }),
        }
    }

    /// Get a reference to the scheduler
    pub fn scheduler(&self) -> &Scheduler {
        &self.inner.scheduler
    }

    /// Get a reference to the configuration
    pub fn config(&self) -> &Config {
        &self.inner.config
    }
}
