//! Crucible - Sandboxed Remote Code Execution Service
//!
//! This library provides the core functionality for Crucible: a bounded
//! intake queue, a pinned worker pool, and a language-agnostic container
//! protocol for running untrusted code under a CPU/memory/time budget.
//!
//! # Features
//!
//! - Multi-language support (Python, Java, JavaScript, C++, Go, Ruby, Rust)
//! - Isolated Docker container execution
//! - Two execution-measurement modes: RSS sampling and `/usr/bin/time -v`
//! - Fixed-size, CPU-pinned worker pool with a bounded intake queue
//!
//! # Architecture
//!
//! - **sandbox**: container client, per-language adapters, profilers, and
//!   the session lifecycle that ties them together
//! - **scheduler**: the intake queue, result cache, worker pool, and the
//!   submit/poll façade exposed to the HTTP layer
//! - **handlers**: HTTP request handlers (thin layer over the scheduler)
//! - **models**: domain types shared by the sandbox and scheduler layers

pub mod config;
pub mod constants;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod sandbox;
pub mod scheduler;
pub mod state;
pub mod utils;

// Re-export commonly used types
pub use config::Config;
pub use error::{AppError, AppResult};
pub use state::AppState;
