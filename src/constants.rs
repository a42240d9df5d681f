//! Application-wide constants
//!
//! This module contains all constant values used throughout the application.
//! Constants are grouped by their purpose for better organization.

// =============================================================================
// SERVER DEFAULTS
// =============================================================================

/// Default server host address
pub const DEFAULT_SERVER_HOST: &str = "0.0.0.0";

/// Default server port
pub const DEFAULT_SERVER_PORT: u16 = 8080;

// =============================================================================
// DOCKER DEFAULTS
// =============================================================================

/// Default Docker socket path
pub const DEFAULT_DOCKER_SOCKET: &str = "/var/run/docker.sock";

// =============================================================================
// SCHEDULER DEFAULTS
// =============================================================================

/// Default number of pinned worker executors
pub const DEFAULT_SCHEDULER_WORKERS: usize = 4;

/// Default bounded queue capacity
pub const DEFAULT_SCHEDULER_QUEUE_CAPACITY: usize = 128;

/// Default bounded result cache capacity
pub const DEFAULT_SCHEDULER_CACHE_CAPACITY: usize = 128;

/// Default per-container memory ceiling in megabytes
pub const DEFAULT_SCHEDULER_MEMORY_LIMIT_MB: u64 = 1024;

/// Default submission timeout in seconds, used when a submission omits one
pub const DEFAULT_TIMEOUT_SECONDS: u64 = 30;

/// Minimum accepted submission timeout in seconds
pub const MIN_TIMEOUT_SECONDS: u64 = 1;

/// Maximum accepted submission timeout in seconds; larger values are clamped
pub const MAX_TIMEOUT_SECONDS: u64 = 120;

/// Process limit per container (defends against fork bombs)
pub const CONTAINER_PIDS_LIMIT: i64 = 64;

// =============================================================================
// SUPPORTED LANGUAGES
// =============================================================================

/// Language identifiers
pub mod languages {
    pub const PYTHON: &str = "python";
    pub const JAVA: &str = "java";
    pub const JAVASCRIPT: &str = "javascript";
    pub const CPP: &str = "cpp";
    pub const GO: &str = "go";
    pub const RUBY: &str = "ruby";
    pub const RUST: &str = "rust";

    /// All supported language identifiers
    pub const ALL: &[&str] = &[PYTHON, JAVA, JAVASCRIPT, CPP, GO, RUBY, RUST];
}

/// Container images for each language
pub mod container_images {
    pub const PYTHON: &str = "crucible/python:latest";
    pub const JAVA: &str = "crucible/java:latest";
    pub const JAVASCRIPT: &str = "crucible/node:latest";
    pub const CPP: &str = "crucible/gcc:latest";
    pub const GO: &str = "crucible/go:latest";
    pub const RUBY: &str = "crucible/ruby:latest";
    pub const RUST: &str = "crucible/rust:latest";
}

/// Source file extensions for each language
pub mod file_extensions {
    pub const PYTHON: &str = "py";
    pub const JAVA: &str = "java";
    pub const JAVASCRIPT: &str = "js";
    pub const CPP: &str = "cpp";
    pub const GO: &str = "go";
    pub const RUBY: &str = "rb";
    pub const RUST: &str = "rs";
}

// =============================================================================
// IN-CONTAINER PATHS
// =============================================================================

/// Fixed in-container paths used when staging code, stdin and the profiler
pub mod container_paths {
    pub const STDIN_FILE: &str = "/tmp/stdin";
    pub const PROFILER_SCRIPT: &str = "/tmp/memory_profiler.sh";
    pub const MEMORY_LOG: &str = "mem_usage.log";
    pub const GO_WORKDIR: &str = "/go_space";
    pub const RUST_WORKDIR: &str = "/rust_space";
}

// =============================================================================
// MISC
// =============================================================================

/// Project home page, used for the `/` redirect
pub const PROJECT_HOME_URL: &str = "https://github.com/crucible-run/crucible";
