//! Sandboxed execution engine: container client, per-language adapters,
//! resource profilers, and the per-task session that ties them together.

pub mod container;
pub mod languages;
pub mod profiler;
pub mod session;

pub use container::ContainerClient;
pub use session::SandboxSession;
