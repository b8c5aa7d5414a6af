//! Logging and observability
//!
//! Structured logging via `tracing`, with console output always on and
//! optional JSON file logging with rotation.

pub mod structured;

// Re-export commonly used items
pub use structured::{init_logging, LoggingGuard};
