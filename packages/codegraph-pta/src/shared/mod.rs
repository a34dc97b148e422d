//! Shared module - Common types and utilities
//!
//! The IR model consumed by every analysis, the statement-level CFG and the
//! class hierarchy port. None of it depends on a feature module.

#[macro_use]
pub mod macros;
pub mod models;
pub mod ports;

// Re-exports for convenience
pub use models::*;
pub use ports::ClassHierarchy;
