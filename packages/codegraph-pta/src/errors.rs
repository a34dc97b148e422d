//! Error types for codegraph-pta
//!
//! Provides unified error handling across the crate. The fixpoint solvers
//! themselves never fail: unresolved calls, absent fields and absent methods
//! contribute nothing. Errors only surface when a program or a configuration
//! is constructed.

use crate::config::ConfigError;
use thiserror::Error;

/// Main error type for codegraph-pta operations
#[derive(Debug, Error)]
pub enum PtaError {
    /// Program failed structural validation (dangling ids, bad branch targets, ...)
    #[error("Invalid program: {0}")]
    InvalidProgram(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// JSON (de)serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl PtaError {
    /// Create an invalid-program error
    pub fn invalid_program(msg: impl Into<String>) -> Self {
        PtaError::InvalidProgram(msg.into())
    }
}

/// Result type alias for codegraph-pta operations
pub type Result<T> = std::result::Result<T, PtaError>;
