//! Error types for the apothecary_core library.
//!
//! The simulation itself never fails: unknown actions cost nothing and
//! missing treatment data falls back to the generic pool. Errors only come
//! from the edges (files, config, parsing user input).

use std::io;

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for apothecary_core operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// IO error occurred
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// TOML parsing error
    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    /// Configuration validation error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Game state persistence error
    #[error("State error: {0}")]
    State(String),

    /// An action identifier that is not one of the known actions
    #[error("Unknown action: {0}")]
    UnknownAction(String),

    /// Generic error
    #[error("{0}")]
    Other(String),
}
