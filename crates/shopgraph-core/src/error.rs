//! Centralized error types for ShopGraph.

use thiserror::Error;

/// Main error type for ShopGraph operations.
#[derive(Error, Debug)]
pub enum ShopGraphError {
    #[error("Duplicate key: {label} with key '{key}' already exists")]
    DuplicateKey { label: String, key: String },

    #[error("Missing endpoint for {rel}: ({from}) -> ({to})")]
    MissingEndpoint {
        rel: String,
        from: String,
        to: String,
    },

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Load step '{step}' failed: {source}")]
    LoadStep {
        step: &'static str,
        #[source]
        source: Box<ShopGraphError>,
    },

    #[error("Graph store error: {0}")]
    Store(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(String),
}

/// Result type for ShopGraph operations.
pub type ShopGraphResult<T> = Result<T, ShopGraphError>;

impl ShopGraphError {
    /// Create a validation error.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::ValidationError(msg.into())
    }

    /// Create a store error.
    pub fn store(msg: impl Into<String>) -> Self {
        Self::Store(msg.into())
    }

    /// Wrap an error with the name of the load step it aborted.
    pub fn in_step(self, step: &'static str) -> Self {
        Self::LoadStep {
            step,
            source: Box::new(self),
        }
    }

    /// True when this error (or the error it wraps) is a uniqueness violation.
    pub fn is_duplicate_key(&self) -> bool {
        match self {
            Self::DuplicateKey { .. } => true,
            Self::LoadStep { source, .. } => source.is_duplicate_key(),
            _ => false,
        }
    }
}
