use std::path::PathBuf;
use thiserror::Error;

use crate::corpus::CorpusError;
use crate::embedding::{EmbeddingError, VectorIndexError};
use crate::llm::GenerationError;

/// Setup-time error for the classifier application.
///
/// Every variant is fatal: it is reported once and the process exits
/// before the interactive loop starts. Per-query failures use
/// [`crate::chain::ChainError`] instead.
#[derive(Error, Debug)]
pub enum AppError {
    /// Configuration related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Configuration validation errors
    #[error("Configuration validation failed: {errors:?}")]
    ConfigValidation { errors: Vec<ValidationError> },

    /// Configuration file not found
    #[error("Configuration file not found: {path}")]
    ConfigNotFound { path: PathBuf },

    /// Invalid configuration value
    #[error("Invalid configuration value at {path}: {message}")]
    InvalidConfigValue { path: String, message: String },

    /// API credential missing from the environment
    #[error("{var} environment variable is not set. Check your .env file.")]
    MissingCredential { var: String },

    /// Corpus could not be loaded
    #[error("Corpus error: {0}")]
    Corpus(#[from] CorpusError),

    /// Embedding backend could not be initialized
    #[error("Embedding error: {0}")]
    Embedding(#[from] EmbeddingError),

    /// Generative model client could not be initialized
    #[error("Generation error: {0}")]
    Generation(#[from] GenerationError),

    /// Vector index construction failed
    #[error("Vector index error: {0}")]
    Index(#[from] VectorIndexError),

    /// IO errors
    #[error("IO error: {context}: {source}")]
    Io {
        source: std::io::Error,
        context: String,
    },

    /// TOML deserialization errors
    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    /// TOML serialization errors
    #[error("TOML serialization error: {0}")]
    TomlSerialization(#[from] toml::ser::Error),

    /// JSON errors
    #[error("JSON error: {context}: {source}")]
    Json {
        source: serde_json::Error,
        context: String,
    },

    /// Generic errors
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Configuration validation error
#[derive(Debug, Clone)]
pub struct ValidationError {
    /// Path to the configuration key that failed validation
    pub path: String,
    /// Error message describing the validation failure
    pub message: String,
}

impl ValidationError {
    pub fn new(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
        }
    }
}

/// Result type for setup operations
pub type Result<T> = std::result::Result<T, AppError>;
