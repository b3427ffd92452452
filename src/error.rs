//! Error types for Akwaaba.

use thiserror::Error;

/// Library-level error type for Akwaaba operations.
#[derive(Error, Debug)]
pub enum AkwaabaError {
    #[error("Document load failed: {0}")]
    Document(String),

    #[error("Embedding generation failed: {0}")]
    Embedding(String),

    #[error("Index error: {0}")]
    Index(String),

    #[error("Generation failed: {0}")]
    Generation(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("OpenAI API error: {0}")]
    OpenAI(String),
}

/// Result type alias for Akwaaba operations.
pub type Result<T> = std::result::Result<T, AkwaabaError>;
