use thiserror::Error;

/// Main error type for callflow operations
#[derive(Error, Debug)]
pub enum CallflowError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Parser error: {0}")]
    Parser(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Template error: {0}")]
    Template(#[from] tera::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Source lookup failed for {type_name}: {reason}")]
    SourceLookup { type_name: String, reason: String },

    #[error("File system error: {0}")]
    FileSystem(String),
}

pub type Result<T> = std::result::Result<T, CallflowError>;
