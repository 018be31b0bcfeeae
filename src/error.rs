use thiserror::Error;

#[derive(Debug, Error)]
pub enum EmitterError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Intent rejected, system not ready: {}", .0.join("; "))]
    NotReady(Vec<String>),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Logger error: {0}")]
    LoggerError(String),
}

pub type Result<T> = std::result::Result<T, EmitterError>;
