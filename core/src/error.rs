use thiserror::Error;

#[derive(Error, Debug)]
pub enum SynthError {
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid generator config: {reason}")]
    InvalidConfig { reason: String },

    #[error("Generation for '{key}' aborted before producing a value")]
    GenerationAborted { key: String },

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub type SynthResult<T> = Result<T, SynthError>;
