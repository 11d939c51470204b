use thiserror::Error;

pub type Result<T> = std::result::Result<T, LotteryError>;

#[derive(Error, Debug)]
pub enum LotteryError {
    #[error("Invalid range: {0}")]
    InvalidRange(String),

    #[error("Invalid selection: {0}")]
    InvalidSelection(String),

    #[error("Storage error: {0}")]
    Storage(#[from] rusqlite::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("Batch aborted after {completed} of {total} tickets")]
    BatchAborted { completed: usize, total: usize },

    #[error("Internal error: {0}")]
    Internal(String),
}

impl LotteryError {
    pub fn invalid_range(msg: impl Into<String>) -> Self {
        Self::InvalidRange(msg.into())
    }

    pub fn invalid_selection(msg: impl Into<String>) -> Self {
        Self::InvalidSelection(msg.into())
    }

    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }
}
