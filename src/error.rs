use thiserror::Error;

#[derive(Debug, Error)]
pub enum ChatError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Resolution error: {0}")]
    Resolution(String),
}

pub type ChatResult<T> = Result<T, ChatError>;
