use thiserror::Error;

pub type Result<T> = std::result::Result<T, EmbedError>;

#[derive(Debug, Error)]
pub enum EmbedError {
    /// The input exceeded the model's context window. Callers may
    /// truncate and retry; every other variant is not recoverable at
    /// the call site.
    #[error("Input exceeds the embedding model's context window")]
    ContextTooLarge,

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("Network error: {0}")]
    Network(String),

    #[error("No embedding in response")]
    Empty,
}

impl From<reqwest::Error> for EmbedError {
    fn from(err: reqwest::Error) -> Self {
        EmbedError::Network(err.to_string())
    }
}
