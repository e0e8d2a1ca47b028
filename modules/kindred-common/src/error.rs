use thiserror::Error;

#[derive(Error, Debug)]
pub enum KindredError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Not found: {0}")]
    NotFound(String),

    /// Query profile exists but cannot be matched (no embedding yet).
    /// Distinct from an empty candidate set, which is not an error.
    #[error("Not eligible for matching: {0}")]
    NotEligible(String),

    #[error("Fetch error: {0}")]
    Fetch(String),

    #[error("Embedding error: {0}")]
    Embedding(String),

    #[error("Store error: {0}")]
    Store(String),

    #[error("Pipeline error: {0}")]
    Pipeline(String),

    #[error(transparent)]
    Anyhow(#[from] anyhow::Error),
}
