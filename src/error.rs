use thiserror::Error;

/// Errors raised while loading caption data or word vectors, or while embedding
#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// malformed word-vector file, `line` is 1-based
    #[error("format error at line {line}: {message}")]
    Format { line: usize, message: String },

    #[error("dimension mismatch: expected {expected}, found {found}")]
    DimensionMismatch { expected: usize, found: usize },

    /// token was never seen by the corpus the IDF table was built from
    #[error("no IDF weight for token {token:?}")]
    UnknownIdf { token: String },

    #[error("caption id {id} not found")]
    UnknownCaption { id: u64 },

    #[error("usage: {0}")]
    Usage(String),
}

pub type Result<T> = std::result::Result<T, Error>;
