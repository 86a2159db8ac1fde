//! Error types for the reallocation engine.

/// Errors surfaced by the library.
///
/// The reallocation algorithm itself never fails: malformed numeric fields are
/// coerced to zero at the record boundary. Errors only arise when building an
/// engine from bad parameters or when the input is not JSON at all.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("invalid reallocation parameters: {0}")]
    InvalidParams(String),

    #[error("failed to parse snapshot: {0}")]
    Parse(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
