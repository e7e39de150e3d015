/// Errors surfaced at the edges of the library: decoding series and
/// validating caller-supplied thresholds. The reduction itself never fails.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("invalid threshold {0}: must not be negative")]
    InvalidThreshold(i64),

    #[error("line {line}: {reason}")]
    Decode { line: usize, reason: String },

    #[error("unknown format: {0}")]
    UnknownFormat(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Csv(#[from] csv::Error),
}

pub type Result<T> = core::result::Result<T, Error>;
