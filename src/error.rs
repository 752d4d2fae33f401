//! Error type shared by every pipeline stage.
//!
//! Each stage either returns a valid buffer or one of these variants. Nothing
//! is retried or swallowed inside the crate; callers decide how to present
//! the message (HTTP status, Python exception, JS error).

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    /// Input bytes are empty, not a supported raster format, or corrupt.
    #[error("failed to decode image: {0}")]
    Decode(String),

    /// Threshold pair violates `low < high` or the configured range.
    #[error("invalid thresholds (low={low}, high={high}): {reason}")]
    InvalidThreshold {
        low: i32,
        high: i32,
        reason: &'static str,
    },

    /// Montage panels of unequal size. Indicates a wiring bug, not bad input.
    #[error("dimension mismatch: expected {expected:?} (w, h), got {actual:?}")]
    DimensionMismatch {
        expected: (usize, usize),
        actual: (usize, usize),
    },

    /// Upload filename extension is not in the allowed set.
    #[error("unsupported file type '{0}'")]
    UnsupportedExtension(String),

    /// Upload exceeds the configured size limit.
    #[error("payload of {size} bytes exceeds the limit of {limit} bytes")]
    PayloadTooLarge { size: usize, limit: usize },

    #[error("failed to encode image: {0}")]
    Encode(String),

    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// True for errors caused by caller-supplied input rather than a bug or
    /// an environment failure.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            Self::Decode(_)
                | Self::InvalidThreshold { .. }
                | Self::UnsupportedExtension(_)
                | Self::PayloadTooLarge { .. }
        )
    }
}

pub type Result<T> = std::result::Result<T, Error>;
