//! Error types for the spectral filter.
//!
//! Every precondition violation of the transform, centering, synthesis and
//! masking stages is reported through [`FilterError`]. These are caller
//! mistakes: nothing is retried and no partial output is produced.

use thiserror::Error;

/// A specialized Result type for spectral filter operations.
pub type Result<T> = std::result::Result<T, FilterError>;

/// Errors that can occur while transforming or filtering an image.
#[derive(Debug, Error)]
pub enum FilterError {
    /// A sequence or matrix side is not a power of two.
    #[error("length {len} is not a power of two")]
    NotPowerOfTwo {
        /// Offending length.
        len: usize,
    },

    /// The matrix is not square.
    #[error("matrix must be square, got {rows}x{cols}")]
    NotSquare {
        /// Number of rows.
        rows: usize,
        /// Number of columns.
        cols: usize,
    },

    /// Quadrant swapping needs an even side length.
    #[error("side length {side} is odd, cannot swap quadrants")]
    OddSide {
        /// Offending side length.
        side: usize,
    },

    /// Spectrum and mask shapes differ.
    #[error("shape mismatch: expected {expected:?}, got {got:?}")]
    ShapeMismatch {
        /// Shape of the spectrum.
        expected: (usize, usize),
        /// Shape of the mask.
        got: (usize, usize),
    },

    /// Butterworth order below one.
    #[error("butterworth order must be at least 1, got {order}")]
    InvalidOrder {
        /// Requested order.
        order: i32,
    },

    /// Cutoff radius is negative or not finite.
    #[error("cutoff radius must be finite and non-negative, got {cutoff}")]
    InvalidCutoff {
        /// Requested cutoff.
        cutoff: f64,
    },

    /// A sample reduced to NaN while encoding.
    #[error("sample at ({row}, {col}) is NaN")]
    NanSample {
        /// Row of the first NaN sample.
        row: usize,
        /// Column of the first NaN sample.
        col: usize,
    },

    /// File I/O failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Decoding or encoding an image failed.
    #[error("image error: {0}")]
    Image(#[from] image::ImageError),

    /// Loading or saving the persisted settings failed.
    #[error("preferences error: {0}")]
    Preferences(String),
}

impl From<preferences::PreferencesError> for FilterError {
    fn from(err: preferences::PreferencesError) -> Self {
        FilterError::Preferences(format!("{err:?}"))
    }
}
