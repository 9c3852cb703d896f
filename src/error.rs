//! Error types for tomoview.

use thiserror::Error;

/// The main error type for tomoview operations.
#[derive(Error, Debug)]
pub enum TomoError {
    /// No dataset with the given identifier is registered.
    #[error("unknown dataset '{0}'")]
    UnknownDataset(String),

    /// The remote returned a non-success status while fetching a dataset.
    #[error("download of dataset '{id}' failed with HTTP status {status}")]
    DownloadFailed { id: String, status: u16 },

    /// A working buffer's shape does not match the original volume.
    #[error("volume shape mismatch: expected {expected:?}, got {actual:?}")]
    ShapeMismatch {
        expected: [usize; 3],
        actual: [usize; 3],
    },

    /// Raw voxel data does not fill the declared dimensions.
    #[error("volume data length {len} does not match dims {dims:?}")]
    LengthMismatch { dims: [usize; 3], len: usize },

    /// The TIFF stack contained no image pages.
    #[error("empty volume: TIFF stack contains no image pages")]
    EmptyVolume,

    /// A page of the TIFF stack disagrees with the first page's size.
    #[error("inconsistent TIFF stack: page {page} is {actual:?}, expected {expected:?}")]
    InconsistentSlice {
        page: usize,
        expected: (u32, u32),
        actual: (u32, u32),
    },

    /// Unsupported file extension, color type or sample format.
    #[error("unsupported volume format: {0}")]
    UnsupportedFormat(String),

    /// A parameter-change event named a parameter nobody subscribed to.
    #[error("no subscriber registered for parameter '{0}'")]
    UnknownParameter(String),

    /// Invalid control-parameter configuration.
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    /// TIFF decode/encode error.
    #[error("TIFF error: {0}")]
    Tiff(#[from] tiff::TiffError),

    /// HTTP transport error.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON (de)serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// A specialized Result type for tomoview operations.
pub type Result<T> = std::result::Result<T, TomoError>;
