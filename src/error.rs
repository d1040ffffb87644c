use std::path::PathBuf;
use thiserror::Error;

/// Errors produced while decoding a single ROI record.
///
/// Every variant is terminal: a failed decode never yields a partial record.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DecodeError {
    #[error("not an ROI file: expected signature \"Io\" (0x49 0x6F), found {found:02X?}")]
    InvalidSignature { found: [u8; 2] },

    #[error("truncated ROI data: needed {needed} byte(s), only {available} available")]
    TruncatedHeader { needed: usize, available: usize },

    #[error("composite (shape) ROIs are not supported (shape roi size {size})")]
    UnsupportedCompositeRoi { size: i32 },

    #[error("unknown ROI type code {0}")]
    UnknownRoiType(u8),

    #[error("unknown ROI subtype code {0}")]
    UnknownSubtype(i32),

    #[error("ROI format version {found} is older than the required minimum {minimum}")]
    UnsupportedVersion { found: i32, minimum: i32 },
}

/// Errors produced while assembling a [`RoiCollection`](crate::roi::RoiCollection).
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CollectionError {
    #[error("failed to decode entry '{name}': {source}")]
    EntryFailed {
        name: String,
        #[source]
        source: DecodeError,
    },

    #[error("duplicate collection key '{key}'")]
    DuplicateKey { key: String },
}

/// The main error type for ijroi operations.
#[derive(Debug, Error)]
pub enum RoiError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to decode ROI file {path}: {source}")]
    Decode {
        path: PathBuf,
        #[source]
        source: DecodeError,
    },

    #[error("Failed to read ROI collection: {0}")]
    Collection(#[from] CollectionError),

    #[error("Failed to open zip archive {path}: {source}")]
    ZipOpen {
        path: PathBuf,
        #[source]
        source: zip::result::ZipError,
    },

    #[error("Failed to read member #{index} of zip archive {path}: {message}")]
    ZipEntry {
        path: PathBuf,
        index: usize,
        message: String,
    },

    #[error("Failed to read ROI directory {path}: {message}")]
    DirectoryWalk { path: PathBuf, message: String },

    #[error("Failed to write JSON to {path}: {source}")]
    JsonWrite {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Failed to write CSV to {path}: {source}")]
    CsvWrite {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),

    #[error("Unsupported input {path}: {message}")]
    UnsupportedInput { path: PathBuf, message: String },
}
