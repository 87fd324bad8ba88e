//! Error type shared by the catalog services and the command front end.

use thiserror::Error;

/// Errors surfaced by catalog operations.
///
/// Storage and load failures are normally absorbed into a status report by
/// [`crate::services::editor::CatalogEditor`]; only misuse (unknown category,
/// bad index) and configuration problems reach callers as `Err`.
#[derive(Error, Debug)]
pub enum CmsError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Non-success HTTP status on the catalog fetch.
    #[error("HTTP {status}")]
    HttpStatus { status: u16 },

    #[error("unknown category: {0}")]
    UnknownCategory(String),

    #[error("index {index} out of range for category '{category}' ({len} entries)")]
    IndexOutOfRange {
        category: String,
        index: usize,
        len: usize,
    },

    #[error("File System Access not available")]
    FsUnavailable,

    /// Another load or save holds the shared editor.
    #[error("another catalog operation is in flight")]
    Busy,

    #[error("invalid configuration: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, CmsError>;
