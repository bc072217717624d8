//! Error types for nbgallery.
//!
//! Library crates use [`GalleryError`] via `thiserror`.
//! The CLI wraps this with `color-eyre` for rich diagnostics.
//!
//! Every variant is fatal: a gallery build never retries and never writes
//! a partial page.

use std::path::PathBuf;

/// Top-level error type for all gallery operations.
#[derive(Debug, thiserror::Error)]
pub enum GalleryError {
    /// Configuration loading or validation error.
    #[error("config error: {message}")]
    Config { message: String },

    /// A notebook file is not a well-formed notebook document.
    #[error("could not parse notebook {path:?}: {message}")]
    NotebookParse { path: PathBuf, message: String },

    /// A marker names a category outside the closed vocabulary.
    #[error("unknown gallery tag '{tag}' in {path:?}")]
    UnknownCategory { tag: String, path: PathBuf },

    /// An embedded image payload could not be decoded or re-encoded.
    #[error("could not decode gallery image in {path:?}: {message}")]
    ImageDecode { path: PathBuf, message: String },

    /// Filesystem I/O error.
    #[error("I/O error at {path:?}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// Convenience alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, GalleryError>;

impl GalleryError {
    /// Create a config error from any displayable message.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config {
            message: msg.into(),
        }
    }

    /// Create a notebook parse error for the given file.
    pub fn notebook_parse(path: impl Into<PathBuf>, msg: impl Into<String>) -> Self {
        Self::NotebookParse {
            path: path.into(),
            message: msg.into(),
        }
    }

    /// Create an unknown category error for a tag found in the given file.
    pub fn unknown_category(tag: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        Self::UnknownCategory {
            tag: tag.into(),
            path: path.into(),
        }
    }

    /// Create an image decode error for the given file.
    pub fn image_decode(path: impl Into<PathBuf>, msg: impl Into<String>) -> Self {
        Self::ImageDecode {
            path: path.into(),
            message: msg.into(),
        }
    }

    /// Wrap a `std::io::Error` with a path for context.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
