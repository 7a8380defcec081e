//! Error types for Calliope operations.
//!
//! Errors are categorized into two main types:
//!
//! - **`Error`**: Top-level errors that halt the run (sink write failures, etc.)
//! - **`FileError`**: File-level errors that are collected but don't halt extraction
//!
//! ## Error Philosophy
//!
//! Calliope follows a "best effort" approach for extraction:
//! - A single malformed source file shouldn't prevent documenting the rest
//! - File-level errors are collected and reported, not thrown
//! - Only infrastructure failures (output sink, grammar loading) cause early
//!   termination

use std::path::PathBuf;
use thiserror::Error;

/// Result type for Calliope operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Top-level error type for Calliope operations.
///
/// These errors represent infrastructure failures that prevent
/// the document from being produced.
#[derive(Debug, Error)]
pub enum Error {
    /// File system operation failed (project root missing, sink not writable)
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Tree-sitter parsing infrastructure failed (grammar could not be loaded)
    #[error("parser error: {0}")]
    Parser(String),

    /// Invalid configuration or arguments
    #[error("configuration error: {0}")]
    Config(String),
}

/// Error encountered while extracting declarations from a specific file.
///
/// These errors are collected during a run but don't halt it. Extraction
/// continues with remaining files and all errors are reported at the end;
/// the failing file simply contributes nothing to the document.
#[derive(Debug, Clone)]
pub struct FileError {
    /// Path to the file that failed
    pub path: PathBuf,
    /// Category of the error
    pub kind: FileErrorKind,
    /// Human-readable error message
    pub message: String,
}

impl std::fmt::Display for FileError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}: {} ({})",
            self.path.display(),
            self.message,
            self.kind
        )
    }
}

impl std::error::Error for FileError {}

/// Categorization of file-level errors.
///
/// Uses a 4xx/5xx style pattern:
/// - Input problems are issues with the source files (user can fix)
/// - Internal problems are issues with Calliope's environment
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileErrorKind {
    // === Input Problems (analogous to HTTP 4xx) ===
    /// Source file has syntax errors that prevent extraction
    ParseFailed,

    /// File content is not valid UTF-8
    EncodingError,

    // === Internal Problems (analogous to HTTP 5xx) ===
    /// Could not read the file from disk
    IoError,
}

impl std::fmt::Display for FileErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ParseFailed => write!(f, "parse failed"),
            Self::EncodingError => write!(f, "encoding error"),
            Self::IoError => write!(f, "I/O error"),
        }
    }
}

impl FileErrorKind {
    /// Returns `true` if this is an input problem (4xx-style).
    ///
    /// Input problems are issues with the source files that the user can fix.
    #[must_use]
    pub fn is_input_error(&self) -> bool {
        matches!(self, Self::ParseFailed | Self::EncodingError)
    }

    /// Returns `true` if this is an internal problem (5xx-style).
    #[must_use]
    pub fn is_internal_error(&self) -> bool {
        matches!(self, Self::IoError)
    }
}

impl FileError {
    /// Create a new file-level error.
    #[must_use]
    pub fn new(path: PathBuf, kind: FileErrorKind, message: impl Into<String>) -> Self {
        Self {
            path,
            kind,
            message: message.into(),
        }
    }

    /// Create a parse error for a file.
    #[must_use]
    pub fn parse_failed(path: PathBuf, message: impl Into<String>) -> Self {
        Self::new(path, FileErrorKind::ParseFailed, message)
    }

    /// Create an encoding error for a file.
    #[must_use]
    pub fn encoding_error(path: PathBuf) -> Self {
        Self::new(
            path,
            FileErrorKind::EncodingError,
            "file is not valid UTF-8",
        )
    }

    /// Create an I/O error for a file.
    #[must_use]
    pub fn io_error(path: PathBuf, error: &std::io::Error) -> Self {
        Self::new(path, FileErrorKind::IoError, error.to_string())
    }
}
