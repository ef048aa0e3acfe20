//! Error types for clocmaplib

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while reading a report or building a treemap
#[derive(Error, Debug)]
pub enum ClocmapError {
    /// Failed to read a report file
    #[error("failed to read file '{path}': {source}")]
    FileRead {
        path: PathBuf,
        source: std::io::Error,
    },

    /// A report row could not be split into a path and three counts
    #[error("malformed report row at line {line}: '{content}'")]
    MalformedRow { line: usize, content: String },

    /// A JSON report could not be decoded
    #[error("invalid JSON report: {0}")]
    InvalidJson(#[from] serde_json::Error),

    /// Invalid glob pattern
    #[error("invalid glob pattern '{pattern}': {message}")]
    InvalidGlob { pattern: String, message: String },

    /// A report path does not live under the analyzed base path
    #[error("path '{path}' is not under base path '{base}'")]
    PathOutsideBase { path: String, base: String },

    /// A report path has no segments, or an empty one (`a//b`, trailing `/`)
    #[error("path '{0}' contains an empty segment")]
    EmptyPathSegment(String),

    /// A directory sum does not fit in a `u64`
    #[error("line counts under '{0}' overflow")]
    CountOverflow(String),

    /// The root label is empty or shaped like a generated node id
    #[error("invalid root label '{0}': must be non-empty and not end in '__<n>'")]
    InvalidRootLabel(String),

    /// The hierarchy references a file the path index does not know about
    #[error("no line counts for '{0}': hierarchy and path index are out of sync")]
    MissingEntry(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
