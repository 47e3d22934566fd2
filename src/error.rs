//! Error types and handling infrastructure for rlpager.
//!
//! This module provides a centralized error handling system using `thiserror` for
//! library error types. The binary wraps these in `anyhow` at the top level.
//!
//! ## Taxonomy
//!
//! - **CompileError**: invalid search pattern, reported before any scanning
//! - **EndOfStream**: no more lines; a control signal rather than a failure
//! - **ReadError**: the byte source itself failed; fatal for the current operation
//!
//! A short read is not an error. It is reported as
//! [`ReadStatus::Short`](crate::file_handler::ReadStatus) on a successful read.

use thiserror::Error;

/// The main error type for rlpager operations.
#[derive(Error, Debug)]
pub enum PagerError {
    /// The search pattern failed to compile
    #[error("Invalid search pattern '{pattern}': {message}")]
    CompileError { pattern: String, message: String },

    /// The byte source ran out before the requested line was reached
    #[error("End of stream")]
    EndOfStream,

    /// The byte source failed while reading at `offset`
    #[error("Read failed at byte offset {offset}")]
    ReadError {
        offset: u64,
        #[source]
        source: std::io::Error,
    },

    /// No indexed line is less than or equal to the requested one
    #[error("No indexed line at or before line {line}")]
    NotFound { line: u64 },

    /// File system related errors (file not found, permission denied, etc.)
    #[error("File operation failed: {message}")]
    FileError {
        message: String,
        #[source]
        source: std::io::Error,
    },

    /// Search coordination errors (a worker task died)
    #[error("Search operation failed: {message}")]
    SearchError { message: String },

    /// Configuration related errors
    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    /// Invalid command line arguments
    #[error("Invalid argument: {message}")]
    InvalidArgument { message: String },
}

/// Standard Result type for rlpager operations.
pub type Result<T> = std::result::Result<T, PagerError>;

impl PagerError {
    /// Create a FileError from an io::Error with additional context
    pub fn file_error(message: impl Into<String>, source: std::io::Error) -> Self {
        Self::FileError {
            message: message.into(),
            source,
        }
    }

    /// Create a ReadError for a failed source read at `offset`
    pub fn read_error(offset: u64, source: std::io::Error) -> Self {
        Self::ReadError { offset, source }
    }

    /// Create a CompileError for `pattern`
    pub fn compile(pattern: impl Into<String>, message: impl ToString) -> Self {
        Self::CompileError {
            pattern: pattern.into(),
            message: message.to_string(),
        }
    }

    /// Create a SearchError with a descriptive message
    pub fn search(message: impl Into<String>) -> Self {
        Self::SearchError {
            message: message.into(),
        }
    }

    /// Create a ConfigError with a descriptive message
    pub fn config(message: impl Into<String>) -> Self {
        Self::ConfigError {
            message: message.into(),
        }
    }

    /// Create an InvalidArgument error with a descriptive message
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::InvalidArgument {
            message: message.into(),
        }
    }

    /// True for the "no more lines" control signal
    pub fn is_end_of_stream(&self) -> bool {
        matches!(self, Self::EndOfStream)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display_messages() {
        let compile = PagerError::compile("[a", "unclosed character class");
        assert_eq!(
            compile.to_string(),
            "Invalid search pattern '[a': unclosed character class"
        );

        assert_eq!(PagerError::EndOfStream.to_string(), "End of stream");

        let not_found = PagerError::NotFound { line: 0 };
        assert_eq!(not_found.to_string(), "No indexed line at or before line 0");

        let read = PagerError::read_error(
            42,
            std::io::Error::new(std::io::ErrorKind::Other, "disk gone"),
        );
        assert_eq!(read.to_string(), "Read failed at byte offset 42");
    }

    #[test]
    fn test_error_constructors() {
        assert!(matches!(
            PagerError::search("worker panicked"),
            PagerError::SearchError { .. }
        ));
        assert!(matches!(
            PagerError::config("width must be positive"),
            PagerError::ConfigError { .. }
        ));
        assert!(matches!(
            PagerError::invalid_argument("bad line"),
            PagerError::InvalidArgument { .. }
        ));
    }

    #[test]
    fn test_end_of_stream_predicate() {
        assert!(PagerError::EndOfStream.is_end_of_stream());
        assert!(!PagerError::NotFound { line: 0 }.is_end_of_stream());
    }

    #[test]
    fn test_read_error_keeps_source() {
        use std::error::Error as _;

        let err = PagerError::read_error(
            7,
            std::io::Error::new(std::io::ErrorKind::UnexpectedEof, "truncated"),
        );
        let source = err.source().expect("read error carries its io source");
        assert_eq!(source.to_string(), "truncated");
    }
}
