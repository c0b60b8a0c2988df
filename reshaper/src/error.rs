//! Error types for the reshaping pipeline.
//!
//! - [`ParseError`] - malformed input table (shape, ragged rows, bad hours)
//! - [`ReshapeError`] - top-level errors returned by the pipeline
//! - [`ErrorKind`] - coarse classification used for exit codes
//!
//! Conversion into [`ReshapeError`] is automatic via `From`, so `?` works
//! across the parser, writer and pipeline.

use std::path::PathBuf;
use thiserror::Error;

// =============================================================================
// Parse Errors
// =============================================================================

/// Malformed input, with the position it was found at.
#[derive(Debug, Clone, PartialEq)]
pub struct ParseError {
    /// 1-based line in the input file (0 when not tied to a line).
    pub line: u64,
    pub column: Option<String>,
    pub value: Option<String>,
    pub message: String,
}

impl std::fmt::Display for ParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match (&self.column, &self.value) {
            (Some(col), Some(val)) => {
                write!(
                    f,
                    "Line {}, column '{}' (value '{}'): {}",
                    self.line, col, val, self.message
                )
            }
            (Some(col), None) => {
                write!(f, "Line {}, column '{}': {}", self.line, col, self.message)
            }
            _ if self.line == 0 => write!(f, "{}", self.message),
            _ => write!(f, "Line {}: {}", self.line, self.message),
        }
    }
}

impl std::error::Error for ParseError {}

impl ParseError {
    pub fn new(line: u64, message: impl Into<String>) -> Self {
        Self {
            line,
            column: None,
            value: None,
            message: message.into(),
        }
    }

    pub fn with_column(mut self, column: impl Into<String>) -> Self {
        self.column = Some(column.into());
        self
    }

    pub fn with_value(mut self, value: impl Into<String>) -> Self {
        self.value = Some(value.into());
        self
    }
}

// =============================================================================
// Pipeline Errors (top-level)
// =============================================================================

/// Errors returned by [`crate::transform::pipeline::transform_file`] and the
/// functions it is built from.
#[derive(Debug, Error)]
pub enum ReshapeError {
    /// Input path does not exist.
    #[error("Input file not found: {}", path.display())]
    FileNotFound { path: PathBuf },

    /// Input exists but could not be read.
    #[error("Failed to read '{}': {source}", path.display())]
    ReadInput {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Input table is malformed.
    #[error("Invalid input table: {0}")]
    Parse(#[from] ParseError),

    /// Output could not be created, written or moved into place.
    #[error("Failed to write '{}': {source}", path.display())]
    WriteOutput {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Stream-level IO error (reader or writer without a known path).
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// CSV serialization error.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Options are inconsistent.
    #[error("Invalid options: {0}")]
    InvalidOptions(String),

    /// Options or report JSON could not be read or produced.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Coarse error classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    FileNotFound,
    Parse,
    Io,
    Config,
}

impl ErrorKind {
    /// Process exit code for this kind of failure.
    pub fn exit_code(self) -> u8 {
        match self {
            ErrorKind::Config => 1,
            ErrorKind::FileNotFound => 2,
            ErrorKind::Parse => 3,
            ErrorKind::Io => 4,
        }
    }
}

impl ReshapeError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ReshapeError::FileNotFound { .. } => ErrorKind::FileNotFound,
            ReshapeError::Parse(_) => ErrorKind::Parse,
            ReshapeError::ReadInput { .. }
            | ReshapeError::WriteOutput { .. }
            | ReshapeError::Io(_)
            | ReshapeError::Csv(_) => ErrorKind::Io,
            ReshapeError::InvalidOptions(_) | ReshapeError::Json(_) => ErrorKind::Config,
        }
    }

    pub fn exit_code(&self) -> u8 {
        self.kind().exit_code()
    }
}

// =============================================================================
// Result Type Aliases
// =============================================================================

/// Result type for table parsing.
pub type ParseResult<T> = Result<T, ParseError>;

/// Result type for pipeline operations.
pub type ReshapeResult<T> = Result<T, ReshapeError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_error_message_format() {
        let err = ParseError::new(7, "not a number")
            .with_column("ADY=0.1 IDY=0.07 CY=0.3")
            .with_value("abc");

        let msg = err.to_string();
        assert!(msg.contains("Line 7"));
        assert!(msg.contains("column 'ADY=0.1 IDY=0.07 CY=0.3'"));
        assert!(msg.contains("value 'abc'"));
    }

    #[test]
    fn test_parse_error_without_line() {
        let err = ParseError::new(0, "expected 3 header rows");
        assert_eq!(err.to_string(), "expected 3 header rows");
    }

    #[test]
    fn test_error_conversion_chain() {
        let parse_err = ParseError::new(4, "ragged row");
        let err: ReshapeError = parse_err.into();
        assert_eq!(err.kind(), ErrorKind::Parse);
        assert!(err.to_string().contains("ragged row"));

        let io_err = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let err: ReshapeError = io_err.into();
        assert_eq!(err.kind(), ErrorKind::Io);
    }

    #[test]
    fn test_exit_codes_are_distinct() {
        let not_found = ReshapeError::FileNotFound {
            path: PathBuf::from("raw-values.csv"),
        };
        assert_eq!(not_found.exit_code(), 2);
        assert!(not_found.to_string().contains("raw-values.csv"));

        let write = ReshapeError::WriteOutput {
            path: PathBuf::from("out/yeast-model.csv"),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "missing dir"),
        };
        assert_eq!(write.exit_code(), 4);
        assert_eq!(ReshapeError::InvalidOptions("x".into()).exit_code(), 1);
    }
}
