//! # Reshaper - yeast model table builder
//!
//! Turns the hand-maintained raw yeast values table (hours to rise, by
//! temperature and yeast amount) into the long CSV the dough calculator
//! loads.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────┐     ┌─────────────┐     ┌─────────────┐     ┌─────────────┐
//! │  raw-values │────▶│   Parser    │────▶│    Melt     │────▶│ yeast-model │
//! │ (3 headers) │     │ (WideTable) │     │ (long rows) │     │    (CSV)    │
//! └─────────────┘     └─────────────┘     └─────────────┘     └─────────────┘
//! ```
//!
//! ## Quick Start
//!
//! ```rust
//! use reshaper::{transform_str, ReshapeOptions};
//!
//! let raw = "ADY,,A\nIDY,,X\nCY,,1\n0,32,5.5\n";
//! let (csv, summary) = transform_str(raw, &ReshapeOptions::default()).unwrap();
//!
//! assert_eq!(summary.records, 1);
//! assert!(csv.ends_with("0,32,A,X,1,5.5\n"));
//! ```
//!
//! ## Modules
//!
//! - [`error`] - Error types and exit codes
//! - [`models`] - Wide and long table models
//! - [`parser`] - Multi-level header CSV parsing
//! - [`transform`] - Melt and the end-to-end pipeline
//! - [`output`] - Long table CSV writing
//! - [`paths`] - Executable-relative path resolution
//! - [`logs`] - Progress logging

// Core modules
pub mod error;
pub mod models;

// Parsing
pub mod parser;

// Transformation
pub mod transform;

// Output
pub mod output;

// CLI support
pub mod logs;
pub mod paths;

// =============================================================================
// Re-exports - Error types
// =============================================================================

pub use error::{ErrorKind, ParseError, ReshapeError, ReshapeResult};

// =============================================================================
// Re-exports - Models
// =============================================================================

pub use models::{
    ColumnKey,
    IndexLevel,
    IndexValue,
    LongRecord,
    TableOverview,
    TemperaturePoint,
    ValueKind,
    WideTable,
};

// =============================================================================
// Re-exports - Parsing
// =============================================================================

pub use parser::{is_missing, parse_wide_file, parse_wide_reader, parse_wide_str};

// =============================================================================
// Re-exports - Pipeline
// =============================================================================

pub use transform::{
    melt,
    transform_file,
    transform_str,
    ReshapeOptions,
    ReshapeSummary,
    RowOrder,
    RunReport,
};

// =============================================================================
// Re-exports - Output
// =============================================================================

pub use output::{to_csv_string, write_long_csv, write_long_file};
