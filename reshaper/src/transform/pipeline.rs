//! High-level API: raw yeast values CSV in, yeast model CSV out.
//!
//! # Example
//!
//! ```rust,no_run
//! use reshaper::{transform_file, ReshapeOptions};
//! use std::path::Path;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let summary = transform_file(
//!         Path::new("raw-values.csv"),
//!         Path::new("yeast-model.csv"),
//!         &ReshapeOptions::default(),
//!     )?;
//!
//!     println!("Wrote {} rows", summary.records);
//!     Ok(())
//! }
//! ```

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;

use super::melt::{melt, RowOrder};
use crate::error::{ReshapeError, ReshapeResult};
use crate::logs::{log_info, log_info_indent, log_success, log_warning, LogEntry};
use crate::models::{LongRecord, WideTable, DEFAULT_OUTPUT_HEADERS};
use crate::output::{to_csv_string, write_long_file};
use crate::parser::{parse_wide_file, parse_wide_str};

/// Options for the reshaping pipeline
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct ReshapeOptions {
    /// Enumeration order of output rows
    pub order: RowOrder,

    /// Text written for missing values
    pub missing_sentinel: String,

    /// Output header, in field order
    pub output_headers: [String; 6],

    /// Field delimiter for both input and output
    pub delimiter: char,
}

impl Default for ReshapeOptions {
    fn default() -> Self {
        Self {
            order: RowOrder::ColumnMajor,
            missing_sentinel: "-1".to_string(),
            output_headers: DEFAULT_OUTPUT_HEADERS.map(String::from),
            delimiter: ',',
        }
    }
}

impl ReshapeOptions {
    /// Parse options from JSON; absent fields keep their defaults.
    pub fn from_json(content: &str) -> ReshapeResult<Self> {
        let options: Self = serde_json::from_str(content)?;
        options.validate()?;
        Ok(options)
    }

    pub fn from_json_file(path: &Path) -> ReshapeResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => ReshapeError::FileNotFound {
                path: path.to_path_buf(),
            },
            _ => ReshapeError::ReadInput {
                path: path.to_path_buf(),
                source: e,
            },
        })?;
        Self::from_json(&content)
    }

    pub fn validate(&self) -> ReshapeResult<()> {
        self.delimiter_byte()?;

        let mut seen = HashSet::new();
        for header in &self.output_headers {
            if header.is_empty() {
                return Err(ReshapeError::InvalidOptions(
                    "output header names must not be empty".into(),
                ));
            }
            if !seen.insert(header.as_str()) {
                return Err(ReshapeError::InvalidOptions(format!(
                    "duplicate output header '{}'",
                    header
                )));
            }
        }
        Ok(())
    }

    /// The delimiter as the single byte the CSV reader and writer expect.
    pub fn delimiter_byte(&self) -> ReshapeResult<u8> {
        if self.delimiter.is_ascii() && !matches!(self.delimiter, '"' | '\n' | '\r') {
            Ok(self.delimiter as u8)
        } else {
            Err(ReshapeError::InvalidOptions(format!(
                "delimiter must be one ASCII character other than a quote or newline, got {:?}",
                self.delimiter
            )))
        }
    }
}

/// What a pipeline run produced
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ReshapeSummary {
    pub input: Option<String>,
    pub output: Option<String>,
    /// Temperature rows in the input
    pub rows: usize,
    /// Yeast column triples in the input
    pub columns: usize,
    /// Data rows written
    pub records: usize,
    /// Hours cells written as the missing sentinel
    pub missing_cells: usize,
    pub order: RowOrder,
}

/// JSON report of one run: the summary when it succeeded, the error when it
/// failed, and the log recorded up to that point.
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    pub succeeded: bool,
    pub summary: Option<ReshapeSummary>,
    pub error: Option<String>,
    pub log: Vec<LogEntry>,
}

impl RunReport {
    pub fn new(outcome: &ReshapeResult<ReshapeSummary>, log: Vec<LogEntry>) -> Self {
        Self {
            succeeded: outcome.is_ok(),
            summary: outcome.as_ref().ok().cloned(),
            error: outcome.as_ref().err().map(|e| e.to_string()),
            log,
        }
    }

    pub fn write(&self, path: &Path) -> ReshapeResult<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json).map_err(|source| ReshapeError::WriteOutput {
            path: path.to_path_buf(),
            source,
        })
    }
}

/// Reshape `input` into `output`.
///
/// 1. Parses the wide table
/// 2. Unpivots every cell into a long record
/// 3. Writes the renamed long table, replacing `output`
pub fn transform_file(
    input: &Path,
    output: &Path,
    options: &ReshapeOptions,
) -> ReshapeResult<ReshapeSummary> {
    options.validate()?;

    log_info(format!("📖 Reading {}", input.display()));
    let table = parse_wide_file(input, options.delimiter_byte()?)?;
    print_table_shape(&table);

    let records = reshape(&table, options);

    log_info(format!("💾 Writing {}", output.display()));
    write_long_file(output, &records, options)?;
    log_success(format!("Wrote {} rows", records.len()));

    Ok(summarize(&table, &records, options, Some(input), Some(output)))
}

/// Reshape CSV text held in memory, returning the output CSV text.
pub fn transform_str(
    content: &str,
    options: &ReshapeOptions,
) -> ReshapeResult<(String, ReshapeSummary)> {
    options.validate()?;

    let table = parse_wide_str(content, options.delimiter_byte()?)?;
    let records = reshape(&table, options);
    let csv = to_csv_string(&records, options)?;

    Ok((csv, summarize(&table, &records, options, None, None)))
}

fn reshape(table: &WideTable, options: &ReshapeOptions) -> Vec<LongRecord> {
    log_info("🔄 Unpivoting...");
    let records = melt(table, options.order);

    let missing = table.missing_count();
    if missing > 0 {
        log_warning(format!(
            "{} missing cell(s) written as {}",
            missing, options.missing_sentinel
        ));
    }
    records
}

fn print_table_shape(table: &WideTable) {
    log_success(format!(
        "Read {} temperature rows × {} yeast columns",
        table.row_count(),
        table.column_count()
    ));
    if let (Some(first), Some(last)) = (table.columns.first(), table.columns.last()) {
        log_info_indent(format!("first column: {}", first), 1);
        log_info_indent(format!("last column:  {}", last), 1);
    }
}

fn summarize(
    table: &WideTable,
    records: &[LongRecord],
    options: &ReshapeOptions,
    input: Option<&Path>,
    output: Option<&Path>,
) -> ReshapeSummary {
    ReshapeSummary {
        input: input.map(|p| p.display().to_string()),
        output: output.map(|p| p.display().to_string()),
        rows: table.row_count(),
        columns: table.column_count(),
        records: records.len(),
        missing_cells: table.missing_count(),
        order: options.order,
    }
}
