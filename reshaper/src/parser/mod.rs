//! Multi-level header CSV parser.
//!
//! Reads the raw yeast table: three header rows carrying the `ADY`, `IDY` and
//! `CY` labels of every data column, an optional row naming the two index
//! columns, then one data row per temperature with its `Celsius` and
//! `Fahrenheit` values in the first two cells.
//!
//! ```text
//! ADY,,0.1,0.2
//! IDY,,0.07,0.14
//! CY,,0.3,0.6
//! Celsius,Fahrenheit,,
//! 4,39,120,96
//! ```

use csv::StringRecord;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use crate::error::{ParseError, ParseResult, ReshapeError, ReshapeResult};
use crate::models::{ColumnKey, IndexLevel, WideTable, COLUMN_LEVELS, INDEX_LEVELS};

/// Number of header rows above the data.
pub const HEADER_ROWS: usize = 3;

/// Number of leading row-index columns.
pub const INDEX_COLUMNS: usize = 2;

/// Cell contents treated as a missing value (besides the empty cell).
pub const NA_VALUES: &[&str] = &[
    "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan", "1.#IND", "1.#QNAN",
    "<NA>", "N/A", "NA", "NULL", "NaN", "None", "n/a", "nan", "null",
];

/// Whether a trimmed cell denotes a missing value.
pub fn is_missing(cell: &str) -> bool {
    cell.is_empty() || NA_VALUES.contains(&cell)
}

/// Parse a wide table from a file.
pub fn parse_wide_file<P: AsRef<Path>>(path: P, delimiter: u8) -> ReshapeResult<WideTable> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|e| match e.kind() {
        std::io::ErrorKind::NotFound => ReshapeError::FileNotFound {
            path: path.to_path_buf(),
        },
        _ => ReshapeError::ReadInput {
            path: path.to_path_buf(),
            source: e,
        },
    })?;

    parse_wide_reader(BufReader::new(file), delimiter).map_err(|e| match e {
        ReshapeError::Io(source) => ReshapeError::ReadInput {
            path: path.to_path_buf(),
            source,
        },
        other => other,
    })
}

/// Parse a wide table held in memory.
pub fn parse_wide_str(content: &str, delimiter: u8) -> ReshapeResult<WideTable> {
    parse_wide_reader(content.as_bytes(), delimiter)
}

/// Parse a wide table from any reader.
pub fn parse_wide_reader<R: Read>(reader: R, delimiter: u8) -> ReshapeResult<WideTable> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .delimiter(delimiter)
        .from_reader(reader);

    let mut records = Vec::new();
    for result in reader.records() {
        let record = result.map_err(csv_read_error)?;
        if is_blank(&record) {
            continue;
        }
        let line = record.position().map(|p| p.line()).unwrap_or(0);
        let mut cells: Vec<String> = record.iter().map(|c| c.trim().to_string()).collect();
        if records.is_empty() {
            // Excel exports may prefix the first cell with a BOM.
            if let Some(first) = cells.first_mut() {
                *first = first.trim_start_matches('\u{feff}').trim().to_string();
            }
        }
        records.push((line, cells));
    }

    build_table(records)
}

fn is_blank(record: &StringRecord) -> bool {
    record.len() == 1 && record.get(0).is_some_and(|c| c.trim().is_empty())
}

fn csv_read_error(err: csv::Error) -> ReshapeError {
    let line = err.position().map(|p| p.line()).unwrap_or(0);
    let message = err.to_string();
    match err.into_kind() {
        csv::ErrorKind::Io(e) => ReshapeError::Io(e),
        _ => ParseError::new(line, message).into(),
    }
}

fn build_table(records: Vec<(u64, Vec<String>)>) -> ReshapeResult<WideTable> {
    if records.len() < HEADER_ROWS {
        return Err(ParseError::new(
            0,
            format!(
                "expected {} header rows ({}), found {}",
                HEADER_ROWS,
                COLUMN_LEVELS.join(", "),
                records.len()
            ),
        )
        .into());
    }

    let (headers, body) = records.split_at(HEADER_ROWS);
    let width = headers[0].1.len();
    if width <= INDEX_COLUMNS {
        return Err(ParseError::new(
            headers[0].0,
            format!(
                "expected {} index columns and at least one data column, found {} column(s)",
                INDEX_COLUMNS, width
            ),
        )
        .into());
    }
    for (line, cells) in headers {
        if cells.len() != width {
            return Err(ragged(*line, cells.len(), width).into());
        }
    }

    let columns = column_keys(headers);

    let body = match body.first() {
        Some((_, cells)) if is_index_name_row(cells, width) => &body[1..],
        _ => body,
    };

    let mut celsius = Vec::with_capacity(body.len());
    let mut fahrenheit = Vec::with_capacity(body.len());
    let mut values = Vec::with_capacity(body.len());

    for (line, cells) in body {
        if cells.len() != width {
            return Err(ragged(*line, cells.len(), width).into());
        }
        celsius.push(index_cell(&cells[0]));
        fahrenheit.push(index_cell(&cells[1]));

        let row = cells[INDEX_COLUMNS..]
            .iter()
            .zip(&columns)
            .map(|(cell, key)| parse_hours(*line, cell, key))
            .collect::<Result<Vec<_>, _>>()?;
        values.push(row);
    }

    Ok(WideTable {
        celsius: IndexLevel::from_raw(INDEX_LEVELS[0], &celsius),
        fahrenheit: IndexLevel::from_raw(INDEX_LEVELS[1], &fahrenheit),
        columns,
        values,
    })
}

/// Column triples from the header rows; blank labels get a positional name.
fn column_keys(headers: &[(u64, Vec<String>)]) -> Vec<ColumnKey> {
    let width = headers[0].1.len();
    (INDEX_COLUMNS..width)
        .map(|col| {
            let label = |level: usize| {
                let raw = &headers[level].1[col];
                if raw.is_empty() {
                    format!("Unnamed: {col}_level_{level}")
                } else {
                    raw.clone()
                }
            };
            ColumnKey::new(label(0), label(1), label(2))
        })
        .collect()
}

/// A row with labels in the index cells and nothing else names the index columns.
fn is_index_name_row(cells: &[String], width: usize) -> bool {
    cells.len() == width
        && cells[INDEX_COLUMNS..].iter().all(|c| c.is_empty())
        && cells[..INDEX_COLUMNS]
            .iter()
            .any(|c| !c.is_empty() && c.parse::<f64>().is_err())
}

fn index_cell(raw: &str) -> Option<String> {
    if is_missing(raw) {
        None
    } else {
        Some(raw.to_string())
    }
}

fn parse_hours(line: u64, raw: &str, key: &ColumnKey) -> ParseResult<Option<f64>> {
    if is_missing(raw) {
        return Ok(None);
    }
    raw.parse::<f64>()
        .map(|v| if v.is_nan() { None } else { Some(v) })
        .map_err(|_| {
            ParseError::new(line, "hours value is not numeric")
                .with_column(key.to_string())
                .with_value(raw)
        })
}

fn ragged(line: u64, found: usize, expected: usize) -> ParseError {
    ParseError::new(line, format!("expected {expected} cells, found {found}"))
}
