//! Domain models for the yeast table reshaping pipeline.
//!
//! - [`WideTable`] - the pivoted input: temperature index × yeast column triples
//! - [`IndexLevel`] / [`IndexValue`] - one row-index level and its typed values
//! - [`ColumnKey`] - an `(ADY, IDY, CY)` column triple
//! - [`LongRecord`] - one row of the unpivoted output
//! - [`ValueKind`] - inferred column type, drives number rendering

use serde::{Deserialize, Serialize};

/// Row-index level names, in file order.
pub const INDEX_LEVELS: [&str; 2] = ["Celsius", "Fahrenheit"];

/// Column-header level names, in file order.
pub const COLUMN_LEVELS: [&str; 3] = ["ADY", "IDY", "CY"];

/// Output header written in place of the level and value names.
pub const DEFAULT_OUTPUT_HEADERS: [&str; 6] = [
    "temperature.celsius",
    "temperature.fahrenheit",
    "yeast.ady",
    "yeast.idy",
    "yeast.cy",
    "hours",
];

// =============================================================================
// Value Kinds
// =============================================================================

/// Type inferred for a whole column, like a dataframe dtype.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ValueKind {
    Integer,
    Float,
    Text,
}

impl ValueKind {
    /// Infer the kind of a column from its raw cells (`None` = missing).
    ///
    /// A single missing cell rules out `Integer`, since a missing value can
    /// only be held by a float column.
    pub fn infer<'a, I>(cells: I) -> Self
    where
        I: IntoIterator<Item = Option<&'a str>>,
    {
        let mut kind = ValueKind::Integer;
        for cell in cells {
            match cell {
                None => {
                    if kind == ValueKind::Integer {
                        kind = ValueKind::Float;
                    }
                }
                Some(raw) if raw.parse::<i64>().is_ok() => {}
                Some(raw) if raw.parse::<f64>().is_ok() => kind = ValueKind::Float,
                Some(_) => return ValueKind::Text,
            }
        }
        kind
    }
}

/// Render a float the way the output file expects: shortest round-trip
/// digits, integral values keep a trailing `.0`, and magnitudes of `1e16`
/// and above or below `1e-4` switch to a signed two-digit exponent
/// (`1e+20`, `1.5e-07`).
pub fn format_float(value: f64) -> String {
    let magnitude = value.abs();
    if !value.is_finite() {
        format!("{value}")
    } else if magnitude != 0.0 && !(1e-4..1e16).contains(&magnitude) {
        let scientific = format!("{value:e}");
        match scientific.split_once('e') {
            Some((mantissa, exponent)) => match exponent.parse::<i32>() {
                Ok(exp) => {
                    let sign = if exp < 0 { '-' } else { '+' };
                    format!("{mantissa}e{sign}{:02}", exp.abs())
                }
                Err(_) => scientific,
            },
            None => scientific,
        }
    } else if value.fract() == 0.0 {
        format!("{value:.1}")
    } else {
        format!("{value}")
    }
}

// =============================================================================
// Row Index
// =============================================================================

/// One cell of a row-index level.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum IndexValue {
    Int(i64),
    Float(f64),
    Text(String),
    Missing,
}

impl IndexValue {
    /// Convert a raw cell according to the kind inferred for its level.
    pub fn from_raw(raw: Option<&str>, kind: ValueKind) -> Self {
        let Some(raw) = raw else {
            return IndexValue::Missing;
        };
        match kind {
            ValueKind::Integer => raw
                .parse()
                .map(IndexValue::Int)
                .unwrap_or_else(|_| IndexValue::Text(raw.to_string())),
            ValueKind::Float => raw
                .parse()
                .map(IndexValue::Float)
                .unwrap_or_else(|_| IndexValue::Text(raw.to_string())),
            ValueKind::Text => IndexValue::Text(raw.to_string()),
        }
    }

    /// Text written to the output; `missing` stands in for absent cells.
    pub fn render(&self, missing: &str) -> String {
        match self {
            IndexValue::Int(v) => v.to_string(),
            IndexValue::Float(v) => format_float(*v),
            IndexValue::Text(s) => s.clone(),
            IndexValue::Missing => missing.to_string(),
        }
    }
}

/// A named row-index level with one value per data row.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct IndexLevel {
    pub name: String,
    pub kind: ValueKind,
    pub values: Vec<IndexValue>,
}

impl IndexLevel {
    /// Build a level from raw cells, inferring its kind first.
    pub fn from_raw(name: impl Into<String>, cells: &[Option<String>]) -> Self {
        let kind = ValueKind::infer(cells.iter().map(|c| c.as_deref()));
        let values = cells
            .iter()
            .map(|c| IndexValue::from_raw(c.as_deref(), kind))
            .collect();
        Self {
            name: name.into(),
            kind,
            values,
        }
    }
}

/// Temperature pair identifying one data row.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct TemperaturePoint {
    pub celsius: IndexValue,
    pub fahrenheit: IndexValue,
}

// =============================================================================
// Column Header
// =============================================================================

/// The three header labels of one data column.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ColumnKey {
    pub ady: String,
    pub idy: String,
    pub cy: String,
}

impl ColumnKey {
    pub fn new(ady: impl Into<String>, idy: impl Into<String>, cy: impl Into<String>) -> Self {
        Self {
            ady: ady.into(),
            idy: idy.into(),
            cy: cy.into(),
        }
    }
}

impl std::fmt::Display for ColumnKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}={} {}={} {}={}",
            COLUMN_LEVELS[0], self.ady, COLUMN_LEVELS[1], self.idy, COLUMN_LEVELS[2], self.cy
        )
    }
}

// =============================================================================
// Tables
// =============================================================================

/// The pivoted input table.
///
/// `values[row][column]` holds the hours for `index` row `row` under
/// `columns[column]`; `None` is a missing cell.
#[derive(Debug, Clone, PartialEq)]
pub struct WideTable {
    pub celsius: IndexLevel,
    pub fahrenheit: IndexLevel,
    pub columns: Vec<ColumnKey>,
    pub values: Vec<Vec<Option<f64>>>,
}

impl WideTable {
    pub fn row_count(&self) -> usize {
        self.values.len()
    }

    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    pub fn cell(&self, row: usize, column: usize) -> Option<f64> {
        self.values.get(row).and_then(|r| r.get(column)).copied().flatten()
    }

    pub fn temperature(&self, row: usize) -> TemperaturePoint {
        TemperaturePoint {
            celsius: self.celsius.values[row].clone(),
            fahrenheit: self.fahrenheit.values[row].clone(),
        }
    }

    pub fn missing_count(&self) -> usize {
        self.values.iter().flatten().filter(|v| v.is_none()).count()
    }

    /// Summary used by the `inspect` command.
    pub fn overview(&self) -> TableOverview {
        TableOverview {
            rows: self.row_count(),
            columns: self.column_count(),
            missing_cells: self.missing_count(),
            index_levels: vec![self.celsius.clone(), self.fahrenheit.clone()],
            column_levels: COLUMN_LEVELS.iter().map(|s| s.to_string()).collect(),
            column_keys: self.columns.clone(),
        }
    }
}

/// Shape of a parsed [`WideTable`].
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TableOverview {
    pub rows: usize,
    pub columns: usize,
    pub missing_cells: usize,
    pub index_levels: Vec<IndexLevel>,
    pub column_levels: Vec<String>,
    pub column_keys: Vec<ColumnKey>,
}

/// One row of the unpivoted table.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct LongRecord {
    pub temperature: TemperaturePoint,
    pub yeast: ColumnKey,
    pub hours: Option<f64>,
}

impl LongRecord {
    /// Fields in output order, with `missing` substituted for absent values.
    pub fn render(&self, hours_kind: ValueKind, missing: &str) -> [String; 6] {
        let hours = match self.hours {
            None => missing.to_string(),
            Some(v) if hours_kind == ValueKind::Integer => format!("{}", v as i64),
            Some(v) => format_float(v),
        };
        [
            self.temperature.celsius.render(missing),
            self.temperature.fahrenheit.render(missing),
            self.yeast.ady.clone(),
            self.yeast.idy.clone(),
            self.yeast.cy.clone(),
            hours,
        ]
    }
}

/// Kind of the `hours` column across a set of records.
pub fn hours_kind(records: &[LongRecord]) -> ValueKind {
    let all_integral = records
        .iter()
        .all(|r| matches!(r.hours, Some(v) if v.fract() == 0.0 && v.abs() < 1e16));
    if all_integral {
        ValueKind::Integer
    } else {
        ValueKind::Float
    }
}

// =============================================================================
// Tests
// =============================================================================
