//! Unpivot a wide table into long records.
//!
//! # Architecture
//!
//! ```text
//! Wide Input                              →  Long Output
//! ┌──────────┬───────────┬───────────┐      ┌──────────────────────────┐
//! │ C  F     │ (A,X,1)   │ (B,Y,2)   │      │ 0 32 A X 1 5.5           │
//! │ 0  32    │ 5.5       │ 7         │  →   │ 4 39 A X 1 3             │
//! │ 4  39    │ 3         │ (missing) │      │ 0 32 B Y 2 7             │
//! └──────────┴───────────┴───────────┘      │ 4 39 B Y 2 (missing)     │
//!                                           └──────────────────────────┘
//! ```
//!
//! The default [`RowOrder::ColumnMajor`] walks one source column at a time,
//! top to bottom, which is the order a dataframe `melt` produces.

use serde::{Deserialize, Serialize};

use crate::models::{LongRecord, WideTable};

/// Enumeration order of the unpivoted records.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum RowOrder {
    /// Every row of the first column, then every row of the next column.
    #[default]
    ColumnMajor,
    /// Every column of the first row, then every column of the next row.
    RowMajor,
}

/// Unpivot `table` into one record per (row, column) cell.
///
/// Always returns `row_count() * column_count()` records.
pub fn melt(table: &WideTable, order: RowOrder) -> Vec<LongRecord> {
    let rows = table.row_count();
    let columns = table.column_count();

    let cells: Box<dyn Iterator<Item = (usize, usize)>> = match order {
        RowOrder::ColumnMajor => {
            Box::new((0..columns).flat_map(move |c| (0..rows).map(move |r| (r, c))))
        }
        RowOrder::RowMajor => {
            Box::new((0..rows).flat_map(move |r| (0..columns).map(move |c| (r, c))))
        }
    };

    let mut records = Vec::with_capacity(rows * columns);
    for (row, column) in cells {
        records.push(LongRecord {
            temperature: table.temperature(row),
            yeast: table.columns[column].clone(),
            hours: table.cell(row, column),
        });
    }
    records
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ColumnKey, IndexLevel, IndexValue};
    use std::collections::HashSet;

    fn sample_table() -> WideTable {
        WideTable {
            celsius: IndexLevel::from_raw("Celsius", &[Some("0".into()), Some("4".into())]),
            fahrenheit: IndexLevel::from_raw("Fahrenheit", &[Some("32".into()), Some("39".into())]),
            columns: vec![ColumnKey::new("A", "X", "1"), ColumnKey::new("B", "Y", "2")],
            values: vec![vec![Some(5.5), Some(7.0)], vec![Some(3.0), None]],
        }
    }

    fn summarize(records: &[LongRecord]) -> Vec<(IndexValue, String, Option<f64>)> {
        records
            .iter()
            .map(|r| (r.temperature.celsius.clone(), r.yeast.ady.clone(), r.hours))
            .collect()
    }

    #[test]
    fn test_column_major_order() {
        let records = melt(&sample_table(), RowOrder::ColumnMajor);

        assert_eq!(
            summarize(&records),
            vec![
                (IndexValue::Int(0), "A".to_string(), Some(5.5)),
                (IndexValue::Int(4), "A".to_string(), Some(3.0)),
                (IndexValue::Int(0), "B".to_string(), Some(7.0)),
                (IndexValue::Int(4), "B".to_string(), None),
            ]
        );
    }

    #[test]
    fn test_row_major_order() {
        let records = melt(&sample_table(), RowOrder::RowMajor);

        assert_eq!(
            summarize(&records),
            vec![
                (IndexValue::Int(0), "A".to_string(), Some(5.5)),
                (IndexValue::Int(0), "B".to_string(), Some(7.0)),
                (IndexValue::Int(4), "A".to_string(), Some(3.0)),
                (IndexValue::Int(4), "B".to_string(), None),
            ]
        );
    }

    #[test]
    fn test_every_cell_appears_once() {
        let table = sample_table();
        let records = melt(&table, RowOrder::ColumnMajor);

        assert_eq!(records.len(), table.row_count() * table.column_count());

        let combos: HashSet<(String, String, ColumnKey)> = records
            .iter()
            .map(|r| {
                (
                    r.temperature.celsius.render("-1"),
                    r.temperature.fahrenheit.render("-1"),
                    r.yeast.clone(),
                )
            })
            .collect();
        assert_eq!(combos.len(), records.len());
    }

    #[test]
    fn test_empty_table() {
        let table = WideTable {
            celsius: IndexLevel::from_raw("Celsius", &[]),
            fahrenheit: IndexLevel::from_raw("Fahrenheit", &[]),
            columns: vec![ColumnKey::new("A", "X", "1")],
            values: vec![],
        };
        assert!(melt(&table, RowOrder::ColumnMajor).is_empty());
    }

    #[test]
    fn test_row_order_serde_names() {
        let json = serde_json::to_string(&RowOrder::RowMajor).unwrap();
        assert_eq!(json, "\"row-major\"");
        let order: RowOrder = serde_json::from_str("\"column-major\"").unwrap();
        assert_eq!(order, RowOrder::ColumnMajor);
    }
}
