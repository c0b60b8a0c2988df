//! Long table CSV writer.
//!
//! Writes the renamed header followed by one line per [`LongRecord`]. Files
//! are written to a temporary sibling first and moved over the destination
//! once complete, so a failed run never leaves a truncated output behind.

use std::fs;
use std::io::{BufWriter, Write};
use std::path::Path;

use tempfile::NamedTempFile;

use crate::error::{ReshapeError, ReshapeResult};
use crate::models::{hours_kind, LongRecord};
use crate::transform::pipeline::ReshapeOptions;

/// Write `records` as CSV to any writer.
pub fn write_long_csv<W: Write>(
    writer: W,
    records: &[LongRecord],
    options: &ReshapeOptions,
) -> ReshapeResult<()> {
    let mut csv_writer = csv::WriterBuilder::new()
        .delimiter(options.delimiter_byte()?)
        .terminator(csv::Terminator::Any(b'\n'))
        .from_writer(writer);

    csv_writer.write_record(&options.output_headers)?;

    let kind = hours_kind(records);
    for record in records {
        csv_writer.write_record(record.render(kind, &options.missing_sentinel))?;
    }

    csv_writer.flush()?;
    Ok(())
}

/// Render `records` to a CSV string.
pub fn to_csv_string(records: &[LongRecord], options: &ReshapeOptions) -> ReshapeResult<String> {
    let mut buf = Vec::new();
    write_long_csv(&mut buf, records, options)?;
    String::from_utf8(buf)
        .map_err(|e| ReshapeError::InvalidOptions(format!("output is not UTF-8: {e}")))
}

/// Write `records` to `path`, replacing any existing file.
pub fn write_long_file(
    path: &Path,
    records: &[LongRecord],
    options: &ReshapeOptions,
) -> ReshapeResult<()> {
    let write_err = |source: std::io::Error| ReshapeError::WriteOutput {
        path: path.to_path_buf(),
        source,
    };

    let dir = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    let mut tmp = NamedTempFile::new_in(dir).map_err(write_err)?;

    write_long_csv(BufWriter::new(tmp.as_file_mut()), records, options).map_err(|e| match e {
        ReshapeError::Io(source) => write_err(source),
        ReshapeError::Csv(err) if err.is_io_error() => write_err(err.into()),
        other => other,
    })?;
    tmp.as_file().sync_all().map_err(write_err)?;

    set_output_permissions(&tmp, path).map_err(write_err)?;
    tmp.persist(path).map_err(|e| write_err(e.error))?;
    Ok(())
}

/// Temp files are created private; give the output the permissions an
/// ordinary file would get, or keep the ones of the file being replaced.
fn set_output_permissions(tmp: &NamedTempFile, path: &Path) -> std::io::Result<()> {
    if let Ok(existing) = fs::metadata(path) {
        return tmp.as_file().set_permissions(existing.permissions());
    }
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        tmp.as_file().set_permissions(fs::Permissions::from_mode(0o644))?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use crate::models::{ColumnKey, IndexValue, TemperaturePoint};

    fn record(hours: Option<f64>) -> LongRecord {
        LongRecord {
            temperature: TemperaturePoint {
                celsius: IndexValue::Int(0),
                fahrenheit: IndexValue::Int(32),
            },
            yeast: ColumnKey::new("A", "X", "1"),
            hours,
        }
    }

    #[test]
    fn test_header_is_exact() {
        let csv = to_csv_string(&[], &ReshapeOptions::default()).unwrap();
        assert_eq!(
            csv,
            "temperature.celsius,temperature.fahrenheit,yeast.ady,yeast.idy,yeast.cy,hours\n"
        );
    }

    #[test]
    fn test_value_and_sentinel_rows() {
        let options = ReshapeOptions::default();

        let csv = to_csv_string(&[record(Some(5.5))], &options).unwrap();
        assert_eq!(csv.lines().nth(1), Some("0,32,A,X,1,5.5"));

        let csv = to_csv_string(&[record(None)], &options).unwrap();
        assert_eq!(csv.lines().nth(1), Some("0,32,A,X,1,-1"));
    }

    #[test]
    fn test_integral_hours_follow_column_kind() {
        let options = ReshapeOptions::default();

        let csv = to_csv_string(&[record(Some(12.0)), record(Some(8.0))], &options).unwrap();
        assert_eq!(csv.lines().nth(1), Some("0,32,A,X,1,12"));

        let csv = to_csv_string(&[record(Some(12.0)), record(None)], &options).unwrap();
        assert_eq!(csv.lines().nth(1), Some("0,32,A,X,1,12.0"));
        assert_eq!(csv.lines().nth(2), Some("0,32,A,X,1,-1"));
    }

    #[test]
    fn test_labels_needing_quotes() {
        let mut r = record(Some(1.5));
        r.yeast = ColumnKey::new("A,1", "X", "1");
        let csv = to_csv_string(&[r], &ReshapeOptions::default()).unwrap();
        assert_eq!(csv.lines().nth(1), Some("0,32,\"A,1\",X,1,1.5"));
    }

    #[test]
    fn test_write_file_replaces_existing() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("yeast-model.csv");
        fs::write(&path, "stale contents\n").unwrap();

        write_long_file(&path, &[record(Some(5.5))], &ReshapeOptions::default()).unwrap();

        let written = fs::read_to_string(&path).unwrap();
        assert!(written.starts_with("temperature.celsius,"));
        assert!(written.ends_with("0,32,A,X,1,5.5\n"));
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 1);
    }

    #[test]
    fn test_write_file_into_missing_directory() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("yeast-model.csv");

        let err = write_long_file(&path, &[record(None)], &ReshapeOptions::default()).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Io);
        assert!(!path.exists());
    }
}
