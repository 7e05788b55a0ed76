//! Demand sheet ingestion.
//!
//! The sheet is read as CSV with a header row. Each data row is one snapshot;
//! row order is snapshot order. Header names are trimmed before lookup.

use std::collections::BTreeMap;
use std::fs::File;
use std::io::{self, Read};
use std::path::Path;

use thiserror::Error;
use tracing::info;

/// Errors raised while reading the demand sheet.
#[derive(Debug, Error)]
pub enum InputError {
    #[error("cannot open demand sheet \"{path}\": {source}")]
    Open {
        path: String,
        #[source]
        source: io::Error,
    },
    #[error("malformed demand sheet: {0}")]
    Csv(#[from] csv::Error),
    #[error("column \"{column}\" not found in demand sheet (columns: {available})")]
    MissingColumn { column: String, available: String },
    #[error("snapshot {snapshot}, column \"{column}\": cannot parse \"{raw}\" as a number")]
    Parse {
        snapshot: usize,
        column: String,
        raw: String,
    },
    #[error("snapshot {snapshot}, column \"{column}\": {message}")]
    OutOfRange {
        snapshot: usize,
        column: String,
        message: String,
    },
    #[error("demand sheet contains no snapshots")]
    Empty,
}

/// Per-snapshot load and availability factors.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SnapshotTable {
    /// Column headers of the source, in source order.
    pub columns: Vec<String>,
    /// Load per snapshot (MW).
    pub load_mw: Vec<f64>,
    /// Availability factors per snapshot, keyed by column name.
    pub availability: BTreeMap<String, Vec<f64>>,
}

impl SnapshotTable {
    /// Number of snapshots.
    pub fn len(&self) -> usize {
        self.load_mw.len()
    }

    pub fn is_empty(&self) -> bool {
        self.load_mw.is_empty()
    }

    /// Availability series for `name`, if present.
    pub fn column(&self, name: &str) -> Option<&[f64]> {
        self.availability.get(name).map(Vec::as_slice)
    }
}

/// Opens and reads a demand sheet from `path`.
///
/// # Errors
///
/// Returns an [`InputError`] if the file cannot be opened or its content
/// does not satisfy [`read_snapshot_table`].
pub fn load_snapshot_table(
    path: &Path,
    load_column: &str,
    availability_columns: &[&str],
) -> Result<SnapshotTable, InputError> {
    let file = File::open(path).map_err(|source| InputError::Open {
        path: path.display().to_string(),
        source,
    })?;
    let table = read_snapshot_table(file, load_column, availability_columns)?;
    info!(
        path = %path.display(),
        snapshots = table.len(),
        "loaded demand sheet"
    );
    Ok(table)
}

/// Reads a demand sheet from any reader.
///
/// `load_column` must be present and hold non-negative MW values;
/// every entry of `availability_columns` must be present and hold fractions
/// in `[0, 1]`. Other columns are ignored.
///
/// # Errors
///
/// Returns an [`InputError`] naming the offending snapshot and column.
pub fn read_snapshot_table(
    reader: impl Read,
    load_column: &str,
    availability_columns: &[&str],
) -> Result<SnapshotTable, InputError> {
    let mut rdr = csv::ReaderBuilder::new()
        .trim(csv::Trim::Headers)
        .from_reader(reader);
    let headers = rdr.headers()?.clone();
    let columns: Vec<String> = headers.iter().map(str::to_string).collect();
    info!(columns = ?columns, "demand sheet columns");

    let index_of = |name: &str| -> Result<usize, InputError> {
        headers
            .iter()
            .position(|h| h == name.trim())
            .ok_or_else(|| InputError::MissingColumn {
                column: name.to_string(),
                available: headers.iter().collect::<Vec<_>>().join(", "),
            })
    };

    let load_idx = index_of(load_column)?;
    let avail_idx = availability_columns
        .iter()
        .map(|c| index_of(c).map(|i| (*c, i)))
        .collect::<Result<Vec<_>, _>>()?;

    let mut table = SnapshotTable {
        columns,
        ..SnapshotTable::default()
    };
    for (c, _) in &avail_idx {
        table.availability.insert((*c).to_string(), Vec::new());
    }

    for (snapshot, record) in rdr.records().enumerate() {
        let record = record?;

        let load = parse_cell(&record, load_idx, snapshot, load_column)?;
        if load < 0.0 {
            return Err(InputError::OutOfRange {
                snapshot,
                column: load_column.to_string(),
                message: format!("load must be >= 0, got {load}"),
            });
        }
        table.load_mw.push(load);

        for (column, idx) in &avail_idx {
            let cf = parse_cell(&record, *idx, snapshot, column)?;
            if !(0.0..=1.0).contains(&cf) {
                return Err(InputError::OutOfRange {
                    snapshot,
                    column: (*column).to_string(),
                    message: format!("availability must be in [0, 1], got {cf}"),
                });
            }
            if let Some(series) = table.availability.get_mut(*column) {
                series.push(cf);
            }
        }
    }

    if table.is_empty() {
        return Err(InputError::Empty);
    }
    Ok(table)
}

fn parse_cell(
    record: &csv::StringRecord,
    idx: usize,
    snapshot: usize,
    column: &str,
) -> Result<f64, InputError> {
    let raw = record.get(idx).unwrap_or("").trim();
    let value = raw.parse::<f64>().map_err(|_| InputError::Parse {
        snapshot,
        column: column.to_string(),
        raw: raw.to_string(),
    })?;
    if !value.is_finite() {
        return Err(InputError::OutOfRange {
            snapshot,
            column: column.to_string(),
            message: "value must be finite".to_string(),
        });
    }
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SHEET: &str = "\
Hour, Load (MW) ,offshore capacity factor,onshore capacity factor,solar capacity factor
0,52000,0.41,0.22,0.0
1,50500,0.44,0.25,0.0
2,49800,0.47,0.27,0.05
";

    const COLUMNS: [&str; 3] = [
        "offshore capacity factor",
        "onshore capacity factor",
        "solar capacity factor",
    ];

    #[test]
    fn reads_rows_as_snapshots_with_trimmed_headers() {
        let table = read_snapshot_table(SHEET.as_bytes(), "Load (MW)", &COLUMNS);
        assert!(table.is_ok(), "{:?}", table.err());
        let table = table.unwrap_or_default();
        assert_eq!(table.len(), 3);
        assert_eq!(table.load_mw, vec![52000.0, 50500.0, 49800.0]);
        assert_eq!(table.column("solar capacity factor"), Some(&[0.0, 0.0, 0.05][..]));
        assert_eq!(table.availability.len(), 3);
        assert_eq!(table.columns.len(), 5);
        assert_eq!(table.columns[1], "Load (MW)");
    }

    #[test]
    fn missing_column_lists_available_headers() {
        let err = read_snapshot_table(SHEET.as_bytes(), "Demand", &COLUMNS).unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("\"Demand\""));
        assert!(msg.contains("Load (MW)"));
    }

    #[test]
    fn unparsable_cell_names_snapshot_and_column() {
        let sheet = "Load (MW),solar capacity factor\n100,0.1\n200,abc\n";
        let err = read_snapshot_table(sheet.as_bytes(), "Load (MW)", &["solar capacity factor"])
            .unwrap_err();
        match err {
            InputError::Parse {
                snapshot,
                column,
                raw,
            } => {
                assert_eq!(snapshot, 1);
                assert_eq!(column, "solar capacity factor");
                assert_eq!(raw, "abc");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn availability_above_one_is_rejected() {
        let sheet = "Load (MW),solar capacity factor\n100,1.2\n";
        let err = read_snapshot_table(sheet.as_bytes(), "Load (MW)", &["solar capacity factor"]);
        assert!(matches!(err, Err(InputError::OutOfRange { .. })));
    }

    #[test]
    fn negative_load_is_rejected() {
        let sheet = "Load (MW)\n-5\n";
        let err = read_snapshot_table(sheet.as_bytes(), "Load (MW)", &[]);
        assert!(matches!(err, Err(InputError::OutOfRange { snapshot: 0, .. })));
    }

    #[test]
    fn header_only_sheet_is_empty_error() {
        let sheet = "Load (MW),solar capacity factor\n";
        let err = read_snapshot_table(sheet.as_bytes(), "Load (MW)", &["solar capacity factor"]);
        assert!(matches!(err, Err(InputError::Empty)));
    }

    #[test]
    fn missing_file_reports_path() {
        let err = load_snapshot_table(Path::new("does/not/exist.csv"), "Load (MW)", &[]);
        let msg = err.map(|_| ()).unwrap_err().to_string();
        assert!(msg.contains("does/not/exist.csv"));
    }
}
