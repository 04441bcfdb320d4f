//! CSV persistence for the snapshot table.
//!
//! Layout on disk: one header row holding the URL of every column, then one
//! row per rank position. Values are written in shortest round-trip form,
//! so a load immediately after a save compares equal cell for cell and a
//! no-change run diffs to nothing.

use std::io;
use std::path::Path;

use super::PriceTable;

/// Why the snapshot could not be read or written.
#[derive(thiserror::Error, Debug)]
pub enum SnapshotError {
    #[error("snapshot I/O failed: {0}")]
    Io(#[from] io::Error),

    #[error("snapshot table is malformed: {0}")]
    Csv(#[from] csv::Error),

    #[error("snapshot cell ({row},{col}) is not a number: {value:?}")]
    BadCell {
        row: usize,
        col: usize,
        value: String,
    },
}

/// Persist the table, replacing whatever was there.
pub fn save(path: &Path, table: &PriceTable) -> Result<(), SnapshotError> {
    // A batch with no columns degenerates to an empty file; the csv writer
    // cannot express a zero-field record.
    if table.columns.is_empty() {
        std::fs::write(path, "")?;
        return Ok(());
    }

    let mut writer = csv::Writer::from_path(path)?;
    writer.write_record(&table.columns)?;
    for row in &table.rows {
        writer.serialize(row)?;
    }
    writer.flush()?;
    Ok(())
}

/// Load the persisted table. `Ok(None)` means no snapshot exists yet: the
/// caller is on its first run and has nothing to diff against.
pub fn load(path: &Path) -> Result<Option<PriceTable>, SnapshotError> {
    if !path.exists() {
        return Ok(None);
    }

    let mut reader = csv::Reader::from_path(path)?;
    let columns: Vec<String> = reader.headers()?.iter().map(str::to_string).collect();
    if columns.is_empty() || (columns.len() == 1 && columns[0].is_empty()) {
        return Ok(Some(PriceTable::default()));
    }

    let mut rows = Vec::new();
    for (row_idx, record) in reader.records().enumerate() {
        let record = record?;
        let mut row = Vec::with_capacity(columns.len());
        for (col_idx, cell) in record.iter().enumerate() {
            let value = cell
                .trim()
                .parse::<f64>()
                .map_err(|_| SnapshotError::BadCell {
                    row: row_idx,
                    col: col_idx,
                    value: cell.to_string(),
                })?;
            row.push(value);
        }
        rows.push(row);
    }

    Ok(Some(PriceTable { columns, rows }))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_table() -> PriceTable {
        PriceTable {
            columns: vec![
                "https://a.example.com/x".to_string(),
                "https://b.example.com/y".to_string(),
            ],
            rows: vec![vec![5.0, 3.5], vec![19.99, 0.0]],
        }
    }

    #[test]
    fn test_round_trip_preserves_values_exactly() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("current-prices.csv");

        let table = sample_table();
        save(&path, &table).unwrap();
        let loaded = load(&path).unwrap().unwrap();

        assert_eq!(loaded, table);
    }

    #[test]
    fn test_written_form_keeps_trailing_point_zero() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("current-prices.csv");

        save(&path, &sample_table()).unwrap();
        let raw = std::fs::read_to_string(&path).unwrap();
        // Integral values keep a decimal point so the file never degrades
        // to ambiguous bare integers.
        assert!(raw.contains("5.0,3.5"));
        assert!(raw.contains("19.99,0.0"));
    }

    #[test]
    fn test_missing_file_is_none() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("no-such-snapshot.csv");
        assert!(load(&path).unwrap().is_none());
    }

    #[test]
    fn test_empty_table_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("current-prices.csv");

        save(&path, &PriceTable::default()).unwrap();
        let loaded = load(&path).unwrap().unwrap();
        assert!(loaded.columns.is_empty());
        assert_eq!(loaded.depth(), 0);
    }

    #[test]
    fn test_non_numeric_cell_is_reported_with_position() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("current-prices.csv");
        std::fs::write(&path, "https://a.example.com\nnot-a-price\n").unwrap();

        let err = load(&path).unwrap_err();
        match err {
            SnapshotError::BadCell { row, col, value } => {
                assert_eq!((row, col), (0, 0));
                assert_eq!(value, "not-a-price");
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}
