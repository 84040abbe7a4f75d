use std::path::Path;

use log::debug;
use ndarray::Array2;

use super::model::RawTable;
use crate::error::{DataError, Result};

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// On-disk layout of a raw table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableFormat {
    /// Fields separated by runs of blanks, leading blanks allowed.
    Whitespace,
    /// Comma-separated, no header row.
    Csv,
}

impl TableFormat {
    /// `.csv` is comma-delimited; everything else (`.data`, `.txt`, …) is
    /// whitespace-delimited.
    pub fn from_path(path: &Path) -> Self {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("")
            .to_ascii_lowercase();

        match ext.as_str() {
            "csv" => TableFormat::Csv,
            _ => TableFormat::Whitespace,
        }
    }
}

/// Parse a headerless numeric table whose columns are `column_names`, in
/// order. Dispatches on the file extension.
///
/// Every row must carry exactly `column_names.len()` numeric fields.
pub fn load_table(path: &Path, column_names: &[String]) -> Result<RawTable> {
    if column_names.len() < 2 {
        return Err(DataError::parse(
            path,
            format!(
                "need at least two columns (features + label), {} configured",
                column_names.len()
            ),
        ));
    }

    let format = TableFormat::from_path(path);
    let flat = match format {
        TableFormat::Whitespace => read_whitespace(path, column_names.len())?,
        TableFormat::Csv => read_csv(path, column_names.len())?,
    };

    let ncols = column_names.len();
    let nrows = flat.len() / ncols;
    let values = Array2::from_shape_vec((nrows, ncols), flat)
        .map_err(|e| DataError::parse(path, e))?;

    debug!("Parsed {} as {format:?}: {nrows} rows × {ncols} columns", path.display());

    Ok(RawTable {
        column_names: column_names.to_vec(),
        values,
    })
}

// ---------------------------------------------------------------------------
// Whitespace-delimited tables
// ---------------------------------------------------------------------------

/// Row-major values of a whitespace table. Blank lines are skipped.
fn read_whitespace(path: &Path, ncols: usize) -> Result<Vec<f64>> {
    let text = std::fs::read_to_string(path).map_err(|e| DataError::parse(path, e))?;
    let mut flat = Vec::new();

    for (line_no, line) in text.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        let start = flat.len();
        for (j, tok) in line.split_whitespace().enumerate() {
            let v = parse_field(tok).ok_or_else(|| {
                DataError::parse(
                    path,
                    format!("line {}, column {j}: '{tok}' is not a number", line_no + 1),
                )
            })?;
            flat.push(v);
        }
        let found = flat.len() - start;
        if found != ncols {
            return Err(DataError::parse(
                path,
                format!("line {}: expected {ncols} columns, found {found}", line_no + 1),
            ));
        }
    }

    Ok(flat)
}

// ---------------------------------------------------------------------------
// CSV tables
// ---------------------------------------------------------------------------

fn read_csv(path: &Path, ncols: usize) -> Result<Vec<f64>> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_path(path)
        .map_err(|e| DataError::parse(path, e))?;

    let mut flat = Vec::new();

    for (row_no, result) in reader.records().enumerate() {
        let record = result.map_err(|e| DataError::parse(path, format!("row {row_no}: {e}")))?;

        if record.len() == 1 && record.get(0).is_some_and(str::is_empty) {
            continue;
        }
        if record.len() != ncols {
            return Err(DataError::parse(
                path,
                format!("row {row_no}: expected {ncols} columns, found {}", record.len()),
            ));
        }
        for (j, tok) in record.iter().enumerate() {
            let v = parse_field(tok).ok_or_else(|| {
                DataError::parse(path, format!("row {row_no}, column {j}: '{tok}' is not a number"))
            })?;
            flat.push(v);
        }
    }

    Ok(flat)
}

fn parse_field(tok: &str) -> Option<f64> {
    tok.trim().parse::<f64>().ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;
    use tempfile::tempdir;

    fn names(n: usize) -> Vec<String> {
        (0..n).map(|i| format!("C{i}")).collect()
    }

    #[test]
    fn test_format_from_extension() {
        assert_eq!(TableFormat::from_path(&PathBuf::from("housing.data")), TableFormat::Whitespace);
        assert_eq!(TableFormat::from_path(&PathBuf::from("a.CSV")), TableFormat::Csv);
        assert_eq!(TableFormat::from_path(&PathBuf::from("noext")), TableFormat::Whitespace);
    }

    #[test]
    fn test_whitespace_collapses_runs() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("t.data");
        std::fs::write(
            &path,
            " 0.00632  18.00   2.310\n\n   0.02731   0.00   7.070  \n",
        )
        .unwrap();

        let table = load_table(&path, &names(3)).unwrap();
        assert_eq!(table.values.dim(), (2, 3));
        assert_eq!(table.values[[0, 0]], 0.00632);
        assert_eq!(table.values[[1, 2]], 7.07);
        assert_eq!(table.column_names, names(3));
    }

    #[test]
    fn test_whitespace_column_mismatch_fails() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("t.data");
        std::fs::write(&path, "1 2 3\n4 5\n").unwrap();

        let err = load_table(&path, &names(3)).unwrap_err();
        match err {
            DataError::Parse { reason, .. } => assert!(reason.contains("line 2")),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_non_numeric_field_fails() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("t.data");
        std::fs::write(&path, "1 abc 3\n").unwrap();

        assert!(matches!(load_table(&path, &names(3)), Err(DataError::Parse { .. })));
    }

    #[test]
    fn test_csv_table() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("t.csv");
        std::fs::write(&path, "1.5, 2, 3\n4,5,6\n").unwrap();

        let table = load_table(&path, &names(3)).unwrap();
        assert_eq!(table.values, ndarray::array![[1.5, 2.0, 3.0], [4.0, 5.0, 6.0]]);
    }

    #[test]
    fn test_csv_column_mismatch_fails() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("t.csv");
        std::fs::write(&path, "1,2,3,4\n").unwrap();

        assert!(matches!(load_table(&path, &names(3)), Err(DataError::Parse { .. })));
    }

    #[test]
    fn test_empty_file_gives_zero_rows() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("t.data");
        std::fs::write(&path, "").unwrap();

        let table = load_table(&path, &names(4)).unwrap();
        assert_eq!(table.values.dim(), (0, 4));
        assert!(table.is_empty());
    }

    #[test]
    fn test_missing_file_fails() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("absent.data");
        assert!(matches!(load_table(&path, &names(2)), Err(DataError::Parse { .. })));
    }
}
