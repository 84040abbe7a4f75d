use std::fmt;
use std::str::FromStr;

use ndarray::{s, Array2, ArrayView2};
use serde::Serialize;

use crate::error::DataError;

/// `(features, labels)`: all-but-last columns, and the last column kept as
/// an `n × 1` matrix.
pub type Xy = (Array2<f64>, Array2<f64>);

// ---------------------------------------------------------------------------
// Partition – a named subset of rows
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Partition {
    Train,
    Val,
}

impl Partition {
    pub const ALL: [Partition; 2] = [Partition::Train, Partition::Val];

    pub fn as_str(&self) -> &'static str {
        match self {
            Partition::Train => "train",
            Partition::Val => "val",
        }
    }
}

impl fmt::Display for Partition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Partition {
    type Err = DataError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "train" => Ok(Partition::Train),
            "val" => Ok(Partition::Val),
            other => Err(DataError::InvalidPartition(other.to_string())),
        }
    }
}

// ---------------------------------------------------------------------------
// RawTable – the full parsed dataset
// ---------------------------------------------------------------------------

/// The parsed table before any split: one row per record, columns in
/// configured order.
#[derive(Debug, Clone, PartialEq)]
pub struct RawTable {
    pub column_names: Vec<String>,
    pub values: Array2<f64>,
}

impl RawTable {
    pub fn nrows(&self) -> usize {
        self.values.nrows()
    }

    pub fn ncols(&self) -> usize {
        self.values.ncols()
    }

    pub fn is_empty(&self) -> bool {
        self.values.nrows() == 0
    }

    /// Names of the feature columns (everything but the label).
    pub fn feature_names(&self) -> &[String] {
        let n = self.column_names.len().saturating_sub(1);
        &self.column_names[..n]
    }

    pub fn label_name(&self) -> Option<&str> {
        self.column_names.last().map(String::as_str)
    }
}

/// Split rows into features (all columns but the last) and labels (the last
/// column, still two-dimensional).
pub fn features_labels(rows: ArrayView2<'_, f64>) -> Xy {
    let ncols = rows.ncols();
    let split = ncols.saturating_sub(1);
    let features = rows.slice(s![.., ..split]).to_owned();
    let labels = rows.slice(s![.., split..]).to_owned();
    (features, labels)
}
