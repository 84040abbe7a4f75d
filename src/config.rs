//! Loader configuration: where data lives, which dataset to fetch, and how
//! to split it.

use std::path::PathBuf;

use log::warn;

use crate::error::{DataError, Result};

const BOSTON_HOUSING_URL: &str =
    "https://archive.ics.uci.edu/ml/machine-learning-databases/housing/housing.data";

const BOSTON_HOUSING_COLUMNS: [&str; 14] = [
    "CRIM", "ZN", "INDUS", "CHAS", "NOX", "RM", "AGE", "DIS", "RAD", "TAX", "PTRATIO", "B",
    "LSTAT", "MEDV",
];

// ---------------------------------------------------------------------------
// DatasetSource – what to download and how its columns are named
// ---------------------------------------------------------------------------

/// Remote location and schema of one tabular dataset.
#[derive(Debug, Clone, PartialEq)]
pub struct DatasetSource {
    /// Short name; also the name of the per-dataset cache directory.
    pub name: String,
    pub url: String,
    /// File name the download is stored under.
    pub file_name: String,
    /// Ordered column names. The last column is the label.
    pub column_names: Vec<String>,
}

impl DatasetSource {
    /// The UCI Boston housing table: 13 features, `MEDV` as the target.
    pub fn boston_housing() -> Self {
        Self {
            name: "boston_housing".to_string(),
            url: BOSTON_HOUSING_URL.to_string(),
            file_name: "housing.data".to_string(),
            column_names: BOSTON_HOUSING_COLUMNS.iter().map(|c| c.to_string()).collect(),
        }
    }
}

// ---------------------------------------------------------------------------
// LoaderConfig
// ---------------------------------------------------------------------------

/// Construction parameters for [`crate::data::loader::HousingData`].
#[derive(Debug, Clone)]
pub struct LoaderConfig {
    /// Base data directory. The per-dataset cache lives below it.
    pub data_dir: PathBuf,
    /// `true`: serve partitions from the on-disk cache only.
    /// `false`: compute partitions in memory and write them to the cache.
    pub use_cache: bool,
    /// Fraction of rows reserved for validation, in `[0, 1)`.
    pub val_split: f64,
    /// Shuffle seed; `None` draws a fresh split on every construction.
    pub seed: Option<u64>,
    pub source: DatasetSource,
}

impl Default for LoaderConfig {
    fn default() -> Self {
        let data_dir = dirs::data_dir()
            .map(|d| d.join("housing-loader"))
            .unwrap_or_else(|| PathBuf::from("data"));

        Self {
            data_dir,
            use_cache: false,
            val_split: 0.2,
            seed: None,
            source: DatasetSource::boston_housing(),
        }
    }
}

impl LoaderConfig {
    /// Defaults overlaid with `HOUSING_*` environment variables.
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(dir) = std::env::var("HOUSING_DATA_DIR") {
            config.data_dir = PathBuf::from(dir);
        }

        if let Ok(flag) = std::env::var("HOUSING_USE_CACHE") {
            match parse_flag(&flag) {
                Some(b) => config.use_cache = b,
                None => warn!("Ignoring HOUSING_USE_CACHE={flag:?}: not a boolean"),
            }
        }

        if let Ok(split) = std::env::var("HOUSING_VAL_SPLIT") {
            match split.parse() {
                Ok(v) => config.val_split = v,
                Err(_) => warn!("Ignoring HOUSING_VAL_SPLIT={split:?}: not a number"),
            }
        }

        if let Ok(seed) = std::env::var("HOUSING_SEED") {
            match seed.parse() {
                Ok(s) => config.seed = Some(s),
                Err(_) => warn!("Ignoring HOUSING_SEED={seed:?}: not an unsigned integer"),
            }
        }

        config
    }

    /// Directory holding both the raw download and the cached partitions.
    pub fn cache_dir(&self) -> PathBuf {
        self.data_dir
            .join("dataloader")
            .join("data")
            .join(&self.source.name)
    }

    /// Path the raw table is downloaded to.
    pub fn raw_path(&self) -> PathBuf {
        self.cache_dir().join(&self.source.file_name)
    }

    pub fn validate(&self) -> Result<()> {
        if !self.val_split.is_finite() || !(0.0..1.0).contains(&self.val_split) {
            return Err(DataError::InvalidSplit {
                val_split: self.val_split,
                reason: "must lie in [0, 1)".to_string(),
            });
        }
        if self.source.column_names.len() < 2 {
            return Err(DataError::parse(
                self.raw_path(),
                format!(
                    "need at least two columns (features + label), {} configured",
                    self.source.column_names.len()
                ),
            ));
        }
        Ok(())
    }
}

fn parse_flag(s: &str) -> Option<bool> {
    match s.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
