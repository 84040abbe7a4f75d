use std::fs::File;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use arrow::array::{Array, ArrayRef, Float64Array};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::error::ArrowError;
use arrow::record_batch::RecordBatch;
use log::{debug, info};
use ndarray::{Array2, ArrayView2};
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use parquet::arrow::ArrowWriter;
use parquet::file::properties::WriterProperties;

use super::model::Xy;
use crate::error::{DataError, Result};

const FEATURE_PREFIX: char = 'x';
const LABEL_PREFIX: char = 'y';

// ---------------------------------------------------------------------------
// PartitionCache – named (features, labels) pairs on disk
// ---------------------------------------------------------------------------

/// Persists `(features, labels)` pairs under a fixed directory, one Parquet
/// file per partition name.
///
/// Layout of `<dir>/<name>.parquet`: feature columns `x0..xk`, then label
/// columns `y0..`, all non-nullable Float64. Values round-trip bit for bit.
#[derive(Debug, Clone)]
pub struct PartitionCache {
    dir: PathBuf,
}

impl PartitionCache {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn entry_path(&self, name: &str) -> PathBuf {
        self.dir.join(format!("{name}.parquet"))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entry_path(name).is_file()
    }

    /// Write `features`/`labels` under `name`, replacing any earlier entry.
    pub fn save(&self, features: &Array2<f64>, labels: &Array2<f64>, name: &str) -> Result<()> {
        let path = self.entry_path(name);

        if features.nrows() != labels.nrows() {
            return Err(DataError::persistence(
                &path,
                format!(
                    "features have {} rows but labels have {}",
                    features.nrows(),
                    labels.nrows()
                ),
            ));
        }

        std::fs::create_dir_all(&self.dir).map_err(|e| DataError::persistence(&path, e))?;

        let names = generated_names(features.ncols(), labels.ncols());
        let batch = record_batch(features.view(), labels.view(), &names)
            .map_err(|e| DataError::persistence(&path, e))?;

        let file = File::create(&path).map_err(|e| DataError::persistence(&path, e))?;
        let props = WriterProperties::builder()
            .set_dictionary_enabled(false)
            .build();
        let mut writer = ArrowWriter::try_new(file, batch.schema(), Some(props))
            .map_err(|e| DataError::persistence(&path, e))?;
        writer
            .write(&batch)
            .map_err(|e| DataError::persistence(&path, e))?;
        writer
            .close()
            .map_err(|e| DataError::persistence(&path, e))?;

        info!(
            "Cached '{name}' ({} rows, {} + {} columns) at {}",
            features.nrows(),
            features.ncols(),
            labels.ncols(),
            path.display()
        );
        Ok(())
    }

    /// Read back the pair saved under `name`.
    pub fn load(&self, name: &str) -> Result<Xy> {
        let path = self.entry_path(name);
        if !path.is_file() {
            return Err(DataError::NotFound {
                partition: name.to_string(),
                path,
            });
        }

        let file = File::open(&path).map_err(|e| DataError::persistence(&path, e))?;
        let builder = ParquetRecordBatchReaderBuilder::try_new(file)
            .map_err(|e| DataError::persistence(&path, e))?;

        // Column layout comes from the schema so zero-row entries keep their shape.
        let schema = builder.schema().clone();
        let mut n_features = 0;
        let mut n_labels = 0;
        for field in schema.fields() {
            if field.name().starts_with(FEATURE_PREFIX) {
                if n_labels > 0 {
                    return Err(DataError::persistence(&path, "feature column after label column"));
                }
                n_features += 1;
            } else if field.name().starts_with(LABEL_PREFIX) {
                n_labels += 1;
            } else {
                return Err(DataError::persistence(
                    &path,
                    format!("unexpected column '{}'", field.name()),
                ));
            }
        }

        let reader = builder.build().map_err(|e| DataError::persistence(&path, e))?;

        let mut columns: Vec<Vec<f64>> = vec![Vec::new(); schema.fields().len()];
        for batch_result in reader {
            let batch = batch_result.map_err(|e| DataError::persistence(&path, e))?;
            for (col_idx, col) in batch.columns().iter().enumerate() {
                let values = col
                    .as_any()
                    .downcast_ref::<Float64Array>()
                    .ok_or_else(|| {
                        DataError::persistence(
                            &path,
                            format!("column {col_idx} is {:?}, expected Float64", col.data_type()),
                        )
                    })?;
                if values.null_count() > 0 {
                    return Err(DataError::persistence(&path, format!("column {col_idx} has nulls")));
                }
                columns[col_idx].extend_from_slice(values.values());
            }
        }

        let nrows = columns.first().map_or(0, Vec::len);
        let features = Array2::from_shape_fn((nrows, n_features), |(r, c)| columns[c][r]);
        let labels =
            Array2::from_shape_fn((nrows, n_labels), |(r, c)| columns[n_features + c][r]);

        debug!(
            "Loaded '{name}' from {}: features {:?}, labels {:?}",
            path.display(),
            features.dim(),
            labels.dim()
        );
        Ok((features, labels))
    }
}

// ---------------------------------------------------------------------------
// Arrow conversion
// ---------------------------------------------------------------------------

fn generated_names(n_features: usize, n_labels: usize) -> Vec<String> {
    (0..n_features)
        .map(|i| format!("{FEATURE_PREFIX}{i}"))
        .chain((0..n_labels).map(|i| format!("{LABEL_PREFIX}{i}")))
        .collect()
}

/// Lay `features` then `labels` out as Float64 columns named `names`.
pub fn record_batch(
    features: ArrayView2<'_, f64>,
    labels: ArrayView2<'_, f64>,
    names: &[String],
) -> std::result::Result<RecordBatch, ArrowError> {
    let total = features.ncols() + labels.ncols();
    if names.len() != total {
        return Err(ArrowError::InvalidArgumentError(format!(
            "{} column names for {total} columns",
            names.len()
        )));
    }

    let fields: Vec<Field> = names
        .iter()
        .map(|n| Field::new(n, DataType::Float64, false))
        .collect();

    let arrays: Vec<ArrayRef> = features
        .columns()
        .into_iter()
        .chain(labels.columns())
        .map(|col| Arc::new(Float64Array::from_iter_values(col.iter().copied())) as ArrayRef)
        .collect();

    RecordBatch::try_new(Arc::new(Schema::new(fields)), arrays)
}
