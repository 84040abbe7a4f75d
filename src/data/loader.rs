use std::collections::BTreeMap;

use log::info;
use ndarray::Array2;

use super::cache::PartitionCache;
use super::fetch::{ensure_local, HttpTransport, Transport};
use super::model::{features_labels, Partition, RawTable, Xy};
use super::parser::load_table;
use super::split::train_val_split;
use crate::config::LoaderConfig;
use crate::error::Result;

// ---------------------------------------------------------------------------
// HousingData – fetch, parse, split, serve
// ---------------------------------------------------------------------------

/// Loads one tabular dataset and serves its `train` / `val` partitions.
///
/// Construction always downloads (if needed), parses and splits; only the
/// per-partition arrays are cached. `use_cache` then picks one of two modes
/// for [`HousingData::dataset`]:
///
/// * `false` – slice the in-memory partition and write it to the cache.
/// * `true`  – read the cache only; an unpopulated cache is an error.
#[derive(Debug)]
pub struct HousingData {
    config: LoaderConfig,
    cache: PartitionCache,
    table: RawTable,
    partitions: BTreeMap<Partition, Array2<f64>>,
}

impl HousingData {
    /// Build a loader that downloads over HTTP(S).
    pub fn new(config: LoaderConfig) -> Result<Self> {
        Self::with_transport(config, &HttpTransport::new())
    }

    /// Build a loader that retrieves the raw file through `transport`.
    pub fn with_transport(config: LoaderConfig, transport: &dyn Transport) -> Result<Self> {
        config.validate()?;

        let cache_dir = config.cache_dir();
        let source = &config.source;

        let raw_path = ensure_local(transport, &cache_dir, &source.file_name, &source.url)?;
        let table = load_table(&raw_path, &source.column_names)?;
        info!(
            "Loaded {} ({} rows × {} columns)",
            source.name,
            table.nrows(),
            table.ncols()
        );

        let (train, val) = train_val_split(&table.values, config.val_split, config.seed)?;
        info!(
            "Partitions: train={} val={} (val_split={})",
            train.nrows(),
            val.nrows(),
            config.val_split
        );

        let partitions = BTreeMap::from([(Partition::Train, train), (Partition::Val, val)]);

        Ok(Self {
            cache: PartitionCache::new(cache_dir),
            config,
            table,
            partitions,
        })
    }

    /// `(features, labels)` for `partition_name` (`"train"` or `"val"`).
    ///
    /// In cache mode this only reads the cache. Otherwise the in-memory
    /// partition is sliced, written to the cache, and returned.
    pub fn dataset(&self, partition_name: &str) -> Result<Xy> {
        let partition: Partition = partition_name.parse()?;

        if self.config.use_cache {
            return self.cache.load(partition.as_str());
        }

        self.compute_and_cache(partition)
    }

    /// Read-through variant of [`HousingData::dataset`]: serve the cached
    /// entry when there is one, otherwise compute it, cache it and return
    /// it. Ignores `use_cache`.
    pub fn dataset_or_compute(&self, partition_name: &str) -> Result<Xy> {
        let partition: Partition = partition_name.parse()?;

        if self.cache.contains(partition.as_str()) {
            return self.cache.load(partition.as_str());
        }

        self.compute_and_cache(partition)
    }

    fn compute_and_cache(&self, partition: Partition) -> Result<Xy> {
        let (features, labels) = features_labels(self.partition_rows(partition).view());
        self.cache.save(&features, &labels, partition.as_str())?;
        Ok((features, labels))
    }

    /// Rows of `partition`, label column included.
    pub fn partition_rows(&self, partition: Partition) -> &Array2<f64> {
        &self.partitions[&partition]
    }

    pub fn table(&self) -> &RawTable {
        &self.table
    }

    pub fn column_names(&self) -> &[String] {
        &self.table.column_names
    }

    pub fn config(&self) -> &LoaderConfig {
        &self.config
    }

    pub fn cache(&self) -> &PartitionCache {
        &self.cache
    }
}
