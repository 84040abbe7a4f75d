use std::cell::Cell;
use std::collections::BTreeSet;
use std::fmt::Write as _;

use housing_loader::{DataError, HousingData, LoaderConfig, Result, Transport};
use reqwest::Url;
use tempfile::{tempdir, TempDir};

/// Serves a generated 14-column table and counts requests.
struct TableServer {
    body: Vec<u8>,
    requests: Cell<usize>,
}

impl TableServer {
    /// Row `i` is `[i, i+0.5, …]` with label `1000 + i`, so rows are traceable.
    fn with_rows(n: usize) -> Self {
        let mut text = String::new();
        for i in 0..n {
            for c in 0..13 {
                write!(text, " {:.3}", i as f64 + c as f64 * 0.5).unwrap();
            }
            writeln!(text, "  {}", 1000 + i).unwrap();
        }
        Self {
            body: text.into_bytes(),
            requests: Cell::new(0),
        }
    }
}

impl Transport for TableServer {
    fn get(&self, _url: &Url) -> Result<Vec<u8>> {
        self.requests.set(self.requests.get() + 1);
        Ok(self.body.clone())
    }
}

fn config(dir: &TempDir, use_cache: bool, val_split: f64, seed: Option<u64>) -> LoaderConfig {
    LoaderConfig {
        data_dir: dir.path().to_path_buf(),
        use_cache,
        val_split,
        seed,
        ..LoaderConfig::default()
    }
}

fn label_ids(labels: &ndarray::Array2<f64>) -> Vec<usize> {
    labels.column(0).iter().map(|v| (*v - 1000.0) as usize).collect()
}

#[test]
fn test_default_split_on_500_rows() {
    let dir = tempdir().unwrap();
    let server = TableServer::with_rows(500);
    let data = HousingData::with_transport(config(&dir, false, 0.2, None), &server).unwrap();

    let (tx, ty) = data.dataset("train").unwrap();
    let (vx, vy) = data.dataset("val").unwrap();

    assert_eq!(tx.dim(), (400, 13));
    assert_eq!(ty.dim(), (400, 1));
    assert_eq!(vx.dim(), (100, 13));
    assert_eq!(vy.dim(), (100, 1));
    assert_eq!(tx.nrows() + vx.nrows(), 500);

    let mut seen: Vec<usize> = label_ids(&ty);
    seen.extend(label_ids(&vy));
    let unique: BTreeSet<usize> = seen.iter().copied().collect();
    assert_eq!(seen.len(), 500);
    assert_eq!(unique, (0..500).collect::<BTreeSet<_>>());

    // Features stay attached to their label.
    for (row, id) in tx.rows().into_iter().zip(label_ids(&ty)) {
        assert_eq!(row[0], id as f64);
    }
}

#[test]
fn test_zero_split_train_is_full_table() {
    let dir = tempdir().unwrap();
    let server = TableServer::with_rows(50);
    let data = HousingData::with_transport(config(&dir, false, 0.0, None), &server).unwrap();

    let (tx, ty) = data.dataset("train").unwrap();
    assert_eq!(tx.dim(), (50, 13));
    assert_eq!(label_ids(&ty), (0..50).collect::<Vec<_>>());
    assert_eq!(data.table().values.column(13).to_vec(), ty.column(0).to_vec());

    let (vx, vy) = data.dataset("val").unwrap();
    assert_eq!(vx.dim(), (0, 13));
    assert_eq!(vy.dim(), (0, 1));
}

#[test]
fn test_raw_file_downloaded_once_across_loaders() {
    let dir = tempdir().unwrap();
    let server = TableServer::with_rows(20);

    HousingData::with_transport(config(&dir, false, 0.2, Some(1)), &server).unwrap();
    HousingData::with_transport(config(&dir, true, 0.2, Some(2)), &server).unwrap();

    assert_eq!(server.requests.get(), 1);
    assert!(config(&dir, false, 0.2, None).raw_path().is_file());
}

#[test]
fn test_cache_mode_before_any_run_is_not_found() {
    let dir = tempdir().unwrap();
    let server = TableServer::with_rows(30);
    let data = HousingData::with_transport(config(&dir, true, 0.2, None), &server).unwrap();

    let err = data.dataset("train").unwrap_err();
    assert!(matches!(err, DataError::NotFound { .. }), "got {err}");
}

#[test]
fn test_cache_mode_serves_earlier_split() {
    let dir = tempdir().unwrap();
    let server = TableServer::with_rows(100);

    let writer = HousingData::with_transport(config(&dir, false, 0.3, None), &server).unwrap();
    let train = writer.dataset("train").unwrap();
    let val = writer.dataset("val").unwrap();

    // A fresh unseeded split would almost surely differ; the cache must not.
    let reader = HousingData::with_transport(config(&dir, true, 0.3, None), &server).unwrap();
    assert_eq!(reader.dataset("train").unwrap(), train);
    assert_eq!(reader.dataset("val").unwrap(), val);
}

#[test]
fn test_seeded_loaders_agree() {
    let a_dir = tempdir().unwrap();
    let b_dir = tempdir().unwrap();
    let server = TableServer::with_rows(80);

    let a = HousingData::with_transport(config(&a_dir, false, 0.25, Some(5)), &server).unwrap();
    let b = HousingData::with_transport(config(&b_dir, false, 0.25, Some(5)), &server).unwrap();
    assert_eq!(a.dataset("val").unwrap(), b.dataset("val").unwrap());
}

#[test]
fn test_unknown_partition_on_any_instance() {
    let dir = tempdir().unwrap();
    let server = TableServer::with_rows(10);

    for use_cache in [false, true] {
        let data =
            HousingData::with_transport(config(&dir, use_cache, 0.2, None), &server).unwrap();
        assert!(matches!(
            data.dataset("test"),
            Err(DataError::InvalidPartition(_))
        ));
    }
}

#[test]
fn test_wrong_column_count_fails() {
    let dir = tempdir().unwrap();
    let mut cfg = config(&dir, false, 0.2, None);
    cfg.source.column_names.pop();

    let err = HousingData::with_transport(cfg, &TableServer::with_rows(10)).unwrap_err();
    assert!(matches!(err, DataError::Parse { .. }));
}
