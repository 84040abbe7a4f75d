use std::path::PathBuf;

use anyhow::{Context, Result};
use arrow::util::pretty::pretty_format_batches;
use clap::Parser;
use ndarray::s;
use serde::Serialize;

use housing_loader::data::cache::record_batch;
use housing_loader::{HousingData, LoaderConfig, Partition};

/// Fetch the Boston housing table, split it, and report partition shapes.
///
/// Unset flags fall back to `HOUSING_*` environment variables, then to
/// built-in defaults.
#[derive(Debug, Parser)]
#[command(name = "housing-loader", version)]
struct Args {
    /// Base data directory
    #[arg(long)]
    data_dir: Option<PathBuf>,

    /// Serve partitions from the on-disk cache instead of computing them
    #[arg(long)]
    use_cache: bool,

    /// Fraction of rows reserved for validation, in [0, 1)
    #[arg(long)]
    val_split: Option<f64>,

    /// Seed for a reproducible split
    #[arg(long)]
    seed: Option<u64>,

    /// Partitions to load (default: train and val)
    #[arg(long = "partition", value_parser = parse_partition)]
    partitions: Vec<Partition>,

    /// Print the first N rows of each partition
    #[arg(long, default_value_t = 0)]
    head: usize,

    /// Emit the shape summary as JSON
    #[arg(long)]
    json: bool,
}

#[derive(Debug, Serialize)]
struct PartitionSummary {
    partition: Partition,
    rows: usize,
    feature_columns: usize,
    label_columns: usize,
}

fn parse_partition(s: &str) -> std::result::Result<Partition, String> {
    s.parse().map_err(|e: housing_loader::DataError| e.to_string())
}

fn main() -> Result<()> {
    env_logger::init();

    let args = Args::parse();

    let mut config = LoaderConfig::from_env();
    if let Some(dir) = args.data_dir {
        config.data_dir = dir;
    }
    if args.use_cache {
        config.use_cache = true;
    }
    if let Some(split) = args.val_split {
        config.val_split = split;
    }
    if args.seed.is_some() {
        config.seed = args.seed;
    }

    let data = HousingData::new(config).context("building dataset")?;

    let partitions = if args.partitions.is_empty() {
        Partition::ALL.to_vec()
    } else {
        args.partitions
    };

    let mut summaries = Vec::with_capacity(partitions.len());
    for partition in partitions {
        let (x, y) = data
            .dataset(partition.as_str())
            .with_context(|| format!("loading partition '{partition}'"))?;

        if args.head > 0 {
            let n = args.head.min(x.nrows());
            let batch = record_batch(
                x.slice(s![..n, ..]),
                y.slice(s![..n, ..]),
                data.column_names(),
            )
            .context("formatting rows")?;
            println!("{partition}:");
            println!("{}", pretty_format_batches(&[batch]).context("formatting rows")?);
        }

        summaries.push(PartitionSummary {
            partition,
            rows: x.nrows(),
            feature_columns: x.ncols(),
            label_columns: y.ncols(),
        });
    }

    if args.json {
        println!("{}", serde_json::to_string_pretty(&summaries)?);
    } else {
        for s in &summaries {
            println!(
                "{:<5}  features ({}, {})  labels ({}, {})",
                s.partition.as_str(),
                s.rows,
                s.feature_columns,
                s.rows,
                s.label_columns
            );
        }
    }

    Ok(())
}
