//! Write a synthetic housing table in the same whitespace layout as the UCI
//! file. Point `--output` at `<data_dir>/dataloader/data/boston_housing/housing.data`
//! to run the loader offline.

use std::fmt::Write as _;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use log::info;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

#[derive(Debug, Parser)]
#[command(name = "generate_sample")]
struct Args {
    /// Number of rows to generate
    #[arg(long, default_value_t = 506)]
    rows: usize,

    #[arg(long, default_value_t = 42)]
    seed: u64,

    #[arg(long, default_value = "housing.data")]
    output: PathBuf,
}

/// Value ranges for the 13 feature columns, in CRIM..LSTAT order.
const FEATURE_RANGES: [(f64, f64); 13] = [
    (0.006, 89.0),  // CRIM
    (0.0, 100.0),   // ZN
    (0.46, 27.74),  // INDUS
    (0.0, 1.0),     // CHAS
    (0.385, 0.871), // NOX
    (3.56, 8.78),   // RM
    (2.9, 100.0),   // AGE
    (1.13, 12.13),  // DIS
    (1.0, 24.0),    // RAD
    (187.0, 711.0), // TAX
    (12.6, 22.0),   // PTRATIO
    (0.32, 396.9),  // B
    (1.73, 37.97),  // LSTAT
];

fn generate_row(rng: &mut StdRng) -> [f64; 14] {
    let mut row = [0.0; 14];
    for (slot, &(lo, hi)) in row.iter_mut().zip(FEATURE_RANGES.iter()) {
        *slot = rng.gen_range(lo..=hi);
    }
    // CHAS and RAD are categorical in the real data.
    row[3] = row[3].round();
    row[8] = row[8].round();

    // Price rises with rooms, falls with lower-status share; plus noise.
    let medv = 9.0 * (row[5] - 6.0) - 0.6 * (row[12] - 12.0) + 22.0 + rng.gen_range(-3.0_f64..3.0);
    row[13] = medv.clamp(5.0, 50.0);
    row
}

fn main() -> Result<()> {
    env_logger::init();

    let args = Args::parse();
    info!("Generating {} rows with seed {}", args.rows, args.seed);
    let mut rng = StdRng::seed_from_u64(args.seed);

    let mut text = String::new();
    for _ in 0..args.rows {
        let row = generate_row(&mut rng);
        for v in row {
            write!(text, " {v:>10.5}")?;
        }
        text.push('\n');
    }

    if let Some(parent) = args.output.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("creating {}", parent.display()))?;
    }
    std::fs::write(&args.output, text)
        .with_context(|| format!("writing {}", args.output.display()))?;

    println!("Wrote {} rows (14 columns) to {}", args.rows, args.output.display());
    Ok(())
}
