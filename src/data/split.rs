use log::debug;
use ndarray::{Array2, Axis};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

use crate::error::{DataError, Result};

/// Shuffle the rows of `table` and split them into `(train, val)`.
///
/// `ceil(val_split * rows)` rows go to validation, the rest to training.
/// With `val_split == 0` nothing is shuffled: `train` is the table in its
/// original order and `val` has zero rows but the same column count.
///
/// `seed` makes the permutation reproducible; `None` draws from the thread
/// RNG so every call may differ.
pub fn train_val_split(
    table: &Array2<f64>,
    val_split: f64,
    seed: Option<u64>,
) -> Result<(Array2<f64>, Array2<f64>)> {
    if !val_split.is_finite() || !(0.0..1.0).contains(&val_split) {
        return Err(DataError::InvalidSplit {
            val_split,
            reason: "must lie in [0, 1)".to_string(),
        });
    }

    if val_split == 0.0 {
        return Ok((table.clone(), Array2::zeros((0, table.ncols()))));
    }

    let total = table.nrows();
    let n_val = (val_split * total as f64).ceil() as usize;
    let n_val = n_val.min(total);
    let n_train = total - n_val;

    if total > 0 && n_train == 0 {
        return Err(DataError::InvalidSplit {
            val_split,
            reason: format!("leaves no training rows out of {total}"),
        });
    }

    let mut order: Vec<usize> = (0..total).collect();
    match seed {
        Some(s) => shuffle(&mut order, &mut StdRng::seed_from_u64(s)),
        None => shuffle(&mut order, &mut rand::thread_rng()),
    }

    let (val_idx, train_idx) = order.split_at(n_val);
    let train = table.select(Axis(0), train_idx);
    let val = table.select(Axis(0), val_idx);

    debug!(
        "Split {total} rows: {} train, {} val (val_split={val_split}, seed={seed:?})",
        train.nrows(),
        val.nrows()
    );

    Ok((train, val))
}

fn shuffle<R: Rng + ?Sized>(order: &mut [usize], rng: &mut R) {
    order.shuffle(rng);
}
