use rand::{seq::SliceRandom, Rng};

use crate::{DataError, Dataset, Result};

/// Shuffle the rows and split them into a train and a test dataset
///
/// # Arguments:
/// dataset: The rows to split
/// test_fraction: Share of rows going into the test set, rounded up
/// rng: The random source used for shuffling
///
/// # Returns:
/// (train, test)
pub fn train_test_split<R: Rng + ?Sized>(
    dataset: &Dataset,
    test_fraction: f64,
    rng: &mut R,
) -> Result<(Dataset, Dataset)> {
    if !(test_fraction > 0.0 && test_fraction < 1.0) {
        return Err(DataError::InvalidInput(format!(
            "test fraction must lie in (0, 1), got {}",
            test_fraction
        )));
    }
    let n = dataset.n_samples();
    let n_test = (n as f64 * test_fraction).ceil() as usize;
    if n_test >= n {
        return Err(DataError::InvalidInput(format!(
            "splitting {} samples with test fraction {} leaves no training rows",
            n, test_fraction
        )));
    }

    let mut rows: Vec<usize> = (0..n).collect();
    rows.shuffle(rng);
    let (test_rows, train_rows) = rows.split_at(n_test);
    debug!("split {} samples into {} train and {} test rows", n, train_rows.len(), n_test);

    Ok((dataset.select_rows(train_rows), dataset.select_rows(test_rows)))
}
