use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

use crate::data::csv::Dataset;
use crate::error::{NetError, Result};
use crate::math::matrix::Matrix;

/// Shuffles rows with a seeded RNG and splits off `test_fraction` of them
/// (rounded up, at least one row on each side). Returns `(train, test)`.
pub fn train_test_split(dataset: &Dataset, test_fraction: f64, seed: u64) -> Result<(Dataset, Dataset)> {
    if !(test_fraction > 0.0 && test_fraction < 1.0) {
        return Err(NetError::Configuration(format!(
            "test_fraction must be in (0, 1), got {test_fraction}"
        )));
    }
    let n = dataset.len();
    if n < 2 {
        return Err(NetError::Data(format!("need at least 2 rows to split, got {n}")));
    }
    if dataset.labels.rows != n {
        return Err(NetError::shape("labels", (n, 1), dataset.labels.shape()));
    }

    let mut indices: Vec<usize> = (0..n).collect();
    indices.shuffle(&mut StdRng::seed_from_u64(seed));

    let n_test = ((n as f64 * test_fraction).ceil() as usize).clamp(1, n - 1);
    let (test_idx, train_idx) = indices.split_at(n_test);

    Ok((select(dataset, train_idx), select(dataset, test_idx)))
}

fn select(dataset: &Dataset, indices: &[usize]) -> Dataset {
    let pick = |m: &Matrix| Matrix {
        rows: indices.len(),
        cols: m.cols,
        data: indices.iter().map(|&i| m.data[i].clone()).collect(),
    };
    Dataset {
        inputs: pick(&dataset.inputs),
        labels: pick(&dataset.labels),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dataset(n: usize) -> Dataset {
        Dataset {
            inputs: Matrix::from_rows((0..n).map(|i| vec![i as f64]).collect()).unwrap(),
            labels: Matrix::column(&(0..n).map(|i| (i % 2) as f64).collect::<Vec<_>>()),
        }
    }

    #[test]
    fn split_partitions_every_row_once() {
        let ds = dataset(10);
        let (train, test) = train_test_split(&ds, 0.2, 42).unwrap();
        assert_eq!(train.len(), 8);
        assert_eq!(test.len(), 2);

        let mut seen: Vec<f64> = train.inputs.data.iter().chain(test.inputs.data.iter()).map(|r| r[0]).collect();
        seen.sort_by(|a, b| a.partial_cmp(b).unwrap());
        assert_eq!(seen, (0..10).map(|i| i as f64).collect::<Vec<_>>());

        for (x, y) in train.inputs.data.iter().zip(train.labels.data.iter()) {
            assert_eq!((x[0] as usize % 2) as f64, y[0]);
        }
    }

    #[test]
    fn split_is_reproducible_per_seed() {
        let ds = dataset(20);
        let (a, _) = train_test_split(&ds, 0.25, 7).unwrap();
        let (b, _) = train_test_split(&ds, 0.25, 7).unwrap();
        assert_eq!(a.inputs, b.inputs);
    }

    #[test]
    fn split_rejects_bad_fraction() {
        let ds = dataset(4);
        assert!(train_test_split(&ds, 0.0, 1).is_err());
        assert!(train_test_split(&ds, 1.0, 1).is_err());
    }
}
