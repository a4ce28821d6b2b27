//! Small built-in datasets for demos and tests.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::data::csv::Dataset;
use crate::math::matrix::Matrix;

/// Truth table of logical AND: 4 rows, 2 inputs, label 1 only for `[1, 1]`.
pub fn logical_and() -> Dataset {
    Dataset {
        inputs: Matrix {
            rows: 4,
            cols: 2,
            data: vec![
                vec![0.0, 0.0],
                vec![0.0, 1.0],
                vec![1.0, 0.0],
                vec![1.0, 1.0],
            ],
        },
        labels: Matrix::column(&[0.0, 0.0, 0.0, 1.0]),
    }
}

/// `n` points in two linearly separable 2D blobs.
/// Class 0 is centred at (-1, -1), class 1 at (1, 1), with uniform jitter of
/// ±0.5 on each axis, so the classes never overlap.
pub fn blobs(n: usize, seed: u64) -> Dataset {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut inputs = Vec::with_capacity(n);
    let mut labels = Vec::with_capacity(n);
    for i in 0..n {
        let class = (i % 2) as f64;
        let centre = if class == 0.0 { -1.0 } else { 1.0 };
        inputs.push(vec![
            centre + rng.gen_range(-0.5..0.5),
            centre + rng.gen_range(-0.5..0.5),
        ]);
        labels.push(class);
    }
    Dataset {
        inputs: Matrix { rows: n, cols: 2, data: inputs },
        labels: Matrix::column(&labels),
    }
}
