use crate::error::{NetError, Result};
use crate::math::matrix::Matrix;

/// Maps probabilities to 0/1: strictly greater than `threshold` is 1.
pub fn threshold(probabilities: &Matrix, threshold: f64) -> Matrix {
    probabilities.map(|p| if p > threshold { 1.0 } else { 0.0 })
}

/// Fraction of rows where every column of `predicted` equals `labels`.
pub fn accuracy(predicted: &Matrix, labels: &Matrix) -> Result<f64> {
    if predicted.shape() != labels.shape() {
        return Err(NetError::shape("labels", predicted.shape(), labels.shape()));
    }
    if predicted.rows == 0 {
        return Err(NetError::EmptyBatch);
    }
    let correct = predicted
        .data
        .iter()
        .zip(labels.data.iter())
        .filter(|(p, y)| p == y)
        .count();
    Ok(correct as f64 / predicted.rows as f64)
}
