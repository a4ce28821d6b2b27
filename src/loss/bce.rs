use crate::error::{NetError, Result};
use crate::math::matrix::Matrix;

pub struct BceLoss;

/// Added inside each log() so a saturated prediction never hits log(0).
pub const EPS: f64 = 1e-8;

impl BceLoss {
    /// Scalar BCE over every element: -mean(y·log(p+ε) + (1-y)·log(1-p+ε))
    pub fn loss(predicted: &Matrix, expected: &Matrix) -> Result<f64> {
        check_shapes(predicted, expected)?;
        let n = (predicted.rows * predicted.cols) as f64;
        let total: f64 = predicted.data.iter().flatten()
            .zip(expected.data.iter().flatten())
            .map(|(p, y)| -(y * (p + EPS).ln() + (1.0 - y) * (1.0 - p + EPS).ln()))
            .sum();
        Ok(total / n)
    }

    /// Gradient w.r.t. the output pre-activation when the output layer is a
    /// sigmoid: the sigmoid derivative cancels and leaves `p - y`.
    pub fn output_delta(predicted: &Matrix, expected: &Matrix) -> Result<Matrix> {
        check_shapes(predicted, expected)?;
        Ok(predicted - expected)
    }
}

fn check_shapes(predicted: &Matrix, expected: &Matrix) -> Result<()> {
    if predicted.shape() != expected.shape() {
        return Err(NetError::shape("labels", predicted.shape(), expected.shape()));
    }
    if predicted.rows == 0 {
        return Err(NetError::EmptyBatch);
    }
    Ok(())
}
