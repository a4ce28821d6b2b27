use rand::Rng;
use serde::{Serialize, Deserialize};

use crate::activation::sigmoid;
use crate::math::matrix::Matrix;

/// One fully-connected sigmoid layer.
///
/// `weights` is `(input_size × size)`, `biases` is `(1 × size)`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DenseLayer {
    pub weights: Matrix,
    pub biases: Matrix,
}

impl DenseLayer {
    /// Normal weights times `scale`, zero biases.
    pub fn new<R: Rng + ?Sized>(input_size: usize, size: usize, scale: f64, rng: &mut R) -> DenseLayer {
        DenseLayer {
            weights: Matrix::random_normal(input_size, size, scale, rng),
            biases: Matrix::zeros(1, size),
        }
    }

    pub fn input_size(&self) -> usize {
        self.weights.rows
    }

    pub fn size(&self) -> usize {
        self.weights.cols
    }

    /// Returns `(z, a)` for a batch: `z = a_prev · W + b`, `a = sigmoid(z)`.
    pub fn feed_from(&self, a_prev: &Matrix) -> (Matrix, Matrix) {
        let z = (a_prev * &self.weights).add_row(&self.biases);
        let a = sigmoid::activate(&z);
        (z, a)
    }

    /// Batch-averaged gradients for this layer given its input activation and
    /// the error `dz` at its pre-activation. Returns `(weights_grad, biases_grad)`.
    pub fn compute_gradients(&self, a_prev: &Matrix, dz: &Matrix) -> (Matrix, Matrix) {
        let inv_batch = 1.0 / dz.rows as f64;
        let weights_grad = (&a_prev.transpose() * dz).map(|x| x * inv_batch);
        let biases_grad = dz.sum_columns().map(|x| x * inv_batch);
        (weights_grad, biases_grad)
    }

    /// Error at the previous layer's pre-activation:
    /// `(dz · Wᵀ) ⊙ a_prev ⊙ (1 - a_prev)`. Uses the current weights, so it
    /// must run before `apply_gradients`.
    pub fn propagate_error(&self, dz: &Matrix, a_prev: &Matrix) -> Matrix {
        (dz * &self.weights.transpose()).hadamard(&sigmoid::derivative_from_activation(a_prev))
    }

    /// Applies pre-computed gradients scaled by lr.
    pub fn apply_gradients(&mut self, weights_grad: &Matrix, biases_grad: &Matrix, lr: f64) {
        self.weights.sub_scaled_assign(weights_grad, lr);
        self.biases.sub_scaled_assign(biases_grad, lr);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn layer() -> DenseLayer {
        DenseLayer {
            weights: Matrix::from_rows(vec![vec![1.0, -1.0], vec![0.5, 2.0]]).unwrap(),
            biases: Matrix::from_rows(vec![vec![0.0, 1.0]]).unwrap(),
        }
    }

    #[test]
    fn feed_from_caches_pre_activation() {
        let input = Matrix::from_rows(vec![vec![2.0, 0.0]]).unwrap();
        let (z, a) = layer().feed_from(&input);
        assert_eq!(z.data, vec![vec![2.0, -1.0]]);
        assert_eq!(a.data[0][0], sigmoid::sigmoid(2.0));
    }

    #[test]
    fn gradients_average_over_batch() {
        let a_prev = Matrix::from_rows(vec![vec![1.0, 0.0], vec![0.0, 1.0]]).unwrap();
        let dz = Matrix::from_rows(vec![vec![2.0, 4.0], vec![6.0, 8.0]]).unwrap();
        let (dw, db) = layer().compute_gradients(&a_prev, &dz);
        assert_eq!(dw.data, vec![vec![1.0, 2.0], vec![3.0, 4.0]]);
        assert_eq!(db.data, vec![vec![4.0, 6.0]]);
    }
}
