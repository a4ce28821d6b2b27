use rand::Rng;
use serde::{Serialize, Deserialize};
use std::f64::consts::PI;
use std::ops::{Mul, Sub};

use crate::error::{NetError, Result};

/// Dense row-major matrix of `f64`.
///
/// A batch is stored one example per row, so a forward pass is always
/// `batch (B × in) · weights (in × out)`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Matrix {
    pub rows: usize,
    pub cols: usize,
    pub data: Vec<Vec<f64>>,
}

impl Matrix {
    pub fn zeros(rows: usize, cols: usize) -> Matrix {
        Matrix {
            rows,
            cols,
            data: vec![vec![0.0; cols]; rows],
        }
    }

    /// Samples every entry from N(0, 1) and multiplies it by `scale`.
    pub fn random_normal<R: Rng + ?Sized>(rows: usize, cols: usize, scale: f64, rng: &mut R) -> Matrix {
        let mut res = Matrix::zeros(rows, cols);
        for row in res.data.iter_mut() {
            for value in row.iter_mut() {
                *value = sample_standard_normal(rng) * scale;
            }
        }
        res
    }

    /// Builds a matrix from rows, rejecting empty and ragged input.
    pub fn from_rows(data: Vec<Vec<f64>>) -> Result<Matrix> {
        let cols = match data.first() {
            Some(first) if !first.is_empty() => first.len(),
            _ => return Err(NetError::EmptyBatch),
        };
        if let Some((i, row)) = data.iter().enumerate().find(|(_, row)| row.len() != cols) {
            return Err(NetError::Data(format!(
                "row {} has {} columns, expected {}",
                i,
                row.len(),
                cols
            )));
        }
        Ok(Matrix { rows: data.len(), cols, data })
    }

    /// A single-column matrix, one value per row (the shape labels use).
    pub fn column(values: &[f64]) -> Matrix {
        Matrix {
            rows: values.len(),
            cols: 1,
            data: values.iter().map(|&v| vec![v]).collect(),
        }
    }

    pub fn shape(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }

    /// Checks that `data` really holds `rows × cols` values. Matrices built
    /// here always do; deserialized ones may not.
    pub fn check_consistent(&self, context: &'static str) -> Result<()> {
        if self.data.len() != self.rows {
            return Err(NetError::shape(context, self.shape(), (self.data.len(), self.cols)));
        }
        if let Some(row) = self.data.iter().find(|row| row.len() != self.cols) {
            return Err(NetError::shape(context, self.shape(), (self.rows, row.len())));
        }
        Ok(())
    }

    pub fn transpose(&self) -> Matrix {
        let mut res = Matrix::zeros(self.cols, self.rows);

        for i in 0..res.rows {
            for j in 0..res.cols {
                res.data[i][j] = self.data[j][i];
            }
        }

        res
    }

    pub fn map<F>(&self, functor: F) -> Matrix
    where
        F: Fn(f64) -> f64,
    {
        Matrix {
            rows: self.rows,
            cols: self.cols,
            data: self
                .data
                .iter()
                .map(|row| row.iter().map(|&x| functor(x)).collect())
                .collect(),
        }
    }

    /// Adds a `1 × cols` row vector to every row.
    pub fn add_row(&self, row: &Matrix) -> Matrix {
        assert_eq!(row.rows, 1, "broadcast operand must be a single row");
        assert_eq!(row.cols, self.cols, "Matrices are of incorrect sizes");
        let bias = &row.data[0];
        Matrix {
            rows: self.rows,
            cols: self.cols,
            data: self
                .data
                .iter()
                .map(|r| r.iter().zip(bias.iter()).map(|(x, b)| x + b).collect())
                .collect(),
        }
    }

    /// Element-wise (Hadamard) product of two same-shape matrices.
    pub fn hadamard(&self, other: &Matrix) -> Matrix {
        assert_eq!(self.shape(), other.shape(), "Matrices are of incorrect sizes");
        Matrix {
            rows: self.rows,
            cols: self.cols,
            data: self
                .data
                .iter()
                .zip(other.data.iter())
                .map(|(a, b)| a.iter().zip(b.iter()).map(|(x, y)| x * y).collect())
                .collect(),
        }
    }

    /// Sums over rows, giving a `1 × cols` matrix.
    pub fn sum_columns(&self) -> Matrix {
        let mut res = Matrix::zeros(1, self.cols);
        for row in &self.data {
            for (acc, x) in res.data[0].iter_mut().zip(row.iter()) {
                *acc += x;
            }
        }
        res
    }

    /// In place: `self -= factor * delta`.
    pub fn sub_scaled_assign(&mut self, delta: &Matrix, factor: f64) {
        assert_eq!(self.shape(), delta.shape(), "Matrices are of incorrect sizes");
        for (row, drow) in self.data.iter_mut().zip(delta.data.iter()) {
            for (x, d) in row.iter_mut().zip(drow.iter()) {
                *x -= factor * d;
            }
        }
    }
}

/// Samples a single value from N(0, 1) using the Box-Muller transform.
fn sample_standard_normal<R: Rng + ?Sized>(rng: &mut R) -> f64 {
    // Uniform on (0, 1] so ln() never sees zero.
    let u1: f64 = 1.0 - rng.gen::<f64>();
    let u2: f64 = 1.0 - rng.gen::<f64>();
    (-2.0 * u1.ln()).sqrt() * (2.0 * PI * u2).cos()
}

impl Sub for &Matrix {
    type Output = Matrix;

    fn sub(self, rhs: Self) -> Self::Output {
        if self.rows != rhs.rows || self.cols != rhs.cols {
            panic!("Matrices are of incorrect sizes")
        }

        let mut res = Matrix::zeros(self.rows, self.cols);

        for i in 0..self.rows {
            for j in 0..self.cols {
                res.data[i][j] = self.data[i][j] - rhs.data[i][j];
            }
        }

        res
    }
}

impl Mul for &Matrix {
    type Output = Matrix;

    fn mul(self, rhs: Self) -> Self::Output {
        if self.cols != rhs.rows {
            panic!("Matrices are of incorrect sizes")
        }

        let mut res = Matrix::zeros(self.rows, rhs.cols);

        for i in 0..res.rows {
            for k in 0..self.cols {
                let lhs = self.data[i][k];
                for j in 0..res.cols {
                    res.data[i][j] += lhs * rhs.data[k][j];
                }
            }
        }

        res
    }
}
