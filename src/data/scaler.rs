use serde::{Serialize, Deserialize};

use crate::error::{NetError, Result};
use crate::math::matrix::Matrix;

/// Per-column standardization to zero mean and unit variance.
///
/// Sigmoid layers saturate quickly on unscaled features, so training data is
/// normally passed through this first. The fitted statistics are kept so the
/// same transform can be applied to test or inference data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StandardScaler {
    pub means: Vec<f64>,
    pub std_devs: Vec<f64>,
}

impl StandardScaler {
    /// Computes column means and population standard deviations.
    /// A constant column gets a deviation of 1 so it maps to zeros.
    pub fn fit(data: &Matrix) -> Result<StandardScaler> {
        if data.rows == 0 {
            return Err(NetError::EmptyBatch);
        }
        let n = data.rows as f64;
        let means: Vec<f64> = data.sum_columns().data[0].iter().map(|s| s / n).collect();

        let mut variances = vec![0.0; data.cols];
        for row in &data.data {
            for ((var, x), mean) in variances.iter_mut().zip(row.iter()).zip(means.iter()) {
                *var += (x - mean).powi(2);
            }
        }
        let std_devs = variances
            .into_iter()
            .map(|v| {
                let sd = (v / n).sqrt();
                if sd > 0.0 { sd } else { 1.0 }
            })
            .collect();

        Ok(StandardScaler { means, std_devs })
    }

    pub fn transform(&self, data: &Matrix) -> Result<Matrix> {
        if data.cols != self.means.len() {
            return Err(NetError::shape("scaler input", (data.rows, self.means.len()), data.shape()));
        }
        let mut res = data.clone();
        for row in res.data.iter_mut() {
            for ((x, mean), sd) in row.iter_mut().zip(self.means.iter()).zip(self.std_devs.iter()) {
                *x = (*x - mean) / sd;
            }
        }
        Ok(res)
    }

    pub fn fit_transform(data: &Matrix) -> Result<(StandardScaler, Matrix)> {
        let scaler = StandardScaler::fit(data)?;
        let scaled = scaler.transform(data)?;
        Ok((scaler, scaled))
    }
}
