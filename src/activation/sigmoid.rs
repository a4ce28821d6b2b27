use std::f64::consts::E;

use crate::math::matrix::Matrix;

/// Inputs are clipped to `[-CLIP, CLIP]` before exponentiation so `e^-x`
/// never overflows.
pub const CLIP: f64 = 500.0;

/// Largest `f64` strictly below 1.0. For `x` near the clip bound
/// `1 + e^-x` rounds to exactly 1, so the output is capped here to keep it
/// inside the open interval (0, 1).
const BELOW_ONE: f64 = 1.0 - f64::EPSILON / 2.0;

/// `1 / (1 + e^-x)` with the input clipped to `[-500, 500]`.
pub fn sigmoid(x: f64) -> f64 {
    let x = x.clamp(-CLIP, CLIP);
    let y = 1.0 / (1.0 + E.powf(-x));
    // NaN falls through untouched.
    if y >= 1.0 { BELOW_ONE } else { y }
}

/// Derivative of the sigmoid written in terms of its output `a = sigmoid(z)`.
pub fn sigmoid_derivative(a: f64) -> f64 {
    a * (1.0 - a)
}

/// Applies `sigmoid` element-wise.
pub fn activate(z: &Matrix) -> Matrix {
    z.map(sigmoid)
}

/// `a ⊙ (1 - a)` for a whole activation matrix.
pub fn derivative_from_activation(a: &Matrix) -> Matrix {
    a.map(sigmoid_derivative)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sigmoid_at_zero_is_exactly_half() {
        assert_eq!(sigmoid(0.0), 0.5);
    }

    #[test]
    fn sigmoid_stays_strictly_inside_unit_interval() {
        for &x in &[-1000.0, -500.0, -40.0, -1.0, 1.0, 40.0, 500.0, 1000.0, f64::MAX, f64::MIN] {
            let y = sigmoid(x);
            assert!(y > 0.0 && y < 1.0, "sigmoid({x}) = {y}");
        }
    }

    #[test]
    fn sigmoid_is_symmetric_and_monotonic() {
        assert!((sigmoid(2.0) + sigmoid(-2.0) - 1.0).abs() < 1e-15);
        assert!(sigmoid(-1.0) < sigmoid(0.0) && sigmoid(0.0) < sigmoid(1.0));
    }

    #[test]
    fn derivative_peaks_at_half() {
        assert_eq!(sigmoid_derivative(0.5), 0.25);
        assert_eq!(sigmoid_derivative(0.0), 0.0);
        assert_eq!(sigmoid_derivative(1.0), 0.0);
    }
}
