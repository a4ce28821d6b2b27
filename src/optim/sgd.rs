use crate::error::Result;
use crate::math::matrix::Matrix;
use crate::network::params::ParameterStore;

/// Plain gradient descent with a fixed learning rate.
#[derive(Debug, Clone, Copy)]
pub struct Sgd {
    pub learning_rate: f64,
}

impl Sgd {
    pub fn new(learning_rate: f64) -> Sgd {
        Sgd { learning_rate }
    }

    /// Applies one descent step to a single layer of `store`.
    pub fn step(
        &self,
        store: &mut ParameterStore,
        layer_index: usize,
        weights_grad: &Matrix,
        biases_grad: &Matrix,
    ) -> Result<()> {
        store.update(layer_index, weights_grad, biases_grad, self.learning_rate)
    }
}
