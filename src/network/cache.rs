use crate::math::matrix::Matrix;

/// Intermediate values of one forward pass, consumed by the backward pass.
///
/// `activations[0]` is the input batch and `activations[i + 1]` is the output
/// of layer `i`; `pre_activations[i]` is that layer's `z`. The cache belongs to
/// the training step that produced it and is never stored on the network.
#[derive(Debug, Clone)]
pub struct ActivationCache {
    pub pre_activations: Vec<Matrix>,
    pub activations: Vec<Matrix>,
}

impl ActivationCache {
    pub(crate) fn new(input: Matrix, layer_count: usize) -> ActivationCache {
        let mut activations = Vec::with_capacity(layer_count + 1);
        activations.push(input);
        ActivationCache {
            pre_activations: Vec::with_capacity(layer_count),
            activations,
        }
    }

    pub(crate) fn push(&mut self, z: Matrix, a: Matrix) {
        self.pre_activations.push(z);
        self.activations.push(a);
    }

    /// Number of layers the cache covers.
    pub fn depth(&self) -> usize {
        self.pre_activations.len()
    }

    /// Final layer activation, i.e. the network's prediction.
    pub fn output(&self) -> &Matrix {
        // Never empty: `new` seeds it with the input.
        &self.activations[self.activations.len() - 1]
    }
}
