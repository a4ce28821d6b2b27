use crate::error::{NetError, Result};
use crate::loss::bce::BceLoss;
use crate::math::matrix::Matrix;
use crate::network::cache::ActivationCache;
use crate::network::params::ParameterStore;
use crate::optim::sgd::Sgd;

/// Gradients of one layer, averaged over the batch.
#[derive(Debug, Clone)]
pub struct LayerGradients {
    pub weights: Matrix,
    pub biases: Matrix,
}

/// Computes BCE gradients for every layer from a cached forward pass.
///
/// Walks the layers last to first starting from `dz = a_L - y`. The error is
/// pushed back through each layer's weights as they are in `store`, so the
/// result is only valid against the parameters that produced `cache`.
/// The returned vector is indexed by layer, input side first.
pub fn gradients(
    store: &ParameterStore,
    cache: &ActivationCache,
    labels: &Matrix,
) -> Result<Vec<LayerGradients>> {
    let layers = store.layers();
    if cache.depth() != layers.len() {
        return Err(NetError::shape(
            "activation cache depth",
            (layers.len(), 1),
            (cache.depth(), 1),
        ));
    }

    let mut dz = BceLoss::output_delta(cache.output(), labels)?;
    let mut grads = Vec::with_capacity(layers.len());

    for i in (0..layers.len()).rev() {
        let a_prev = &cache.activations[i];
        let (weights, biases) = layers[i].compute_gradients(a_prev, &dz);
        if i > 0 {
            dz = layers[i].propagate_error(&dz, a_prev);
        }
        grads.push(LayerGradients { weights, biases });
    }

    grads.reverse();
    Ok(grads)
}

/// One backward pass: computes every layer's gradient against the
/// pre-update weights, then applies them through `optimizer`.
pub fn backward(
    store: &mut ParameterStore,
    cache: &ActivationCache,
    labels: &Matrix,
    optimizer: &Sgd,
) -> Result<()> {
    let grads = gradients(store, cache, labels)?;
    for (i, grad) in grads.iter().enumerate().rev() {
        optimizer.step(store, i, &grad.weights, &grad.biases)?;
    }
    Ok(())
}
