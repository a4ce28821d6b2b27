use rand::Rng;
use serde::{Serialize, Deserialize};
use tracing::debug;

use crate::error::{NetError, Result};
use crate::layers::dense::DenseLayer;
use crate::math::matrix::Matrix;
use crate::network::cache::ActivationCache;

/// Default multiplier applied to normally distributed initial weights, small
/// enough that first-epoch activations stay in the sigmoid's linear region.
pub const DEFAULT_INIT_SCALE: f64 = 0.01;

/// Weights and biases of every layer, input side first.
///
/// Deserialization goes through `from_layers`, so a store read from JSON
/// (directly or nested in a `Classifier`) has the same shape guarantees as
/// one built by `initialize`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawParameterStore")]
pub struct ParameterStore {
    layers: Vec<DenseLayer>,
}

/// Unchecked wire form of `ParameterStore`.
#[derive(Deserialize)]
struct RawParameterStore {
    layers: Vec<DenseLayer>,
}

impl TryFrom<RawParameterStore> for ParameterStore {
    type Error = NetError;

    fn try_from(raw: RawParameterStore) -> Result<ParameterStore> {
        ParameterStore::from_layers(raw.layers)
    }
}

impl ParameterStore {
    /// Allocates one layer per consecutive pair of `layer_sizes`
    /// (e.g. `[30, 16, 8, 1]` gives three layers) using the thread RNG.
    pub fn initialize(layer_sizes: &[usize], scale: f64) -> Result<ParameterStore> {
        ParameterStore::initialize_with_rng(layer_sizes, scale, &mut rand::thread_rng())
    }

    pub fn initialize_with_rng<R: Rng + ?Sized>(
        layer_sizes: &[usize],
        scale: f64,
        rng: &mut R,
    ) -> Result<ParameterStore> {
        if layer_sizes.len() < 2 {
            return Err(NetError::Configuration(format!(
                "need at least 2 layer sizes (input and output), got {}",
                layer_sizes.len()
            )));
        }
        if let Some(i) = layer_sizes.iter().position(|&w| w == 0) {
            return Err(NetError::Configuration(format!("layer size at position {i} is zero")));
        }
        if !scale.is_finite() || scale <= 0.0 {
            return Err(NetError::Configuration(format!(
                "initialization scale must be positive and finite, got {scale}"
            )));
        }

        let layers = layer_sizes
            .windows(2)
            .map(|pair| DenseLayer::new(pair[0], pair[1], scale, &mut *rng))
            .collect();
        debug!(?layer_sizes, scale, "initialized parameter store");
        Ok(ParameterStore { layers })
    }

    /// Builds a store from explicit layers. Every matrix must hold the values
    /// its dimensions claim, no width may be zero, and consecutive widths must chain.
    pub fn from_layers(layers: Vec<DenseLayer>) -> Result<ParameterStore> {
        if layers.is_empty() {
            return Err(NetError::Configuration("a network needs at least one layer".into()));
        }
        for (i, layer) in layers.iter().enumerate() {
            layer.weights.check_consistent("layer weights")?;
            layer.biases.check_consistent("layer biases")?;
            if layer.input_size() == 0 || layer.size() == 0 {
                return Err(NetError::Configuration(format!("layer {i} has a zero width")));
            }
            if layer.biases.shape() != (1, layer.size()) {
                return Err(NetError::shape("layer biases", (1, layer.size()), layer.biases.shape()));
            }
            if i > 0 && layer.input_size() != layers[i - 1].size() {
                return Err(NetError::shape(
                    "layer weights",
                    (layers[i - 1].size(), layer.size()),
                    layer.weights.shape(),
                ));
            }
        }
        Ok(ParameterStore { layers })
    }

    pub fn layers(&self) -> &[DenseLayer] {
        &self.layers
    }

    pub fn layer_count(&self) -> usize {
        self.layers.len()
    }

    /// Widths from input to output; the inverse of `initialize`.
    pub fn layer_sizes(&self) -> Vec<usize> {
        std::iter::once(self.input_width())
            .chain(self.layers.iter().map(DenseLayer::size))
            .collect()
    }

    pub fn input_width(&self) -> usize {
        self.layers[0].input_size()
    }

    pub fn output_width(&self) -> usize {
        self.layers[self.layers.len() - 1].size()
    }

    /// In place: `W -= lr * delta_weights`, `b -= lr * delta_bias` for one layer.
    pub fn update(
        &mut self,
        layer_index: usize,
        delta_weights: &Matrix,
        delta_bias: &Matrix,
        learning_rate: f64,
    ) -> Result<()> {
        let layers = self.layers.len();
        let layer = self
            .layers
            .get_mut(layer_index)
            .ok_or(NetError::LayerIndex { index: layer_index, layers })?;
        if delta_weights.shape() != layer.weights.shape() {
            return Err(NetError::shape("weight update", layer.weights.shape(), delta_weights.shape()));
        }
        if delta_bias.shape() != layer.biases.shape() {
            return Err(NetError::shape("bias update", layer.biases.shape(), delta_bias.shape()));
        }
        layer.apply_gradients(delta_weights, delta_bias, learning_rate);
        Ok(())
    }

    /// Forward pass over a batch. Returns the final activation
    /// `(batch × output_width)` together with every `z` and `a` computed.
    pub fn forward(&self, input: &Matrix) -> Result<(Matrix, ActivationCache)> {
        self.check_input(input)?;
        let mut cache = ActivationCache::new(input.clone(), self.layers.len());
        for layer in &self.layers {
            let (z, a) = layer.feed_from(cache.output());
            cache.push(z, a);
        }
        Ok((cache.output().clone(), cache))
    }

    /// Forward pass without keeping the cache.
    pub fn predict_proba(&self, input: &Matrix) -> Result<Matrix> {
        self.check_input(input)?;
        let mut current = input.clone();
        for layer in &self.layers {
            current = layer.feed_from(&current).1;
        }
        Ok(current)
    }

    fn check_input(&self, input: &Matrix) -> Result<()> {
        if input.rows == 0 {
            return Err(NetError::EmptyBatch);
        }
        if input.cols != self.input_width() {
            return Err(NetError::shape(
                "forward input",
                (input.rows, self.input_width()),
                input.shape(),
            ));
        }
        Ok(())
    }

    /// Serializes the parameters to a pretty-printed JSON file.
    pub fn save_json(&self, path: &str) -> Result<()> {
        let file = std::fs::File::create(path)?;
        let writer = std::io::BufWriter::new(file);
        serde_json::to_writer_pretty(writer, self)?;
        Ok(())
    }

    /// Deserializes parameters written by `save_json`; layer shapes are re-checked.
    pub fn load_json(path: &str) -> Result<ParameterStore> {
        let file = std::fs::File::open(path)?;
        let reader = std::io::BufReader::new(file);
        Ok(serde_json::from_reader(reader)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn seeded(sizes: &[usize]) -> ParameterStore {
        ParameterStore::initialize_with_rng(sizes, DEFAULT_INIT_SCALE, &mut StdRng::seed_from_u64(1)).unwrap()
    }

    #[test]
    fn initialize_allocates_one_pair_per_consecutive_widths() {
        for sizes in [vec![2, 1], vec![30, 16, 8, 1], vec![5, 5, 5, 5, 3]] {
            let store = seeded(&sizes);
            assert_eq!(store.layer_count(), sizes.len() - 1);
            for (layer, pair) in store.layers().iter().zip(sizes.windows(2)) {
                assert_eq!(layer.weights.shape(), (pair[0], pair[1]));
                assert_eq!(layer.biases.shape(), (1, pair[1]));
                assert!(layer.biases.data[0].iter().all(|&b| b == 0.0));
            }
            assert_eq!(store.layer_sizes(), sizes);
        }
    }

    #[test]
    fn initialize_rejects_short_or_zero_width_sizes() {
        assert!(matches!(ParameterStore::initialize(&[], 0.01), Err(NetError::Configuration(_))));
        assert!(matches!(ParameterStore::initialize(&[4], 0.01), Err(NetError::Configuration(_))));
        assert!(matches!(ParameterStore::initialize(&[4, 0, 1], 0.01), Err(NetError::Configuration(_))));
        assert!(matches!(ParameterStore::initialize(&[4, 1], 0.0), Err(NetError::Configuration(_))));
    }

    #[test]
    fn forward_output_has_batch_rows_and_fills_cache() {
        let store = seeded(&[3, 4, 2]);
        let input = Matrix::from_rows(vec![vec![0.1, 0.2, 0.3]; 5]).unwrap();
        let (output, cache) = store.forward(&input).unwrap();
        assert_eq!(output.shape(), (5, 2));
        assert_eq!(cache.activations.len(), store.layer_count() + 1);
        assert_eq!(cache.pre_activations.len(), store.layer_count());
        assert_eq!(cache.activations[0], input);
        assert_eq!(cache.output(), &output);
        assert_eq!(store.predict_proba(&input).unwrap(), output);
    }

    #[test]
    fn forward_rejects_wrong_width() {
        let store = seeded(&[3, 1]);
        let input = Matrix::from_rows(vec![vec![1.0, 2.0]]).unwrap();
        assert!(matches!(store.forward(&input), Err(NetError::ShapeMismatch { .. })));
    }

    #[test]
    fn update_subtracts_scaled_delta() {
        let mut store = seeded(&[2, 1]);
        let before = store.layers()[0].clone();
        let dw = Matrix::from_rows(vec![vec![1.0], vec![-2.0]]).unwrap();
        let db = Matrix::from_rows(vec![vec![4.0]]).unwrap();
        store.update(0, &dw, &db, 0.5).unwrap();
        let after = &store.layers()[0];
        assert!((after.weights.data[0][0] - (before.weights.data[0][0] - 0.5)).abs() < 1e-12);
        assert!((after.weights.data[1][0] - (before.weights.data[1][0] + 1.0)).abs() < 1e-12);
        assert_eq!(after.biases.data[0][0], -2.0);
    }

    #[test]
    fn update_checks_index_and_shape() {
        let mut store = seeded(&[2, 1]);
        let dw = Matrix::zeros(2, 1);
        let db = Matrix::zeros(1, 1);
        assert!(matches!(
            store.update(1, &dw, &db, 0.1),
            Err(NetError::LayerIndex { index: 1, layers: 1 })
        ));
        assert!(matches!(
            store.update(0, &Matrix::zeros(1, 2), &db, 0.1),
            Err(NetError::ShapeMismatch { .. })
        ));
    }

    #[test]
    fn json_round_trip_preserves_parameters() {
        let store = seeded(&[4, 3, 1]);
        let path = std::env::temp_dir().join(format!("sigmoid_mlp_params_{}.json", std::process::id()));
        let path = path.to_str().unwrap();
        store.save_json(path).unwrap();
        let loaded = ParameterStore::load_json(path).unwrap();
        std::fs::remove_file(path).ok();
        assert_eq!(loaded.layer_sizes(), store.layer_sizes());
        for (a, b) in loaded.layers().iter().zip(store.layers()) {
            let pairs = a.weights.data.iter().flatten().zip(b.weights.data.iter().flatten());
            for (x, y) in pairs {
                assert!((x - y).abs() < 1e-15);
            }
        }
    }

    #[test]
    fn load_rejects_weights_with_fewer_rows_than_declared() {
        let json = r#"{"layers":[{"weights":{"rows":2,"cols":1,"data":[[0.5]]},
                                  "biases":{"rows":1,"cols":1,"data":[[0.0]]}}]}"#;
        let path = std::env::temp_dir().join(format!("sigmoid_mlp_short_{}.json", std::process::id()));
        let path = path.to_str().unwrap();
        std::fs::write(path, json).unwrap();
        let loaded = ParameterStore::load_json(path);
        std::fs::remove_file(path).ok();
        assert!(loaded.is_err());

        let err = serde_json::from_str::<ParameterStore>(json).unwrap_err();
        assert!(err.to_string().contains("shape mismatch in layer weights"));
    }

    #[test]
    fn deserialize_rejects_empty_layer_list() {
        let err = serde_json::from_str::<ParameterStore>(r#"{"layers":[]}"#).unwrap_err();
        assert!(err.to_string().contains("at least one layer"));
    }

    #[test]
    fn from_layers_rejects_ragged_biases_and_zero_widths() {
        let ragged = DenseLayer {
            weights: Matrix::zeros(2, 2),
            biases: Matrix { rows: 1, cols: 2, data: vec![vec![0.0]] },
        };
        assert!(matches!(ParameterStore::from_layers(vec![ragged]), Err(NetError::ShapeMismatch { .. })));

        let empty = DenseLayer { weights: Matrix::zeros(0, 1), biases: Matrix::zeros(1, 1) };
        assert!(matches!(ParameterStore::from_layers(vec![empty]), Err(NetError::Configuration(_))));
    }
}
