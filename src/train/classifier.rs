use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Serialize, Deserialize};
use tracing::{info, warn};

use crate::error::{NetError, Result};
use crate::loss::bce::BceLoss;
use crate::math::matrix::Matrix;
use crate::metrics;
use crate::network::params::ParameterStore;
use crate::optim::sgd::Sgd;
use crate::train::backprop;
use crate::train::epoch_stats::LossHistory;
use crate::train::train_config::TrainConfig;

/// Probability above which a prediction counts as the positive class.
pub const DECISION_THRESHOLD: f64 = 0.5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TrainingState {
    /// Freshly initialized, `fit` never called.
    Untrained,
    /// Inside `fit`.
    Training,
    /// `fit` returned; parameters and history are frozen until the next `fit`.
    Trained,
}

/// A sigmoid network trained with full-batch gradient descent on binary
/// cross-entropy.
///
/// Training is resumable: each `fit` continues from the current parameters
/// and appends to the same loss history. The epoch counter used for loss
/// sampling runs across calls.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Classifier {
    params: ParameterStore,
    history: LossHistory,
    state: TrainingState,
    epochs_completed: usize,
}

impl Classifier {
    /// Initializes parameters for `layer_sizes` with `config.init_scale`,
    /// seeding the RNG from `config.seed` when present.
    pub fn new(layer_sizes: &[usize], config: &TrainConfig) -> Result<Classifier> {
        config.validate()?;
        let params = match config.seed {
            Some(seed) => ParameterStore::initialize_with_rng(
                layer_sizes,
                config.init_scale,
                &mut StdRng::seed_from_u64(seed),
            )?,
            None => ParameterStore::initialize(layer_sizes, config.init_scale)?,
        };
        Ok(Classifier::from_params(params))
    }

    pub fn from_params(params: ParameterStore) -> Classifier {
        Classifier {
            params,
            history: LossHistory::new(),
            state: TrainingState::Untrained,
            epochs_completed: 0,
        }
    }

    pub fn params(&self) -> &ParameterStore {
        &self.params
    }

    pub fn history(&self) -> &LossHistory {
        &self.history
    }

    pub fn state(&self) -> TrainingState {
        self.state
    }

    pub fn epochs_completed(&self) -> usize {
        self.epochs_completed
    }

    /// Runs exactly `config.epochs` epochs of forward → loss → backward over
    /// the whole batch and returns the loss of the last epoch run.
    ///
    /// `labels` must be `(inputs.rows × output_width)` with 0/1 entries.
    /// With `epochs == 0` nothing is updated and the current loss is returned.
    /// A non-finite loss is logged once but does not stop the run.
    pub fn fit(&mut self, inputs: &Matrix, labels: &Matrix, config: &TrainConfig) -> Result<f64> {
        config.validate()?;
        self.check_batch(inputs, labels)?;

        if config.epochs == 0 {
            return self.loss(inputs, labels);
        }

        self.state = TrainingState::Training;
        let result = self.run_epochs(inputs, labels, config);
        self.state = TrainingState::Trained;
        result
    }

    fn run_epochs(&mut self, inputs: &Matrix, labels: &Matrix, config: &TrainConfig) -> Result<f64> {
        let optimizer = Sgd::new(config.learning_rate);
        let mut last_loss = f64::NAN;
        let mut reported_non_finite = false;

        for _ in 0..config.epochs {
            let (output, cache) = self.params.forward(inputs)?;
            let loss = BceLoss::loss(&output, labels)?;
            backprop::backward(&mut self.params, &cache, labels, &optimizer)?;

            if !loss.is_finite() && !reported_non_finite {
                warn!(
                    "Epoch {}: loss is {}, parameters are no longer finite",
                    self.epochs_completed, loss
                );
                reported_non_finite = true;
            }

            if self.epochs_completed % config.log_interval == 0 {
                self.history.push(self.epochs_completed, loss);
                info!("Epoch {}, Loss: {:.4}", self.epochs_completed, loss);
            }

            self.epochs_completed += 1;
            last_loss = loss;
        }

        Ok(last_loss)
    }

    /// Mean BCE of the current parameters on a batch, without updating.
    pub fn loss(&self, inputs: &Matrix, labels: &Matrix) -> Result<f64> {
        self.check_batch(inputs, labels)?;
        let predicted = self.params.predict_proba(inputs)?;
        BceLoss::loss(&predicted, labels)
    }

    /// Per-example probabilities, `(batch × output_width)`.
    pub fn predict_proba(&self, inputs: &Matrix) -> Result<Matrix> {
        self.params.predict_proba(inputs)
    }

    /// 0/1 predictions thresholded at 0.5.
    pub fn predict(&self, inputs: &Matrix) -> Result<Matrix> {
        Ok(metrics::threshold(&self.predict_proba(inputs)?, DECISION_THRESHOLD))
    }

    /// Fraction of rows whose thresholded prediction equals the label.
    pub fn accuracy(&self, inputs: &Matrix, labels: &Matrix) -> Result<f64> {
        self.check_batch(inputs, labels)?;
        metrics::accuracy(&self.predict(inputs)?, labels)
    }

    fn check_batch(&self, inputs: &Matrix, labels: &Matrix) -> Result<()> {
        if inputs.rows == 0 {
            return Err(NetError::EmptyBatch);
        }
        let input_width = self.params.input_width();
        if inputs.cols != input_width {
            return Err(NetError::shape("inputs", (inputs.rows, input_width), inputs.shape()));
        }
        let expected = (inputs.rows, self.params.output_width());
        if labels.shape() != expected {
            return Err(NetError::shape("labels", expected, labels.shape()));
        }
        Ok(())
    }

    pub fn save_json(&self, path: &str) -> Result<()> {
        let file = std::fs::File::create(path)?;
        let writer = std::io::BufWriter::new(file);
        serde_json::to_writer_pretty(writer, self)?;
        Ok(())
    }

    pub fn load_json(path: &str) -> Result<Classifier> {
        let file = std::fs::File::open(path)?;
        let reader = std::io::BufReader::new(file);
        Ok(serde_json::from_reader(reader)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn and_table() -> (Matrix, Matrix) {
        let x = Matrix::from_rows(vec![
            vec![0.0, 0.0],
            vec![0.0, 1.0],
            vec![1.0, 0.0],
            vec![1.0, 1.0],
        ])
        .unwrap();
        (x, Matrix::column(&[0.0, 0.0, 0.0, 1.0]))
    }

    #[test]
    fn state_moves_from_untrained_to_trained() {
        let config = TrainConfig::new(10, 0.5).with_seed(1);
        let mut clf = Classifier::new(&[2, 1], &config).unwrap();
        assert_eq!(clf.state(), TrainingState::Untrained);
        let (x, y) = and_table();
        clf.fit(&x, &y, &config).unwrap();
        assert_eq!(clf.state(), TrainingState::Trained);
        assert_eq!(clf.epochs_completed(), 10);
    }

    #[test]
    fn history_is_sampled_every_log_interval() {
        let config = TrainConfig::new(250, 0.5).with_log_interval(100).with_seed(2);
        let mut clf = Classifier::new(&[2, 1], &config).unwrap();
        let (x, y) = and_table();
        clf.fit(&x, &y, &config).unwrap();
        let epochs: Vec<usize> = clf.history().records().iter().map(|r| r.epoch).collect();
        assert_eq!(epochs, vec![0, 100, 200]);
    }

    #[test]
    fn zero_epochs_leaves_parameters_alone() {
        let config = TrainConfig::new(0, 0.5).with_seed(3);
        let mut clf = Classifier::new(&[2, 1], &config).unwrap();
        let before = clf.params().clone();
        let (x, y) = and_table();
        let loss = clf.fit(&x, &y, &config).unwrap();
        assert!(loss.is_finite());
        assert_eq!(clf.params(), &before);
        assert_eq!(clf.state(), TrainingState::Untrained);
        assert!(clf.history().is_empty());
    }

    #[test]
    fn fit_rejects_mismatched_batches() {
        let config = TrainConfig::new(5, 0.5);
        let mut clf = Classifier::new(&[2, 1], &config).unwrap();
        let (x, _) = and_table();
        let short = Matrix::column(&[0.0, 1.0]);
        assert!(matches!(clf.fit(&x, &short, &config), Err(NetError::ShapeMismatch { .. })));

        let wide = Matrix::from_rows(vec![vec![0.0, 0.0, 0.0]]).unwrap();
        let one = Matrix::column(&[1.0]);
        assert!(matches!(clf.fit(&wide, &one, &config), Err(NetError::ShapeMismatch { .. })));
        assert_eq!(clf.state(), TrainingState::Untrained);
    }

    #[test]
    fn huge_learning_rate_does_not_abort() {
        let config = TrainConfig::new(50, 1e300).with_seed(4);
        let mut clf = Classifier::new(&[2, 3, 1], &config).unwrap();
        let (x, y) = and_table();
        assert!(clf.fit(&x, &y, &config).is_ok());
        assert_eq!(clf.epochs_completed(), 50);
    }

    #[test]
    fn nested_parameters_are_validated_on_deserialize() {
        let json = r#"{"params":{"layers":[]},"history":{"records":[]},
                       "state":"Trained","epochs_completed":10}"#;
        let err = serde_json::from_str::<Classifier>(json).unwrap_err();
        assert!(err.to_string().contains("at least one layer"));

        let short = r#"{"params":{"layers":[{"weights":{"rows":2,"cols":1,"data":[[0.5]]},
                                             "biases":{"rows":1,"cols":1,"data":[[0.0]]}}]},
                        "history":{"records":[]},"state":"Trained","epochs_completed":10}"#;
        assert!(serde_json::from_str::<Classifier>(short).is_err());
    }
}
