pub mod error;
pub mod math;
pub mod activation;
pub mod layers;
pub mod network;
pub mod loss;
pub mod optim;
pub mod train;
pub mod metrics;
pub mod data;

// Convenience re-exports
pub use error::{NetError, Result};
pub use math::matrix::Matrix;
pub use activation::sigmoid::{sigmoid, sigmoid_derivative};
pub use layers::dense::DenseLayer;
pub use network::{ActivationCache, ParameterStore, DEFAULT_INIT_SCALE};
pub use loss::bce::BceLoss;
pub use optim::sgd::Sgd;
pub use train::{Classifier, LossHistory, LossRecord, TrainConfig, TrainingState};
pub use data::{Dataset, StandardScaler};
