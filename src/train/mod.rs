pub mod backprop;
pub mod classifier;
pub mod epoch_stats;
pub mod train_config;

pub use backprop::{backward, gradients, LayerGradients};
pub use classifier::{Classifier, TrainingState, DECISION_THRESHOLD};
pub use epoch_stats::{LossHistory, LossRecord};
pub use train_config::TrainConfig;
