use serde::{Serialize, Deserialize};

use crate::error::{NetError, Result};
use crate::network::params::DEFAULT_INIT_SCALE;

/// Hyperparameters for a `Classifier::fit` run.
///
/// # Fields
/// - `epochs`       : exact number of full-batch steps to run
/// - `learning_rate`: fixed gradient-descent step size
/// - `log_interval` : the loss is recorded and logged every `log_interval` epochs
/// - `init_scale`   : multiplier on normally distributed initial weights
/// - `seed`         : optional RNG seed for reproducible initialization
///
/// Every field has a default, so a JSON config may set only what it changes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrainConfig {
    pub epochs: usize,
    pub learning_rate: f64,
    pub log_interval: usize,
    pub init_scale: f64,
    pub seed: Option<u64>,
}

impl Default for TrainConfig {
    fn default() -> Self {
        TrainConfig {
            epochs: 1000,
            learning_rate: 0.1,
            log_interval: 100,
            init_scale: DEFAULT_INIT_SCALE,
            seed: None,
        }
    }
}

impl TrainConfig {
    /// Creates a config with the given epochs and learning rate, other fields default.
    pub fn new(epochs: usize, learning_rate: f64) -> Self {
        TrainConfig {
            epochs,
            learning_rate,
            ..TrainConfig::default()
        }
    }

    pub fn with_log_interval(mut self, log_interval: usize) -> Self {
        self.log_interval = log_interval;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn validate(&self) -> Result<()> {
        if !self.learning_rate.is_finite() || self.learning_rate <= 0.0 {
            return Err(NetError::Configuration(format!(
                "learning_rate must be positive and finite, got {}",
                self.learning_rate
            )));
        }
        if self.log_interval == 0 {
            return Err(NetError::Configuration("log_interval must be at least 1".into()));
        }
        if !self.init_scale.is_finite() || self.init_scale <= 0.0 {
            return Err(NetError::Configuration(format!(
                "init_scale must be positive and finite, got {}",
                self.init_scale
            )));
        }
        Ok(())
    }

    /// Serializes the config to a pretty-printed JSON file.
    pub fn save_json(&self, path: &str) -> Result<()> {
        let file = std::fs::File::create(path)?;
        let writer = std::io::BufWriter::new(file);
        serde_json::to_writer_pretty(writer, self)?;
        Ok(())
    }

    /// Reads and validates a config from JSON. Missing fields take defaults.
    pub fn load_json(path: &str) -> Result<TrainConfig> {
        let file = std::fs::File::open(path)?;
        let reader = std::io::BufReader::new(file);
        let config: TrainConfig = serde_json::from_reader(reader)?;
        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_json_fills_defaults() {
        let config: TrainConfig = serde_json::from_str(r#"{"learning_rate": 0.5, "epochs": 2000}"#).unwrap();
        assert_eq!(config.learning_rate, 0.5);
        assert_eq!(config.epochs, 2000);
        assert_eq!(config.log_interval, 100);
        assert_eq!(config.init_scale, DEFAULT_INIT_SCALE);
        assert_eq!(config.seed, None);
    }

    #[test]
    fn validate_rejects_bad_values() {
        assert!(TrainConfig::default().validate().is_ok());
        assert!(TrainConfig::new(10, 0.0).validate().is_err());
        assert!(TrainConfig::new(10, f64::NAN).validate().is_err());
        assert!(TrainConfig::new(10, 0.1).with_log_interval(0).validate().is_err());
        assert!(TrainConfig::new(0, 0.1).validate().is_ok());
    }
}
