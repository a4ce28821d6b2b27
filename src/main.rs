//! sigmoid-mlp CLI
//!
//! Trains a sigmoid network on a numeric CSV (last column is the 0/1 label)
//! and evaluates a saved model on new data.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde::{Deserialize, Serialize};
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use sigmoid_mlp::data::{load_csv, train_test_split, StandardScaler};
use sigmoid_mlp::train::DECISION_THRESHOLD;
use sigmoid_mlp::{Classifier, TrainConfig};

#[derive(Parser)]
#[command(name = "sigmoid-mlp")]
#[command(about = "Feed-forward sigmoid network for binary classification", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Verbosity level
    #[arg(short, long, default_value = "info")]
    log_level: String,
}

#[derive(Subcommand)]
enum Commands {
    /// Train a new model on a CSV file
    Train {
        /// Path to training data (CSV, last column is the label)
        #[arg(short, long)]
        data: String,

        /// Hidden layer widths, comma-separated
        #[arg(long, value_delimiter = ',', default_value = "16,8")]
        hidden: Vec<usize>,

        /// JSON file with training hyperparameters; flags below override it
        #[arg(short, long)]
        config: Option<String>,

        /// Number of training epochs
        #[arg(short, long)]
        epochs: Option<usize>,

        /// Learning rate
        #[arg(long)]
        learning_rate: Option<f64>,

        /// Record and log the loss every N epochs
        #[arg(long)]
        log_interval: Option<usize>,

        /// Fraction of rows held out for testing
        #[arg(long, default_value = "0.2")]
        test_fraction: f64,

        /// Seed for the split and weight initialization [default: 42]
        #[arg(long)]
        seed: Option<u64>,

        /// Where to write the trained model bundle
        #[arg(short, long)]
        save: Option<String>,

        /// Where to write the sampled loss history
        #[arg(long)]
        history: Option<String>,
    },

    /// Evaluate a saved model on a CSV file
    Predict {
        /// Model bundle written by `train --save`
        #[arg(short, long)]
        model: String,

        /// Path to data (CSV, last column is the label)
        #[arg(short, long)]
        data: String,
    },
}

/// Seed used when neither `--seed` nor the config file sets one.
const DEFAULT_SEED: u64 = 42;

/// Everything needed to reuse a trained model on raw (unscaled) data.
#[derive(Serialize, Deserialize)]
struct ModelBundle {
    scaler: StandardScaler,
    classifier: Classifier,
}

/// Flags win over the config file; the seed falls back to `DEFAULT_SEED`.
fn apply_overrides(
    mut config: TrainConfig,
    epochs: Option<usize>,
    learning_rate: Option<f64>,
    log_interval: Option<usize>,
    seed: Option<u64>,
) -> TrainConfig {
    if let Some(epochs) = epochs {
        config.epochs = epochs;
    }
    if let Some(lr) = learning_rate {
        config.learning_rate = lr;
    }
    if let Some(interval) = log_interval {
        config.log_interval = interval;
    }
    config.seed = seed.or(config.seed).or(Some(DEFAULT_SEED));
    config
}

/// Input width, hidden widths as given, one sigmoid output.
/// Zero widths are kept so `Classifier::new` reports them.
fn layer_sizes(n_features: usize, hidden: &[usize]) -> Vec<usize> {
    let mut sizes = Vec::with_capacity(hidden.len() + 2);
    sizes.push(n_features);
    sizes.extend_from_slice(hidden);
    sizes.push(1);
    sizes
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let log_level = match cli.log_level.as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_target(false)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    match cli.command {
        Commands::Train {
            data,
            hidden,
            config,
            epochs,
            learning_rate,
            log_interval,
            test_fraction,
            seed,
            save,
            history,
        } => {
            let file_config = match config {
                Some(path) => TrainConfig::load_json(&path)
                    .with_context(|| format!("failed to load config {path}"))?,
                None => TrainConfig::default(),
            };
            let train_config = apply_overrides(file_config, epochs, learning_rate, log_interval, seed);
            let seed = train_config.seed.unwrap_or(DEFAULT_SEED);

            let dataset = load_csv(&data).with_context(|| format!("failed to read {data}"))?;
            info!("Loaded {} rows with {} features from {}", dataset.len(), dataset.n_features(), data);

            let (train, test) = train_test_split(&dataset, test_fraction, seed)?;
            let (scaler, train_x) = StandardScaler::fit_transform(&train.inputs)?;
            let test_x = scaler.transform(&test.inputs)?;

            let layer_sizes = layer_sizes(dataset.n_features(), &hidden);
            info!(
                "Training {:?} for {} epochs, LR: {}",
                layer_sizes, train_config.epochs, train_config.learning_rate
            );

            let mut classifier = Classifier::new(&layer_sizes, &train_config)?;
            let final_loss = classifier.fit(&train_x, &train.labels, &train_config)?;
            info!("Final training loss: {:.4}", final_loss);

            let train_acc = classifier.accuracy(&train_x, &train.labels)?;
            let test_acc = classifier.accuracy(&test_x, &test.labels)?;
            println!("Train Accuracy: {:.2}%", train_acc * 100.0);
            println!("Test Accuracy: {:.2}%", test_acc * 100.0);

            if let Some(path) = history {
                classifier
                    .history()
                    .save_json(&path)
                    .with_context(|| format!("failed to write history {path}"))?;
                info!("Loss history written to {}", path);
            }

            if let Some(path) = save {
                let bundle = ModelBundle { scaler, classifier };
                let file = std::fs::File::create(&path)
                    .with_context(|| format!("failed to create {path}"))?;
                serde_json::to_writer_pretty(std::io::BufWriter::new(file), &bundle)?;
                info!("Model saved to {}", path);
            }
        }

        Commands::Predict { model, data } => {
            let file = std::fs::File::open(&model).with_context(|| format!("failed to open {model}"))?;
            let bundle: ModelBundle = serde_json::from_reader(std::io::BufReader::new(file))
                .with_context(|| format!("{model} is not a model bundle"))?;

            let dataset = load_csv(&data).with_context(|| format!("failed to read {data}"))?;
            let inputs = bundle.scaler.transform(&dataset.inputs)?;
            let probabilities = bundle.classifier.predict_proba(&inputs)?;

            for (i, p) in probabilities.data.iter().enumerate() {
                println!("{}\t{:.4}\t{}", i, p[0], if p[0] > DECISION_THRESHOLD { 1 } else { 0 });
            }
            let accuracy = bundle.classifier.accuracy(&inputs, &dataset.labels)?;
            println!("Accuracy: {:.2}%", accuracy * 100.0);
        }
    }

    Ok(())
}
