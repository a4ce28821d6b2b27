use sigmoid_mlp::data::toy;
use sigmoid_mlp::{Classifier, TrainConfig};

fn main() -> sigmoid_mlp::Result<()> {
    tracing_subscriber::fmt::init();

    let ds = toy::logical_and();
    let config = TrainConfig::new(5000, 1.0).with_log_interval(1000);
    let mut classifier = Classifier::new(&[2, 1], &config)?;

    classifier.fit(&ds.inputs, &ds.labels, &config)?;

    let probabilities = classifier.predict_proba(&ds.inputs)?;
    for (input, p) in ds.inputs.data.iter().zip(probabilities.data.iter()) {
        println!("Input: {:?} -> Output: {:.4}", input, p[0]);
    }
    Ok(())
}
