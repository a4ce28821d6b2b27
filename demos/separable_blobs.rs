use sigmoid_mlp::data::{toy, train_test_split, StandardScaler};
use sigmoid_mlp::{Classifier, TrainConfig};

fn main() -> sigmoid_mlp::Result<()> {
    tracing_subscriber::fmt::init();

    let ds = toy::blobs(200, 42);
    let (train, test) = train_test_split(&ds, 0.2, 42)?;
    let (scaler, train_x) = StandardScaler::fit_transform(&train.inputs)?;
    let test_x = scaler.transform(&test.inputs)?;

    let config = TrainConfig::new(2000, 0.5).with_seed(42);
    let mut classifier = Classifier::new(&[2, 16, 8, 1], &config)?;
    classifier.fit(&train_x, &train.labels, &config)?;

    for record in classifier.history().records() {
        println!("{:>5}  {:.4}", record.epoch, record.loss);
    }
    let accuracy = classifier.accuracy(&test_x, &test.labels)?;
    println!("Test Accuracy: {:.2}%", accuracy * 100.0);
    Ok(())
}
