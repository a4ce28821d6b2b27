pub mod csv;
pub mod scaler;
pub mod split;
pub mod toy;

pub use csv::{load_csv, parse_csv, Dataset};
pub use scaler::StandardScaler;
pub use split::train_test_split;
