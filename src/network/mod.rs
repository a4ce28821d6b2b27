pub mod cache;
pub mod params;

pub use cache::ActivationCache;
pub use params::{ParameterStore, DEFAULT_INIT_SCALE};
