pub mod math;
pub mod activation;
pub mod network;
pub mod optim;
pub mod eval;
pub mod train;
pub mod data;
pub mod error;

// Convenience re-exports
pub use math::matrix::Matrix;
pub use activation::normalize::normalize;
pub use network::{backward, forward, Activations, Gradients, ParameterSet};
pub use optim::sgd::Sgd;
pub use eval::error_rate::error_rate;
pub use train::{EvalStats, TrainConfig, TrainSummary, Trainer};
pub use data::{Batch, DataSource, InMemorySource};
pub use error::{MlpError, Result};
