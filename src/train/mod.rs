pub mod trainer;
pub mod eval_stats;
pub mod train_config;

pub use trainer::{StepOutput, Trainer, TrainerState};
pub use eval_stats::{EvalStats, TrainSummary};
pub use train_config::TrainConfig;
