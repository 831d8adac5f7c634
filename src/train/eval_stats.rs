use serde::{Deserialize, Serialize};

/// Result of one periodic evaluation.
///
/// When a progress channel is attached to the `Trainer`, one `EvalStats`
/// value is sent every `eval_cadence` steps.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvalStats {
    /// 0-based epoch the evaluation happened in.
    pub epoch: usize,
    /// 1-based global step that triggered it.
    pub step: usize,
    /// Misclassification rate on the minibatch just trained on, measured
    /// before its update was applied.
    pub train_error: f64,
    /// Misclassification rate on the test batch.
    pub test_error: f64,
    /// Mean per-sample squared error of the normalized output on the minibatch.
    pub train_loss: f64,
}

/// What a completed run did.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainSummary {
    pub epochs_completed: usize,
    pub steps: usize,
    pub evals: Vec<EvalStats>,
}
