use std::sync::mpsc;

use log::{debug, info, warn};
use rand::{rngs::StdRng, Rng, SeedableRng};

use crate::activation::normalize::normalize;
use crate::data::batch::Batch;
use crate::data::source::DataSource;
use crate::error::{ensure_shape, MlpError, Result};
use crate::eval::error_rate::{error_rate, squared_error};
use crate::math::matrix::Matrix;
use crate::network::backward::backward;
use crate::network::forward::forward;
use crate::network::params::ParameterSet;
use crate::optim::sgd::Sgd;
use crate::train::eval_stats::{EvalStats, TrainSummary};
use crate::train::train_config::TrainConfig;

/// Epoch and global step counters. Both only move forward.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TrainerState {
    pub epoch: usize,
    pub step: usize,
}

/// The normalized output of a step and the targets it was scored against,
/// both `output × N`.
#[derive(Debug, Clone)]
pub struct StepOutput {
    pub out: Matrix,
    pub target: Matrix,
}

/// Owns the parameters of one training run and drives it.
pub struct Trainer {
    params: ParameterSet,
    optimizer: Sgd,
    config: TrainConfig,
    state: TrainerState,
    progress_tx: Option<mpsc::Sender<EvalStats>>,
}

impl Trainer {
    /// Initializes parameters from `config.seed`, or from entropy when unset.
    pub fn new(config: TrainConfig) -> Result<Trainer> {
        let mut rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Trainer::with_rng(config, &mut rng)
    }

    pub fn with_rng<R: Rng + ?Sized>(config: TrainConfig, rng: &mut R) -> Result<Trainer> {
        config.validate()?;
        let params =
            ParameterSet::initialize(config.input_dim, config.hidden_dim, config.output_dim, rng);
        Trainer::with_params(config, params)
    }

    /// Starts from existing parameters, which must match the configured widths.
    pub fn with_params(config: TrainConfig, params: ParameterSet) -> Result<Trainer> {
        config.validate()?;
        let configured = (config.input_dim, config.hidden_dim, config.output_dim);
        let actual = (params.input_dim(), params.hidden_dim(), params.output_dim());
        if configured != actual {
            return Err(MlpError::InvalidConfig(format!(
                "parameters are {actual:?} (input, hidden, output) but the config asks for {configured:?}"
            )));
        }

        Ok(Trainer {
            params,
            optimizer: Sgd::new(config.weight_learning_rate, config.bias_learning_rate),
            config,
            state: TrainerState::default(),
            progress_tx: None,
        })
    }

    /// Sends every periodic evaluation on `tx` as well as recording it.
    pub fn with_progress(mut self, tx: mpsc::Sender<EvalStats>) -> Trainer {
        self.progress_tx = Some(tx);
        self
    }

    pub fn params(&self) -> &ParameterSet {
        &self.params
    }

    pub fn into_params(self) -> ParameterSet {
        self.params
    }

    pub fn config(&self) -> &TrainConfig {
        &self.config
    }

    pub fn state(&self) -> TrainerState {
        self.state
    }

    /// Runs `config.num_epochs` passes over the source's training minibatches
    /// and returns what the run did.
    ///
    /// Minibatches are taken in the order `source` yields them. After every
    /// `config.eval_cadence`-th step (counted from the start of the run, across
    /// epochs) the minibatch just trained on and the test batch are scored; the
    /// result is logged, sent on the progress channel if one is attached, and
    /// recorded in the returned `TrainSummary`.
    ///
    /// # Arguments
    /// - `source` — supplies the training minibatches (restarted every epoch)
    ///              and the fixed test batch
    ///
    /// # Errors
    /// - `EmptyBatch` / `ShapeMismatch` if the test batch is empty or does not
    ///   fit the configured widths; checked before any step is taken
    /// - anything `step` or `evaluate` returns; the run stops at the first
    ///   error and steps already applied stay applied
    pub fn run<D: DataSource + ?Sized>(&mut self, source: &D) -> Result<TrainSummary> {
        self.check_test_batch(source.test_batch())?;

        let mut evals = Vec::new();
        let mut epochs_completed = 0;

        for epoch in 0..self.config.num_epochs {
            self.state.epoch = epoch;
            info!("starting epoch {epoch}");

            // ── One pass over the training minibatches ─────────────────────
            for batch in source.train_batches() {
                let output = self.step(&batch)?;

                // ── Periodic evaluation ────────────────────────────────────
                if self.state.step % self.config.eval_cadence == 0 {
                    let stats = self.periodic_eval(&output, source.test_batch())?;
                    self.report(&stats);
                    evals.push(stats);
                }
            }

            info!("finished epoch {epoch} at step {}", self.state.step);
            epochs_completed += 1;
        }

        Ok(TrainSummary {
            epochs_completed,
            steps: self.state.step,
            evals,
        })
    }

    /// Trains on one minibatch: forward, normalize, backward, update.
    ///
    /// # Arguments
    /// - `batch` — `N` samples (`N × input_dim`) with one-hot labels
    ///             (`N × output_dim`)
    ///
    /// # Returns
    /// The normalized output and transposed labels of this minibatch, as seen
    /// before the update.
    ///
    /// # Errors
    /// `EmptyBatch`, `ShapeMismatch` or `NumericInstability`. Parameters are
    /// only touched once every earlier stage has succeeded, so a failed step
    /// leaves them and the step counter unchanged.
    pub fn step(&mut self, batch: &Batch) -> Result<StepOutput> {
        if batch.is_empty() {
            return Err(MlpError::EmptyBatch);
        }

        // ── Forward ───────────────────────────────────────────────────────
        let acts = forward(&self.params, batch.samples())?;
        let out = normalize(&acts.a3);
        if !out.is_finite() {
            return Err(MlpError::NumericInstability { stage: "output normalization" });
        }

        // ── Backward and update ───────────────────────────────────────────
        let target = batch.labels().transpose();
        let grads = backward(&self.params, &acts.a1, &acts.a2, &out, &target)?;
        self.optimizer.step(&mut self.params, &grads);

        self.state.step += 1;
        debug!("step {} applied ({} samples)", self.state.step, batch.len());

        Ok(StepOutput { out, target })
    }

    /// Misclassification rate of the current parameters on `batch`.
    ///
    /// Scores the un-normalized output; the normalizer keeps each column's
    /// ordering, so the arg-max is the same.
    pub fn evaluate(&self, batch: &Batch) -> Result<f64> {
        if batch.is_empty() {
            return Err(MlpError::EmptyBatch);
        }
        let acts = forward(&self.params, batch.samples())?;
        error_rate(&acts.a3, &batch.labels().transpose())
    }

    /// The test batch must be usable before the first step, not at the first eval.
    fn check_test_batch(&self, test: &Batch) -> Result<()> {
        if test.is_empty() {
            return Err(MlpError::EmptyBatch);
        }
        ensure_shape(
            "test samples",
            (test.len(), self.config.input_dim),
            test.samples().shape(),
        )?;
        ensure_shape(
            "test labels",
            (test.len(), self.config.output_dim),
            test.labels().shape(),
        )
    }

    fn periodic_eval(&self, output: &StepOutput, test: &Batch) -> Result<EvalStats> {
        let n = output.out.cols as f64;
        Ok(EvalStats {
            epoch: self.state.epoch,
            step: self.state.step,
            train_error: error_rate(&output.out, &output.target)?,
            test_error: self.evaluate(test)?,
            train_loss: squared_error(&output.out, &output.target)? / n,
        })
    }

    fn report(&mut self, stats: &EvalStats) {
        info!(
            "step {}: training error {:.4}, testing error {:.4}",
            stats.step, stats.train_error, stats.test_error
        );

        let disconnected = match &self.progress_tx {
            Some(tx) => tx.send(stats.clone()).is_err(),
            None => false,
        };
        if disconnected {
            warn!("progress receiver dropped; continuing without it");
            self.progress_tx = None;
        }
    }
}
