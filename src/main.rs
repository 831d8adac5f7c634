//! Trains the two-layer classifier on MNIST IDX files.
//!
//! Usage: `mnist-mlp [DATA_DIR] [CONFIG_JSON]`
//!
//! DATA_DIR (default `./mnist_data`) must hold the four standard MNIST files.
//! Logging is controlled with `RUST_LOG`, e.g. `RUST_LOG=info`.

use std::path::PathBuf;

use anyhow::Context;
use log::info;

use mnist_mlp::data::idx::load_idx_pair;
use mnist_mlp::{InMemorySource, TrainConfig, Trainer};

const TRAIN_IMAGES: &str = "train-images-idx3-ubyte";
const TRAIN_LABELS: &str = "train-labels-idx1-ubyte";
const TEST_IMAGES: &str = "t10k-images-idx3-ubyte";
const TEST_LABELS: &str = "t10k-labels-idx1-ubyte";

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let mut args = std::env::args().skip(1);
    let data_dir = PathBuf::from(args.next().unwrap_or_else(|| "mnist_data".to_owned()));
    let config = match args.next() {
        Some(path) => TrainConfig::load_json(&path)
            .with_context(|| format!("loading config from {path}"))?,
        None => TrainConfig::default(),
    };
    config.validate()?;

    let (train_inputs, train_labels) = load_idx_pair(
        &data_dir.join(TRAIN_IMAGES),
        &data_dir.join(TRAIN_LABELS),
        config.output_dim,
    )
    .with_context(|| format!("loading training set from {}", data_dir.display()))?;
    let (test_inputs, test_labels) = load_idx_pair(
        &data_dir.join(TEST_IMAGES),
        &data_dir.join(TEST_LABELS),
        config.output_dim,
    )
    .with_context(|| format!("loading test set from {}", data_dir.display()))?;

    let source = InMemorySource::new(
        train_inputs,
        train_labels,
        &test_inputs,
        &test_labels,
        config.minibatch_size,
    )?;
    info!(
        "{} training samples in {} minibatches per epoch, {} test samples",
        source.train_len(),
        source.batches_per_epoch(),
        test_inputs.len()
    );

    let mut trainer = Trainer::new(config)?;
    let summary = trainer.run(&source)?;

    match summary.evals.last() {
        Some(last) => info!(
            "done after {} epochs ({} steps): training error {:.4}, testing error {:.4}",
            summary.epochs_completed, summary.steps, last.train_error, last.test_error
        ),
        None => info!(
            "done after {} epochs ({} steps), no evaluation ran",
            summary.epochs_completed, summary.steps
        ),
    }

    Ok(())
}
