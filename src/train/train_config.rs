use serde::{Deserialize, Serialize};

use crate::error::{MlpError, Result};

/// Configuration for a training run.
///
/// # Fields
/// - `input_dim`, `hidden_dim`, `output_dim` — layer widths (784 / 256 / 10 for MNIST)
/// - `num_epochs`           — full passes over the training minibatches
/// - `minibatch_size`       — samples per minibatch handed to the data source
/// - `weight_learning_rate` — step size for `w1` and `w2`
/// - `bias_learning_rate`   — step size for `b1` and `b2`
/// - `eval_cadence`         — evaluate every this many steps since the run started
/// - `seed`                 — seeds weight initialization; `None` draws from entropy
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrainConfig {
    pub input_dim: usize,
    pub hidden_dim: usize,
    pub output_dim: usize,
    pub num_epochs: usize,
    pub minibatch_size: usize,
    pub weight_learning_rate: f64,
    pub bias_learning_rate: f64,
    pub eval_cadence: usize,
    pub seed: Option<u64>,
}

impl Default for TrainConfig {
    fn default() -> Self {
        TrainConfig {
            input_dim: 784,
            hidden_dim: 256,
            output_dim: 10,
            num_epochs: 100,
            minibatch_size: 256,
            weight_learning_rate: 0.01,
            bias_learning_rate: 0.01,
            eval_cadence: 40,
            seed: None,
        }
    }
}

impl TrainConfig {
    pub fn validate(&self) -> Result<()> {
        let dims = [
            ("input_dim", self.input_dim),
            ("hidden_dim", self.hidden_dim),
            ("output_dim", self.output_dim),
            ("minibatch_size", self.minibatch_size),
            ("eval_cadence", self.eval_cadence),
        ];
        if let Some((name, _)) = dims.iter().find(|(_, v)| *v == 0) {
            return Err(MlpError::InvalidConfig(format!("{name} must be at least 1")));
        }

        let rates = [
            ("weight_learning_rate", self.weight_learning_rate),
            ("bias_learning_rate", self.bias_learning_rate),
        ];
        if let Some((name, v)) = rates.iter().find(|(_, v)| !v.is_finite() || *v < 0.0) {
            return Err(MlpError::InvalidConfig(format!(
                "{name} must be finite and non-negative, got {v}"
            )));
        }

        Ok(())
    }

    /// Serializes the config to a pretty-printed JSON file.
    pub fn save_json(&self, path: &str) -> Result<()> {
        let file = std::fs::File::create(path)?;
        let writer = std::io::BufWriter::new(file);
        serde_json::to_writer_pretty(writer, self)?;
        Ok(())
    }

    /// Reads a config from JSON; missing fields take their defaults.
    pub fn load_json(path: &str) -> Result<TrainConfig> {
        let file = std::fs::File::open(path)?;
        let reader = std::io::BufReader::new(file);
        let config: TrainConfig = serde_json::from_reader(reader)?;
        config.validate()?;
        Ok(config)
    }
}
