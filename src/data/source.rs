use crate::data::batch::Batch;
use crate::error::{MlpError, Result};

/// Supplies training minibatches and a fixed test set.
pub trait DataSource {
    /// A fresh pass over the training minibatches. Each call restarts from the
    /// first minibatch; the order is the source's own.
    fn train_batches(&self) -> Box<dyn Iterator<Item = Batch> + '_>;

    fn test_batch(&self) -> &Batch;
}

/// Keeps every training row in memory, sliced once into minibatches in order.
///
/// The last minibatch of an epoch holds the remainder and may be smaller.
#[derive(Debug, Clone)]
pub struct InMemorySource {
    train: Vec<Batch>,
    train_len: usize,
    test: Batch,
}

impl InMemorySource {
    pub fn new(
        train_inputs: Vec<Vec<f64>>,
        train_labels: Vec<Vec<f64>>,
        test_inputs: &[Vec<f64>],
        test_labels: &[Vec<f64>],
        minibatch_size: usize,
    ) -> Result<InMemorySource> {
        if minibatch_size == 0 {
            return Err(MlpError::InvalidConfig("minibatch_size must be at least 1".to_owned()));
        }
        if train_inputs.len() != train_labels.len() {
            return Err(MlpError::Dataset(format!(
                "{} training samples but {} training labels",
                train_inputs.len(),
                train_labels.len()
            )));
        }
        // Whole-set check so every minibatch shares one sample and label width.
        Batch::from_rows(&train_inputs, &train_labels)?;
        let train = train_inputs
            .chunks(minibatch_size)
            .zip(train_labels.chunks(minibatch_size))
            .map(|(inputs, labels)| Batch::from_rows(inputs, labels))
            .collect::<Result<Vec<_>>>()?;
        let test = Batch::from_rows(test_inputs, test_labels)?;

        Ok(InMemorySource {
            train,
            train_len: train_inputs.len(),
            test,
        })
    }

    pub fn train_len(&self) -> usize {
        self.train_len
    }

    pub fn batches_per_epoch(&self) -> usize {
        self.train.len()
    }
}

impl DataSource for InMemorySource {
    fn train_batches(&self) -> Box<dyn Iterator<Item = Batch> + '_> {
        Box::new(self.train.iter().cloned())
    }

    fn test_batch(&self) -> &Batch {
        &self.test
    }
}
