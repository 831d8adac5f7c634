use crate::error::{ensure_shape, MlpError, Result};
use crate::math::matrix::Matrix;

/// A set of samples with their one-hot labels, one sample per row.
#[derive(Debug, Clone, PartialEq)]
pub struct Batch {
    samples: Matrix,
    labels: Matrix,
}

impl Batch {
    /// Pairs `samples` (`N × input`) with `labels` (`N × classes`).
    ///
    /// # Errors
    /// `ShapeMismatch` if either matrix's rows disagree with its declared
    /// width, or if the row counts differ.
    pub fn new(samples: Matrix, labels: Matrix) -> Result<Batch> {
        ensure_rectangular(&samples, "batch samples")?;
        ensure_rectangular(&labels, "batch labels")?;
        ensure_shape("batch labels", (samples.rows, labels.cols), labels.shape())?;
        Ok(Batch { samples, labels })
    }

    /// Builds a batch from row slices. Every row must share its slice's width.
    pub fn from_rows(samples: &[Vec<f64>], labels: &[Vec<f64>]) -> Result<Batch> {
        Batch::new(rows_to_matrix(samples, "batch samples")?, rows_to_matrix(labels, "batch labels")?)
    }

    pub fn samples(&self) -> &Matrix {
        &self.samples
    }

    pub fn labels(&self) -> &Matrix {
        &self.labels
    }

    pub fn len(&self) -> usize {
        self.samples.rows
    }

    pub fn is_empty(&self) -> bool {
        self.samples.rows == 0
    }
}

fn ensure_rectangular(m: &Matrix, what: &'static str) -> Result<()> {
    if m.is_rectangular() {
        return Ok(());
    }
    let width = m.data.iter().map(Vec::len).find(|&w| w != m.cols).unwrap_or(m.cols);
    Err(MlpError::ShapeMismatch {
        what,
        expected: m.shape(),
        got: (m.data.len(), width),
    })
}

fn rows_to_matrix(rows: &[Vec<f64>], what: &'static str) -> Result<Matrix> {
    let width = rows.first().map_or(0, Vec::len);
    if let Some(bad) = rows.iter().find(|row| row.len() != width) {
        return Err(MlpError::ShapeMismatch {
            what,
            expected: (rows.len(), width),
            got: (rows.len(), bad.len()),
        });
    }
    Ok(Matrix::from_data(rows.to_vec()))
}
