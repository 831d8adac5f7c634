use rand::Rng;

use crate::error::{ensure_shape, MlpError, Result};
use crate::math::matrix::Matrix;

/// The four trainable tensors of the two-layer classifier.
///
/// Shapes are fixed at construction: `w1` is `hidden × input`, `b1` is
/// `hidden × 1`, `w2` is `output × hidden` and `b2` is `output × 1`.
#[derive(Debug, Clone, PartialEq)]
pub struct ParameterSet {
    pub(crate) w1: Matrix,
    pub(crate) b1: Matrix,
    pub(crate) w2: Matrix,
    pub(crate) b2: Matrix,
}

impl ParameterSet {
    /// Draws both weight matrices with variance-scaling initialization and
    /// zeroes the biases.
    pub fn initialize<R: Rng + ?Sized>(
        input_dim: usize,
        hidden_dim: usize,
        output_dim: usize,
        rng: &mut R,
    ) -> ParameterSet {
        let w1 = Matrix::variance_scaling(hidden_dim, input_dim, rng);
        let w2 = Matrix::variance_scaling(output_dim, hidden_dim, rng);

        ParameterSet {
            w1,
            b1: Matrix::zeros(hidden_dim, 1),
            w2,
            b2: Matrix::zeros(output_dim, 1),
        }
    }

    /// Builds a parameter set from explicit tensors, checking that they agree.
    pub fn from_parts(w1: Matrix, b1: Matrix, w2: Matrix, b2: Matrix) -> Result<ParameterSet> {
        let (hidden, input) = w1.shape();
        let output = w2.rows;
        if hidden == 0 || input == 0 || output == 0 {
            return Err(MlpError::InvalidConfig(
                "parameter tensors must have non-zero dimensions".to_owned(),
            ));
        }
        ensure_shape("b1", (hidden, 1), b1.shape())?;
        ensure_shape("w2", (output, hidden), w2.shape())?;
        ensure_shape("b2", (output, 1), b2.shape())?;

        Ok(ParameterSet { w1, b1, w2, b2 })
    }

    pub fn input_dim(&self) -> usize {
        self.w1.cols
    }

    pub fn hidden_dim(&self) -> usize {
        self.w1.rows
    }

    pub fn output_dim(&self) -> usize {
        self.w2.rows
    }

    pub fn w1(&self) -> &Matrix {
        &self.w1
    }

    pub fn b1(&self) -> &Matrix {
        &self.b1
    }

    pub fn w2(&self) -> &Matrix {
        &self.w2
    }

    pub fn b2(&self) -> &Matrix {
        &self.b2
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{rngs::StdRng, SeedableRng};

    #[test]
    fn initialize_uses_layer_shapes_and_zero_biases() {
        let params = ParameterSet::initialize(784, 256, 10, &mut StdRng::seed_from_u64(1));

        assert_eq!(params.w1().shape(), (256, 784));
        assert_eq!(params.b1().shape(), (256, 1));
        assert_eq!(params.w2().shape(), (10, 256));
        assert_eq!(params.b2().shape(), (10, 1));
        assert!(params.b1().data.iter().flatten().all(|&b| b == 0.0));
        assert!(params.b2().data.iter().flatten().all(|&b| b == 0.0));
    }

    #[test]
    fn weight_spread_follows_fan_in_and_fan_out() {
        let params = ParameterSet::initialize(784, 256, 10, &mut StdRng::seed_from_u64(2));
        let w1 = &params.w1().data;
        let n = (256 * 784) as f64;
        let mean = w1.iter().flatten().sum::<f64>() / n;
        let var = w1.iter().flatten().map(|x| (x - mean).powi(2)).sum::<f64>() / n;

        let expected = 4.0 / (784.0 + 256.0);
        assert!(mean.abs() < 0.01);
        assert!((var - expected).abs() / expected < 0.05);
    }

    #[test]
    fn from_parts_rejects_disagreeing_tensors() {
        let err = ParameterSet::from_parts(
            Matrix::zeros(3, 2),
            Matrix::zeros(3, 1),
            Matrix::zeros(2, 4),
            Matrix::zeros(2, 1),
        )
        .unwrap_err();

        assert!(matches!(err, MlpError::ShapeMismatch { what: "w2", .. }));
    }
}
