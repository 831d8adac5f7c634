use crate::activation::activation::sigmoid_matrix;
use crate::error::{ensure_shape, MlpError, Result};
use crate::math::matrix::Matrix;
use crate::network::params::ParameterSet;

/// Layer activations for one batch, one sample per column.
#[derive(Debug, Clone)]
pub struct Activations {
    /// Transposed input, `input × N`.
    pub a1: Matrix,
    /// Hidden layer, `hidden × N`.
    pub a2: Matrix,
    /// Output layer before normalization, `output × N`.
    pub a3: Matrix,
}

/// Runs `samples` (`N × input`, one sample per row) through both sigmoid layers.
pub fn forward(params: &ParameterSet, samples: &Matrix) -> Result<Activations> {
    ensure_shape(
        "batch samples",
        (samples.rows, params.input_dim()),
        samples.shape(),
    )?;

    let a1 = samples.transpose();
    let a2 = sigmoid_matrix(&(&params.w1 * &a1).add_column(&params.b1));
    if !a2.is_finite() {
        return Err(MlpError::NumericInstability { stage: "hidden layer" });
    }

    let a3 = sigmoid_matrix(&(&params.w2 * &a2).add_column(&params.b2));
    if !a3.is_finite() {
        return Err(MlpError::NumericInstability { stage: "output layer" });
    }

    Ok(Activations { a1, a2, a3 })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{rngs::StdRng, SeedableRng};

    #[test]
    fn output_has_one_column_per_sample() {
        let params = ParameterSet::initialize(6, 4, 3, &mut StdRng::seed_from_u64(3));
        for n in [1, 2, 7] {
            let acts = forward(&params, &Matrix::zeros(n, 6)).unwrap();
            assert_eq!(acts.a1.shape(), (6, n));
            assert_eq!(acts.a2.shape(), (4, n));
            assert_eq!(acts.a3.shape(), (3, n));
        }
    }

    #[test]
    fn zero_parameters_give_one_half_everywhere() {
        let params = ParameterSet::from_parts(
            Matrix::zeros(256, 784),
            Matrix::zeros(256, 1),
            Matrix::zeros(10, 256),
            Matrix::zeros(10, 1),
        )
        .unwrap();

        let acts = forward(&params, &Matrix::zeros(1, 784)).unwrap();
        assert!(acts.a2.data.iter().flatten().all(|&x| x == 0.5));
        assert!(acts.a3.data.iter().flatten().all(|&x| x == 0.5));
    }

    #[test]
    fn bias_is_broadcast_across_samples() {
        let params = ParameterSet::from_parts(
            Matrix::zeros(1, 2),
            Matrix::column(&[2.0]),
            Matrix::from_data(vec![vec![1.0]]),
            Matrix::zeros(1, 1),
        )
        .unwrap();

        let acts = forward(&params, &Matrix::from_data(vec![vec![1.0, 1.0], vec![-3.0, 5.0]])).unwrap();
        let expected = 1.0 / (1.0 + (-2.0f64).exp());
        assert_eq!(acts.a2.data, vec![vec![expected, expected]]);
    }

    #[test]
    fn wrong_input_width_is_rejected() {
        let params = ParameterSet::initialize(6, 4, 3, &mut StdRng::seed_from_u64(3));
        let err = forward(&params, &Matrix::zeros(2, 5)).unwrap_err();
        assert!(matches!(
            err,
            MlpError::ShapeMismatch { expected: (2, 6), got: (2, 5), .. }
        ));
    }

    #[test]
    fn nan_input_is_reported_as_instability() {
        let params = ParameterSet::initialize(2, 2, 2, &mut StdRng::seed_from_u64(4));
        let samples = Matrix::from_data(vec![vec![f64::NAN, 0.0]]);
        assert!(matches!(
            forward(&params, &samples),
            Err(MlpError::NumericInstability { .. })
        ));
    }
}
