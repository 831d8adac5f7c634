use crate::error::{ensure_shape, MlpError, Result};
use crate::math::matrix::Matrix;

/// Fraction of samples (columns) whose predicted class differs from the target class.
///
/// Both matrices are `classes × N`. Class indices are column arg-maxes with
/// ties going to the lowest index.
pub fn error_rate(predictions: &Matrix, targets: &Matrix) -> Result<f64> {
    ensure_shape("targets", predictions.shape(), targets.shape())?;
    if predictions.cols == 0 {
        return Err(MlpError::EmptyBatch);
    }

    let wrong = predictions
        .column_argmax()
        .into_iter()
        .zip(targets.column_argmax())
        .filter(|(p, t)| p != t)
        .count();

    Ok(wrong as f64 / predictions.cols as f64)
}

/// Sum of squared differences between `out` and `target`.
pub fn squared_error(out: &Matrix, target: &Matrix) -> Result<f64> {
    ensure_shape("targets", out.shape(), target.shape())?;
    Ok(out
        .data
        .iter()
        .flatten()
        .zip(target.data.iter().flatten())
        .map(|(o, t)| (o - t).powi(2))
        .sum())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn one_hot_columns(classes: usize, labels: &[usize]) -> Matrix {
        let mut m = Matrix::zeros(classes, labels.len());
        for (j, &c) in labels.iter().enumerate() {
            m.data[c][j] = 1.0;
        }
        m
    }

    #[test]
    fn matching_argmax_gives_zero() {
        let targets = one_hot_columns(3, &[0, 2, 1]);
        let predictions = Matrix::from_data(vec![
            vec![0.9, 0.1, 0.2],
            vec![0.3, 0.2, 0.8],
            vec![0.1, 0.7, 0.4],
        ]);
        assert_eq!(error_rate(&predictions, &targets).unwrap(), 0.0);
    }

    #[test]
    fn all_wrong_gives_one() {
        let targets = one_hot_columns(3, &[0, 0]);
        let predictions = one_hot_columns(3, &[1, 2]);
        assert_eq!(error_rate(&predictions, &targets).unwrap(), 1.0);
    }

    #[test]
    fn two_way_tie_picks_lower_index() {
        let predictions = Matrix::column(&[0.1, 0.6, 0.6]);
        assert_eq!(error_rate(&predictions, &one_hot_columns(3, &[1])).unwrap(), 0.0);
        assert_eq!(error_rate(&predictions, &one_hot_columns(3, &[2])).unwrap(), 1.0);
    }

    #[test]
    fn partial_errors_are_a_fraction() {
        let targets = one_hot_columns(2, &[0, 1, 1, 0]);
        let predictions = one_hot_columns(2, &[0, 1, 0, 0]);
        assert_eq!(error_rate(&predictions, &targets).unwrap(), 0.25);
    }

    #[test]
    fn squared_error_sums_every_entry() {
        let out = Matrix::from_data(vec![vec![1.0, 0.5], vec![0.0, 0.5]]);
        let target = one_hot_columns(2, &[0, 1]);
        assert_eq!(squared_error(&out, &target).unwrap(), 0.5);
    }

    #[test]
    fn mismatched_shapes_are_rejected() {
        let err = error_rate(&Matrix::zeros(2, 3), &Matrix::zeros(3, 3)).unwrap_err();
        assert!(matches!(err, MlpError::ShapeMismatch { .. }));
    }
}
