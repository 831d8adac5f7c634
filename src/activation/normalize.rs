use crate::math::matrix::Matrix;

/// Column-wise max-exponential normalizer applied to the output activations.
///
/// For each column `c` the normalizer is `ln(max_j exp(c_j - max c)) + max c`
/// and every entry becomes `exp(c_j - normalizer)`. The denominator is the
/// largest exponential, not the sum of exponentials, so columns do not sum to
/// one: the winning entry maps to exactly `1.0` and the rest to
/// `exp(c_j - max c)` in `(0, 1]`.
///
/// NOTE: this is not a softmax. Training behavior depends on it, so it is kept
/// as-is rather than replaced by the textbook form.
pub fn normalize(a3: &Matrix) -> Matrix {
    let col_max = a3.column_max();

    // ln(max_j exp(c_j - m)) + m, computed literally.
    let normalizer: Vec<f64> = col_max
        .iter()
        .enumerate()
        .map(|(j, &m)| {
            let max_exp = a3
                .data
                .iter()
                .map(|row| (row[j] - m).exp())
                .fold(f64::NEG_INFINITY, f64::max);
            max_exp.ln() + m
        })
        .collect();

    let data = a3
        .data
        .iter()
        .map(|row| {
            row.iter()
                .zip(normalizer.iter())
                .map(|(x, n)| (x - n).exp())
                .collect()
        })
        .collect();

    Matrix {
        rows: a3.rows,
        cols: a3.cols,
        data,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn uniform_column_maps_to_all_ones() {
        let out = normalize(&Matrix::from_data(vec![vec![0.5]; 10]));
        assert_eq!(out.shape(), (10, 1));
        assert!(out.data.iter().all(|row| row[0] == 1.0));
    }

    #[test]
    fn columns_are_scaled_by_their_own_max() {
        let a3 = Matrix::from_data(vec![vec![0.0, 3.0], vec![1.0, 1.0]]);
        let out = normalize(&a3);

        assert!((out.data[0][0] - (-1.0f64).exp()).abs() < 1e-12);
        assert!((out.data[1][0] - 1.0).abs() < 1e-12);
        assert!((out.data[0][1] - 1.0).abs() < 1e-12);
        assert!((out.data[1][1] - (-2.0f64).exp()).abs() < 1e-12);
    }

    #[test]
    fn large_inputs_stay_finite_and_non_negative() {
        let a3 = Matrix::from_data(vec![vec![800.0, -800.0], vec![790.0, -805.0]]);
        let out = normalize(&a3);
        assert!(out.is_finite());
        assert!(out.data.iter().flatten().all(|&x| x >= 0.0));
    }
}
