use crate::math::matrix::Matrix;

/// Logistic sigmoid, `1 / (1 + e^-x)`.
pub fn sigmoid(x: f64) -> f64 {
    1.0 / (1.0 + (-x).exp())
}

/// Element-wise sigmoid over a whole matrix.
pub fn sigmoid_matrix(z: &Matrix) -> Matrix {
    z.map(sigmoid)
}
