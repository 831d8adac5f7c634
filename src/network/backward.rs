use crate::error::{ensure_shape, MlpError, Result};
use crate::math::matrix::Matrix;
use crate::network::params::ParameterSet;

/// Batch-mean gradients, shaped like the `ParameterSet` they update.
#[derive(Debug, Clone, PartialEq)]
pub struct Gradients {
    pub w1: Matrix,
    pub b1: Matrix,
    pub w2: Matrix,
    pub b2: Matrix,
}

impl Gradients {
    fn is_finite(&self) -> bool {
        self.w1.is_finite() && self.b1.is_finite() && self.w2.is_finite() && self.b2.is_finite()
    }
}

/// `e ⊙ (1 - e)`, the sigmoid-style factor applied to both error terms.
fn sigmoid_style_factor(e: &Matrix) -> Matrix {
    e.map(|x| x * (1.0 - x))
}

/// Computes parameter gradients for one batch.
///
/// `a1` is `input × N`, `a2` is `hidden × N`, and `out` and `target` are
/// `output × N` (one sample per column).
///
/// The output error and the back-propagated hidden error are both multiplied
/// by `e ⊙ (1 - e)` as if the error itself were a sigmoid activation. This is
/// not the gradient of any standard loss, but it is the update rule the
/// classifier is tuned for; see `DESIGN.md`.
pub fn backward(
    params: &ParameterSet,
    a1: &Matrix,
    a2: &Matrix,
    out: &Matrix,
    target: &Matrix,
) -> Result<Gradients> {
    let n = a1.cols;
    if n == 0 {
        return Err(MlpError::EmptyBatch);
    }
    ensure_shape("input activations", (params.input_dim(), n), a1.shape())?;
    ensure_shape("hidden activations", (params.hidden_dim(), n), a2.shape())?;
    ensure_shape("normalized output", (params.output_dim(), n), out.shape())?;
    ensure_shape("targets", (params.output_dim(), n), target.shape())?;

    let delta3 = sigmoid_style_factor(&(out - target));
    let delta2 = sigmoid_style_factor(&(&params.w2.transpose() * &delta3));

    let inv_n = 1.0 / n as f64;
    let grads = Gradients {
        w1: (&delta2 * &a1.transpose()).scale(inv_n),
        b1: delta2.row_sums().scale(inv_n),
        w2: (&delta3 * &a2.transpose()).scale(inv_n),
        b2: delta3.row_sums().scale(inv_n),
    };

    if !grads.is_finite() {
        return Err(MlpError::NumericInstability { stage: "backward pass" });
    }

    Ok(grads)
}
