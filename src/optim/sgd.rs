use crate::{network::backward::Gradients, network::params::ParameterSet};

/// Plain fixed-step gradient descent with separate weight and bias rates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sgd {
    pub weight_learning_rate: f64,
    pub bias_learning_rate: f64,
}

impl Sgd {
    pub fn new(weight_learning_rate: f64, bias_learning_rate: f64) -> Sgd {
        Sgd {
            weight_learning_rate,
            bias_learning_rate,
        }
    }

    /// Applies one update to `params` in place given batch-mean gradients.
    pub fn step(&self, params: &mut ParameterSet, grads: &Gradients) {
        params.w1.sub_scaled_assign(self.weight_learning_rate, &grads.w1);
        params.w2.sub_scaled_assign(self.weight_learning_rate, &grads.w2);
        params.b1.sub_scaled_assign(self.bias_learning_rate, &grads.b1);
        params.b2.sub_scaled_assign(self.bias_learning_rate, &grads.b2);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::matrix::Matrix;

    #[test]
    fn weights_and_biases_use_their_own_rates() {
        let mut params = ParameterSet::from_parts(
            Matrix::from_data(vec![vec![1.0]]),
            Matrix::column(&[1.0]),
            Matrix::from_data(vec![vec![1.0]]),
            Matrix::column(&[1.0]),
        )
        .unwrap();
        let ones = Matrix::from_data(vec![vec![1.0]]);
        let grads = Gradients {
            w1: ones.clone(),
            b1: ones.clone(),
            w2: ones.clone(),
            b2: ones,
        };

        Sgd::new(0.5, 0.25).step(&mut params, &grads);

        assert_eq!(params.w1().data, vec![vec![0.5]]);
        assert_eq!(params.w2().data, vec![vec![0.5]]);
        assert_eq!(params.b1().data, vec![vec![0.75]]);
        assert_eq!(params.b2().data, vec![vec![0.75]]);
    }
}
