use rand::Rng;
use std::f64::consts::PI;
use std::ops::{Mul, Sub};

#[derive(Debug, Clone, PartialEq)]
pub struct Matrix {
    pub rows: usize,
    pub cols: usize,
    pub data: Vec<Vec<f64>>,
}

impl Matrix {
    pub fn zeros(rows: usize, cols: usize) -> Matrix {
        Matrix {
            rows,
            cols,
            data: vec![vec![0.0; cols]; rows],
        }
    }

    /// Builds a matrix from row vectors. An empty `data` yields a 0×0 matrix.
    ///
    /// Every row must have the same length as the first one; use
    /// `is_rectangular` to check matrices built from untrusted rows.
    pub fn from_data(data: Vec<Vec<f64>>) -> Matrix {
        let cols = data.first().map_or(0, Vec::len);
        debug_assert!(data.iter().all(|row| row.len() == cols), "ragged matrix rows");
        Matrix {
            rows: data.len(),
            cols,
            data,
        }
    }

    /// A `len × 1` column vector.
    pub fn column(values: &[f64]) -> Matrix {
        Matrix::from_data(values.iter().map(|&v| vec![v]).collect())
    }

    pub fn shape(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }

    /// Samples a single value from N(0, 1) using the Box-Muller transform.
    /// Both u1 and u2 must be uniform on (0, 1].
    fn sample_standard_normal<R: Rng + ?Sized>(rng: &mut R) -> f64 {
        // Draw two independent uniform samples in (0, 1] to avoid log(0).
        let u1: f64 = 1.0 - rng.gen::<f64>();
        let u2: f64 = 1.0 - rng.gen::<f64>();
        (-2.0 * u1.ln()).sqrt() * (2.0 * PI * u2).cos()
    }

    /// Samples every entry from N(0, std_dev²).
    pub fn random_normal<R: Rng + ?Sized>(rows: usize, cols: usize, std_dev: f64, rng: &mut R) -> Matrix {
        let mut res = Matrix::zeros(rows, cols);
        for i in 0..rows {
            for j in 0..cols {
                res.data[i][j] = Matrix::sample_standard_normal(rng) * std_dev;
            }
        }
        res
    }

    /// Variance-scaling initialization: samples from N(0, sqrt(4 / (rows + cols))).
    ///
    /// Shape: (rows, cols). `cols` is the fan-in and `rows` the fan-out, so the
    /// scale keeps sigmoid activations away from saturation on both passes.
    pub fn variance_scaling<R: Rng + ?Sized>(rows: usize, cols: usize, rng: &mut R) -> Matrix {
        let std_dev = (4.0 / (rows + cols) as f64).sqrt();
        Matrix::random_normal(rows, cols, std_dev, rng)
    }

    pub fn transpose(&self) -> Matrix {
        let mut res = Matrix::zeros(self.cols, self.rows);

        for i in 0..res.rows {
            for j in 0..res.cols {
                res.data[i][j] = self.data[j][i];
            }
        }

        res
    }

    pub fn map<F>(&self, functor: F) -> Matrix
    where
        F: Fn(f64) -> f64,
    {
        Matrix {
            rows: self.rows,
            cols: self.cols,
            data: self
                .data
                .iter()
                .map(|row| row.iter().map(|&x| functor(x)).collect())
                .collect(),
        }
    }

    /// Element-wise (Hadamard) product of two same-shape matrices.
    pub fn hadamard(&self, rhs: &Matrix) -> Matrix {
        assert_eq!(self.shape(), rhs.shape(), "Matrices are of incorrect sizes");
        let data = self
            .data
            .iter()
            .zip(rhs.data.iter())
            .map(|(row_a, row_b)| row_a.iter().zip(row_b.iter()).map(|(x, y)| x * y).collect())
            .collect();
        Matrix::from_shape_data(self.rows, self.cols, data)
    }

    /// Adds the `rows × 1` column vector `bias` to every column.
    pub fn add_column(&self, bias: &Matrix) -> Matrix {
        assert_eq!((self.rows, 1), bias.shape(), "Matrices are of incorrect sizes");
        let data = self
            .data
            .iter()
            .zip(bias.data.iter())
            .map(|(row, b)| row.iter().map(|x| x + b[0]).collect())
            .collect();
        Matrix::from_shape_data(self.rows, self.cols, data)
    }

    /// Sums each row into a `rows × 1` column vector.
    pub fn row_sums(&self) -> Matrix {
        Matrix::from_shape_data(
            self.rows,
            1,
            self.data.iter().map(|row| vec![row.iter().sum()]).collect(),
        )
    }

    /// Maximum of each column. Empty for a matrix without rows.
    pub fn column_max(&self) -> Vec<f64> {
        if self.rows == 0 {
            return Vec::new();
        }
        (0..self.cols)
            .map(|j| {
                self.data
                    .iter()
                    .map(|row| row[j])
                    .fold(f64::NEG_INFINITY, f64::max)
            })
            .collect()
    }

    /// Row index of the largest entry in each column.
    ///
    /// Ties resolve to the lowest row index; NaN entries never win.
    pub fn column_argmax(&self) -> Vec<usize> {
        (0..self.cols)
            .map(|j| {
                let mut best = 0;
                for i in 1..self.rows {
                    if self.data[i][j] > self.data[best][j] {
                        best = i;
                    }
                }
                best
            })
            .collect()
    }

    pub fn scale(&self, factor: f64) -> Matrix {
        self.map(|x| x * factor)
    }

    /// `self -= rate * rhs`, in place.
    pub fn sub_scaled_assign(&mut self, rate: f64, rhs: &Matrix) {
        assert_eq!(self.shape(), rhs.shape(), "Matrices are of incorrect sizes");
        for (row, rhs_row) in self.data.iter_mut().zip(rhs.data.iter()) {
            for (x, g) in row.iter_mut().zip(rhs_row.iter()) {
                *x -= rate * g;
            }
        }
    }

    /// True when `data` really is `rows × cols`.
    pub fn is_rectangular(&self) -> bool {
        self.data.len() == self.rows && self.data.iter().all(|row| row.len() == self.cols)
    }

    pub fn is_finite(&self) -> bool {
        self.data.iter().flatten().all(|x| x.is_finite())
    }

    fn from_shape_data(rows: usize, cols: usize, data: Vec<Vec<f64>>) -> Matrix {
        Matrix { rows, cols, data }
    }
}

impl Sub for &Matrix {
    type Output = Matrix;

    fn sub(self, rhs: Self) -> Self::Output {
        if self.rows != rhs.rows || self.cols != rhs.cols {
            panic!("Matrices are of incorrect sizes")
        }

        let mut res = Matrix::zeros(self.rows, self.cols);

        for i in 0..self.rows {
            for j in 0..self.cols {
                res.data[i][j] = self.data[i][j] - rhs.data[i][j];
            }
        }

        res
    }
}

impl Mul for &Matrix {
    type Output = Matrix;

    fn mul(self, rhs: Self) -> Self::Output {
        if self.cols != rhs.rows {
            panic!("Matrices are of incorrect sizes")
        }

        let mut res = Matrix::zeros(self.rows, rhs.cols);

        // i-k-j order keeps the inner loop on contiguous rows.
        for i in 0..self.rows {
            let out = &mut res.data[i];
            for k in 0..self.cols {
                let a = self.data[i][k];
                for (o, b) in out.iter_mut().zip(rhs.data[k].iter()) {
                    *o += a * b;
                }
            }
        }

        res
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{rngs::StdRng, SeedableRng};

    #[test]
    fn product_matches_hand_computation() {
        let a = Matrix::from_data(vec![vec![1.0, 2.0], vec![3.0, 4.0]]);
        let b = Matrix::from_data(vec![vec![5.0], vec![6.0]]);
        assert_eq!((&a * &b).data, vec![vec![17.0], vec![39.0]]);
    }

    #[test]
    fn add_column_broadcasts_over_every_column() {
        let m = Matrix::zeros(2, 3);
        let b = Matrix::column(&[1.0, -1.0]);
        assert_eq!(m.add_column(&b).data, vec![vec![1.0; 3], vec![-1.0; 3]]);
    }

    #[test]
    fn row_sums_and_column_max() {
        let m = Matrix::from_data(vec![vec![1.0, 5.0], vec![4.0, 2.0]]);
        assert_eq!(m.row_sums().data, vec![vec![6.0], vec![6.0]]);
        assert_eq!(m.column_max(), vec![4.0, 5.0]);
    }

    #[test]
    fn column_argmax_prefers_lowest_index_on_ties() {
        let m = Matrix::from_data(vec![vec![0.2, 0.7], vec![0.9, 0.7], vec![0.9, 0.1]]);
        assert_eq!(m.column_argmax(), vec![1, 0]);
    }

    #[test]
    fn sub_scaled_assign_updates_in_place() {
        let mut m = Matrix::from_data(vec![vec![1.0, 1.0]]);
        m.sub_scaled_assign(0.5, &Matrix::from_data(vec![vec![2.0, -2.0]]));
        assert_eq!(m.data, vec![vec![0.0, 2.0]]);
    }

    #[test]
    fn variance_scaling_is_reproducible_for_a_seed() {
        let a = Matrix::variance_scaling(4, 3, &mut StdRng::seed_from_u64(7));
        let b = Matrix::variance_scaling(4, 3, &mut StdRng::seed_from_u64(7));
        assert_eq!(a, b);
        assert_eq!(a.shape(), (4, 3));
        assert!(a.is_finite());
    }

    #[test]
    fn from_data_accepts_empty_input() {
        assert_eq!(Matrix::from_data(vec![]).shape(), (0, 0));
    }
}
