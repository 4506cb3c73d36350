use approx::abs_diff_eq;
use faer::{Mat, linalg::solvers::DenseSolveCore};

/// Online ridge regression for one action
///
/// Keeps the precision matrix `A = λI + Σ x xᵀ`, its inverse, and `b = Σ y x`.
/// The inverse is maintained with Sherman-Morrison rank-one updates and only
/// recomputed from `A` when the update becomes numerically unsafe.
#[derive(Debug, Clone)]
pub struct RidgeRegression {
    l2_lambda: f64,
    precision: Mat<f64>,
    covariance: Mat<f64>,
    xty: Mat<f64>,
    coefficients: Mat<f64>,
    observations: usize,
}

impl RidgeRegression {
    /// Create an untrained model with `num_features` inputs
    pub fn new(num_features: usize, l2_lambda: f64) -> Self {
        let precision = Mat::from_fn(num_features, num_features, |i, j| {
            if i == j { l2_lambda } else { 0.0 }
        });
        let covariance = Mat::from_fn(num_features, num_features, |i, j| {
            if i == j { 1.0 / l2_lambda } else { 0.0 }
        });

        Self {
            l2_lambda,
            precision,
            covariance,
            xty: Mat::zeros(num_features, 1),
            coefficients: Mat::zeros(num_features, 1),
            observations: 0,
        }
    }

    /// Number of input features
    pub fn num_features(&self) -> usize {
        self.precision.nrows()
    }

    /// Number of samples fitted so far
    pub fn observations(&self) -> usize {
        self.observations
    }

    /// Incorporate one `(x, y)` sample
    pub fn fit(&mut self, x: &[f64], y: f64) {
        let d = self.num_features();

        for i in 0..d {
            for j in 0..d {
                self.precision[(i, j)] += x[i] * x[j];
            }
            self.xty[(i, 0)] += x[i] * y;
        }

        // A⁻¹ ← A⁻¹ - (A⁻¹x)(A⁻¹x)ᵀ / (1 + xᵀA⁻¹x)
        let x_col = Mat::from_fn(d, 1, |i, _| x[i]);
        let cx = &self.covariance * &x_col;
        let denominator = 1.0 + (0..d).map(|i| x[i] * cx[(i, 0)]).sum::<f64>();

        if abs_diff_eq!(denominator, 0.0, epsilon = 1e-10) {
            self.covariance = self.precision.partial_piv_lu().inverse();
        } else {
            for i in 0..d {
                for j in 0..d {
                    self.covariance[(i, j)] -= cx[(i, 0)] * cx[(j, 0)] / denominator;
                }
            }
        }

        self.coefficients = &self.covariance * &self.xty;
        self.observations += 1;
    }

    /// Point estimate `xᵀβ`
    pub fn predict(&self, x: &[f64]) -> f64 {
        x.iter()
            .enumerate()
            .map(|(i, xi)| xi * self.coefficients[(i, 0)])
            .sum()
    }

    /// Confidence width `sqrt(xᵀA⁻¹x)`
    pub fn width(&self, x: &[f64]) -> f64 {
        let d = self.num_features();
        let mut quad = 0.0;
        for i in 0..d {
            for j in 0..d {
                quad += x[i] * self.covariance[(i, j)] * x[j];
            }
        }
        quad.max(0.0).sqrt()
    }

    /// Coefficient `i` of the current estimate
    pub fn coefficient(&self, i: usize) -> f64 {
        self.coefficients[(i, 0)]
    }

    /// Diagonal entry `i` of `A⁻¹`
    pub fn variance(&self, i: usize) -> f64 {
        self.covariance[(i, i)]
    }

    /// Forget all fitted samples
    pub fn reset(&mut self) {
        *self = Self::new(self.num_features(), self.l2_lambda);
    }
}
