//! Mean/variance standardization with frozen fit-time parameters

use ndarray::ArrayView2;
use serde::{Deserialize, Serialize};

/// Standard scaler: `(value - mean) / std` per feature column.
///
/// Uses the population standard deviation (ddof = 0). A zero standard
/// deviation is recorded as-is at fit time; the pipeline rejects such a
/// feature at transform time instead of dividing by zero.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StandardScaler {
    means: Vec<f64>,
    stds: Vec<f64>,
}

impl StandardScaler {
    /// Fit means and standard deviations over an (already imputed) matrix.
    pub fn fit(x: ArrayView2<'_, f64>) -> Self {
        let n = x.nrows() as f64;
        let mut means = Vec::with_capacity(x.ncols());
        let mut stds = Vec::with_capacity(x.ncols());

        for j in 0..x.ncols() {
            let col = x.column(j);
            let mean = col.sum() / n;
            let var = col.iter().map(|v| (v - mean) * (v - mean)).sum::<f64>() / n;
            means.push(mean);
            stds.push(var.sqrt());
        }

        Self { means, stds }
    }

    /// Rebuild a scaler from frozen parameters (artifact load path).
    pub fn from_params(means: Vec<f64>, stds: Vec<f64>) -> Self {
        Self { means, stds }
    }

    /// Standardize a single value; `None` if the column is degenerate
    /// (zero standard deviation).
    pub fn standardize(&self, column: usize, value: f64) -> Option<f64> {
        let std = self.stds[column];
        if std == 0.0 {
            None
        } else {
            Some((value - self.means[column]) / std)
        }
    }

    pub fn means(&self) -> &[f64] {
        &self.means
    }

    pub fn stds(&self) -> &[f64] {
        &self.stds
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn test_fit_population_std() {
        let x = array![[1.0], [2.0], [3.0], [4.0]];
        let scaler = StandardScaler::fit(x.view());
        assert!((scaler.means()[0] - 2.5).abs() < 1e-12);
        // population variance of [1,2,3,4] = 1.25
        assert!((scaler.stds()[0] - 1.25f64.sqrt()).abs() < 1e-12);
    }

    #[test]
    fn test_standardize_known_params() {
        // mean(BMI)=30, std(BMI)=5; 18.5 => (18.5-30)/5 = -2.3
        let scaler = StandardScaler::from_params(vec![30.0], vec![5.0]);
        assert_eq!(scaler.standardize(0, 18.5), Some(-2.3));
    }

    #[test]
    fn test_degenerate_column() {
        let x = array![[7.0], [7.0], [7.0]];
        let scaler = StandardScaler::fit(x.view());
        assert_eq!(scaler.stds()[0], 0.0);
        assert_eq!(scaler.standardize(0, 7.0), None);
    }
}
