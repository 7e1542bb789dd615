//! Binary logistic risk classifier

use crate::error::{Result, RiskError};
use ndarray::{Array1, ArrayView1, ArrayView2};
use serde::{Deserialize, Serialize};

/// Thresholded classification outcome.
///
/// `High` iff the predicted probability is >= 0.5; the threshold is inclusive
/// on the high side and is the only one supported by this design.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskLabel {
    Low,
    High,
}

/// One classification result: probability plus thresholded label
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Prediction {
    pub probability: f64,
    pub label: RiskLabel,
}

/// Logistic regression for binary risk classification
///
/// Fitted by gradient descent on the standard logistic loss with L2
/// regularization. Fitting fails with a convergence error if the gradient
/// norm does not drop below the tolerance within the iteration budget.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogisticRegression {
    coefficients: Option<Array1<f64>>,
    intercept: Option<f64>,
    l2: f64,
    max_iter: usize,
    tol: f64,
    learning_rate: f64,
    is_fitted: bool,
}

impl Default for LogisticRegression {
    fn default() -> Self {
        Self::new()
    }
}

impl LogisticRegression {
    pub fn new() -> Self {
        Self {
            coefficients: None,
            intercept: None,
            l2: 0.01,
            max_iter: 10_000,
            tol: 1e-4,
            learning_rate: 0.1,
            is_fitted: false,
        }
    }

    /// Set L2 regularization strength
    pub fn with_l2(mut self, l2: f64) -> Self {
        self.l2 = l2;
        self
    }

    /// Set maximum iterations
    pub fn with_max_iter(mut self, max_iter: usize) -> Self {
        self.max_iter = max_iter;
        self
    }

    /// Set convergence tolerance on the gradient norm
    pub fn with_tol(mut self, tol: f64) -> Self {
        self.tol = tol;
        self
    }

    /// Set learning rate
    pub fn with_learning_rate(mut self, lr: f64) -> Self {
        self.learning_rate = lr;
        self
    }

    /// Rebuild a fitted classifier from frozen parameters (artifact load path).
    pub fn from_params(coefficients: Array1<f64>, intercept: f64) -> Self {
        Self {
            coefficients: Some(coefficients),
            intercept: Some(intercept),
            is_fitted: true,
            ..Self::new()
        }
    }

    fn sigmoid(z: &Array1<f64>) -> Array1<f64> {
        z.mapv(|v| 1.0 / (1.0 + (-v).exp()))
    }

    /// Fit by gradient descent.
    ///
    /// `y` holds binary labels as 0.0/1.0. Converges when the gradient norm
    /// drops below the tolerance; exhausting the iteration budget first is an
    /// error, not a silently half-trained model.
    pub fn fit(&mut self, x: ArrayView2<'_, f64>, y: ArrayView1<'_, f64>) -> Result<&mut Self> {
        let n_samples = x.nrows();
        let n_features = x.ncols();

        if n_samples != y.len() {
            return Err(RiskError::Shape {
                expected: format!("y length = {}", n_samples),
                actual: format!("y length = {}", y.len()),
            });
        }

        let mut weights: Array1<f64> = Array1::zeros(n_features);
        let mut bias = 0.0;
        let lr = self.learning_rate;
        let mut grad_norm = f64::INFINITY;
        let mut converged = false;

        for _iter in 0..self.max_iter {
            let linear = x.dot(&weights) + bias;
            let predictions = Self::sigmoid(&linear);

            let errors = &predictions - &y;
            let dw = (x.t().dot(&errors) / n_samples as f64) + &weights * self.l2;
            let db = errors.mean().unwrap_or(0.0);

            grad_norm = (dw.dot(&dw) + db * db).sqrt();
            if grad_norm < self.tol {
                converged = true;
                break;
            }

            weights = weights - &dw * lr;
            bias -= lr * db;
        }

        if !converged {
            return Err(RiskError::Convergence {
                iterations: self.max_iter,
                gradient_norm: grad_norm,
            });
        }

        self.coefficients = Some(weights);
        self.intercept = Some(bias);
        self.is_fitted = true;

        Ok(self)
    }

    /// Predict probabilities for a standardized matrix.
    pub fn predict_proba(&self, x: ArrayView2<'_, f64>) -> Result<Array1<f64>> {
        let coefficients = self.coefficients.as_ref().ok_or_else(|| {
            RiskError::Fit("classifier is not fitted".to_string())
        })?;
        let intercept = self.intercept.unwrap_or(0.0);

        let linear = x.dot(coefficients) + intercept;
        Ok(Self::sigmoid(&linear))
    }

    /// Classify one standardized vector. Pure and deterministic.
    pub fn predict_one(&self, x: ArrayView1<'_, f64>) -> Result<Prediction> {
        let coefficients = self.coefficients.as_ref().ok_or_else(|| {
            RiskError::Fit("classifier is not fitted".to_string())
        })?;
        let intercept = self.intercept.unwrap_or(0.0);

        let z = x.dot(coefficients) + intercept;
        let probability = 1.0 / (1.0 + (-z).exp());
        let label = if probability >= 0.5 {
            RiskLabel::High
        } else {
            RiskLabel::Low
        };

        Ok(Prediction { probability, label })
    }

    /// Thresholded labels for a standardized matrix.
    pub fn predict(&self, x: ArrayView2<'_, f64>) -> Result<Array1<f64>> {
        let proba = self.predict_proba(x)?;
        Ok(proba.mapv(|p| if p >= 0.5 { 1.0 } else { 0.0 }))
    }

    pub fn coefficients(&self) -> Option<&Array1<f64>> {
        self.coefficients.as_ref()
    }

    pub fn intercept(&self) -> Option<f64> {
        self.intercept
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn test_fit_separable() {
        let x = array![
            [-1.0, -1.0],
            [-1.5, -1.5],
            [-2.0, -2.0],
            [1.0, 1.0],
            [1.5, 1.5],
            [2.0, 2.0],
        ];
        let y = array![0.0, 0.0, 0.0, 1.0, 1.0, 1.0];

        let mut model = LogisticRegression::new()
            .with_learning_rate(0.5)
            .with_tol(1e-3)
            .with_max_iter(100_000);
        model.fit(x.view(), y.view()).unwrap();

        let labels = model.predict(x.view()).unwrap();
        assert_eq!(labels, y);
    }

    #[test]
    fn test_convergence_budget_exhausted() {
        let x = array![[-1.0], [1.0]];
        let y = array![0.0, 1.0];

        let mut model = LogisticRegression::new().with_max_iter(2).with_tol(1e-12);
        let err = model.fit(x.view(), y.view()).unwrap_err();
        assert!(matches!(err, RiskError::Convergence { iterations: 2, .. }));
    }

    #[test]
    fn test_threshold_inclusive_at_half() {
        // Zero coefficients and intercept give probability exactly 0.5,
        // which must classify as High.
        let model = LogisticRegression::from_params(Array1::zeros(2), 0.0);
        let prediction = model.predict_one(array![1.0, -1.0].view()).unwrap();
        assert_eq!(prediction.probability, 0.5);
        assert_eq!(prediction.label, RiskLabel::High);
    }

    #[test]
    fn test_unfitted_predict_fails() {
        let model = LogisticRegression::new();
        assert!(model.predict_one(array![0.0].view()).is_err());
    }

    #[test]
    fn test_predict_proba_range() {
        let model = LogisticRegression::from_params(array![3.0], -1.0);
        let proba = model.predict_proba(array![[-10.0], [0.0], [10.0]].view()).unwrap();
        for p in proba.iter() {
            assert!((0.0..=1.0).contains(p));
        }
        assert!(proba[0] < proba[2]);
    }
}
