//! Trainer configuration

use serde::{Deserialize, Serialize};

/// Configuration for the offline training run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrainerConfig {
    /// Held-out fraction for evaluation (stratified)
    pub test_fraction: f64,

    /// Random seed for the split; identical data and seed always yield
    /// identical evaluation numbers
    pub seed: u64,

    /// Gradient descent learning rate
    pub learning_rate: f64,

    /// L2 regularization strength
    pub l2: f64,

    /// Iteration budget for the classifier fit
    pub max_iter: usize,

    /// Convergence tolerance on the gradient norm
    pub tol: f64,
}

impl Default for TrainerConfig {
    fn default() -> Self {
        Self {
            test_fraction: 0.2,
            seed: 42,
            learning_rate: 0.1,
            l2: 0.01,
            max_iter: 50_000,
            tol: 1e-4,
        }
    }
}

impl TrainerConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder method to set the held-out fraction
    pub fn with_test_fraction(mut self, fraction: f64) -> Self {
        self.test_fraction = fraction;
        self
    }

    /// Builder method to set the split seed
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Builder method to set the learning rate
    pub fn with_learning_rate(mut self, lr: f64) -> Self {
        self.learning_rate = lr;
        self
    }

    /// Builder method to set L2 regularization
    pub fn with_l2(mut self, l2: f64) -> Self {
        self.l2 = l2;
        self
    }

    /// Builder method to set the iteration budget
    pub fn with_max_iter(mut self, max_iter: usize) -> Self {
        self.max_iter = max_iter;
        self
    }

    /// Builder method to set the convergence tolerance
    pub fn with_tol(mut self, tol: f64) -> Self {
        self.tol = tol;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = TrainerConfig::default();
        assert_eq!(config.test_fraction, 0.2);
        assert_eq!(config.seed, 42);
    }

    #[test]
    fn test_builder_pattern() {
        let config = TrainerConfig::new()
            .with_seed(7)
            .with_test_fraction(0.25)
            .with_max_iter(1000);
        assert_eq!(config.seed, 7);
        assert_eq!(config.test_fraction, 0.25);
        assert_eq!(config.max_iter, 1000);
    }
}
