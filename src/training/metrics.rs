//! Evaluation metrics for the held-out split
//!
//! Diagnostic output only; nothing here is consumed by the inference path.

use ndarray::ArrayView1;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::classifier::RiskLabel;

/// Precision/recall summary for one class
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassMetrics {
    pub label: RiskLabel,
    pub precision: f64,
    pub recall: f64,
    pub support: usize,
}

/// Accuracy plus a per-class precision/recall summary
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassificationReport {
    pub accuracy: f64,
    pub classes: Vec<ClassMetrics>,
}

impl ClassificationReport {
    /// Compute from 0.0/1.0 true labels and predicted labels.
    pub fn compute(y_true: ArrayView1<'_, f64>, y_pred: ArrayView1<'_, f64>) -> Self {
        let n = y_true.len();
        let correct = y_true
            .iter()
            .zip(y_pred.iter())
            .filter(|(t, p)| t == p)
            .count();
        let accuracy = if n == 0 { 0.0 } else { correct as f64 / n as f64 };

        let classes = [(0.0, RiskLabel::Low), (1.0, RiskLabel::High)]
            .into_iter()
            .map(|(class, label)| {
                let tp = count(&y_true, &y_pred, |t, p| t == class && p == class);
                let fp = count(&y_true, &y_pred, |t, p| t != class && p == class);
                let fn_ = count(&y_true, &y_pred, |t, p| t == class && p != class);
                ClassMetrics {
                    label,
                    precision: ratio(tp, tp + fp),
                    recall: ratio(tp, tp + fn_),
                    support: tp + fn_,
                }
            })
            .collect();

        Self { accuracy, classes }
    }
}

fn count(
    y_true: &ArrayView1<'_, f64>,
    y_pred: &ArrayView1<'_, f64>,
    pred: impl Fn(f64, f64) -> bool,
) -> usize {
    y_true
        .iter()
        .zip(y_pred.iter())
        .filter(|(t, p)| pred(**t, **p))
        .count()
}

fn ratio(num: usize, denom: usize) -> f64 {
    if denom == 0 {
        0.0
    } else {
        num as f64 / denom as f64
    }
}

impl fmt::Display for ClassificationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "{:<10} {:>10} {:>10} {:>10}",
            "class", "precision", "recall", "support"
        )?;
        for c in &self.classes {
            writeln!(
                f,
                "{:<10} {:>10.3} {:>10.3} {:>10}",
                format!("{:?}", c.label).to_lowercase(),
                c.precision,
                c.recall,
                c.support
            )?;
        }
        write!(f, "accuracy: {:.4}", self.accuracy)
    }
}
