//! Sentinel-zero median imputation

use crate::error::{Result, RiskError};
use crate::schema::FeatureSchema;
use ndarray::{Array2, ArrayView2};
use serde::{Deserialize, Serialize};

/// Imputer replacing sentinel zeros with frozen training-set medians.
///
/// Medians are computed once at fit time over the non-zero values of each
/// flagged column and never recomputed afterwards; a single inference sample
/// cannot alter the imputation baseline.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MedianImputer {
    /// Per-column fill value, aligned with the schema order. `None` for
    /// columns where zero is a legitimate value.
    medians: Vec<Option<f64>>,
}

impl MedianImputer {
    /// Fit the imputer to a feature matrix whose columns follow the schema
    /// order.
    ///
    /// Fails if a zero-is-missing column has no non-zero values: the median
    /// would be undefined and training must abort rather than silently impute
    /// zero.
    pub fn fit(x: ArrayView2<'_, f64>, schema: &FeatureSchema) -> Result<Self> {
        if x.ncols() != schema.len() {
            return Err(RiskError::Shape {
                expected: format!("{} columns", schema.len()),
                actual: format!("{} columns", x.ncols()),
            });
        }

        let mut medians = Vec::with_capacity(schema.len());
        for (j, spec) in schema.features().iter().enumerate() {
            if !spec.zero_is_missing {
                medians.push(None);
                continue;
            }
            let mut observed: Vec<f64> =
                x.column(j).iter().copied().filter(|v| *v != 0.0).collect();
            if observed.is_empty() {
                return Err(RiskError::Fit(format!(
                    "feature '{}' has no recorded (non-zero) values; median is undefined",
                    spec.name
                )));
            }
            medians.push(Some(median(&mut observed)));
        }

        Ok(Self { medians })
    }

    /// Rebuild an imputer from frozen parameters (artifact load path).
    pub fn from_medians(medians: Vec<Option<f64>>) -> Self {
        Self { medians }
    }

    /// Replace sentinel zeros in a full matrix.
    pub fn transform(&self, x: &mut Array2<f64>) {
        for (j, median) in self.medians.iter().enumerate() {
            if let Some(m) = median {
                for v in x.column_mut(j) {
                    if *v == 0.0 {
                        *v = *m;
                    }
                }
            }
        }
    }

    /// Impute a single value for the given column.
    pub fn impute(&self, column: usize, value: f64) -> f64 {
        match self.medians[column] {
            Some(m) if value == 0.0 => m,
            _ => value,
        }
    }

    /// Frozen per-column medians, aligned with the schema order.
    pub fn medians(&self) -> &[Option<f64>] {
        &self.medians
    }
}

/// Median with even-length averaging, matching pandas/numpy behavior.
fn median(values: &mut [f64]) -> f64 {
    values.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
    let n = values.len();
    if n % 2 == 1 {
        values[n / 2]
    } else {
        (values[n / 2 - 1] + values[n / 2]) / 2.0
    }
}
