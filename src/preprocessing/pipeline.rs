//! Preprocessing pipeline binding schema, imputer and scaler

use crate::error::{Result, RiskError};
use crate::inference::RawSample;
use crate::schema::FeatureSchema;
use ndarray::{Array1, Array2, ArrayView2};
use serde::{Deserialize, Serialize};

use super::{MedianImputer, StandardScaler};

/// Fitted preprocessor: sentinel-zero imputation followed by
/// standardization, with all parameters frozen at fit time.
///
/// `transform_*` is pure and deterministic; the same input against the same
/// fitted preprocessor yields a bit-identical standardized vector.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Preprocessor {
    schema: FeatureSchema,
    imputer: MedianImputer,
    scaler: StandardScaler,
}

impl Preprocessor {
    /// Fit on a raw feature matrix whose columns follow the schema order.
    ///
    /// The scaler is fitted on the imputed columns, mirroring the training
    /// procedure: impute first, then standardize.
    pub fn fit(x: ArrayView2<'_, f64>, schema: &FeatureSchema) -> Result<Self> {
        let imputer = MedianImputer::fit(x, schema)?;
        let mut imputed = x.to_owned();
        imputer.transform(&mut imputed);
        let scaler = StandardScaler::fit(imputed.view());

        Ok(Self {
            schema: schema.clone(),
            imputer,
            scaler,
        })
    }

    /// Rebuild a preprocessor from frozen parameters (artifact load path).
    pub fn from_params(
        schema: FeatureSchema,
        medians: Vec<Option<f64>>,
        means: Vec<f64>,
        stds: Vec<f64>,
    ) -> Self {
        Self {
            schema,
            imputer: MedianImputer::from_medians(medians),
            scaler: StandardScaler::from_params(means, stds),
        }
    }

    /// Transform a full matrix (training path).
    pub fn transform_matrix(&self, x: ArrayView2<'_, f64>) -> Result<Array2<f64>> {
        if x.ncols() != self.schema.len() {
            return Err(RiskError::Shape {
                expected: format!("{} columns", self.schema.len()),
                actual: format!("{} columns", x.ncols()),
            });
        }

        let mut out = x.to_owned();
        self.imputer.transform(&mut out);
        for (j, spec) in self.schema.features().iter().enumerate() {
            for v in out.column_mut(j) {
                *v = self
                    .scaler
                    .standardize_checked(j, *v, &spec.name)?;
            }
        }
        Ok(out)
    }

    /// Transform one raw sample (inference path).
    ///
    /// The sample must cover exactly the schema's feature names; a missing or
    /// unexpected name is a `SchemaMismatch`, never a silent default.
    pub fn transform_sample(&self, sample: &RawSample) -> Result<Array1<f64>> {
        self.validate_sample(sample)?;

        let mut out = Array1::zeros(self.schema.len());
        for (j, spec) in self.schema.features().iter().enumerate() {
            let raw = sample[&spec.name];
            let imputed = self.imputer.impute(j, raw);
            out[j] = self.scaler.standardize_checked(j, imputed, &spec.name)?;
        }
        Ok(out)
    }

    /// The schema this preprocessor was fitted against.
    pub fn schema(&self) -> &FeatureSchema {
        &self.schema
    }

    pub fn imputer(&self) -> &MedianImputer {
        &self.imputer
    }

    pub fn scaler(&self) -> &StandardScaler {
        &self.scaler
    }

    fn validate_sample(&self, sample: &RawSample) -> Result<()> {
        let missing: Vec<&str> = self
            .schema
            .features()
            .iter()
            .filter(|spec| !sample.contains_key(&spec.name))
            .map(|spec| spec.name.as_str())
            .collect();
        if !missing.is_empty() {
            return Err(RiskError::SchemaMismatch(format!(
                "missing features: {}",
                missing.join(", ")
            )));
        }

        if sample.len() != self.schema.len() {
            let mut unexpected: Vec<&str> = sample
                .keys()
                .filter(|name| self.schema.position(name).is_none())
                .map(|name| name.as_str())
                .collect();
            unexpected.sort_unstable();
            return Err(RiskError::SchemaMismatch(format!(
                "unexpected features: {}",
                unexpected.join(", ")
            )));
        }

        Ok(())
    }
}

impl StandardScaler {
    fn standardize_checked(&self, column: usize, value: f64, name: &str) -> Result<f64> {
        self.standardize(column, value)
            .ok_or_else(|| RiskError::DegenerateFeature {
                feature: name.to_string(),
            })
    }
}
