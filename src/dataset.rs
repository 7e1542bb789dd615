//! Labeled dataset loading
//!
//! Tabular CSV input where each row is a raw sample plus a binary outcome
//! label in a fixed, named column.

use crate::error::{Result, RiskError};
use crate::schema::FeatureSchema;
use ndarray::{Array1, Array2};
use polars::prelude::*;
use std::path::Path;

/// Load a CSV dataset.
pub fn load_csv(path: &Path) -> Result<DataFrame> {
    let file = std::fs::File::open(path)?;

    let mut reader = CsvReadOptions::default()
        .with_has_header(true)
        .with_infer_schema_length(Some(100))
        .into_reader_with_file_handle(file);

    reader.finish().map_err(RiskError::from)
}

/// Extract the schema-ordered feature matrix and the label vector.
///
/// Columns are read in schema order regardless of their order in the file.
/// Nulls are a data defect here; "not recorded" travels as the sentinel zero.
pub fn extract_matrix(df: &DataFrame, schema: &FeatureSchema) -> Result<(Array2<f64>, Array1<f64>)> {
    let n_rows = df.height();
    let n_cols = schema.len();

    let mut data = Vec::with_capacity(n_rows * n_cols);
    for spec in schema.features() {
        data.extend(numeric_column(df, &spec.name)?);
    }

    // Columns were appended contiguously; transpose into row-major samples.
    let x = Array2::from_shape_vec((n_cols, n_rows), data)
        .map_err(|e| RiskError::Shape {
            expected: format!("({}, {})", n_cols, n_rows),
            actual: e.to_string(),
        })?
        .t()
        .to_owned();

    let y = Array1::from_vec(numeric_column(df, schema.target())?);
    validate_labels(&y, schema.target())?;

    Ok((x, y))
}

fn numeric_column(df: &DataFrame, name: &str) -> Result<Vec<f64>> {
    let column = df
        .column(name)
        .map_err(|_| RiskError::Data(format!("column '{}' not found in dataset", name)))?;

    let series = column
        .as_materialized_series()
        .cast(&DataType::Float64)
        .map_err(|_| RiskError::Data(format!("column '{}' is not numeric", name)))?;

    series
        .f64()?
        .into_iter()
        .map(|v| v.ok_or_else(|| RiskError::Data(format!("null value in column '{}'", name))))
        .collect()
}

fn validate_labels(y: &Array1<f64>, target: &str) -> Result<()> {
    if y.iter().any(|v| *v != 0.0 && *v != 1.0) {
        return Err(RiskError::Data(format!(
            "target column '{}' must contain only 0/1 labels",
            target
        )));
    }
    Ok(())
}
