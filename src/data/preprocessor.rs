// ============================================================
// Layer 4 — Feature Preprocessor
// ============================================================
// Turns the raw training table into a dense numeric matrix and
// remembers exactly how it did so, so inference can repeat the
// same steps on a single record.
//
// Training-time steps (in order):
//   1. Split off the target column and encode it (No=0, Yes=1)
//   2. Drop identifier columns, and constant columns that are not
//      form fields
//   3. Learn the Encoding Table and encode categoricals
//   4. Polars medians per column; fill the missing cells with them
//
// What is persisted (FeatureSpace → encoding.json):
//   - feature order (post-drop dataset column order)
//   - the Encoding Table
//   - the medians used for imputation
//   - target name and class labels
//
// Scaling is NOT done here; it needs the train/test split first
// (see data::scaler).

use anyhow::{bail, Context, Result};
use polars::prelude::*;
use serde::{Deserialize, Serialize};

use crate::data::encoder::{CategoryMapping, EncodingTable};
use crate::data::table::{column_names, constant_columns, drop_columns, take_column};
use crate::domain::record::{EmployeeRecord, RawValue};
use crate::domain::schema::{FieldKind, FieldSpec, FEATURE_ORDER};

/// Everything needed to turn a raw record into a model row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureSpace {
    target:        String,
    /// `class_labels[class]`, e.g. `["No", "Yes"]`
    class_labels:  Vec<String>,
    feature_order: Vec<String>,
    encodings:     EncodingTable,
    medians:       Vec<f64>,
    dropped:       Vec<String>,
}

/// Output of fitting: the dense Float64 feature table (no missing
/// cells), labels, and the fitted space.
#[derive(Debug, Clone)]
pub struct PreparedData {
    pub features: DataFrame,
    pub labels:   Vec<u8>,
    pub space:    FeatureSpace,
}

impl FeatureSpace {
    /// Fit on the full training table.
    pub fn fit(mut df: DataFrame, target: &str, drop: &[String]) -> Result<PreparedData> {
        let target_series = take_column(&mut df, target).with_context(|| {
            format!(
                "Target column '{}' not found (columns: {})",
                target,
                column_names(&df).join(", ")
            )
        })?;
        let (labels, class_labels) = encode_target(&target_series)?;

        // Form fields are never dropped for being constant: a feature
        // with one observed category still gets its {value → 0} code.
        let (df, mut dropped) = drop_columns(&df, drop);
        let constant = constant_columns(&df, &FEATURE_ORDER)?;
        let (df, constant) = drop_columns(&df, &constant);
        dropped.extend(constant);
        if !dropped.is_empty() {
            tracing::info!("Dropped columns without information: {}", dropped.join(", "));
        }
        if df.width() == 0 {
            bail!("No feature columns left after dropping {}", dropped.join(", "));
        }

        let encodings = EncodingTable::fit(&df);

        let mut medians  = Vec::with_capacity(df.width());
        let mut features: Vec<Column> = Vec::with_capacity(df.width());
        let mut imputed  = 0usize;
        for column in df.get_columns() {
            let series = column.as_materialized_series();
            let name   = series.name().as_str();

            let numeric = if encodings.mapping(name).is_some() {
                encodings.encode_series(series)?
            } else {
                series
                    .cast(&DataType::Float64)
                    .with_context(|| format!("Column '{name}' is not numeric"))?
            };
            let ca = numeric.f64().with_context(|| format!("Column '{name}' is not Float64"))?;
            let median = ca.median().with_context(|| format!("Column '{name}' has no values"))?;

            imputed += ca.null_count();
            let filled = ca
                .fill_null_with_values(median)
                .with_context(|| format!("Cannot impute '{name}'"))?;
            medians.push(median);
            features.push(filled.into_series().into());
        }
        if imputed > 0 {
            tracing::info!("Imputed {} missing cells with column medians", imputed);
        }
        let features = DataFrame::new(features).context("Cannot assemble the feature table")?;

        let space = FeatureSpace {
            target: target.to_string(),
            class_labels,
            feature_order: column_names(&features),
            encodings,
            medians,
            dropped,
        };
        tracing::info!(
            "Feature space: {} features, {} categorical",
            space.num_features(),
            space.encodings.columns().count()
        );

        Ok(PreparedData { features, labels, space })
    }

    pub fn num_features(&self) -> usize {
        self.feature_order.len()
    }

    pub fn class_labels(&self) -> &[String] {
        &self.class_labels
    }

    /// Assemble the unscaled feature row for one record, in the
    /// persisted feature order. Missing fields take the training median.
    pub fn vectorize(&self, record: &EmployeeRecord) -> Result<Vec<f64>> {
        let mut row = Vec::with_capacity(self.num_features());

        for (name, median) in self.feature_order.iter().zip(&self.medians) {
            let mapping = self.encodings.mapping(name);
            let value = match (record.get(name), mapping) {
                (None, _) => {
                    tracing::debug!("'{}' not provided, using median {}", name, median);
                    *median
                }
                (Some(RawValue::Category(c)), Some(m)) => m.encode(name, c)? as f64,
                (Some(RawValue::Number(n)), Some(_)) => {
                    bail!("Column '{name}' expects a category label, got the number {n}")
                }
                (Some(RawValue::Category(c)), None) => {
                    bail!("Column '{name}' is numeric, got '{c}'")
                }
                (Some(RawValue::Number(n)), None) => {
                    if !n.is_finite() {
                        bail!("Column '{name}' got a non-finite value");
                    }
                    *n
                }
            };
            row.push(value);
        }

        Ok(row)
    }

    /// Check that the documented form agrees with what training learned:
    /// same feature order, and every offered category has a code.
    pub fn check_form_schema(&self, fields: &[FieldSpec], expected_order: &[&str]) -> Result<()> {
        let mut problems = Vec::new();

        if self.feature_order.iter().map(String::as_str).ne(expected_order.iter().copied()) {
            problems.push(format!(
                "feature order differs: trained on [{}], form expects [{}]",
                self.feature_order.join(", "),
                expected_order.join(", ")
            ));
        }

        for spec in fields {
            match (spec.kind, self.encodings.mapping(spec.name)) {
                (FieldKind::Choice { options, .. }, Some(mapping)) => {
                    problems.extend(unknown_options(spec.name, options, mapping));
                }
                (FieldKind::Choice { .. }, None) => {
                    problems.push(format!("'{}' is a choice on the form but was not categorical in training", spec.name));
                }
                (_, Some(_)) => {
                    problems.push(format!("'{}' is numeric on the form but was categorical in training", spec.name));
                }
                (_, None) => {}
            }
        }

        if problems.is_empty() {
            Ok(())
        } else {
            bail!("Encoding table does not match the form:\n  - {}", problems.join("\n  - "))
        }
    }
}

fn unknown_options(column: &str, options: &[&str], mapping: &CategoryMapping) -> Vec<String> {
    options
        .iter()
        .filter(|o| mapping.code(o).is_none())
        .map(|o| {
            format!(
                "'{}' option '{}' was never seen in training (known: {})",
                column,
                o,
                mapping.categories().join(", ")
            )
        })
        .collect()
}

/// Encode the label column into class indices 0/1.
fn encode_target(series: &Series) -> Result<(Vec<u8>, Vec<String>)> {
    let name = series.name().as_str();
    // Row numbers in messages are 1-based file lines (header = line 1).
    if let Ok(ca) = series.str() {
        let mapping = CategoryMapping::fit(ca.into_iter().flatten());
        if mapping.len() != 2 {
            bail!(
                "Target '{}' must have exactly two classes, found {:?}",
                name,
                mapping.categories()
            );
        }
        let labels = ca
            .into_iter()
            .enumerate()
            .map(|(i, v)| match v {
                Some(s) => Ok(mapping.encode(name, s)? as u8),
                None    => bail!("Line {} has no '{}' label", i + 2, name),
            })
            .collect::<Result<Vec<u8>>>()?;
        return Ok((labels, mapping.categories().to_vec()));
    }

    let cast = series
        .cast(&DataType::Float64)
        .with_context(|| format!("Target '{name}' is neither text nor numeric"))?;
    let labels = cast
        .f64()?
        .into_iter()
        .enumerate()
        .map(|(i, v)| match v {
            Some(x) if x == 0.0 => Ok(0u8),
            Some(x) if x == 1.0 => Ok(1u8),
            Some(x) => bail!("Line {} has label {} in '{}', expected 0 or 1", i + 2, x, name),
            None    => bail!("Line {} has no '{}' label", i + 2, name),
        })
        .collect::<Result<Vec<u8>>>()?;
    if !labels.contains(&0) || !labels.contains(&1) {
        bail!("Target '{}' must contain both classes", name);
    }
    Ok((labels, vec!["0".to_string(), "1".to_string()]))
}
