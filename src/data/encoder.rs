// ============================================================
// Layer 4 — Label Encoder / Encoding Table
// ============================================================
// Every categorical column gets an integer code per category.
// The codes are DATA-DEPENDENT: distinct observed values are
// sorted alphabetically (byte order) and numbered 0..k-1.
//
//   Department: ["Human Resources", "Research & Development", "Sales"]
//                 → 0                 → 1                       → 2
//
// The table is persisted next to the model so inference uses the
// exact mapping training produced, instead of a copy kept by hand.

use std::collections::{BTreeMap, BTreeSet};

use anyhow::{bail, Context, Result};
use polars::prelude::*;
use serde::{Deserialize, Serialize};

/// The learned mapping for one categorical column.
/// `categories[code]` is the label for `code`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryMapping {
    categories: Vec<String>,
}

impl CategoryMapping {
    /// Learn a mapping from observed values; missing cells are ignored.
    /// A column with a single observed category gets {value → 0}.
    pub fn fit<'a>(values: impl IntoIterator<Item = &'a str>) -> Self {
        let distinct: BTreeSet<&str> = values.into_iter().collect();
        Self { categories: distinct.into_iter().map(str::to_string).collect() }
    }

    pub fn code(&self, value: &str) -> Option<usize> {
        self.categories.binary_search_by(|c| c.as_str().cmp(value)).ok()
    }

    /// Like `code`, but an unknown value is an error listing the valid ones.
    pub fn encode(&self, column: &str, value: &str) -> Result<usize> {
        match self.code(value) {
            Some(code) => Ok(code),
            None => bail!(
                "Unknown category '{}' for column '{}' (known: {})",
                value,
                column,
                self.categories.join(", ")
            ),
        }
    }

    pub fn categories(&self) -> &[String] {
        &self.categories
    }

    pub fn len(&self) -> usize {
        self.categories.len()
    }
}

/// Mappings for every categorical (String) column of the training
/// table, keyed by column name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EncodingTable {
    columns: BTreeMap<String, CategoryMapping>,
}

impl EncodingTable {
    pub fn fit(df: &DataFrame) -> Self {
        let mut columns = BTreeMap::new();
        for column in df.get_columns() {
            let Ok(ca) = column.as_materialized_series().str() else {
                continue;
            };
            let mapping = CategoryMapping::fit(ca.into_iter().flatten());
            tracing::debug!(
                "Encoded '{}' with {} categories: {:?}",
                column.name(),
                mapping.len(),
                mapping.categories()
            );
            columns.insert(column.name().to_string(), mapping);
        }
        Self { columns }
    }

    pub fn mapping(&self, column: &str) -> Option<&CategoryMapping> {
        self.columns.get(column)
    }

    pub fn columns(&self) -> impl Iterator<Item = (&str, &CategoryMapping)> {
        self.columns.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Replace every label of a String column by its code as Float64;
    /// missing cells stay missing.
    pub fn encode_series(&self, series: &Series) -> Result<Series> {
        let name = series.name().as_str();
        let Some(mapping) = self.mapping(name) else {
            bail!("Column '{name}' has no learned encoding");
        };
        let ca = series
            .str()
            .with_context(|| format!("Column '{name}' is not a text column"))?;
        let codes = ca
            .into_iter()
            .map(|v| v.map(|s| mapping.encode(name, s).map(|c| c as f64)).transpose())
            .collect::<Result<Vec<Option<f64>>>>()?;
        Ok(Series::new(series.name().clone(), codes))
    }
}
