// ============================================================
// Layer 4 — Table Operations (Polars)
// ============================================================
// Column and row operations on the loaded DataFrame, used while
// fitting the FeatureSpace and splitting it:
//
//   drop_columns      → remove configured columns that exist
//   constant_columns  → fewer than two distinct non-missing values
//   take_column       → detach the target column
//   take_rows         → the train or test subset, in split order
//   to_rows           → dense row-major copy for the scaler / SMOTE
//
// Column order is the file's order and is what ends up as the
// model's feature order, so nothing here reorders columns.

use anyhow::{bail, Context, Result};
use polars::prelude::*;

pub fn column_names(df: &DataFrame) -> Vec<String> {
    df.get_columns().iter().map(|c| c.name().to_string()).collect()
}

/// Remove the named columns that exist; names not present are
/// skipped. Returns the new frame and the names actually removed.
pub fn drop_columns(df: &DataFrame, names: &[String]) -> (DataFrame, Vec<String>) {
    let removed: Vec<String> = column_names(df)
        .into_iter()
        .filter(|c| names.contains(c))
        .collect();
    (df.drop_many(removed.iter().map(String::as_str)), removed)
}

/// Names of the columns, other than those in `keep`, with fewer
/// than two distinct non-missing values.
pub fn constant_columns(df: &DataFrame, keep: &[&str]) -> Result<Vec<String>> {
    let mut constant = Vec::new();
    for column in df.get_columns() {
        let name = column.name().as_str();
        if keep.contains(&name) {
            continue;
        }
        let distinct = column
            .as_materialized_series()
            .drop_nulls()
            .n_unique()
            .with_context(|| format!("Cannot count distinct values of '{name}'"))?;
        if distinct < 2 {
            constant.push(name.to_string());
        }
    }
    Ok(constant)
}

/// Remove a column and hand it back.
pub fn take_column(df: &mut DataFrame, name: &str) -> Option<Series> {
    df.drop_in_place(name)
        .ok()
        .map(|c| c.as_materialized_series().clone())
}

/// The given rows, in the given order.
pub fn take_rows(df: &DataFrame, rows: &[usize]) -> Result<DataFrame> {
    let idx: Vec<IdxSize> = rows.iter().map(|&r| r as IdxSize).collect();
    df.take(&IdxCa::from_vec("row".into(), idx))
        .context("Cannot select rows from the feature table")
}

/// Row-major copy of an all-Float64 frame with no missing cells.
pub fn to_rows(df: &DataFrame) -> Result<Vec<Vec<f64>>> {
    let mut rows = vec![Vec::with_capacity(df.width()); df.height()];
    for column in df.get_columns() {
        let series = column.as_materialized_series();
        let ca = series
            .f64()
            .with_context(|| format!("Column '{}' is not Float64", series.name()))?;
        if ca.null_count() > 0 {
            bail!("Column '{}' still has {} missing cells", series.name(), ca.null_count());
        }
        for (row, value) in rows.iter_mut().zip(ca.into_no_null_iter()) {
            row.push(value);
        }
    }
    Ok(rows)
}
