// ============================================================
// Layer 4 — Standard Scaler
// ============================================================
// Per-column affine transform: z = (x - mean) / scale
//
//   mean  = column mean over the TRAIN split only (Polars mean)
//   scale = population standard deviation (Polars std, ddof = 0);
//           a zero deviation becomes 1.0 so constant columns map to 0
//
// The fitted scaler is persisted (scaler.json) and reapplied to
// every inference row; a row of the wrong width is an error,
// never silently truncated or padded.

use anyhow::{bail, Context, Result};
use polars::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StandardScaler {
    mean:  Vec<f64>,
    scale: Vec<f64>,
}

impl StandardScaler {
    /// Fit on the Float64 train table, one column per feature.
    pub fn fit(train: &DataFrame) -> Result<Self> {
        if train.height() == 0 {
            bail!("Cannot fit a scaler on zero rows");
        }

        let mut mean  = Vec::with_capacity(train.width());
        let mut scale = Vec::with_capacity(train.width());
        for column in train.get_columns() {
            let series = column.as_materialized_series();
            let ca = series
                .f64()
                .with_context(|| format!("Column '{}' is not Float64", series.name()))?;
            let m = ca
                .mean()
                .with_context(|| format!("Column '{}' has no values", series.name()))?;
            let sd = ca.std(0).unwrap_or(0.0);

            mean.push(m);
            scale.push(if sd > f64::EPSILON { sd } else { 1.0 });
        }

        Ok(Self { mean, scale })
    }

    pub fn num_features(&self) -> usize {
        self.mean.len()
    }

    pub fn transform_row(&self, row: &[f64]) -> Result<Vec<f64>> {
        if row.len() != self.mean.len() {
            bail!(
                "Feature vector has {} values, scaler expects {}",
                row.len(),
                self.mean.len()
            );
        }
        let out: Vec<f64> = row
            .iter()
            .zip(&self.mean)
            .zip(&self.scale)
            .map(|((x, m), s)| (x - m) / s)
            .collect();
        if out.iter().any(|v| !v.is_finite()) {
            bail!("Scaling produced a non-finite value");
        }
        Ok(out)
    }

    pub fn transform(&self, rows: &[Vec<f64>]) -> Result<Vec<Vec<f64>>> {
        rows.iter().map(|r| self.transform_row(r)).collect()
    }
}
