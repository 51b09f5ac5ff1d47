// ============================================================
// Layer 3 — Core Traits (Abstractions)
// ============================================================
// The application layer talks to these traits, not to the CSV
// reader or Burn directly:
//   - CsvLoader   implements TableSource
//   - LoadedModel implements Classifier
//
// Reference: Rust Book §10 (Traits: Defining Shared Behaviour)

use anyhow::Result;
use polars::prelude::DataFrame;

// ─── TableSource ──────────────────────────────────────────────────────────────
/// Anything that can produce the raw training table: String columns
/// for categories, Float64 for everything else, missing cells null.
pub trait TableSource {
    fn load_table(&self) -> Result<DataFrame>;
}

// ─── Classifier ───────────────────────────────────────────────────────────────
/// A fitted binary classifier over already-scaled feature rows.
pub trait Classifier {
    /// Width of the rows this classifier accepts.
    fn num_features(&self) -> usize;

    /// `[p(class 0), p(class 1)]` per row; each pair sums to 1.
    fn predict_proba(&self, rows: &[Vec<f64>]) -> Result<Vec<[f64; 2]>>;

    /// Class 1 when its probability is strictly the larger one.
    fn predict(&self, rows: &[Vec<f64>]) -> Result<Vec<u8>> {
        Ok(self
            .predict_proba(rows)?
            .into_iter()
            .map(|[p0, p1]| u8::from(p1 > p0))
            .collect())
    }
}
