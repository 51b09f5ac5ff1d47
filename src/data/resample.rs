// ============================================================
// Layer 4 — Class Rebalancing
// ============================================================
// Employees who left are the minority class. Without help the
// classifier learns to answer "No" for everyone. Two remedies:
//
//   ClassWeight — weight each class by n / (2 · n_class) inside
//                 the loss (the "balanced" rule). Default.
//   Smote       — synthesise minority rows by interpolating
//                 between a minority row and one of its k nearest
//                 minority neighbours, until both classes match.
//
// SMOTE runs on the SCALED train split only; the test split is
// never resampled.

use anyhow::{bail, Result};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Rebalance {
    ClassWeight,
    /// `k` nearest minority neighbours to interpolate towards
    Smote { k: usize },
    None,
}

/// `[count of class 0, count of class 1]`
pub fn class_counts(labels: &[u8]) -> [usize; 2] {
    let ones = labels.iter().filter(|&&l| l == 1).count();
    [labels.len() - ones, ones]
}

/// Balanced weights `n / (2 · n_c)`; an absent class gets 1.0.
pub fn balanced_class_weights(labels: &[u8]) -> [f32; 2] {
    let counts = class_counts(labels);
    let n = labels.len() as f64;
    let w = |c: usize| if c == 0 { 1.0 } else { (n / (2.0 * c as f64)) as f32 };
    [w(counts[0]), w(counts[1])]
}

/// SMOTE oversampler for a two-class problem.
#[derive(Debug, Clone)]
pub struct Smote {
    k_neighbors: usize,
    seed:        u64,
}

impl Smote {
    pub fn new(k_neighbors: usize, seed: u64) -> Self {
        Self { k_neighbors: k_neighbors.max(1), seed }
    }

    /// Return the input rows plus synthetic minority rows appended
    /// at the end, so that both classes have the same count.
    pub fn resample(&self, features: &[Vec<f64>], labels: &[u8]) -> Result<(Vec<Vec<f64>>, Vec<u8>)> {
        if features.len() != labels.len() {
            bail!("SMOTE got {} rows but {} labels", features.len(), labels.len());
        }

        let counts = class_counts(labels);
        let (minority, majority_count) = if counts[1] < counts[0] {
            (1u8, counts[0])
        } else {
            (0u8, counts[1])
        };
        let minority_idx: Vec<usize> = labels
            .iter()
            .enumerate()
            .filter(|(_, &l)| l == minority)
            .map(|(i, _)| i)
            .collect();

        let needed = majority_count - minority_idx.len();
        let mut out_x = features.to_vec();
        let mut out_y = labels.to_vec();
        if needed == 0 {
            return Ok((out_x, out_y));
        }
        if minority_idx.len() < 2 {
            bail!(
                "SMOTE needs at least two rows of class {}, found {}",
                minority,
                minority_idx.len()
            );
        }

        let k = self.k_neighbors.min(minority_idx.len() - 1);
        let neighbours: Vec<Vec<usize>> = minority_idx
            .iter()
            .map(|&i| nearest(features, i, &minority_idx, k))
            .collect();

        let mut rng = ChaCha8Rng::seed_from_u64(self.seed);
        for _ in 0..needed {
            let pick = rng.gen_range(0..minority_idx.len());
            let base = &features[minority_idx[pick]];
            let other = &features[neighbours[pick][rng.gen_range(0..k)]];
            let gap: f64 = rng.gen();
            let synthetic = base
                .iter()
                .zip(other)
                .map(|(a, b)| a + gap * (b - a))
                .collect();
            out_x.push(synthetic);
            out_y.push(minority);
        }

        tracing::info!(
            "SMOTE added {} synthetic rows of class {} (k = {})",
            needed,
            minority,
            k
        );
        Ok((out_x, out_y))
    }
}

/// Indices (into `features`) of the `k` closest candidates to row `i`,
/// excluding `i` itself. Ties break on index so the result is stable.
fn nearest(features: &[Vec<f64>], i: usize, candidates: &[usize], k: usize) -> Vec<usize> {
    let mut dists: Vec<(f64, usize)> = candidates
        .iter()
        .filter(|&&j| j != i)
        .map(|&j| (squared_distance(&features[i], &features[j]), j))
        .collect();
    dists.sort_by(|a, b| a.0.total_cmp(&b.0).then(a.1.cmp(&b.1)));
    dists.into_iter().take(k).map(|(_, j)| j).collect()
}

fn squared_distance(a: &[f64], b: &[f64]) -> f64 {
    a.iter().zip(b).map(|(x, y)| (x - y).powi(2)).sum()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rebalance_serde_carries_k() {
        let json = serde_json::to_string(&Rebalance::Smote { k: 3 }).unwrap();
        assert_eq!(json, r#"{"smote":{"k":3}}"#);
        let back: Rebalance = serde_json::from_str(r#""class_weight""#).unwrap();
        assert_eq!(back, Rebalance::ClassWeight);
    }

    #[test]
    fn test_balanced_weights() {
        // 8 stay, 2 leave → w0 = 10/16, w1 = 10/4
        let labels = [0, 0, 0, 0, 0, 0, 0, 0, 1, 1];
        let w = balanced_class_weights(&labels);
        assert!((w[0] - 0.625).abs() < 1e-6);
        assert!((w[1] - 2.5).abs() < 1e-6);
    }

    #[test]
    fn test_smote_balances_classes() {
        let x = vec![
            vec![0.0, 0.0],
            vec![0.1, 0.0],
            vec![0.2, 0.1],
            vec![0.0, 0.3],
            vec![0.3, 0.2],
            vec![5.0, 5.0],
            vec![5.5, 5.0],
        ];
        let y = vec![0, 0, 0, 0, 0, 1, 1];
        let (rx, ry) = Smote::new(5, 42).resample(&x, &y).unwrap();

        assert_eq!(class_counts(&ry), [5, 5]);
        assert_eq!(rx.len(), 10);
        // Synthetic rows lie on the segment between the two minority points
        for row in &rx[7..] {
            assert!(row[0] >= 5.0 && row[0] <= 5.5);
            assert_eq!(row[1], 5.0);
        }
    }

    #[test]
    fn test_smote_is_deterministic() {
        let x: Vec<Vec<f64>> = (0..20).map(|i| vec![i as f64, (i * i) as f64]).collect();
        let y: Vec<u8> = (0..20).map(|i| u8::from(i % 5 == 0)).collect();
        let a = Smote::new(3, 9).resample(&x, &y).unwrap();
        let b = Smote::new(3, 9).resample(&x, &y).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_smote_needs_two_minority_rows() {
        let x = vec![vec![0.0], vec![1.0], vec![2.0]];
        let y = vec![0, 0, 1];
        assert!(Smote::new(5, 1).resample(&x, &y).is_err());
    }

    #[test]
    fn test_smote_noop_when_balanced() {
        let x = vec![vec![0.0], vec![1.0]];
        let y = vec![0, 1];
        let (rx, ry) = Smote::new(5, 1).resample(&x, &y).unwrap();
        assert_eq!(rx, x);
        assert_eq!(ry, y);
    }
}
