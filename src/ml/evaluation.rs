// ============================================================
// Layer 5 — Holdout Evaluation
// ============================================================
// Scores the trained classifier on the test split. Class 1
// ("Yes", the employee left) is the positive class.
//
//   accuracy  = (tp + tn) / n
//   precision = tp / (tp + fp)       0 when nothing was predicted positive
//   recall    = tp / (tp + fn)       0 when there are no positives
//   f1        = 2pr / (p + r)        0 when p + r = 0
//   auc_roc   = Mann-Whitney U / (n_pos · n_neg), ties count half
//               undefined (None) when only one class is present
//
// Confusion matrix layout: rows are actual, columns are predicted
//   [[tn, fp],
//    [fn, tp]]

use std::fmt;

use anyhow::{bail, Result};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvaluationReport {
    pub accuracy:  f64,
    pub precision: f64,
    pub recall:    f64,
    pub f1:        f64,
    pub auc_roc:   Option<f64>,
    pub confusion: [[usize; 2]; 2],
    pub support:   usize,
}

impl EvaluationReport {
    /// `scores` are the probabilities of class 1, aligned with `actual`.
    pub fn compute(actual: &[u8], predicted: &[u8], scores: &[f64]) -> Result<Self> {
        if actual.len() != predicted.len() || actual.len() != scores.len() {
            bail!(
                "Evaluation inputs differ in length: {} labels, {} predictions, {} scores",
                actual.len(),
                predicted.len(),
                scores.len()
            );
        }
        if actual.is_empty() {
            bail!("Cannot evaluate on an empty test split");
        }

        let mut confusion = [[0usize; 2]; 2];
        for (&a, &p) in actual.iter().zip(predicted) {
            confusion[usize::from(a == 1)][usize::from(p == 1)] += 1;
        }
        let [[tn, fp], [fn_, tp]] = confusion;

        let ratio = |num: usize, den: usize| if den == 0 { 0.0 } else { num as f64 / den as f64 };
        let accuracy  = ratio(tp + tn, actual.len());
        let precision = ratio(tp, tp + fp);
        let recall    = ratio(tp, tp + fn_);
        let f1 = if precision + recall == 0.0 {
            0.0
        } else {
            2.0 * precision * recall / (precision + recall)
        };

        Ok(Self {
            accuracy,
            precision,
            recall,
            f1,
            auc_roc: auc_roc(actual, scores),
            confusion,
            support: actual.len(),
        })
    }
}

/// Rank-based AUC with average ranks for tied scores.
pub fn auc_roc(actual: &[u8], scores: &[f64]) -> Option<f64> {
    let n_pos = actual.iter().filter(|&&a| a == 1).count();
    let n_neg = actual.len() - n_pos;
    if n_pos == 0 || n_neg == 0 {
        return None;
    }

    let mut order: Vec<usize> = (0..scores.len()).collect();
    order.sort_by(|&a, &b| scores[a].total_cmp(&scores[b]));

    let mut pos_rank_sum = 0.0f64;
    let mut i = 0;
    while i < order.len() {
        let mut j = i;
        while j + 1 < order.len() && scores[order[j + 1]] == scores[order[i]] {
            j += 1;
        }
        // ranks are 1-based: positions i..=j share the mean rank
        let avg_rank = (i + j) as f64 / 2.0 + 1.0;
        for &idx in &order[i..=j] {
            if actual[idx] == 1 {
                pos_rank_sum += avg_rank;
            }
        }
        i = j + 1;
    }

    let u = pos_rank_sum - (n_pos * (n_pos + 1)) as f64 / 2.0;
    Some(u / (n_pos * n_neg) as f64)
}

impl fmt::Display for EvaluationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Accuracy: {:.4}", self.accuracy)?;
        writeln!(f, "Precision: {:.4}", self.precision)?;
        writeln!(f, "Recall: {:.4}", self.recall)?;
        writeln!(f, "F1 Score: {:.4}", self.f1)?;
        match self.auc_roc {
            Some(auc) => writeln!(f, "AUC-ROC: {:.4}", auc)?,
            None => writeln!(f, "AUC-ROC: undefined (test split has a single class)")?,
        }
        let [[tn, fp], [fn_, tp]] = self.confusion;
        writeln!(f, "Confusion Matrix:")?;
        writeln!(f, "[[{:>4} {:>4}]", tn, fp)?;
        write!(f, " [{:>4} {:>4}]]", fn_, tp)
    }
}
