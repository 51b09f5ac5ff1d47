// ============================================================
// Layer 6 — Training Log
// ============================================================
// One CSV row per epoch, rewritten on every training run:
//
//   epoch,train_loss,holdout_loss
//   1,0.693147,0.671203
//   2,0.612954,0.598871
//   ...
//
// train_loss is the mean weighted cross-entropy over the train
// batches; holdout_loss is the unweighted cross-entropy on the
// test split. holdout_loss climbing while train_loss falls means
// the model is overfitting.

use anyhow::{Context, Result};
use std::{
    fs::{self, OpenOptions},
    io::Write,
    path::{Path, PathBuf},
};
use serde::{Deserialize, Serialize};

pub const TRAINING_LOG_FILE: &str = "training_log.csv";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EpochMetrics {
    /// starts at 1
    pub epoch:        usize,
    pub train_loss:   f64,
    /// NaN when the test split is empty
    pub holdout_loss: f64,
}

impl EpochMetrics {
    pub fn new(epoch: usize, train_loss: f64, holdout_loss: f64) -> Self {
        Self { epoch, train_loss, holdout_loss }
    }
}

pub struct TrainingLog {
    csv_path: PathBuf,
}

impl TrainingLog {
    /// Start a fresh log in `dir`, replacing any previous run's file.
    pub fn create(dir: impl AsRef<Path>) -> Result<Self> {
        let dir = dir.as_ref();
        fs::create_dir_all(dir)?;
        let csv_path = dir.join(TRAINING_LOG_FILE);

        let mut f = fs::File::create(&csv_path)
            .with_context(|| format!("Cannot create '{}'", csv_path.display()))?;
        writeln!(f, "epoch,train_loss,holdout_loss")?;
        tracing::debug!("Created training log '{}'", csv_path.display());

        Ok(Self { csv_path })
    }

    pub fn log(&self, m: &EpochMetrics) -> Result<()> {
        let mut f = OpenOptions::new()
            .append(true)
            .open(&self.csv_path)
            .with_context(|| format!("Cannot append to '{}'", self.csv_path.display()))?;

        writeln!(f, "{},{:.6},{:.6}", m.epoch, m.train_loss, m.holdout_loss)?;
        Ok(())
    }

    pub fn csv_path(&self) -> &Path {
        &self.csv_path
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_rows_follow_header() {
        let tmp = TempDir::new().unwrap();
        let log = TrainingLog::create(tmp.path()).unwrap();
        log.log(&EpochMetrics::new(1, 0.7, 0.65)).unwrap();
        log.log(&EpochMetrics::new(2, 0.5, 0.55)).unwrap();

        let text = fs::read_to_string(log.csv_path()).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "epoch,train_loss,holdout_loss");
        assert_eq!(lines[1], "1,0.700000,0.650000");
        assert_eq!(lines.len(), 3);
    }

    #[test]
    fn test_create_truncates_previous_run() {
        let tmp = TempDir::new().unwrap();
        let first = TrainingLog::create(tmp.path()).unwrap();
        first.log(&EpochMetrics::new(1, 0.7, 0.6)).unwrap();

        let second = TrainingLog::create(tmp.path()).unwrap();
        let text = fs::read_to_string(second.csv_path()).unwrap();
        assert_eq!(text.lines().count(), 1);
    }
}
