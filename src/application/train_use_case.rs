// ============================================================
// Layer 2 — TrainUseCase
// ============================================================
// Orchestrates the full training pipeline in order:
//
//   Step 1: Load the CSV                     (Layer 4 - data)
//   Step 2: Fit the FeatureSpace             (Layer 4 - data)
//   Step 3: Seeded train/test split          (Layer 4 - data)
//   Step 4: Fit the scaler on train          (Layer 4 - data)
//   Step 5: Rebalance the train split        (Layer 4 - data)
//   Step 6: Save the config used             (Layer 6 - infra)
//   Step 7: Run the training loop            (Layer 5 - ml)
//   Step 8: Evaluate on the test split       (Layer 5 - ml)
//   Step 9: Persist every artifact           (Layer 6 - infra)
//
// Same data + same TrainConfig → same weights, same metrics.

use anyhow::{bail, Result};
use serde::{Deserialize, Serialize};

use crate::data::{
    dataset::AttritionDataset,
    loader::CsvLoader,
    preprocessor::{FeatureSpace, PreparedData},
    resample::{balanced_class_weights, class_counts, Rebalance, Smote},
    scaler::StandardScaler,
    splitter::{split_train_test, DEFAULT_SEED},
    table::{take_rows, to_rows},
};
use crate::domain::schema::{IDENTIFIER_COLUMNS, TARGET_COLUMN};
use crate::domain::traits::{Classifier, TableSource};
use crate::infra::{checkpoint::ArtifactStore, metrics::TrainingLog};
use crate::ml::{
    evaluation::EvaluationReport,
    inferencer::LoadedModel,
    model::AttritionModelConfig,
    trainer::run_training,
};

// ─── Training Configuration ──────────────────────────────────────────────────
// Saved next to the model as train_config.json.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainConfig {
    pub dataset_path:  String,
    pub artifact_dir:  String,
    pub target_column: String,
    pub drop_columns:  Vec<String>,
    pub test_fraction: f64,
    pub seed:          u64,
    pub epochs:        usize,
    pub batch_size:    usize,
    pub learning_rate: f64,
    pub weight_decay:  f64,
    pub rebalance:     Rebalance,
}

impl Default for TrainConfig {
    fn default() -> Self {
        Self {
            dataset_path:  "data/Employee-Attrition.csv".to_string(),
            artifact_dir:  "artifacts".to_string(),
            target_column: TARGET_COLUMN.to_string(),
            drop_columns:  IDENTIFIER_COLUMNS.iter().map(|s| s.to_string()).collect(),
            test_fraction: 0.2,
            seed:          DEFAULT_SEED,
            epochs:        100,
            batch_size:    64,
            learning_rate: 0.01,
            weight_decay:  1e-4,
            rebalance:     Rebalance::ClassWeight,
        }
    }
}

// ─── TrainUseCase ─────────────────────────────────────────────────────────────
pub struct TrainUseCase {
    config: TrainConfig,
}

impl TrainUseCase {
    pub fn new(config: TrainConfig) -> Self {
        Self { config }
    }

    /// Run the pipeline end to end and return the test-split report.
    pub fn execute(&self) -> Result<EvaluationReport> {
        let cfg = &self.config;
        if !(0.0..1.0).contains(&cfg.test_fraction) {
            bail!("test_fraction must be in [0, 1), got {}", cfg.test_fraction);
        }

        // ── Step 1: Load ─────────────────────────────────────────────────────
        tracing::info!("Loading dataset from '{}'", cfg.dataset_path);
        let table = CsvLoader::new(&cfg.dataset_path).load_table()?;

        // ── Step 2: Drop / encode / impute ───────────────────────────────────
        let PreparedData { features, labels, space } =
            FeatureSpace::fit(table, &cfg.target_column, &cfg.drop_columns)?;

        // ── Step 3: Split ────────────────────────────────────────────────────
        let (train_rows, test_rows) =
            split_train_test((0..labels.len()).collect(), cfg.test_fraction, cfg.seed);
        let labels_of = |rows: &[usize]| -> Vec<u8> { rows.iter().map(|&r| labels[r]).collect() };
        let train_y = labels_of(&train_rows);
        let test_y  = labels_of(&test_rows);
        tracing::info!("Split: {} train, {} test", train_rows.len(), test_rows.len());

        let counts = class_counts(&train_y);
        if counts.contains(&0) {
            bail!(
                "Training split needs both classes, got {} '{}' and {} '{}'",
                counts[0], space.class_labels()[0], counts[1], space.class_labels()[1]
            );
        }
        if test_rows.is_empty() {
            bail!("Test split is empty; raise test_fraction or provide more rows");
        }

        // ── Step 4: Scale (fit on train only) ────────────────────────────────
        let train_frame = take_rows(&features, &train_rows)?;
        let test_frame  = take_rows(&features, &test_rows)?;
        let scaler  = StandardScaler::fit(&train_frame)?;
        let train_x = scaler.transform(&to_rows(&train_frame)?)?;
        let test_x  = scaler.transform(&to_rows(&test_frame)?)?;

        // ── Step 5: Rebalance ────────────────────────────────────────────────
        let (train_x, train_y, class_weights) = match cfg.rebalance {
            Rebalance::ClassWeight => {
                let w = balanced_class_weights(&train_y);
                tracing::info!("Class weights: stay={:.4}, leave={:.4}", w[0], w[1]);
                (train_x, train_y, Some(w))
            }
            Rebalance::Smote { k } => {
                let (x, y) = Smote::new(k, cfg.seed).resample(&train_x, &train_y)?;
                (x, y, None)
            }
            Rebalance::None => (train_x, train_y, None),
        };

        // ── Step 6: Save config ──────────────────────────────────────────────
        let store = ArtifactStore::create(&cfg.artifact_dir)?;
        store.save_train_config(cfg)?;

        // ── Step 7: Train ────────────────────────────────────────────────────
        let model_cfg = AttritionModelConfig::new(space.num_features());
        let log = TrainingLog::create(store.dir())?;
        let model = run_training(
            cfg,
            &model_cfg,
            AttritionDataset::from_rows(&train_x, &train_y),
            &AttritionDataset::from_rows(&test_x, &test_y),
            class_weights,
            &log,
        )?;
        let classifier = LoadedModel::new(model, space.num_features());

        // ── Step 8: Evaluate ─────────────────────────────────────────────────
        let probabilities = classifier.predict_proba(&test_x)?;
        let predicted     = classifier.predict(&test_x)?;
        let scores: Vec<f64> = probabilities.iter().map(|p| p[1]).collect();
        let report = EvaluationReport::compute(&test_y, &predicted, &scores)?;

        // ── Step 9: Persist ──────────────────────────────────────────────────
        store.save_model(classifier.model())?;
        store.save_model_config(&model_cfg)?;
        store.save_scaler(&scaler)?;
        store.save_feature_space(&space)?;
        store.save_report(&report)?;
        tracing::info!("Artifacts written to '{}'", store.dir().display());

        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infra::checkpoint::{ENCODING_FILE, METRICS_FILE, SCALER_FILE};
    use crate::infra::metrics::TRAINING_LOG_FILE;
    use crate::test_support::quick_config;
    use tempfile::TempDir;

    #[test]
    fn test_training_writes_every_artifact() {
        let tmp = TempDir::new().unwrap();
        let cfg = quick_config(tmp.path(), 300, 3);
        let report = TrainUseCase::new(cfg.clone()).execute().unwrap();

        assert_eq!(report.support, 60);
        assert!(report.accuracy > 0.0 && report.accuracy <= 1.0);

        let store = ArtifactStore::open(&cfg.artifact_dir);
        assert!(store.model_path().is_file());
        for file in [ENCODING_FILE, SCALER_FILE, METRICS_FILE, TRAINING_LOG_FILE] {
            assert!(store.dir().join(file).is_file(), "missing {file}");
        }
        assert_eq!(store.load_train_config().unwrap(), cfg);
        assert_eq!(store.load_report().unwrap(), report);

        let log = std::fs::read_to_string(store.dir().join(TRAINING_LOG_FILE)).unwrap();
        assert_eq!(log.lines().count(), 1 + cfg.epochs);
    }

    #[test]
    fn test_retraining_is_deterministic() {
        let tmp = TempDir::new().unwrap();
        let cfg = quick_config(tmp.path(), 250, 5);
        let first = TrainUseCase::new(cfg.clone()).execute().unwrap();
        let second = TrainUseCase::new(cfg).execute().unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_smote_training_runs() {
        let tmp = TempDir::new().unwrap();
        let cfg = TrainConfig {
            rebalance: Rebalance::Smote { k: 5 },
            ..quick_config(tmp.path(), 250, 8)
        };
        let report = TrainUseCase::new(cfg).execute().unwrap();
        assert!(report.auc_roc.is_some());
    }

    #[test]
    fn test_missing_dataset_is_fatal() {
        let tmp = TempDir::new().unwrap();
        let cfg = TrainConfig {
            dataset_path: tmp.path().join("nope.csv").to_string_lossy().into_owned(),
            artifact_dir: tmp.path().join("artifacts").to_string_lossy().into_owned(),
            ..TrainConfig::default()
        };
        let err = TrainUseCase::new(cfg).execute().unwrap_err();
        assert!(format!("{err:#}").contains("nope.csv"));
        assert!(!tmp.path().join("artifacts").exists());
    }

    #[test]
    fn test_bad_test_fraction_is_rejected() {
        let cfg = TrainConfig { test_fraction: 1.5, ..TrainConfig::default() };
        assert!(TrainUseCase::new(cfg).execute().is_err());
    }
}
