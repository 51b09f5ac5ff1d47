// ============================================================
// Layer 6 — Artifact Store
// ============================================================
// Everything the serving side needs, in one directory:
//
//   artifacts/
//     attrition_model.mpk   ← weights (NamedMpkFileRecorder, full precision)
//     model_config.json     ← AttritionModelConfig, to rebuild the module
//     scaler.json           ← StandardScaler fitted on the train split
//     encoding.json         ← FeatureSpace: feature order, encoding table,
//                             medians, dropped columns
//     train_config.json     ← the TrainConfig that produced the rest
//     metrics.json          ← EvaluationReport on the test split
//
// Weights are stored at full precision so a reloaded model
// reproduces the probabilities seen at the end of training.
//
// Every load checks the file exists first and names it in the
// error, so a half-written artifact directory fails loudly.
//
// Reference: Burn Book §5 (Records and Checkpointing)

use anyhow::{bail, Context, Result};
use std::{
    fs,
    path::{Path, PathBuf},
};
use burn::{
    prelude::*,
    record::{FullPrecisionSettings, NamedMpkFileRecorder, Recorder},
};
use serde::{de::DeserializeOwned, Serialize};

use crate::application::train_use_case::TrainConfig;
use crate::data::{preprocessor::FeatureSpace, scaler::StandardScaler};
use crate::ml::{
    evaluation::EvaluationReport,
    model::{AttritionModel, AttritionModelConfig},
};

/// Weights file stem; the recorder appends `.mpk`.
pub const MODEL_STEM:        &str = "attrition_model";
pub const MODEL_CONFIG_FILE: &str = "model_config.json";
pub const SCALER_FILE:       &str = "scaler.json";
pub const ENCODING_FILE:     &str = "encoding.json";
pub const TRAIN_CONFIG_FILE: &str = "train_config.json";
pub const METRICS_FILE:      &str = "metrics.json";

type ModelRecorder = NamedMpkFileRecorder<FullPrecisionSettings>;

pub struct ArtifactStore {
    dir: PathBuf,
}

impl ArtifactStore {
    /// Open an existing directory for reading. Nothing is created.
    pub fn open(dir: impl AsRef<Path>) -> Self {
        Self { dir: dir.as_ref().to_path_buf() }
    }

    /// Open for writing, creating the directory if needed.
    pub fn create(dir: impl AsRef<Path>) -> Result<Self> {
        let dir = dir.as_ref().to_path_buf();
        fs::create_dir_all(&dir)
            .with_context(|| format!("Cannot create artifact directory '{}'", dir.display()))?;
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn model_path(&self) -> PathBuf {
        self.dir.join(format!("{MODEL_STEM}.mpk"))
    }

    // ── Model weights ─────────────────────────────────────────────────────────

    pub fn save_model<B: Backend>(&self, model: &AttritionModel<B>) -> Result<()> {
        let stem = self.dir.join(MODEL_STEM);
        ModelRecorder::new()
            .record(model.clone().into_record(), stem)
            .with_context(|| format!("Failed to save model to '{}'", self.model_path().display()))?;
        tracing::debug!("Saved model weights to '{}'", self.model_path().display());
        Ok(())
    }

    /// Load weights into `model`, which must already have the saved shape.
    pub fn load_model<B: Backend>(
        &self,
        model:  AttritionModel<B>,
        device: &B::Device,
    ) -> Result<AttritionModel<B>> {
        self.require(&self.model_path(), "model weights")?;
        let record = ModelRecorder::new()
            .load(self.dir.join(MODEL_STEM), device)
            .with_context(|| format!("Cannot load model weights '{}'", self.model_path().display()))?;
        Ok(model.load_record(record))
    }

    // ── JSON artifacts ────────────────────────────────────────────────────────

    pub fn save_model_config(&self, cfg: &AttritionModelConfig) -> Result<()> {
        self.save_json(MODEL_CONFIG_FILE, cfg)
    }

    pub fn load_model_config(&self) -> Result<AttritionModelConfig> {
        self.load_json(MODEL_CONFIG_FILE, "model config")
    }

    pub fn save_scaler(&self, scaler: &StandardScaler) -> Result<()> {
        self.save_json(SCALER_FILE, scaler)
    }

    pub fn load_scaler(&self) -> Result<StandardScaler> {
        self.load_json(SCALER_FILE, "scaler")
    }

    pub fn save_feature_space(&self, space: &FeatureSpace) -> Result<()> {
        self.save_json(ENCODING_FILE, space)
    }

    pub fn load_feature_space(&self) -> Result<FeatureSpace> {
        self.load_json(ENCODING_FILE, "encoding table")
    }

    pub fn save_train_config(&self, cfg: &TrainConfig) -> Result<()> {
        self.save_json(TRAIN_CONFIG_FILE, cfg)
    }

    pub fn load_train_config(&self) -> Result<TrainConfig> {
        self.load_json(TRAIN_CONFIG_FILE, "training config")
    }

    pub fn save_report(&self, report: &EvaluationReport) -> Result<()> {
        self.save_json(METRICS_FILE, report)
    }

    pub fn load_report(&self) -> Result<EvaluationReport> {
        self.load_json(METRICS_FILE, "evaluation report")
    }

    fn save_json<T: Serialize>(&self, file: &str, value: &T) -> Result<()> {
        let path = self.dir.join(file);
        let json = serde_json::to_string_pretty(value)?;
        fs::write(&path, json)
            .with_context(|| format!("Cannot write '{}'", path.display()))?;
        tracing::debug!("Saved '{}'", path.display());
        Ok(())
    }

    fn load_json<T: DeserializeOwned>(&self, file: &str, what: &str) -> Result<T> {
        let path = self.dir.join(file);
        self.require(&path, what)?;
        let json = fs::read_to_string(&path)
            .with_context(|| format!("Cannot read {what} from '{}'", path.display()))?;
        serde_json::from_str(&json)
            .with_context(|| format!("Malformed {what} in '{}'", path.display()))
    }

    fn require(&self, path: &Path, what: &str) -> Result<()> {
        if !path.is_file() {
            bail!(
                "Missing {what}: '{}' not found. Run 'train' before predicting.",
                path.display()
            );
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use burn::backend::NdArray;
    use tempfile::TempDir;

    #[test]
    fn test_model_config_round_trip() {
        let tmp = TempDir::new().unwrap();
        let store = ArtifactStore::create(tmp.path()).unwrap();
        store.save_model_config(&AttritionModelConfig::new(30)).unwrap();
        let cfg = store.load_model_config().unwrap();
        assert_eq!(cfg.num_features, 30);
        assert_eq!(cfg.num_classes, 2);
    }

    #[test]
    fn test_missing_file_is_named() {
        let tmp = TempDir::new().unwrap();
        let store = ArtifactStore::open(tmp.path());
        let err = store.load_scaler().unwrap_err().to_string();
        assert!(err.contains(SCALER_FILE), "{err}");
        assert!(err.contains("Missing scaler"), "{err}");
    }

    #[test]
    fn test_missing_model_weights() {
        let tmp = TempDir::new().unwrap();
        let store = ArtifactStore::open(tmp.path());
        let device = Default::default();
        let model = AttritionModelConfig::new(4).init::<NdArray>(&device);
        let err = store.load_model(model, &device).unwrap_err().to_string();
        assert!(err.contains("attrition_model.mpk"), "{err}");
    }

    #[test]
    fn test_weights_round_trip() {
        let tmp = TempDir::new().unwrap();
        let store = ArtifactStore::create(tmp.path()).unwrap();
        let device = Default::default();
        let model = AttritionModelConfig::new(4).init::<NdArray>(&device);
        store.save_model(&model).unwrap();
        assert!(store.model_path().is_file());

        let fresh = AttritionModelConfig::new(4).init::<NdArray>(&device);
        let loaded = store.load_model(fresh, &device).unwrap();
        assert_eq!(loaded.linear.weight.dims(), [4, 2]);
    }

    #[test]
    fn test_malformed_json_is_reported() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join(METRICS_FILE), "{not json").unwrap();
        let store = ArtifactStore::open(tmp.path());
        let err = format!("{:#}", store.load_report().unwrap_err());
        assert!(err.contains("Malformed evaluation report"), "{err}");
    }
}
