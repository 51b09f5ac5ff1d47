// ============================================================
// Layer 2 — PredictUseCase
// ============================================================
// Serving side of the pipeline, for one record at a time:
//
//   EmployeeRecord ─▶ check against the form schema
//                  ─▶ fill unset fields with form defaults
//                  ─▶ FeatureSpace::vectorize (persisted encodings)
//                  ─▶ StandardScaler::transform_row
//                  ─▶ Classifier::predict + predict_proba
//                  ─▶ Prediction
//
// Artifacts are loaded once, validated against the documented
// form, and then shared read-only. A failure while loading is
// fatal; a failure while predicting only affects that request.

use std::sync::Arc;

use anyhow::{anyhow, bail, Context, Result};

use crate::data::{preprocessor::FeatureSpace, scaler::StandardScaler};
use crate::domain::{
    prediction::Prediction,
    record::EmployeeRecord,
    schema::{check_record, default_record, FEATURE_ORDER, FIELDS},
    traits::Classifier,
};
use crate::infra::checkpoint::ArtifactStore;
use crate::ml::{evaluation::EvaluationReport, inferencer::LoadedModel};

/// Everything a prediction needs, loaded from the artifact directory.
pub struct ServingArtifacts {
    pub model:  LoadedModel,
    pub scaler: StandardScaler,
    pub space:  FeatureSpace,
    /// Informational only; a missing or unreadable report is not fatal.
    pub report: Option<EvaluationReport>,
}

impl ServingArtifacts {
    pub fn load(dir: &str) -> Result<Self> {
        let store = ArtifactStore::open(dir);
        let space  = store.load_feature_space()?;
        let scaler = store.load_scaler()?;
        let model  = LoadedModel::from_artifacts(&store)?;

        let widths = [space.num_features(), scaler.num_features(), model.num_features()];
        if widths.iter().any(|&w| w != widths[0]) {
            bail!(
                "Artifacts in '{}' disagree on feature count: encoding {}, scaler {}, model {}",
                dir, widths[0], widths[1], widths[2]
            );
        }

        if let Ok(trained) = store.load_train_config() {
            tracing::info!(
                "Model trained on '{}' (seed {}, {:?})",
                trained.dataset_path, trained.seed, trained.rebalance
            );
        }
        let report = match store.load_report() {
            Ok(r) => Some(r),
            Err(e) => {
                tracing::warn!("No evaluation report: {e:#}");
                None
            }
        };

        tracing::info!("Serving artifacts loaded from '{}'", dir);
        Ok(Self { model, scaler, space, report })
    }

    /// The persisted feature order and encoding table must match the
    /// documented form, or predictions would be silently wrong.
    pub fn validate_form(&self) -> Result<()> {
        self.space
            .check_form_schema(&FIELDS, &FEATURE_ORDER)
            .context("Trained artifacts do not match this front end; retrain the model")
    }
}

pub struct PredictUseCase {
    artifacts: Arc<ServingArtifacts>,
}

impl PredictUseCase {
    pub fn new(artifacts: Arc<ServingArtifacts>) -> Self {
        Self { artifacts }
    }

    /// Load and validate the artifacts in `dir`.
    pub fn open(dir: &str) -> Result<Self> {
        let artifacts = ServingArtifacts::load(dir)?;
        artifacts.validate_form()?;
        Ok(Self::new(Arc::new(artifacts)))
    }

    pub fn artifacts(&self) -> &ServingArtifacts {
        &self.artifacts
    }

    /// Score one employee. Fields not present in `record` take the
    /// form defaults.
    pub fn predict(&self, record: &EmployeeRecord) -> Result<Prediction> {
        check_record(record).map_err(|msg| anyhow!(msg))?;
        tracing::debug!("Scoring a record with {} of {} fields set", record.len(), FIELDS.len());

        let mut full = default_record();
        full.merge(record.clone());

        let raw    = self.artifacts.space.vectorize(&full)?;
        let scaled = vec![self.artifacts.scaler.transform_row(&raw)?];

        let model = &self.artifacts.model;
        let class = model.predict(&scaled)?.first().copied().context("Model returned no class")?;
        let probabilities = model
            .predict_proba(&scaled)?
            .first()
            .copied()
            .context("Model returned no probabilities")?;

        let prediction = Prediction::new(class, probabilities);
        tracing::debug!("Prediction: {}", prediction.summary());
        Ok(prediction)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::train_use_case::TrainUseCase;
    use crate::domain::prediction::Attrition;
    use crate::infra::checkpoint::MODEL_STEM;
    use crate::test_support::quick_config;
    use tempfile::TempDir;

    /// Train once on synthetic data and open the result.
    fn trained(tmp: &TempDir) -> (PredictUseCase, String) {
        let cfg = quick_config(tmp.path(), 400, 21);
        TrainUseCase::new(cfg.clone()).execute().unwrap();
        (PredictUseCase::open(&cfg.artifact_dir).unwrap(), cfg.artifact_dir)
    }

    #[test]
    fn test_serving_scenarios() {
        let tmp = TempDir::new().unwrap();
        let (use_case, _) = trained(&tmp);

        // Defaults with a few overrides
        let record = EmployeeRecord::new()
            .with("Age", 35i64)
            .with("OverTime", "No")
            .with("MonthlyIncome", 5000i64)
            .with("JobSatisfaction", 3i64)
            .with("EnvironmentSatisfaction", 3i64);
        let p = use_case.predict(&record).unwrap();
        assert!((p.probabilities[0] + p.probabilities[1] - 1.0).abs() < 1e-9);
        assert!(p.confidence() >= 0.5);
        assert_eq!(p.label == Attrition::Yes, p.probabilities[1] > p.probabilities[0]);

        // Overtime + low satisfaction should look riskier than the opposite
        let risky = EmployeeRecord::new().with("OverTime", "Yes").with("JobSatisfaction", 1i64);
        let safe  = EmployeeRecord::new().with("OverTime", "No").with("JobSatisfaction", 4i64);
        let risky = use_case.predict(&risky).unwrap().probability_of_leaving();
        let safe  = use_case.predict(&safe).unwrap().probability_of_leaving();
        assert!(risky > safe, "risky {risky} vs safe {safe}");

        // Age bounds both score
        for age in [18i64, 60] {
            let p = use_case.predict(&EmployeeRecord::new().with("Age", age)).unwrap();
            assert!((0.0..=1.0).contains(&p.probability_of_leaving()));
        }

        // The same input gives the same answer
        let a = use_case.predict(&record).unwrap();
        let b = use_case.predict(&record).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_bad_inputs_are_transient_errors() {
        let tmp = TempDir::new().unwrap();
        let (use_case, _) = trained(&tmp);

        let out_of_range = EmployeeRecord::new().with("Age", 75i64);
        assert!(use_case.predict(&out_of_range).is_err());

        let unknown = EmployeeRecord::new().with("Department", "Legal");
        assert!(use_case.predict(&unknown).is_err());

        let typo = EmployeeRecord::new().with("Agee", 30i64);
        assert!(use_case.predict(&typo).unwrap_err().to_string().contains("Agee"));

        // Still usable afterwards
        assert!(use_case.predict(&EmployeeRecord::new()).is_ok());
    }

    #[test]
    fn test_missing_model_refuses_to_load() {
        let tmp = TempDir::new().unwrap();
        let (_, dir) = trained(&tmp);
        std::fs::remove_file(std::path::Path::new(&dir).join(format!("{MODEL_STEM}.mpk"))).unwrap();

        let err = PredictUseCase::open(&dir).err().unwrap();
        assert!(format!("{err:#}").contains("attrition_model.mpk"));
    }

    #[test]
    fn test_empty_directory_refuses_to_load() {
        let tmp = TempDir::new().unwrap();
        assert!(ServingArtifacts::load(&tmp.path().to_string_lossy()).is_err());
    }
}
