// ============================================================
// Layer 5 — Inferencer
// ============================================================
use anyhow::{anyhow, bail, Result};
use burn::backend::ndarray::NdArrayDevice;

use crate::data::batcher::features_tensor;
use crate::domain::traits::Classifier;
use crate::infra::checkpoint::ArtifactStore;
use crate::ml::model::AttritionModel;
use crate::ml::trainer::InferBackend;

/// A trained model on the CPU backend, ready to score scaled rows.
pub struct LoadedModel {
    model:        AttritionModel<InferBackend>,
    num_features: usize,
    device:       NdArrayDevice,
}

impl LoadedModel {
    pub fn new(model: AttritionModel<InferBackend>, num_features: usize) -> Self {
        Self { model, num_features, device: NdArrayDevice::default() }
    }

    pub fn from_artifacts(store: &ArtifactStore) -> Result<Self> {
        let device = NdArrayDevice::default();
        let cfg = store.load_model_config()?;
        if cfg.num_classes != 2 {
            bail!("Model config declares {} classes; only binary models are supported", cfg.num_classes);
        }
        let model = store.load_model(cfg.init::<InferBackend>(&device), &device)?;
        tracing::info!("Model loaded ({} features)", cfg.num_features);
        Ok(Self { model, num_features: cfg.num_features, device })
    }

    pub fn model(&self) -> &AttritionModel<InferBackend> {
        &self.model
    }
}

impl Classifier for LoadedModel {
    fn num_features(&self) -> usize {
        self.num_features
    }

    fn predict_proba(&self, rows: &[Vec<f64>]) -> Result<Vec<[f64; 2]>> {
        if rows.is_empty() {
            return Ok(Vec::new());
        }
        for (i, row) in rows.iter().enumerate() {
            if row.len() != self.num_features {
                bail!("Row {} has {} features, model expects {}", i, row.len(), self.num_features);
            }
            if row.iter().any(|x| !x.is_finite()) {
                bail!("Row {} contains a non-finite feature value", i);
            }
        }

        let input = features_tensor::<InferBackend>(rows, &self.device);
        let probs = self
            .model
            .probabilities(input)
            .into_data()
            .to_vec::<f32>()
            .map_err(|e| anyhow!("Cannot read model output: {e:?}"))?;

        // p0 is derived from p1 so each pair sums to exactly 1 in f64.
        Ok(probs
            .chunks_exact(2)
            .map(|pair| {
                let p1 = f64::from(pair[1]).clamp(0.0, 1.0);
                [1.0 - p1, p1]
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ml::model::AttritionModelConfig;

    fn untrained(width: usize) -> LoadedModel {
        let model = AttritionModelConfig::new(width).init::<InferBackend>(&NdArrayDevice::default());
        LoadedModel::new(model, width)
    }

    #[test]
    fn test_probabilities_sum_to_one() {
        let clf = untrained(3);
        let out = clf.predict_proba(&[vec![0.1, 0.2, 0.3], vec![-1.0, 0.0, 4.0]]).unwrap();
        assert_eq!(out.len(), 2);
        for [p0, p1] in out {
            assert!((p0 + p1 - 1.0).abs() < 1e-12);
        }
    }

    #[test]
    fn test_tie_predicts_stay() {
        // Untrained weights give exactly 0.5 / 0.5
        let clf = untrained(2);
        assert_eq!(clf.predict(&[vec![1.0, 1.0]]).unwrap(), vec![0]);
    }

    #[test]
    fn test_rejects_wrong_width() {
        let clf = untrained(3);
        let err = clf.predict_proba(&[vec![1.0, 2.0]]).unwrap_err();
        assert!(err.to_string().contains("expects 3"));
    }

    #[test]
    fn test_rejects_nan() {
        let clf = untrained(2);
        assert!(clf.predict_proba(&[vec![f64::NAN, 0.0]]).is_err());
    }
}
