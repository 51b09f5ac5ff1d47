// ============================================================
// Layer 4 — Attrition Batcher
// ============================================================
// Implements Burn's Batcher trait: a Vec of samples becomes one
// feature tensor and one label tensor.
//
//   Input:  N samples, each with D features
//   Output: features [N, D] (float), labels [N] (int)
//
// The same row → tensor conversion is used at inference time
// (features_tensor), so training and serving build their input
// tensors identically.
//
// Reference: Burn Book §4 (Batcher)

use burn::{data::dataloader::batcher::Batcher, prelude::*};

use crate::data::dataset::AttritionSample;

#[derive(Debug, Clone)]
pub struct AttritionBatch<B: Backend> {
    /// shape: [batch_size, num_features]
    pub features: Tensor<B, 2>,
    /// shape: [batch_size], values 0 (stayed) or 1 (left)
    pub labels: Tensor<B, 1, Int>,
}

#[derive(Clone, Debug)]
pub struct AttritionBatcher<B: Backend> {
    device: B::Device,
}

impl<B: Backend> AttritionBatcher<B> {
    pub fn new(device: B::Device) -> Self {
        Self { device }
    }
}

impl<B: Backend> Batcher<AttritionSample, AttritionBatch<B>> for AttritionBatcher<B> {
    fn batch(&self, items: Vec<AttritionSample>) -> AttritionBatch<B> {
        let batch_size = items.len();
        let width = items.first().map(|s| s.features.len()).unwrap_or(0);

        let flat: Vec<f32> = items
            .iter()
            .flat_map(|s| s.features.iter().copied())
            .collect();
        let labels: Vec<i32> = items.iter().map(|s| s.label as i32).collect();

        let features = Tensor::<B, 1>::from_floats(flat.as_slice(), &self.device)
            .reshape([batch_size, width]);
        let labels = Tensor::<B, 1, Int>::from_ints(labels.as_slice(), &self.device);

        AttritionBatch { features, labels }
    }
}

/// Stack f64 rows into a `[rows, width]` tensor.
pub fn features_tensor<B: Backend>(rows: &[Vec<f64>], device: &B::Device) -> Tensor<B, 2> {
    let width = rows.first().map(Vec::len).unwrap_or(0);
    let flat: Vec<f32> = rows
        .iter()
        .flat_map(|r| r.iter().map(|&x| x as f32))
        .collect();
    Tensor::<B, 1>::from_floats(flat.as_slice(), device).reshape([rows.len(), width])
}

#[cfg(test)]
mod tests {
    use super::*;
    use burn::backend::NdArray;

    #[test]
    fn test_batch_shapes() {
        let device = Default::default();
        let batcher = AttritionBatcher::<NdArray>::new(device);
        let batch = batcher.batch(vec![
            AttritionSample { features: vec![1.0, 2.0, 3.0], label: 0 },
            AttritionSample { features: vec![4.0, 5.0, 6.0], label: 1 },
        ]);
        assert_eq!(batch.features.dims(), [2, 3]);
        assert_eq!(batch.labels.dims(), [2]);
    }

    #[test]
    fn test_features_tensor_row_major() {
        let device = Default::default();
        let t = features_tensor::<NdArray>(&[vec![1.0, 2.0], vec![3.0, 4.0]], &device);
        assert_eq!(t.dims(), [2, 2]);
        let values = t.into_data().to_vec::<f32>().unwrap();
        assert_eq!(values, vec![1.0, 2.0, 3.0, 4.0]);
    }
}
