use burn::data::dataset::Dataset;

/// One scaled training row. Burn computes in f32, so the f64
/// feature row is narrowed here, once.
#[derive(Debug, Clone, PartialEq)]
pub struct AttritionSample {
    pub features: Vec<f32>,
    pub label:    u8,
}

pub struct AttritionDataset {
    samples: Vec<AttritionSample>,
}

impl AttritionDataset {
    pub fn from_rows(rows: &[Vec<f64>], labels: &[u8]) -> Self {
        let samples = rows
            .iter()
            .zip(labels)
            .map(|(row, &label)| AttritionSample {
                features: row.iter().map(|&x| x as f32).collect(),
                label,
            })
            .collect();
        Self { samples }
    }

    pub fn sample_count(&self) -> usize { self.samples.len() }

    pub fn samples(&self) -> &[AttritionSample] { &self.samples }
}

impl Dataset<AttritionSample> for AttritionDataset {
    fn get(&self, index: usize) -> Option<AttritionSample> {
        self.samples.get(index).cloned()
    }

    fn len(&self) -> usize {
        self.samples.len()
    }
}
