use burn::{
    nn::{loss::CrossEntropyLossConfig, Initializer, Linear, LinearConfig},
    prelude::*,
    tensor::activation::softmax,
};

// #[derive(Config)] already provides Clone and Serialize/Deserialize.
#[derive(Config, Debug)]
pub struct AttritionModelConfig {
    pub num_features: usize,
    #[config(default = 2)]
    pub num_classes:  usize,
}

impl AttritionModelConfig {
    /// Weights and bias start at zero, so every run starts from the same point.
    pub fn init<B: Backend>(&self, device: &B::Device) -> AttritionModel<B> {
        let linear = LinearConfig::new(self.num_features, self.num_classes)
            .with_initializer(Initializer::Zeros)
            .init(device);
        AttritionModel { linear }
    }
}

/// Two-class logistic regression: one linear layer over the scaled
/// features, softmax over the two logits.
#[derive(Module, Debug)]
pub struct AttritionModel<B: Backend> {
    pub linear: Linear<B>,
}

impl<B: Backend> AttritionModel<B> {
    /// features: [batch, num_features] → logits: [batch, 2]
    pub fn forward(&self, features: Tensor<B, 2>) -> Tensor<B, 2> {
        self.linear.forward(features)
    }

    /// Rows of `[p(stay), p(leave)]`.
    pub fn probabilities(&self, features: Tensor<B, 2>) -> Tensor<B, 2> {
        softmax(self.forward(features), 1)
    }

    /// Cross-entropy, optionally weighted per class.
    pub fn forward_loss(
        &self,
        features:      Tensor<B, 2>,
        labels:        Tensor<B, 1, Int>,
        class_weights: Option<[f32; 2]>,
    ) -> Tensor<B, 1> {
        let logits = self.forward(features);
        let ce = CrossEntropyLossConfig::new()
            .with_weights(class_weights.map(|w| w.to_vec()))
            .init(&logits.device());
        ce.forward(logits, labels)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use burn::backend::NdArray;

    #[test]
    fn test_untrained_model_is_undecided() {
        let device = Default::default();
        let model: AttritionModel<NdArray> = AttritionModelConfig::new(3).init(&device);
        let x = Tensor::<NdArray, 2>::from_floats([[1.0, -2.0, 0.5]], &device);
        let p = model.probabilities(x).into_data().to_vec::<f32>().unwrap();
        assert_eq!(p.len(), 2);
        assert!((p[0] - 0.5).abs() < 1e-6);
        assert!((p[1] - 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_loss_is_ln2_at_start() {
        let device = Default::default();
        let model: AttritionModel<NdArray> = AttritionModelConfig::new(2).init(&device);
        let x = Tensor::<NdArray, 2>::from_floats([[1.0, 0.0], [0.0, 1.0]], &device);
        let y = Tensor::<NdArray, 1, Int>::from_ints([0, 1], &device);
        let loss = model
            .forward_loss(x, y, None)
            .into_scalar()
            .elem::<f64>();
        assert!((loss - std::f64::consts::LN_2).abs() < 1e-5);
    }
}
