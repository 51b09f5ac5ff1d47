// ============================================================
// Layer 5 — Training Loop
// ============================================================
// Mini-batch Adam over the scaled train split, one holdout loss
// per epoch.
//
//   - Training runs on TrainBackend (Autodiff<NdArray>)
//   - model.valid() hands back the same weights on NdArray, which
//     is what the holdout pass and the saved artifact use
//   - The loader shuffles with the configured seed and runs on the
//     calling thread, so two runs on the same data produce the same
//     weights bit for bit
//
// Reference: Burn Book §5, Kingma & Ba (2015) Adam

use anyhow::{bail, Result};
use burn::{
    backend::{ndarray::NdArrayDevice, Autodiff, NdArray},
    data::dataloader::{batcher::Batcher, DataLoaderBuilder},
    module::AutodiffModule,
    optim::{decay::WeightDecayConfig, AdamConfig, GradientsParams, Optimizer},
    prelude::*,
};

use crate::application::train_use_case::TrainConfig;
use crate::data::{batcher::AttritionBatcher, dataset::AttritionDataset};
use crate::infra::metrics::{EpochMetrics, TrainingLog};
use crate::ml::model::{AttritionModel, AttritionModelConfig};

pub type TrainBackend = Autodiff<NdArray>;
pub type InferBackend = NdArray;

/// Train a fresh model and return it on the inference backend.
///
/// `class_weights` is passed straight to the loss; `None` means an
/// unweighted cross-entropy (used after SMOTE or with rebalancing off).
pub fn run_training(
    cfg:           &TrainConfig,
    model_cfg:     &AttritionModelConfig,
    train_dataset: AttritionDataset,
    holdout:       &AttritionDataset,
    class_weights: Option<[f32; 2]>,
    log:           &TrainingLog,
) -> Result<AttritionModel<InferBackend>> {
    if train_dataset.sample_count() == 0 {
        bail!("Training split is empty");
    }
    if cfg.batch_size == 0 {
        bail!("batch_size must be at least 1");
    }

    let device = NdArrayDevice::default();
    let mut model: AttritionModel<TrainBackend> = model_cfg.init(&device);
    tracing::info!(
        "Model ready: {} features → {} classes, {} train rows",
        model_cfg.num_features,
        model_cfg.num_classes,
        train_dataset.sample_count()
    );

    let decay = (cfg.weight_decay > 0.0).then(|| WeightDecayConfig::new(cfg.weight_decay as f32));
    let mut optim = AdamConfig::new().with_weight_decay(decay).init();

    let train_loader = DataLoaderBuilder::new(AttritionBatcher::<TrainBackend>::new(device.clone()))
        .batch_size(cfg.batch_size)
        .shuffle(cfg.seed)
        .build(train_dataset);

    // The holdout split is small: one batch, built once.
    let holdout_batch = (holdout.sample_count() > 0).then(|| {
        AttritionBatcher::<InferBackend>::new(device.clone()).batch(holdout.samples().to_vec())
    });

    for epoch in 1..=cfg.epochs {
        let mut loss_sum = 0.0f64;
        let mut batches  = 0usize;

        for batch in train_loader.iter() {
            let loss = model.forward_loss(batch.features, batch.labels, class_weights);
            loss_sum += loss.clone().into_scalar().elem::<f64>();
            batches  += 1;

            let grads = loss.backward();
            let grads = GradientsParams::from_grads(grads, &model);
            model = optim.step(cfg.learning_rate, model, grads);
        }

        let train_loss = if batches > 0 { loss_sum / batches as f64 } else { f64::NAN };

        let holdout_loss = match &holdout_batch {
            Some(batch) => model
                .valid()
                .forward_loss(batch.features.clone(), batch.labels.clone(), None)
                .into_scalar()
                .elem::<f64>(),
            None => f64::NAN,
        };

        log.log(&EpochMetrics::new(epoch, train_loss, holdout_loss))?;
        if epoch == 1 || epoch % 10 == 0 || epoch == cfg.epochs {
            tracing::info!(
                "Epoch {:>3}/{} | train_loss={:.4} | holdout_loss={:.4}",
                epoch, cfg.epochs, train_loss, holdout_loss,
            );
        }
    }

    tracing::info!("Training complete; losses in '{}'", log.csv_path().display());
    Ok(model.valid())
}
