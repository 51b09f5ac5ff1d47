// ============================================================
// Layer 5 — ML / Model Layer (Burn)
// ============================================================
// All Burn model code lives here. The data layer only builds
// tensors; it never owns weights.
//
//   model.rs      — logistic regression as a single Linear layer
//                   with a two-way softmax
//   trainer.rs    — mini-batch Adam with class-weighted loss,
//                   one holdout loss per epoch
//   inferencer.rs — LoadedModel: restored weights behind the
//                   Classifier trait
//   evaluation.rs — accuracy, precision, recall, F1, AUC-ROC and
//                   the confusion matrix on the test split
//
// Reference: Burn Book §3 (Building Blocks), §5 (Training)

/// Logistic regression model and its config
pub mod model;

/// Training loop
pub mod trainer;

/// Classifier over a restored model
pub mod inferencer;

/// Holdout metrics
pub mod evaluation;
