// ============================================================
// Layer 6 — Infrastructure Layer
// ============================================================
// Files on disk shared by training and serving:
//
//   checkpoint.rs — ArtifactStore: model weights (Burn recorder)
//                   plus the JSON artifacts the serving side needs
//                   to rebuild the exact preprocessing
//
//   metrics.rs    — TrainingLog: per-epoch losses as CSV
//
// Reference: Burn Book §5 (Checkpointing)

/// Model weights and JSON artifacts
pub mod checkpoint;

/// Per-epoch training CSV
pub mod metrics;
