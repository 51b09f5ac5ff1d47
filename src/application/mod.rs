// ============================================================
// Layer 2 — Application / Use Cases
// ============================================================
// Workflow coordination only: no model math, no terminal I/O.
//
//   train_use_case   — CSV in, artifacts and test metrics out
//   predict_use_case — artifacts in, one Prediction per record
//
// Reference: Clean Architecture pattern

// The training workflow
pub mod train_use_case;

// The serving workflow
pub mod predict_use_case;
