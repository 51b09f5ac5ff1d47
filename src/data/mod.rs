// ============================================================
// Layer 4 — Data Pipeline
// ============================================================
// Everything from the raw CSV to Burn-ready batches.
//
//   HR CSV
//       │
//       ▼
//   CsvLoader         → DataFrame (String / Float64 columns)
//       │
//       ▼
//   FeatureSpace      → drop ids/constants, label-encode, impute medians
//                       (dense Float64 DataFrame + labels)
//       │
//       ▼
//   split_train_test  → seeded 80/20 shuffle split
//       │
//       ▼
//   StandardScaler    → fit on the train rows, apply to both
//       │
//       ▼
//   Smote (optional)  → oversample the minority class in train
//       │
//       ▼
//   AttritionDataset / AttritionBatcher → tensors for the trainer
//
// At inference the FeatureSpace and StandardScaler are loaded
// from disk and applied to a single record in the same order.

/// Loads the CSV with Polars and normalises column types
pub mod loader;

/// Drop / take / row selection on the Polars table
pub mod table;

/// Alphabetical label encoding (the Encoding Table)
pub mod encoder;

/// Drop / encode / impute, and record → feature vector
pub mod preprocessor;

/// Per-column standardisation
pub mod scaler;

/// Seeded train/test split
pub mod splitter;

/// Class weights and SMOTE
pub mod resample;

/// Implements Burn's Dataset trait for attrition samples
pub mod dataset;

/// Implements Burn's Batcher trait to create tensor batches
pub mod batcher;
