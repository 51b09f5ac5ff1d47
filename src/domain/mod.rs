// ============================================================
// Layer 3 — Domain Layer
// ============================================================
// Plain Rust types that describe what the system talks about:
// an employee record, the documented form schema, a prediction,
// and the state of one front-end session.
//
// Rules for this layer:
//   - NO Burn or Polars types
//   - NO file I/O
//   - Only structs, enums and traits
//
// Reference: Rust Book §5 (Structs), §10 (Traits)

// One employee as entered through the form or a JSON file
pub mod record;

// The documented attribute table: labels, ranges, options, defaults
pub mod schema;

// The result of one prediction request
pub mod prediction;

// Idle → Computing → ResultDisplayed | ErrorDisplayed
pub mod session;

// Core abstractions (traits) that other layers implement
pub mod traits;
