// ============================================================
// Layer 3 — Employee Record
// ============================================================
// One employee's raw attributes, keyed by the dataset column
// name ("Age", "OverTime", ...). Values stay in their raw form:
// numbers as numbers, categories as the exact strings the
// dataset uses ("Travel_Rarely", "Research & Development").
//
// Encoding into the model's numeric space happens later, in
// data::preprocessor, using the persisted Encoding Table.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// A single raw attribute value.
///
/// `untagged` lets a JSON record file say `"Age": 35` and
/// `"OverTime": "No"` without wrapping either value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawValue {
    Number(f64),
    Category(String),
}

impl RawValue {
    /// Parse a command-line string: anything that reads as a finite
    /// number is a number, everything else is a category label.
    pub fn parse(text: &str) -> Self {
        let trimmed = text.trim();
        match trimmed.parse::<f64>() {
            Ok(n) if n.is_finite() => RawValue::Number(n),
            _ => RawValue::Category(trimmed.to_string()),
        }
    }
}

impl fmt::Display for RawValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RawValue::Number(n) if n.fract() == 0.0 => write!(f, "{}", *n as i64),
            RawValue::Number(n) => write!(f, "{n}"),
            RawValue::Category(c) => f.write_str(c),
        }
    }
}

impl From<f64> for RawValue {
    fn from(n: f64) -> Self {
        RawValue::Number(n)
    }
}

impl From<i64> for RawValue {
    fn from(n: i64) -> Self {
        RawValue::Number(n as f64)
    }
}

impl From<&str> for RawValue {
    fn from(s: &str) -> Self {
        RawValue::Category(s.to_string())
    }
}

/// An employee record. BTreeMap keeps `Debug` and JSON output in a
/// stable order, which makes logs and test failures readable.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EmployeeRecord {
    values: BTreeMap<String, RawValue>,
}

impl EmployeeRecord {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style setter.
    pub fn with(mut self, field: impl Into<String>, value: impl Into<RawValue>) -> Self {
        self.set(field, value);
        self
    }

    pub fn set(&mut self, field: impl Into<String>, value: impl Into<RawValue>) {
        self.values.insert(field.into(), value.into());
    }

    pub fn get(&self, field: &str) -> Option<&RawValue> {
        self.values.get(field)
    }

    pub fn fields(&self) -> impl Iterator<Item = (&str, &RawValue)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Overlay every value of `other` on top of this record.
    pub fn merge(&mut self, other: EmployeeRecord) {
        self.values.extend(other.values);
    }
}
