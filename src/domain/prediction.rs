// ============================================================
// Layer 3 — Prediction
// ============================================================
// What one Predict click produces: the label, both class
// probabilities, and the confidence (probability of the
// predicted class).

use std::fmt;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Attrition {
    Yes,
    No,
}

impl Attrition {
    /// Class index → label. Class 1 is "left the company".
    pub fn from_class(class: u8) -> Self {
        if class == 1 { Attrition::Yes } else { Attrition::No }
    }

    pub fn class(self) -> usize {
        match self {
            Attrition::Yes => 1,
            Attrition::No  => 0,
        }
    }
}

impl fmt::Display for Attrition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Attrition::Yes => f.write_str("Attrition = Yes"),
            Attrition::No  => f.write_str("Attrition = No"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Prediction {
    pub label:         Attrition,
    /// `[p(stay), p(leave)]`
    pub probabilities: [f64; 2],
}

impl Prediction {
    pub fn new(class: u8, probabilities: [f64; 2]) -> Self {
        Self { label: Attrition::from_class(class), probabilities }
    }

    /// Probability of the predicted class.
    pub fn confidence(&self) -> f64 {
        self.probabilities[self.label.class()]
    }

    pub fn probability_of_leaving(&self) -> f64 {
        self.probabilities[1]
    }

    /// One-line summary, e.g. "Attrition = No (confidence 0.73)".
    pub fn summary(&self) -> String {
        format!("{} (confidence {:.2})", self.label, self.confidence())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_confidence_tracks_predicted_class() {
        let p = Prediction::new(1, [0.3, 0.7]);
        assert_eq!(p.label, Attrition::Yes);
        assert!((p.confidence() - 0.7).abs() < 1e-12);

        let p = Prediction::new(0, [0.8, 0.2]);
        assert_eq!(p.label, Attrition::No);
        assert!((p.confidence() - 0.8).abs() < 1e-12);
    }

    #[test]
    fn test_summary_rounds_to_two_places() {
        let p = Prediction::new(0, [0.7349, 0.2651]);
        assert_eq!(p.summary(), "Attrition = No (confidence 0.73)");
    }
}
