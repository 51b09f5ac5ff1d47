// ============================================================
// Layer 3 — Front-End Session State
// ============================================================
//   Idle ──submit──▶ Computing ──ok──▶ ResultDisplayed
//                        │
//                        └──err──▶ ErrorDisplayed
//
// Any edit from ResultDisplayed / ErrorDisplayed goes back to
// Idle. Nothing survives the session.

use crate::domain::prediction::Prediction;

#[derive(Debug, Clone, Default, PartialEq)]
pub enum SessionState {
    #[default]
    Idle,
    Computing,
    ResultDisplayed(Prediction),
    ErrorDisplayed(String),
}

impl SessionState {
    /// Predict was pressed.
    pub fn submit(&mut self) {
        *self = SessionState::Computing;
    }

    /// The computation finished. Only meaningful while `Computing`;
    /// a stray outcome in any other state is ignored.
    pub fn finish(&mut self, outcome: Result<Prediction, String>) {
        if *self != SessionState::Computing {
            tracing::warn!("Ignoring prediction outcome outside of Computing state");
            return;
        }
        *self = match outcome {
            Ok(p)    => SessionState::ResultDisplayed(p),
            Err(msg) => SessionState::ErrorDisplayed(msg),
        };
    }

    /// An input changed; any displayed result is now stale.
    pub fn edit(&mut self) {
        *self = SessionState::Idle;
    }

    #[cfg(test)]
    pub fn is_idle(&self) -> bool {
        matches!(self, SessionState::Idle)
    }
}
