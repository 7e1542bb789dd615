//! Online inference
//!
//! A `RiskModel` is built once from a loaded artifact bundle and shared
//! read-only across sessions; each `InferenceSession` owns the session-scoped
//! risk state that downstream advice content reads.

mod session;

pub use session::{InferenceSession, RawSample, RiskModel};

use crate::classifier::RiskLabel;
use serde::{Deserialize, Serialize};

/// Session-scoped classification result.
///
/// `Unknown` until a prediction completes; downstream consumers must treat
/// `Unknown` as "no recommendation available yet", never as a default risk
/// level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskState {
    #[default]
    Unknown,
    Low,
    High,
}

impl RiskState {
    /// The classified label, if a prediction has completed.
    pub fn label(&self) -> Option<RiskLabel> {
        match self {
            RiskState::Unknown => None,
            RiskState::Low => Some(RiskLabel::Low),
            RiskState::High => Some(RiskLabel::High),
        }
    }

    pub fn is_known(&self) -> bool {
        !matches!(self, RiskState::Unknown)
    }
}

impl From<RiskLabel> for RiskState {
    fn from(label: RiskLabel) -> Self {
        match label {
            RiskLabel::Low => RiskState::Low,
            RiskLabel::High => RiskState::High,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_unknown() {
        assert_eq!(RiskState::default(), RiskState::Unknown);
        assert!(!RiskState::default().is_known());
        assert_eq!(RiskState::Unknown.label(), None);
    }

    #[test]
    fn test_label_round_trip() {
        assert_eq!(RiskState::from(RiskLabel::High).label(), Some(RiskLabel::High));
        assert_eq!(RiskState::from(RiskLabel::Low).label(), Some(RiskLabel::Low));
    }
}
