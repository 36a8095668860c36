use serde::{Deserialize, Serialize};

/// Points awarded per factor. The total is clamped to 0..=100.
///
/// Incompatible and ineligible offerings earn nothing by default, so with the default weights
/// the raw total already lies within 0..=100.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringWeights {
    /// Full credit for a priority-1 interest; later priorities decay linearly.
    pub interest: f32,
    pub subject_compatible: f32,
    pub subject_incompatible: f32,
    pub eligible: f32,
    pub ineligible: f32,
    pub within_budget: f32,
    pub preferred_location: f32,
}

impl Default for ScoringWeights {
    fn default() -> Self {
        Self {
            interest: 40.0,
            subject_compatible: 20.0,
            subject_incompatible: 0.0,
            eligible: 20.0,
            ineligible: 0.0,
            within_budget: 15.0,
            preferred_location: 5.0,
        }
    }
}
