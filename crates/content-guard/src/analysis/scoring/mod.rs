mod policy;
mod rules;

pub use policy::verdict;
pub use rules::{band_age, recommend_age};

use super::domain::{ChildProfile, ContentParameters, Verdict};
use serde::{Deserialize, Serialize};

/// Stateless engine applying the age rules and verdict policy to a parameter set.
#[derive(Debug, Clone, Copy, Default)]
pub struct ScoringEngine;

impl ScoringEngine {
    pub fn new() -> Self {
        Self
    }

    pub fn score(
        &self,
        parameters: &ContentParameters,
        profile: Option<&ChildProfile>,
    ) -> ScoreOutcome {
        let (components, recommended_age) = rules::score_age(parameters, profile);

        ScoreOutcome {
            recommended_age,
            verdict: verdict(parameters),
            components,
        }
    }
}

/// Which rule contributed an age floor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoreFactor {
    BaseSeverity,
    FearSensitivity,
    ViolenceSensitivity,
    Banding,
}

impl ScoreFactor {
    pub const fn label(self) -> &'static str {
        match self {
            ScoreFactor::BaseSeverity => "base severity",
            ScoreFactor::FearSensitivity => "fear sensitivity",
            ScoreFactor::ViolenceSensitivity => "violence sensitivity",
            ScoreFactor::Banding => "banding",
        }
    }
}

/// Discrete contribution to the recommended age, kept for audits.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreComponent {
    pub factor: ScoreFactor,
    pub age_floor: u8,
    pub notes: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreOutcome {
    pub recommended_age: u8,
    pub verdict: Verdict,
    pub components: Vec<ScoreComponent>,
}
