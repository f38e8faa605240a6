use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::domain::ContentParameters;

/// Scored severity dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ParameterDimension {
    Violence,
    Language,
    SexualContent,
    RomanticContent,
    SubstanceUse,
    FearHorror,
}

impl ParameterDimension {
    pub const ALL: [ParameterDimension; 6] = [
        ParameterDimension::Violence,
        ParameterDimension::Language,
        ParameterDimension::SexualContent,
        ParameterDimension::RomanticContent,
        ParameterDimension::SubstanceUse,
        ParameterDimension::FearHorror,
    ];

    pub const fn key(self) -> &'static str {
        match self {
            ParameterDimension::Violence => "violence",
            ParameterDimension::Language => "language",
            ParameterDimension::SexualContent => "sexualContent",
            ParameterDimension::RomanticContent => "romanticContent",
            ParameterDimension::SubstanceUse => "substanceUse",
            ParameterDimension::FearHorror => "fearHorror",
        }
    }

    /// Labels indexed by severity value.
    pub const fn scale(self) -> &'static [&'static str] {
        match self {
            ParameterDimension::Violence => &["None", "Mild", "Moderate", "Graphic"],
            ParameterDimension::Language => &["Clean", "Mild", "Frequent", "Explicit"],
            ParameterDimension::SexualContent => &["None", "Implied", "Explicit"],
            ParameterDimension::RomanticContent => &["None", "Light", "Central Theme"],
            ParameterDimension::SubstanceUse => &["None", "Casual", "Frequent"],
            ParameterDimension::FearHorror => &["None", "Mild Tension", "Moderate", "Intense"],
        }
    }

    pub fn value(self, parameters: &ContentParameters) -> u8 {
        match self {
            ParameterDimension::Violence => parameters.violence,
            ParameterDimension::Language => parameters.language,
            ParameterDimension::SexualContent => parameters.sexual_content,
            ParameterDimension::RomanticContent => parameters.romantic_content,
            ParameterDimension::SubstanceUse => parameters.substance_use,
            ParameterDimension::FearHorror => parameters.fear_horror,
        }
    }

    pub fn label(self, value: u8) -> &'static str {
        let scale = self.scale();
        scale
            .get(usize::from(value))
            .or_else(|| scale.last())
            .copied()
            .unwrap_or("Unknown")
    }
}

/// Human readable label for every dimension of a parameter set, keyed by wire name.
pub fn parameter_labels(parameters: &ContentParameters) -> BTreeMap<&'static str, &'static str> {
    ParameterDimension::ALL
        .iter()
        .map(|dimension| (dimension.key(), dimension.label(dimension.value(parameters))))
        .collect()
}
