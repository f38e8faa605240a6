use super::super::domain::{ChildProfile, ContentParameters};
use super::{ScoreComponent, ScoreFactor};

/// Age bands in ascending order; any age above the last threshold lands in the top band.
const AGE_BANDS: [(u8, u8); 4] = [(5, 3), (7, 7), (10, 10), (13, 13)];
const TOP_BAND: u8 = 16;

/// Ordered base-age rules, most severe first; the first match wins.
pub(crate) fn base_age(parameters: &ContentParameters) -> (u8, &'static str) {
    let ContentParameters {
        violence,
        language,
        sexual_content,
        fear_horror,
        themes,
        ..
    } = *parameters;

    if violence >= 3 || sexual_content >= 2 {
        (16, "graphic violence or explicit sexual content")
    } else if violence >= 2 || language >= 3 || fear_horror >= 3 {
        (13, "moderate violence, explicit language, or intense fear")
    } else if violence >= 1 || language >= 2 || fear_horror >= 2 || themes.death {
        (10, "mild violence, frequent language, moderate fear, or death themes")
    } else if language >= 1 || fear_horror >= 1 {
        (7, "mild language or mild tension")
    } else {
        (3, "no notable content concerns")
    }
}

/// Snap an age up to the nearest band.
pub fn band_age(age: u8) -> u8 {
    AGE_BANDS
        .iter()
        .find(|(ceiling, _)| age <= *ceiling)
        .map(|(_, band)| *band)
        .unwrap_or(TOP_BAND)
}

pub(crate) fn score_age(
    parameters: &ContentParameters,
    profile: Option<&ChildProfile>,
) -> (Vec<ScoreComponent>, u8) {
    let mut components = Vec::new();

    let (base, reason) = base_age(parameters);
    components.push(ScoreComponent {
        factor: ScoreFactor::BaseSeverity,
        age_floor: base,
        notes: format!("base age {base}: {reason}"),
    });
    let mut age = base;

    if let Some(profile) = profile {
        if profile.sensitivities.fear_sensitive && parameters.fear_horror >= 2 {
            let floor = profile.age.saturating_add(2);
            components.push(ScoreComponent {
                factor: ScoreFactor::FearSensitivity,
                age_floor: floor,
                notes: format!(
                    "{} is fear sensitive and fear/horror is {}",
                    profile.name, parameters.fear_horror
                ),
            });
            age = age.max(floor);
        }

        if profile.sensitivities.violence_sensitive && parameters.violence >= 1 {
            let floor = profile.age.saturating_add(1);
            components.push(ScoreComponent {
                factor: ScoreFactor::ViolenceSensitivity,
                age_floor: floor,
                notes: format!(
                    "{} is violence sensitive and violence is {}",
                    profile.name, parameters.violence
                ),
            });
            age = age.max(floor);
        }
    }

    let banded = band_age(age);
    if banded != age {
        components.push(ScoreComponent {
            factor: ScoreFactor::Banding,
            age_floor: banded,
            notes: format!("age {age} rounded up to band {banded}"),
        });
    }

    (components, banded)
}

/// Recommended minimum age for a parameter set, optionally tailored to a child.
pub fn recommend_age(parameters: &ContentParameters, profile: Option<&ChildProfile>) -> u8 {
    score_age(parameters, profile).1
}
