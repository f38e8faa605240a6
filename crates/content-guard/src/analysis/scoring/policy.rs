use super::super::domain::{ContentParameters, Verdict};

/// Three-tier verdict. Evaluated on the parameters alone, independent of the
/// recommended age, so the two outputs may disagree.
pub fn verdict(parameters: &ContentParameters) -> Verdict {
    let high_risk = parameters.violence >= 3
        || parameters.sexual_content >= 2
        || parameters.fear_horror >= 3;
    if high_risk {
        return Verdict::Warning;
    }

    let moderate_risk =
        parameters.violence >= 2 || parameters.language >= 2 || parameters.fear_horror >= 2;
    if moderate_risk {
        return Verdict::Caution;
    }

    Verdict::Safe
}
