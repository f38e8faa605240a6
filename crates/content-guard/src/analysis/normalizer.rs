//! Ingestion of untrusted parameter documents.
//!
//! Everything that arrives from outside the crate as loose JSON passes through
//! here exactly once. The defaults applied to missing fields are listed in
//! [`defaults`] so the contract can be audited in one place.

use serde_json::{Map, Value};

use super::domain::{
    ContentParameters, ContentRecord, ContentType, ThemeFlags, ValuesFlags, MAX_FEAR_HORROR,
    MAX_LANGUAGE, MAX_RECOMMENDED_AGE, MAX_ROMANTIC_CONTENT, MAX_SEXUAL_CONTENT,
    MAX_SUBSTANCE_USE, MAX_VIOLENCE, MIN_RECOMMENDED_AGE,
};

/// Values substituted for fields the remote document leaves out.
pub mod defaults {
    pub const SEVERITY: i64 = 0;
    pub const FLAG: bool = false;
    pub const NOTES: &str = "Content analysis completed.";
    pub const REASONING: &str = "";
    pub const RECOMMENDED_AGE: i64 = 10;
}

/// Remote document after validation: the record plus the analyzer's own age suggestion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedAssessment {
    pub record: ContentRecord,
    pub suggested_age: Option<u8>,
}

/// Clamp a raw parameter object into range.
///
/// Missing or non-numeric severities become 0 before clamping, fractional
/// values truncate toward zero, and missing or non-boolean flags become false.
pub fn clamp_parameters(raw: &Value) -> ContentParameters {
    let empty = Map::new();
    let object = raw.as_object().unwrap_or(&empty);

    let themes = nested(object, &["themes"]);
    let values = nested(object, &["valuesSensitive", "values_sensitive"]);

    ContentParameters {
        violence: severity(object, &["violence"], MAX_VIOLENCE),
        language: severity(object, &["language"], MAX_LANGUAGE),
        sexual_content: severity(
            object,
            &["sexualContent", "sexual_content"],
            MAX_SEXUAL_CONTENT,
        ),
        romantic_content: severity(
            object,
            &["romanticContent", "romantic_content"],
            MAX_ROMANTIC_CONTENT,
        ),
        substance_use: severity(object, &["substanceUse", "substance_use"], MAX_SUBSTANCE_USE),
        fear_horror: severity(object, &["fearHorror", "fear_horror"], MAX_FEAR_HORROR),
        themes: ThemeFlags {
            death: flag(themes, &["death"]),
            bullying: flag(themes, &["bullying"]),
            mental_health: flag(themes, &["mentalHealth", "mental_health"]),
            moral_ambiguity: flag(themes, &["moralAmbiguity", "moral_ambiguity"]),
        },
        values_sensitive: ValuesFlags {
            lgbtq: flag(values, &["lgbtq"]),
            gender_identity: flag(values, &["genderIdentity", "gender_identity"]),
            religious: flag(values, &["religious"]),
            political: flag(values, &["political"]),
        },
    }
}

/// Validate a full analyzer document against the requested title and type.
pub fn normalize_document(
    document: &Map<String, Value>,
    requested_title: &str,
    requested_type: ContentType,
) -> NormalizedAssessment {
    let title = text(document, &["title"])
        .unwrap_or(requested_title)
        .to_string();
    let content_type = text(document, &["type", "contentType"])
        .and_then(ContentType::parse)
        .unwrap_or(requested_type);
    let parameters = clamp_parameters(document.get("parameters").unwrap_or(&Value::Null));
    let notes = text(document, &["notes"])
        .unwrap_or(defaults::NOTES)
        .to_string();
    let reasoning = text(document, &["reasoning"])
        .unwrap_or(defaults::REASONING)
        .to_string();

    let suggested_age = integer(document, &["recommendedAge", "recommended_age"])
        .filter(|age| *age != 0)
        .unwrap_or(defaults::RECOMMENDED_AGE)
        .clamp(i64::from(MIN_RECOMMENDED_AGE), i64::from(MAX_RECOMMENDED_AGE));

    NormalizedAssessment {
        record: ContentRecord {
            title,
            content_type,
            parameters,
            notes,
            reasoning: Some(reasoning),
        },
        suggested_age: u8::try_from(suggested_age).ok(),
    }
}

/// Catalog key for a user supplied title.
pub(crate) fn normalize_title(value: &str) -> String {
    value.trim().to_lowercase()
}

fn nested<'a>(object: &'a Map<String, Value>, keys: &[&str]) -> Option<&'a Map<String, Value>> {
    lookup(object, keys).and_then(Value::as_object)
}

fn lookup<'a>(object: &'a Map<String, Value>, keys: &[&str]) -> Option<&'a Value> {
    keys.iter().find_map(|key| object.get(*key))
}

fn text<'a>(object: &'a Map<String, Value>, keys: &[&str]) -> Option<&'a str> {
    lookup(object, keys)
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|value| !value.is_empty())
}

fn integer(object: &Map<String, Value>, keys: &[&str]) -> Option<i64> {
    match lookup(object, keys)? {
        Value::Number(number) => number.as_i64().or_else(|| number.as_f64().and_then(truncate)),
        Value::String(raw) => raw.trim().parse::<f64>().ok().and_then(truncate),
        _ => None,
    }
}

fn truncate(value: f64) -> Option<i64> {
    // saturating float-to-int cast
    value.is_finite().then(|| value.trunc() as i64)
}

fn severity(object: &Map<String, Value>, keys: &[&str], max: u8) -> u8 {
    let value = integer(object, keys).unwrap_or(defaults::SEVERITY);
    // clamped into [0, max] so the cast cannot truncate
    value.clamp(0, i64::from(max)) as u8
}

fn flag(object: Option<&Map<String, Value>>, keys: &[&str]) -> bool {
    object
        .and_then(|object| lookup(object, keys))
        .and_then(Value::as_bool)
        .unwrap_or(defaults::FLAG)
}
