use super::scoring::ScoreComponent;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Inclusive upper bounds for each severity dimension.
pub const MAX_VIOLENCE: u8 = 3;
pub const MAX_LANGUAGE: u8 = 3;
pub const MAX_SEXUAL_CONTENT: u8 = 2;
pub const MAX_ROMANTIC_CONTENT: u8 = 2;
pub const MAX_SUBSTANCE_USE: u8 = 2;
pub const MAX_FEAR_HORROR: u8 = 3;

/// Lowest and highest recommended ages the service will report.
pub const MIN_RECOMMENDED_AGE: u8 = 3;
pub const MAX_RECOMMENDED_AGE: u8 = 16;

/// Kind of media being assessed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentType {
    Book,
    Movie,
}

impl ContentType {
    pub const fn label(self) -> &'static str {
        match self {
            ContentType::Book => "book",
            ContentType::Movie => "movie",
        }
    }

    /// Lenient parse used for remote documents and CLI flags.
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "book" | "books" | "novel" => Some(Self::Book),
            "movie" | "movies" | "film" | "show" | "tv" | "series" => Some(Self::Movie),
            _ => None,
        }
    }
}

impl std::fmt::Display for ContentType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Thematic flags that influence the age recommendation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ThemeFlags {
    pub death: bool,
    pub bullying: bool,
    pub mental_health: bool,
    pub moral_ambiguity: bool,
}

/// Flags for topics some families want surfaced; informational only.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValuesFlags {
    pub lgbtq: bool,
    pub gender_identity: bool,
    pub religious: bool,
    pub political: bool,
}

/// Safety profile of a title. Every severity is within its declared range.
///
/// Construct through [`ContentParameters::clamped`] (or the raw-document
/// normalizer) whenever values come from outside the crate; deserializing
/// also clamps, so request bodies cannot smuggle in out-of-range values.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", from = "UncheckedParameters")]
pub struct ContentParameters {
    pub violence: u8,
    pub language: u8,
    pub sexual_content: u8,
    pub romantic_content: u8,
    pub substance_use: u8,
    pub fear_horror: u8,
    pub themes: ThemeFlags,
    pub values_sensitive: ValuesFlags,
}

impl ContentParameters {
    pub fn clamped(self) -> Self {
        Self {
            violence: self.violence.min(MAX_VIOLENCE),
            language: self.language.min(MAX_LANGUAGE),
            sexual_content: self.sexual_content.min(MAX_SEXUAL_CONTENT),
            romantic_content: self.romantic_content.min(MAX_ROMANTIC_CONTENT),
            substance_use: self.substance_use.min(MAX_SUBSTANCE_USE),
            fear_horror: self.fear_horror.min(MAX_FEAR_HORROR),
            themes: self.themes,
            values_sensitive: self.values_sensitive,
        }
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct UncheckedParameters {
    #[serde(default)]
    violence: u8,
    #[serde(default)]
    language: u8,
    #[serde(default)]
    sexual_content: u8,
    #[serde(default)]
    romantic_content: u8,
    #[serde(default)]
    substance_use: u8,
    #[serde(default)]
    fear_horror: u8,
    #[serde(default)]
    themes: ThemeFlags,
    #[serde(default)]
    values_sensitive: ValuesFlags,
}

impl From<UncheckedParameters> for ContentParameters {
    fn from(raw: UncheckedParameters) -> Self {
        ContentParameters {
            violence: raw.violence,
            language: raw.language,
            sexual_content: raw.sexual_content,
            romantic_content: raw.romantic_content,
            substance_use: raw.substance_use,
            fear_horror: raw.fear_horror,
            themes: raw.themes,
            values_sensitive: raw.values_sensitive,
        }
        .clamped()
    }
}

/// Assessed title together with the notes that explain the ratings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentRecord {
    pub title: String,
    #[serde(rename = "type")]
    pub content_type: ContentType,
    pub parameters: ContentParameters,
    pub notes: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reasoning: Option<String>,
}

/// Identifier wrapper for stored child profiles.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProfileId(pub String);

impl std::fmt::Display for ProfileId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Sensitivities {
    #[serde(default)]
    pub fear_sensitive: bool,
    #[serde(default)]
    pub violence_sensitive: bool,
}

/// Child the assessment is tailored to. Only `age` and `sensitivities` feed scoring.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChildProfile {
    pub id: ProfileId,
    pub name: String,
    pub age: u8,
    #[serde(default)]
    pub sensitivities: Sensitivities,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

/// Three-tier outcome label, ordered from least to most severe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Verdict {
    Safe,
    Caution,
    Warning,
}

impl Verdict {
    pub const fn label(self) -> &'static str {
        match self {
            Verdict::Safe => "safe",
            Verdict::Caution => "caution",
            Verdict::Warning => "warning",
        }
    }
}

/// Where the assessment came from: the remote analyzer or a catalog match
/// are `High`; a synthesized placeholder is `Medium`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Confidence {
    High,
    Medium,
}

impl Confidence {
    pub const fn label(self) -> &'static str {
        match self {
            Confidence::High => "high",
            Confidence::Medium => "medium",
        }
    }
}

/// Output envelope of one analysis request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisResult {
    pub content: ContentRecord,
    pub recommended_age: u8,
    pub verdict: Verdict,
    pub confidence: Confidence,
    pub profile: Option<ChildProfile>,
    /// Rule contributions behind `recommended_age`, in the order they applied.
    #[serde(default)]
    pub score_trace: Vec<ScoreComponent>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl AnalysisResult {
    /// True when the remote analyzer could not be used for this result.
    pub fn is_degraded(&self) -> bool {
        self.error.is_some()
    }
}
