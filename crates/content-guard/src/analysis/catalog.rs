//! Pre-rated titles served when the remote analyzer cannot be reached, plus
//! the low-severity placeholder used for everything else.

use rand::Rng;

use super::domain::{ContentParameters, ContentRecord, ContentType, ThemeFlags, ValuesFlags};
use super::normalizer::normalize_title;

const PLACEHOLDER_DEATH_PROBABILITY: f64 = 0.3;
const PLACEHOLDER_BULLYING_PROBABILITY: f64 = 0.2;

const MOCK_ANALYSIS_NOTE: &str =
    "This is a mock analysis. API call failed, so using fallback data.";
const MISSING_KEY_NOTE: &str =
    "Analyzer API key not configured. Set ANALYZER_API_KEY in your .env file for real analysis.";

struct CatalogEntry {
    key: &'static str,
    title: &'static str,
    content_type: ContentType,
    parameters: ContentParameters,
    notes: &'static str,
}

const fn themes(
    death: bool,
    bullying: bool,
    mental_health: bool,
    moral_ambiguity: bool,
) -> ThemeFlags {
    ThemeFlags {
        death,
        bullying,
        mental_health,
        moral_ambiguity,
    }
}

const NO_VALUES_FLAGS: ValuesFlags = ValuesFlags {
    lgbtq: false,
    gender_identity: false,
    religious: false,
    political: false,
};

const ENTRIES: [CatalogEntry; 3] = [
    CatalogEntry {
        key: "harry potter",
        title: "Harry Potter and the Sorcerer's Stone",
        content_type: ContentType::Book,
        parameters: ContentParameters {
            violence: 2,
            language: 0,
            sexual_content: 0,
            romantic_content: 1,
            substance_use: 0,
            fear_horror: 2,
            themes: themes(true, true, false, false),
            values_sensitive: NO_VALUES_FLAGS,
        },
        notes: "Magical adventure with dark themes, death of parents, and mild violence.",
    },
    CatalogEntry {
        key: "frozen",
        title: "Frozen",
        content_type: ContentType::Movie,
        parameters: ContentParameters {
            violence: 1,
            language: 0,
            sexual_content: 0,
            romantic_content: 1,
            substance_use: 0,
            fear_horror: 1,
            themes: themes(true, false, false, false),
            values_sensitive: NO_VALUES_FLAGS,
        },
        notes: "Family-friendly animated film with themes of love and sacrifice.",
    },
    CatalogEntry {
        key: "stranger things",
        title: "Stranger Things",
        content_type: ContentType::Movie,
        parameters: ContentParameters {
            violence: 3,
            language: 2,
            sexual_content: 0,
            romantic_content: 1,
            substance_use: 1,
            fear_horror: 3,
            themes: themes(true, true, true, true),
            values_sensitive: NO_VALUES_FLAGS,
        },
        notes: "Sci-fi horror series with intense violence, horror, and mature themes.",
    },
];

/// Read-only catalog of known titles.
#[derive(Debug, Clone, Copy, Default)]
pub struct FallbackCatalog;

impl FallbackCatalog {
    /// Exact match on the trimmed, lowercased title.
    pub fn lookup(&self, title: &str) -> Option<ContentRecord> {
        let key = normalize_title(title);
        ENTRIES
            .iter()
            .find(|entry| entry.key == key)
            .map(|entry| ContentRecord {
                title: entry.title.to_string(),
                content_type: entry.content_type,
                parameters: entry.parameters,
                notes: entry.notes.to_string(),
                reasoning: None,
            })
    }

    pub fn titles(&self) -> impl Iterator<Item = &'static str> {
        ENTRIES.iter().map(|entry| entry.title)
    }
}

/// Why the placeholder had to be synthesized; selects the explanatory note.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaceholderReason {
    MissingCredentials,
    AnalyzerFailed,
}

impl PlaceholderReason {
    fn note(self) -> &'static str {
        match self {
            PlaceholderReason::MissingCredentials => MISSING_KEY_NOTE,
            PlaceholderReason::AnalyzerFailed => MOCK_ANALYSIS_NOTE,
        }
    }
}

/// Low-severity stand-in for a title the catalog does not know. The title is
/// echoed exactly as the caller sent it.
pub fn synthesize_placeholder<R: Rng>(
    title: &str,
    content_type: ContentType,
    rng: &mut R,
    reason: PlaceholderReason,
) -> ContentRecord {
    let parameters = ContentParameters {
        violence: rng.random_range(0..=1),
        language: rng.random_range(0..=1),
        sexual_content: 0,
        romantic_content: rng.random_range(0..=1),
        substance_use: 0,
        fear_horror: rng.random_range(0..=1),
        themes: ThemeFlags {
            death: rng.random_bool(PLACEHOLDER_DEATH_PROBABILITY),
            bullying: rng.random_bool(PLACEHOLDER_BULLYING_PROBABILITY),
            mental_health: false,
            moral_ambiguity: false,
        },
        values_sensitive: ValuesFlags::default(),
    };

    ContentRecord {
        title: title.to_string(),
        content_type,
        parameters,
        notes: reason.note().to_string(),
        reasoning: None,
    }
}
