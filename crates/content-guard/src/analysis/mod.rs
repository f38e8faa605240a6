//! Child-safety assessment of books and movies.
//!
//! The [`service::ContentAnalysisService`] asks the remote analyzer first and
//! falls back to the [`catalog`] when that fails; either way the parameters
//! are scored by the pure rules in [`scoring`].

pub mod analyzer;
pub mod catalog;
pub mod domain;
pub mod labels;
pub mod normalizer;
pub mod profiles;
pub mod repository;
pub mod router;
pub mod scoring;
pub mod service;

#[cfg(test)]
mod tests;

pub use analyzer::{
    AnalyzerError, ContentAnalyzer, HttpContentAnalyzer, OfflineAnalyzer, RemoteFailure,
};
pub use catalog::{synthesize_placeholder, FallbackCatalog, PlaceholderReason};
pub use domain::{
    AnalysisResult, ChildProfile, Confidence, ContentParameters, ContentRecord, ContentType,
    ProfileId, Sensitivities, ThemeFlags, ValuesFlags, Verdict,
};
pub use labels::{parameter_labels, ParameterDimension};
pub use normalizer::{clamp_parameters, NormalizedAssessment};
pub use profiles::JsonFileProfileStore;
pub use repository::{ProfileFields, ProfileStore, ProfileStoreError};
pub use router::{analysis_router, AnalysisRequest, AnalysisView};
pub use scoring::{
    recommend_age, verdict, ScoreComponent, ScoreFactor, ScoreOutcome, ScoringEngine,
};
pub use service::{AnalysisServiceError, ContentAnalysisService};
