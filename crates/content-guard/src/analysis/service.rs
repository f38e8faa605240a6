use std::sync::{Arc, Mutex};

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::{info, warn};

use super::analyzer::{AnalyzerError, ContentAnalyzer};
use super::catalog::{synthesize_placeholder, FallbackCatalog, PlaceholderReason};
use super::domain::{
    AnalysisResult, ChildProfile, Confidence, ContentParameters, ContentRecord, ContentType,
    ProfileId, MAX_RECOMMENDED_AGE, MIN_RECOMMENDED_AGE,
};
use super::repository::{ProfileStore, ProfileStoreError};
use super::scoring::{ScoreOutcome, ScoringEngine};

/// Orchestrator composing the remote analyzer, fallback catalog, and scoring engine.
pub struct ContentAnalysisService<A, P, G = StdRng> {
    analyzer: Arc<A>,
    profiles: Arc<P>,
    catalog: FallbackCatalog,
    engine: ScoringEngine,
    placeholder_rng: Mutex<G>,
}

impl<A, P> ContentAnalysisService<A, P, StdRng>
where
    A: ContentAnalyzer + 'static,
    P: ProfileStore + 'static,
{
    pub fn new(analyzer: Arc<A>, profiles: Arc<P>) -> Self {
        Self::with_rng(analyzer, profiles, StdRng::from_os_rng())
    }

    /// Deterministic placeholder generation for tests and demos.
    pub fn seeded(analyzer: Arc<A>, profiles: Arc<P>, seed: u64) -> Self {
        Self::with_rng(analyzer, profiles, StdRng::seed_from_u64(seed))
    }
}

impl<A, P, G> ContentAnalysisService<A, P, G>
where
    A: ContentAnalyzer + 'static,
    P: ProfileStore + 'static,
    G: Rng + Send + 'static,
{
    pub fn with_rng(analyzer: Arc<A>, profiles: Arc<P>, rng: G) -> Self {
        Self {
            analyzer,
            profiles,
            catalog: FallbackCatalog,
            engine: ScoringEngine::new(),
            placeholder_rng: Mutex::new(rng),
        }
    }

    pub fn profiles(&self) -> &P {
        &self.profiles
    }

    /// Score an already validated parameter set without any remote call.
    pub fn score(
        &self,
        parameters: &ContentParameters,
        profile: Option<&ChildProfile>,
    ) -> ScoreOutcome {
        self.engine.score(parameters, profile)
    }

    /// Assess a title. Never fails: remote failures degrade to the catalog or a placeholder.
    pub async fn analyze_content(
        &self,
        input: &str,
        content_type: ContentType,
        profile: Option<&ChildProfile>,
    ) -> AnalysisResult {
        let result = match self.analyzer.analyze(input, content_type, profile).await {
            Ok(assessment) => {
                let outcome = self.engine.score(&assessment.record.parameters, profile);
                let recommended_age = assessment
                    .suggested_age
                    .filter(|age| (MIN_RECOMMENDED_AGE..=MAX_RECOMMENDED_AGE).contains(age))
                    .unwrap_or(outcome.recommended_age);

                AnalysisResult {
                    content: assessment.record,
                    recommended_age,
                    verdict: outcome.verdict,
                    confidence: Confidence::High,
                    profile: profile.cloned(),
                    score_trace: outcome.components,
                    error: None,
                }
            }
            Err(error) => self.fallback(input, content_type, profile, &error),
        };

        info!(
            title = %result.content.title,
            verdict = result.verdict.label(),
            recommended_age = result.recommended_age,
            confidence = result.confidence.label(),
            degraded = result.is_degraded(),
            "content analysis complete"
        );
        result
    }

    /// Resolve the profile from the store, then assess the title for it.
    pub async fn analyze_for_profile(
        &self,
        input: &str,
        content_type: ContentType,
        profile_id: Option<&ProfileId>,
    ) -> Result<AnalysisResult, AnalysisServiceError> {
        if input.trim().is_empty() {
            return Err(AnalysisServiceError::EmptyTitle);
        }

        let profile = match profile_id {
            Some(id) => Some(
                self.profiles
                    .fetch(id)?
                    .ok_or_else(|| AnalysisServiceError::ProfileNotFound(id.clone()))?,
            ),
            None => None,
        };

        Ok(self
            .analyze_content(input, content_type, profile.as_ref())
            .await)
    }

    fn fallback(
        &self,
        input: &str,
        content_type: ContentType,
        profile: Option<&ChildProfile>,
        error: &AnalyzerError,
    ) -> AnalysisResult {
        warn!(%error, title = input.trim(), "remote analysis failed, using fallback data");

        let (content, confidence) = match self.catalog.lookup(input) {
            Some(record) => (record, Confidence::High),
            None => {
                let reason = if error.is_missing_credentials() {
                    PlaceholderReason::MissingCredentials
                } else {
                    PlaceholderReason::AnalyzerFailed
                };
                (self.placeholder(input, content_type, reason), Confidence::Medium)
            }
        };

        let outcome = self.engine.score(&content.parameters, profile);

        AnalysisResult {
            content,
            recommended_age: outcome.recommended_age,
            verdict: outcome.verdict,
            confidence,
            profile: profile.cloned(),
            score_trace: outcome.components,
            error: Some(error.to_string()),
        }
    }

    fn placeholder(
        &self,
        input: &str,
        content_type: ContentType,
        reason: PlaceholderReason,
    ) -> ContentRecord {
        let mut rng = self
            .placeholder_rng
            .lock()
            .expect("placeholder rng mutex poisoned");
        synthesize_placeholder(input, content_type, &mut *rng, reason)
    }
}

/// Error raised by the analysis service before any assessment runs.
#[derive(Debug, thiserror::Error)]
pub enum AnalysisServiceError {
    #[error("title must not be empty")]
    EmptyTitle,
    #[error("profile {0} not found")]
    ProfileNotFound(ProfileId),
    #[error(transparent)]
    Profiles(#[from] ProfileStoreError),
}
