use std::future::Future;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use axum::response::Response;
use serde_json::Value;

use crate::analysis::analyzer::{AnalyzerError, ContentAnalyzer, RemoteFailure};
use crate::analysis::domain::{
    ChildProfile, ContentParameters, ContentRecord, ContentType, ProfileId, Sensitivities,
    ThemeFlags,
};
use crate::analysis::normalizer::NormalizedAssessment;
use crate::analysis::repository::{ProfileFields, ProfileStore, ProfileStoreError};
use crate::analysis::{analysis_router, ContentAnalysisService};

pub(super) const SEED: u64 = 20_251_018;

pub(super) fn profile(age: u8, fear_sensitive: bool, violence_sensitive: bool) -> ChildProfile {
    ChildProfile {
        id: ProfileId(format!("child-{age}")),
        name: "Robin".to_string(),
        age,
        sensitivities: Sensitivities {
            fear_sensitive,
            violence_sensitive,
        },
        notes: None,
        created_at: None,
    }
}

pub(super) fn parameters(violence: u8, language: u8, sexual: u8, fear: u8) -> ContentParameters {
    ContentParameters {
        violence,
        language,
        sexual_content: sexual,
        fear_horror: fear,
        ..ContentParameters::default()
    }
}

pub(super) fn remote_assessment(
    title: &str,
    parameters: ContentParameters,
    suggested_age: Option<u8>,
) -> NormalizedAssessment {
    NormalizedAssessment {
        record: ContentRecord {
            title: title.to_string(),
            content_type: ContentType::Movie,
            parameters,
            notes: "remote notes".to_string(),
            reasoning: Some("remote reasoning".to_string()),
        },
        suggested_age,
    }
}

pub(super) fn death_theme() -> ThemeFlags {
    ThemeFlags {
        death: true,
        ..ThemeFlags::default()
    }
}

/// Analyzer double returning a canned outcome and counting attempts.
pub(super) struct StubAnalyzer {
    outcome: Result<NormalizedAssessment, RemoteFailure>,
    calls: AtomicUsize,
    last_profile: Mutex<Option<ChildProfile>>,
}

impl StubAnalyzer {
    pub(super) fn succeeding(assessment: NormalizedAssessment) -> Self {
        Self {
            outcome: Ok(assessment),
            calls: AtomicUsize::new(0),
            last_profile: Mutex::new(None),
        }
    }

    pub(super) fn failing(failure: RemoteFailure) -> Self {
        Self {
            outcome: Err(failure),
            calls: AtomicUsize::new(0),
            last_profile: Mutex::new(None),
        }
    }

    pub(super) fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub(super) fn last_profile(&self) -> Option<ChildProfile> {
        self.last_profile
            .lock()
            .expect("profile mutex poisoned")
            .clone()
    }
}

impl ContentAnalyzer for StubAnalyzer {
    fn analyze(
        &self,
        _title: &str,
        _content_type: ContentType,
        profile: Option<&ChildProfile>,
    ) -> impl Future<Output = Result<NormalizedAssessment, AnalyzerError>> + Send {
        self.calls.fetch_add(1, Ordering::SeqCst);
        *self.last_profile.lock().expect("profile mutex poisoned") = profile.cloned();
        let outcome = self.outcome.clone().map_err(AnalyzerError::from);
        async move { outcome }
    }
}

#[derive(Default)]
pub(super) struct MemoryProfiles {
    pub(super) profiles: Mutex<Vec<ChildProfile>>,
}

impl MemoryProfiles {
    pub(super) fn with(profiles: Vec<ChildProfile>) -> Self {
        Self {
            profiles: Mutex::new(profiles),
        }
    }
}

impl ProfileStore for MemoryProfiles {
    fn list(&self) -> Result<Vec<ChildProfile>, ProfileStoreError> {
        Ok(self.profiles.lock().expect("profile mutex poisoned").clone())
    }

    fn fetch(&self, id: &ProfileId) -> Result<Option<ChildProfile>, ProfileStoreError> {
        let guard = self.profiles.lock().expect("profile mutex poisoned");
        Ok(guard.iter().find(|profile| &profile.id == id).cloned())
    }

    fn create(&self, fields: ProfileFields) -> Result<ChildProfile, ProfileStoreError> {
        let profile = fields.into_profile()?;
        self.profiles
            .lock()
            .expect("profile mutex poisoned")
            .push(profile.clone());
        Ok(profile)
    }

    fn update(&self, id: &ProfileId, fields: ProfileFields) -> Result<(), ProfileStoreError> {
        let mut guard = self.profiles.lock().expect("profile mutex poisoned");
        let profile = guard
            .iter_mut()
            .find(|profile| &profile.id == id)
            .ok_or(ProfileStoreError::NotFound)?;
        fields.apply_to(profile)
    }

    fn delete(&self, id: &ProfileId) -> Result<(), ProfileStoreError> {
        let mut guard = self.profiles.lock().expect("profile mutex poisoned");
        let before = guard.len();
        guard.retain(|profile| &profile.id != id);
        if guard.len() == before {
            return Err(ProfileStoreError::NotFound);
        }
        Ok(())
    }
}

pub(super) struct UnavailableProfiles;

impl ProfileStore for UnavailableProfiles {
    fn list(&self) -> Result<Vec<ChildProfile>, ProfileStoreError> {
        Err(ProfileStoreError::Unavailable("disk offline".to_string()))
    }

    fn fetch(&self, _id: &ProfileId) -> Result<Option<ChildProfile>, ProfileStoreError> {
        Err(ProfileStoreError::Unavailable("disk offline".to_string()))
    }

    fn create(&self, _fields: ProfileFields) -> Result<ChildProfile, ProfileStoreError> {
        Err(ProfileStoreError::Unavailable("disk offline".to_string()))
    }

    fn update(&self, _id: &ProfileId, _fields: ProfileFields) -> Result<(), ProfileStoreError> {
        Err(ProfileStoreError::Unavailable("disk offline".to_string()))
    }

    fn delete(&self, _id: &ProfileId) -> Result<(), ProfileStoreError> {
        Err(ProfileStoreError::Unavailable("disk offline".to_string()))
    }
}

pub(super) fn offline_service(
    profiles: Vec<ChildProfile>,
) -> (
    ContentAnalysisService<StubAnalyzer, MemoryProfiles>,
    Arc<StubAnalyzer>,
    Arc<MemoryProfiles>,
) {
    let analyzer = Arc::new(StubAnalyzer::failing(RemoteFailure::Transport(
        "connection refused".to_string(),
    )));
    let store = Arc::new(MemoryProfiles::with(profiles));
    let service = ContentAnalysisService::seeded(analyzer.clone(), store.clone(), SEED);
    (service, analyzer, store)
}

pub(super) fn router_with_service(
    service: ContentAnalysisService<StubAnalyzer, MemoryProfiles>,
) -> axum::Router {
    analysis_router(Arc::new(service))
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
