use content_guard::analysis::{
    AnalyzerError, ChildProfile, ContentAnalyzer, ContentType, HttpContentAnalyzer,
    JsonFileProfileStore, NormalizedAssessment, OfflineAnalyzer, ProfileFields, ProfileId,
    ProfileStore, ProfileStoreError,
};
use content_guard::config::{AnalyzerConfig, ProfileStoreConfig};
use metrics_exporter_prometheus::PrometheusHandle;
use std::future::Future;
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex};
use tracing::info;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

#[derive(Default, Clone)]
pub(crate) struct InMemoryProfileStore {
    profiles: Arc<Mutex<Vec<ChildProfile>>>,
}

impl ProfileStore for InMemoryProfileStore {
    fn list(&self) -> Result<Vec<ChildProfile>, ProfileStoreError> {
        let guard = self.profiles.lock().expect("profile store mutex poisoned");
        Ok(guard.clone())
    }

    fn fetch(&self, id: &ProfileId) -> Result<Option<ChildProfile>, ProfileStoreError> {
        let guard = self.profiles.lock().expect("profile store mutex poisoned");
        Ok(guard.iter().find(|profile| &profile.id == id).cloned())
    }

    fn create(&self, fields: ProfileFields) -> Result<ChildProfile, ProfileStoreError> {
        let profile = fields.into_profile()?;
        let mut guard = self.profiles.lock().expect("profile store mutex poisoned");
        guard.push(profile.clone());
        Ok(profile)
    }

    fn update(&self, id: &ProfileId, fields: ProfileFields) -> Result<(), ProfileStoreError> {
        let mut guard = self.profiles.lock().expect("profile store mutex poisoned");
        match guard.iter_mut().find(|profile| &profile.id == id) {
            Some(profile) => fields.apply_to(profile),
            None => Err(ProfileStoreError::NotFound),
        }
    }

    fn delete(&self, id: &ProfileId) -> Result<(), ProfileStoreError> {
        let mut guard = self.profiles.lock().expect("profile store mutex poisoned");
        let before = guard.len();
        guard.retain(|profile| &profile.id != id);
        if guard.len() == before {
            Err(ProfileStoreError::NotFound)
        } else {
            Ok(())
        }
    }
}

/// Profile backend selected from configuration at startup.
pub(crate) enum ConfiguredProfileStore {
    Memory(InMemoryProfileStore),
    File(JsonFileProfileStore),
}

impl ConfiguredProfileStore {
    pub(crate) fn open(config: &ProfileStoreConfig) -> Result<Self, ProfileStoreError> {
        match &config.path {
            Some(path) => {
                let store = JsonFileProfileStore::open(path)?;
                info!(path = %store.path().display(), "using json profile store");
                Ok(Self::File(store))
            }
            None => Ok(Self::Memory(InMemoryProfileStore::default())),
        }
    }

    /// Like [`Self::open`], but refuses the in-memory fallback.
    pub(crate) fn open_persistent(config: &ProfileStoreConfig) -> Result<Self, ProfileStoreError> {
        if config.path.is_none() {
            return Err(ProfileStoreError::Unavailable(
                "PROFILE_STORE_PATH is not set; pass --store or configure a profile file"
                    .to_string(),
            ));
        }
        Self::open(config)
    }
}

impl ProfileStore for ConfiguredProfileStore {
    fn list(&self) -> Result<Vec<ChildProfile>, ProfileStoreError> {
        match self {
            Self::Memory(store) => store.list(),
            Self::File(store) => store.list(),
        }
    }

    fn fetch(&self, id: &ProfileId) -> Result<Option<ChildProfile>, ProfileStoreError> {
        match self {
            Self::Memory(store) => store.fetch(id),
            Self::File(store) => store.fetch(id),
        }
    }

    fn create(&self, fields: ProfileFields) -> Result<ChildProfile, ProfileStoreError> {
        match self {
            Self::Memory(store) => store.create(fields),
            Self::File(store) => store.create(fields),
        }
    }

    fn update(&self, id: &ProfileId, fields: ProfileFields) -> Result<(), ProfileStoreError> {
        match self {
            Self::Memory(store) => store.update(id, fields),
            Self::File(store) => store.update(id, fields),
        }
    }

    fn delete(&self, id: &ProfileId) -> Result<(), ProfileStoreError> {
        match self {
            Self::Memory(store) => store.delete(id),
            Self::File(store) => store.delete(id),
        }
    }
}

/// Remote analyzer, or the offline stand-in when the network is off limits.
pub(crate) enum ConfiguredAnalyzer {
    Http(HttpContentAnalyzer),
    Offline(OfflineAnalyzer),
}

impl ConfiguredAnalyzer {
    pub(crate) fn from_config(
        config: &AnalyzerConfig,
        offline: bool,
    ) -> Result<Self, AnalyzerError> {
        if offline {
            return Ok(Self::Offline(OfflineAnalyzer::new("offline mode requested")));
        }
        HttpContentAnalyzer::new(config.clone()).map(Self::Http)
    }

    /// Endpoint the analyzer calls, or `offline` when it never leaves the process.
    pub(crate) fn describe(&self) -> &str {
        match self {
            Self::Http(analyzer) => analyzer.endpoint(),
            Self::Offline(_) => "offline",
        }
    }
}

impl ContentAnalyzer for ConfiguredAnalyzer {
    fn analyze(
        &self,
        title: &str,
        content_type: ContentType,
        profile: Option<&ChildProfile>,
    ) -> impl Future<Output = Result<NormalizedAssessment, AnalyzerError>> + Send {
        async move {
            match self {
                Self::Http(analyzer) => analyzer.analyze(title, content_type, profile).await,
                Self::Offline(analyzer) => analyzer.analyze(title, content_type, profile).await,
            }
        }
    }
}

pub(crate) fn parse_content_type(raw: &str) -> Result<ContentType, String> {
    ContentType::parse(raw)
        .ok_or_else(|| format!("unknown content type '{raw}' (use book or movie)"))
}
