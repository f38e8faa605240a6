//! Adapter around the remote content analyzer.
//!
//! One request goes out per analysis and there is no retry. Whatever goes
//! wrong (transport, status, timeout, unparsable body) surfaces as
//! [`AnalyzerError::RemoteUnavailable`] so the orchestrator has a single
//! failure kind to recover from.

mod client;
mod prompt;

pub use client::HttpContentAnalyzer;

use std::future::Future;

use super::domain::{ChildProfile, ContentType};
use super::normalizer::NormalizedAssessment;

/// Remote source of content parameters.
pub trait ContentAnalyzer: Send + Sync {
    fn analyze(
        &self,
        title: &str,
        content_type: ContentType,
        profile: Option<&ChildProfile>,
    ) -> impl Future<Output = Result<NormalizedAssessment, AnalyzerError>> + Send;
}

/// Error raised by a content analyzer.
#[derive(Debug, thiserror::Error)]
pub enum AnalyzerError {
    #[error("remote analyzer unavailable: {0}")]
    RemoteUnavailable(#[source] RemoteFailure),
    #[error("failed to build analyzer http client: {0}")]
    ClientSetup(#[source] reqwest::Error),
}

impl AnalyzerError {
    /// True when the remote side rejected or never received credentials.
    pub fn is_missing_credentials(&self) -> bool {
        matches!(
            self,
            AnalyzerError::RemoteUnavailable(RemoteFailure::Unauthorized { .. })
        )
    }
}

impl From<RemoteFailure> for AnalyzerError {
    fn from(value: RemoteFailure) -> Self {
        Self::RemoteUnavailable(value)
    }
}

/// Underlying cause carried by [`AnalyzerError::RemoteUnavailable`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RemoteFailure {
    #[error("request could not be completed: {0}")]
    Transport(String),
    #[error("request timed out")]
    Timeout,
    #[error("API key missing or rejected (status {status})")]
    Unauthorized { status: u16 },
    #[error("API request failed: {status}. {message}")]
    Status { status: u16, message: String },
    #[error("no response content from API")]
    EmptyResponse,
    #[error("malformed analysis document: {0}")]
    MalformedDocument(String),
    #[error("analyzer disabled: {0}")]
    Disabled(String),
}

/// Analyzer that never reaches the network; every call takes the fallback path.
#[derive(Debug, Clone, Default)]
pub struct OfflineAnalyzer {
    reason: Option<String>,
}

impl OfflineAnalyzer {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: Some(reason.into()),
        }
    }
}

impl ContentAnalyzer for OfflineAnalyzer {
    fn analyze(
        &self,
        _title: &str,
        _content_type: ContentType,
        _profile: Option<&ChildProfile>,
    ) -> impl Future<Output = Result<NormalizedAssessment, AnalyzerError>> + Send {
        let reason = self
            .reason
            .clone()
            .unwrap_or_else(|| "offline mode".to_string());
        async move { Err(RemoteFailure::Disabled(reason).into()) }
    }
}
