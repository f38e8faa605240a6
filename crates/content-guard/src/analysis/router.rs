use std::collections::BTreeMap;
use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use serde::{Deserialize, Serialize};
use serde_json::json;

use super::analyzer::ContentAnalyzer;
use super::domain::{AnalysisResult, ChildProfile, ContentType, ProfileId};
use super::labels::parameter_labels;
use super::repository::{ProfileFields, ProfileStore, ProfileStoreError};
use super::service::{AnalysisServiceError, ContentAnalysisService};

type SharedService<A, P> = Arc<ContentAnalysisService<A, P>>;

/// Body of an analysis request. An inline `profile` wins over `profileId`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisRequest {
    pub title: String,
    #[serde(rename = "type")]
    pub content_type: ContentType,
    #[serde(default)]
    pub profile_id: Option<ProfileId>,
    #[serde(default)]
    pub profile: Option<ChildProfile>,
}

/// Analysis result plus display labels for each scored dimension.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisView {
    #[serde(flatten)]
    pub result: AnalysisResult,
    pub parameter_labels: BTreeMap<&'static str, &'static str>,
}

impl From<AnalysisResult> for AnalysisView {
    fn from(result: AnalysisResult) -> Self {
        let parameter_labels = parameter_labels(&result.content.parameters);
        Self {
            result,
            parameter_labels,
        }
    }
}

/// Router builder exposing analysis and profile management endpoints.
pub fn analysis_router<A, P>(service: SharedService<A, P>) -> Router
where
    A: ContentAnalyzer + 'static,
    P: ProfileStore + 'static,
{
    Router::new()
        .route("/api/v1/analysis", post(analyze_handler::<A, P>))
        .route(
            "/api/v1/profiles",
            get(list_profiles_handler::<A, P>).post(create_profile_handler::<A, P>),
        )
        .route(
            "/api/v1/profiles/:profile_id",
            get(get_profile_handler::<A, P>)
                .put(update_profile_handler::<A, P>)
                .delete(delete_profile_handler::<A, P>),
        )
        .with_state(service)
}

pub(crate) async fn analyze_handler<A, P>(
    State(service): State<SharedService<A, P>>,
    axum::Json(request): axum::Json<AnalysisRequest>,
) -> Response
where
    A: ContentAnalyzer + 'static,
    P: ProfileStore + 'static,
{
    let AnalysisRequest {
        title,
        content_type,
        profile_id,
        profile,
    } = request;

    let outcome = match profile {
        Some(profile) if !title.trim().is_empty() => Ok(service
            .analyze_content(&title, content_type, Some(&profile))
            .await),
        _ => {
            service
                .analyze_for_profile(&title, content_type, profile_id.as_ref())
                .await
        }
    };

    match outcome {
        Ok(result) => (StatusCode::OK, axum::Json(AnalysisView::from(result))).into_response(),
        Err(AnalysisServiceError::EmptyTitle) => error_response(
            StatusCode::UNPROCESSABLE_ENTITY,
            AnalysisServiceError::EmptyTitle.to_string(),
        ),
        Err(AnalysisServiceError::ProfileNotFound(id)) => (
            StatusCode::NOT_FOUND,
            axum::Json(json!({
                "error": "profile not found",
                "profile_id": id.0,
            })),
        )
            .into_response(),
        Err(other) => error_response(StatusCode::INTERNAL_SERVER_ERROR, other.to_string()),
    }
}

pub(crate) async fn list_profiles_handler<A, P>(
    State(service): State<SharedService<A, P>>,
) -> Response
where
    A: ContentAnalyzer + 'static,
    P: ProfileStore + 'static,
{
    match service.profiles().list() {
        Ok(profiles) => (StatusCode::OK, axum::Json(profiles)).into_response(),
        Err(error) => store_error_response(error),
    }
}

pub(crate) async fn get_profile_handler<A, P>(
    State(service): State<SharedService<A, P>>,
    Path(profile_id): Path<String>,
) -> Response
where
    A: ContentAnalyzer + 'static,
    P: ProfileStore + 'static,
{
    match service.profiles().fetch(&ProfileId(profile_id)) {
        Ok(Some(profile)) => (StatusCode::OK, axum::Json(profile)).into_response(),
        Ok(None) => store_error_response(ProfileStoreError::NotFound),
        Err(error) => store_error_response(error),
    }
}

pub(crate) async fn create_profile_handler<A, P>(
    State(service): State<SharedService<A, P>>,
    axum::Json(fields): axum::Json<ProfileFields>,
) -> Response
where
    A: ContentAnalyzer + 'static,
    P: ProfileStore + 'static,
{
    match service.profiles().create(fields) {
        Ok(profile) => (StatusCode::CREATED, axum::Json(profile)).into_response(),
        Err(error) => store_error_response(error),
    }
}

pub(crate) async fn update_profile_handler<A, P>(
    State(service): State<SharedService<A, P>>,
    Path(profile_id): Path<String>,
    axum::Json(fields): axum::Json<ProfileFields>,
) -> Response
where
    A: ContentAnalyzer + 'static,
    P: ProfileStore + 'static,
{
    match service.profiles().update(&ProfileId(profile_id), fields) {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(error) => store_error_response(error),
    }
}

pub(crate) async fn delete_profile_handler<A, P>(
    State(service): State<SharedService<A, P>>,
    Path(profile_id): Path<String>,
) -> Response
where
    A: ContentAnalyzer + 'static,
    P: ProfileStore + 'static,
{
    match service.profiles().delete(&ProfileId(profile_id)) {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(error) => store_error_response(error),
    }
}

fn store_error_response(error: ProfileStoreError) -> Response {
    let status = match error {
        ProfileStoreError::NotFound => StatusCode::NOT_FOUND,
        ProfileStoreError::InvalidProfile(_) => StatusCode::UNPROCESSABLE_ENTITY,
        ProfileStoreError::Unavailable(_) => StatusCode::INTERNAL_SERVER_ERROR,
    };
    error_response(status, error.to_string())
}

fn error_response(status: StatusCode, message: String) -> Response {
    (status, axum::Json(json!({ "error": message }))).into_response()
}
