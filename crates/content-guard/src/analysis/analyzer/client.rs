use std::future::Future;

use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use super::prompt::{user_prompt, SYSTEM_PROMPT};
use super::{AnalyzerError, ContentAnalyzer, RemoteFailure};
use crate::analysis::domain::{ChildProfile, ContentType};
use crate::analysis::normalizer::{normalize_document, NormalizedAssessment};
use crate::config::AnalyzerConfig;

/// Chat-completions client posting one JSON-mode request per analysis.
#[derive(Debug, Clone)]
pub struct HttpContentAnalyzer {
    client: reqwest::Client,
    config: AnalyzerConfig,
}

impl HttpContentAnalyzer {
    pub fn new(config: AnalyzerConfig) -> Result<Self, AnalyzerError> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(AnalyzerError::ClientSetup)?;
        Ok(Self { client, config })
    }

    pub fn endpoint(&self) -> &str {
        &self.config.endpoint
    }

    fn request_body(
        &self,
        title: &str,
        content_type: ContentType,
        profile: Option<&ChildProfile>,
    ) -> ChatRequest {
        ChatRequest {
            model: self.config.model.clone(),
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: SYSTEM_PROMPT.to_string(),
                },
                ChatMessage {
                    role: "user",
                    content: user_prompt(title, content_type, profile),
                },
            ],
            temperature: self.config.temperature,
            response_format: ResponseFormat {
                kind: "json_object",
            },
        }
    }

    async fn exchange(&self, body: ChatRequest) -> Result<String, RemoteFailure> {
        let mut request = self.client.post(&self.config.endpoint).json(&body);
        if let Some(key) = &self.config.api_key {
            request = request.bearer_auth(key);
        }

        let response = request.send().await.map_err(map_transport_error)?;
        let status = response.status();

        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            return Err(RemoteFailure::Unauthorized {
                status: status.as_u16(),
            });
        }

        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(RemoteFailure::Status {
                status: status.as_u16(),
                message: error_message(&text),
            });
        }

        let completion: ChatResponse = response
            .json()
            .await
            .map_err(|err| RemoteFailure::MalformedDocument(err.to_string()))?;

        completion
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .filter(|content| !content.trim().is_empty())
            .ok_or(RemoteFailure::EmptyResponse)
    }
}

impl ContentAnalyzer for HttpContentAnalyzer {
    fn analyze(
        &self,
        title: &str,
        content_type: ContentType,
        profile: Option<&ChildProfile>,
    ) -> impl Future<Output = Result<NormalizedAssessment, AnalyzerError>> + Send {
        let body = self.request_body(title, content_type, profile);
        let title = title.to_string();

        async move {
            debug!(endpoint = %self.config.endpoint, %title, "requesting remote analysis");
            let content = self.exchange(body).await?;
            let assessment = parse_document(&content, &title, content_type)?;
            Ok(assessment)
        }
    }
}

/// Parse the model's message content into a normalized assessment.
pub(crate) fn parse_document(
    content: &str,
    requested_title: &str,
    requested_type: ContentType,
) -> Result<NormalizedAssessment, RemoteFailure> {
    let document: Value = serde_json::from_str(strip_code_fence(content))
        .map_err(|err| RemoteFailure::MalformedDocument(err.to_string()))?;

    let object = document.as_object().ok_or_else(|| {
        RemoteFailure::MalformedDocument("expected a JSON object".to_string())
    })?;

    Ok(normalize_document(object, requested_title, requested_type))
}

fn strip_code_fence(content: &str) -> &str {
    let trimmed = content.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let rest = rest.strip_prefix("json").unwrap_or(rest);
    rest.strip_suffix("```").unwrap_or(rest).trim()
}

fn map_transport_error(err: reqwest::Error) -> RemoteFailure {
    if err.is_timeout() {
        RemoteFailure::Timeout
    } else {
        RemoteFailure::Transport(err.to_string())
    }
}

fn error_message(body: &str) -> String {
    serde_json::from_str::<ErrorEnvelope>(body)
        .ok()
        .and_then(|envelope| envelope.error)
        .and_then(|detail| detail.message)
        .unwrap_or_else(|| body.trim().chars().take(200).collect())
}

#[derive(Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<ChatMessage>,
    temperature: f32,
    response_format: ResponseFormat,
}

#[derive(Serialize)]
struct ChatMessage {
    role: &'static str,
    content: String,
}

#[derive(Serialize)]
struct ResponseFormat {
    #[serde(rename = "type")]
    kind: &'static str,
}

#[derive(Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Deserialize)]
struct ChatChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

#[derive(Deserialize)]
struct ErrorEnvelope {
    error: Option<ErrorDetail>,
}

#[derive(Deserialize)]
struct ErrorDetail {
    message: Option<String>,
}
