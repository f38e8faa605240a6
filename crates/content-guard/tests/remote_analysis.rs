//! End-to-end behavior of the HTTP analyzer against a local stand-in for the
//! chat-completions endpoint, exercised through the public service facade.

mod common {
    use std::sync::{Arc, Mutex};
    use std::time::Duration;

    use axum::extract::State;
    use axum::http::{HeaderMap, StatusCode};
    use axum::response::{IntoResponse, Response};
    use axum::routing::post;
    use axum::{Json, Router};
    use serde_json::{json, Value};

    use content_guard::analysis::{
        ChildProfile, ContentAnalysisService, HttpContentAnalyzer, ProfileFields, ProfileId,
        ProfileStore, ProfileStoreError,
    };
    use content_guard::config::AnalyzerConfig;

    /// Canned behavior of the stand-in endpoint.
    #[derive(Clone)]
    pub(super) enum Reply {
        Completion(String),
        Status(u16, Value),
        Stall(Duration),
    }

    #[derive(Clone)]
    struct FakeRemote {
        reply: Reply,
        seen: Arc<Mutex<Vec<CapturedRequest>>>,
    }

    #[derive(Debug, Clone)]
    pub(super) struct CapturedRequest {
        pub(super) authorization: Option<String>,
        pub(super) body: Value,
    }

    pub(super) struct RemoteHandle {
        pub(super) endpoint: String,
        seen: Arc<Mutex<Vec<CapturedRequest>>>,
    }

    impl RemoteHandle {
        pub(super) fn requests(&self) -> Vec<CapturedRequest> {
            self.seen.lock().expect("capture mutex poisoned").clone()
        }
    }

    async fn completions(
        State(remote): State<FakeRemote>,
        headers: HeaderMap,
        Json(body): Json<Value>,
    ) -> Response {
        remote
            .seen
            .lock()
            .expect("capture mutex poisoned")
            .push(CapturedRequest {
                authorization: headers
                    .get("authorization")
                    .and_then(|value| value.to_str().ok())
                    .map(str::to_string),
                body,
            });

        match remote.reply {
            Reply::Completion(content) => Json(json!({
                "choices": [{ "message": { "role": "assistant", "content": content } }]
            }))
            .into_response(),
            Reply::Status(status, body) => (
                StatusCode::from_u16(status).expect("valid status"),
                Json(body),
            )
                .into_response(),
            Reply::Stall(delay) => {
                tokio::time::sleep(delay).await;
                StatusCode::OK.into_response()
            }
        }
    }

    pub(super) async fn spawn_remote(reply: Reply) -> RemoteHandle {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let router = Router::new()
            .route("/v1/chat/completions", post(completions))
            .with_state(FakeRemote {
                reply,
                seen: seen.clone(),
            });

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind ephemeral port");
        let addr = listener.local_addr().expect("local addr");
        tokio::spawn(async move {
            axum::serve(listener, router).await.expect("fake remote runs");
        });

        RemoteHandle {
            endpoint: format!("http://{addr}/v1/chat/completions"),
            seen,
        }
    }

    pub(super) fn analyzer_config(endpoint: &str, api_key: Option<&str>) -> AnalyzerConfig {
        AnalyzerConfig {
            endpoint: endpoint.to_string(),
            api_key: api_key.map(str::to_string),
            timeout: Duration::from_secs(5),
            ..AnalyzerConfig::default()
        }
    }

    #[derive(Default)]
    pub(super) struct MemoryProfiles {
        profiles: Mutex<Vec<ChildProfile>>,
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

    pub(super) fn service(
        config: AnalyzerConfig,
    ) -> (
        ContentAnalysisService<HttpContentAnalyzer, MemoryProfiles>,
        Arc<MemoryProfiles>,
    ) {
        let analyzer = HttpContentAnalyzer::new(config).expect("http client builds");
        let profiles = Arc::new(MemoryProfiles::default());
        let service = ContentAnalysisService::seeded(Arc::new(analyzer), profiles.clone(), 42);
        (service, profiles)
    }
}

mod analyzer_behavior {
    use super::common::*;
    use std::time::Duration;

    use content_guard::analysis::{
        Confidence, ContentType, ProfileFields, ProfileStore, Sensitivities, Verdict,
    };
    use serde_json::json;

    #[tokio::test]
    async fn remote_document_is_normalized_and_scored() {
        let document = json!({
            "title": "Moana",
            "type": "movie",
            "parameters": {
                "violence": 1,
                "language": 0,
                "sexualContent": 0,
                "romanticContent": 0,
                "substanceUse": 0,
                "fearHorror": 2,
                "themes": { "death": true, "bullying": false },
                "valuesSensitive": { "religious": true }
            },
            "notes": "Ocean voyage with a lava monster.",
            "reasoning": "Some scary sequences.",
            "recommendedAge": 8
        });
        let remote = spawn_remote(Reply::Completion(document.to_string())).await;
        let (service, _) = service(analyzer_config(&remote.endpoint, Some("sk-test")));

        let result = service
            .analyze_content("moana", ContentType::Movie, None)
            .await;

        assert_eq!(result.content.title, "Moana");
        assert_eq!(result.content.parameters.fear_horror, 2);
        assert!(result.content.parameters.themes.death);
        assert!(result.content.parameters.values_sensitive.religious);
        assert_eq!(result.recommended_age, 8);
        assert_eq!(result.verdict, Verdict::Caution);
        assert_eq!(result.confidence, Confidence::High);
        assert!(result.error.is_none());

        let requests = remote.requests();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].authorization.as_deref(), Some("Bearer sk-test"));
        assert_eq!(requests[0].body["response_format"]["type"], "json_object");
        assert_eq!(requests[0].body["messages"][0]["role"], "system");
        let user_prompt = requests[0].body["messages"][1]["content"]
            .as_str()
            .expect("user prompt present");
        assert!(user_prompt.contains("moana"));
        assert!(user_prompt.contains("No specific child profile provided."));
    }

    #[tokio::test]
    async fn out_of_range_values_are_clamped() {
        let document = json!({
            "title": "Overclocked",
            "type": "book",
            "parameters": { "violence": 11, "sexualContent": 9, "fearHorror": -2 },
            "recommendedAge": 40
        });
        let fenced = format!("```json\n{document}\n```");
        let remote = spawn_remote(Reply::Completion(fenced)).await;
        let (service, _) = service(analyzer_config(&remote.endpoint, Some("sk-test")));

        let result = service
            .analyze_content("Overclocked", ContentType::Book, None)
            .await;

        assert_eq!(result.content.parameters.violence, 3);
        assert_eq!(result.content.parameters.sexual_content, 2);
        assert_eq!(result.content.parameters.fear_horror, 0);
        assert_eq!(result.recommended_age, 16);
        assert_eq!(result.verdict, Verdict::Warning);
        assert_eq!(result.content.notes, "Content analysis completed.");
    }

    #[tokio::test]
    async fn profile_context_is_sent_to_remote() {
        let document = json!({ "title": "Coraline", "type": "movie", "parameters": {} });
        let remote = spawn_remote(Reply::Completion(document.to_string())).await;
        let (service, profiles) = service(analyzer_config(&remote.endpoint, None));

        let child = profiles
            .create(ProfileFields {
                name: "Mia".to_string(),
                age: 9,
                sensitivities: Sensitivities {
                    fear_sensitive: true,
                    violence_sensitive: false,
                },
                notes: None,
            })
            .expect("profile stored");

        let result = service
            .analyze_for_profile("Coraline", ContentType::Movie, Some(&child.id))
            .await
            .expect("analysis runs");

        assert_eq!(result.profile.map(|profile| profile.id), Some(child.id));
        let requests = remote.requests();
        assert_eq!(requests[0].authorization, None);
        let user_prompt = requests[0].body["messages"][1]["content"]
            .as_str()
            .expect("user prompt present");
        assert!(user_prompt.contains("The child is 9 years old."));
        assert!(user_prompt.contains("sensitive to fear/horror"));
    }

    #[tokio::test]
    async fn rejected_key_falls_back_to_placeholder_with_key_hint() {
        let remote = spawn_remote(Reply::Status(
            401,
            json!({ "error": { "message": "invalid api key" } }),
        ))
        .await;
        let (service, _) = service(analyzer_config(&remote.endpoint, Some("sk-wrong")));

        let result = service
            .analyze_content("Some Unlisted Book", ContentType::Book, None)
            .await;

        assert_eq!(result.confidence, Confidence::Medium);
        assert!(result.content.notes.contains("ANALYZER_API_KEY"));
        assert!(result.error.is_some());
        assert_eq!(remote.requests().len(), 1);
    }

    #[tokio::test]
    async fn server_error_falls_back_to_catalog() {
        let remote = spawn_remote(Reply::Status(
            500,
            json!({ "error": { "message": "upstream exploded" } }),
        ))
        .await;
        let (service, _) = service(analyzer_config(&remote.endpoint, Some("sk-test")));

        let result = service
            .analyze_content("Harry Potter", ContentType::Book, None)
            .await;

        assert_eq!(result.content.title, "Harry Potter and the Sorcerer's Stone");
        assert_eq!(result.recommended_age, 13);
        assert_eq!(result.verdict, Verdict::Caution);
        assert_eq!(result.confidence, Confidence::High);
        let error = result.error.expect("error recorded");
        assert!(error.contains("500"));
        assert!(error.contains("upstream exploded"));
    }

    #[tokio::test]
    async fn unparsable_content_falls_back() {
        let remote = spawn_remote(Reply::Completion("not json at all".to_string())).await;
        let (service, _) = service(analyzer_config(&remote.endpoint, Some("sk-test")));

        let result = service
            .analyze_content("Frozen", ContentType::Movie, None)
            .await;

        assert_eq!(result.recommended_age, 10);
        assert_eq!(result.verdict, Verdict::Safe);
        assert!(result
            .error
            .as_deref()
            .is_some_and(|message| message.contains("malformed")));
    }

    #[tokio::test]
    async fn slow_remote_times_out_without_retry() {
        let remote = spawn_remote(Reply::Stall(Duration::from_secs(3))).await;
        let mut config = analyzer_config(&remote.endpoint, Some("sk-test"));
        config.timeout = Duration::from_millis(200);
        let (service, _) = service(config);

        let result = service
            .analyze_content("Stranger Things", ContentType::Movie, None)
            .await;

        assert_eq!(result.verdict, Verdict::Warning);
        assert!(result
            .error
            .as_deref()
            .is_some_and(|message| message.contains("timed out")));
        assert_eq!(remote.requests().len(), 1);
    }

    #[tokio::test]
    async fn unreachable_remote_degrades_gracefully() {
        let (service, _) = service(analyzer_config("http://127.0.0.1:9/v1/chat/completions", None));

        let result = service
            .analyze_content("Unknown Title", ContentType::Movie, None)
            .await;

        assert_eq!(result.confidence, Confidence::Medium);
        assert!(result.is_degraded());
    }
}
