//! The v1 JSON API consumed by the embedded frontend.
//!
//! Endpoints:
//! - `POST /v1/chat`     : one chat turn; the client supplies the history
//! - `GET  /v1/mood`     : current journal
//! - `POST /v1/mood`     : append a mood and return the journal
//! - `GET  /v1/resources`: crisis hotlines
//! - `GET  /v1/ui`       : static presentation text

use crate::SharedState;
use axum::{
    Router,
    extract::State,
    response::Json,
    routing::{get, post},
};
use mindcare_agent::mood::{MoodLabel, MoodSnapshot};
use mindcare_agent::persona;
use mindcare_agent::resources::{self, CrisisResource};
use mindcare_core::Source;
use mindcare_core::message::Turn;
use serde::{Deserialize, Serialize};
use tracing::info;

pub fn v1_router(state: SharedState) -> Router {
    Router::new()
        .route("/chat", post(chat_handler))
        .route("/mood", get(mood_history_handler).post(log_mood_handler))
        .route("/resources", get(resources_handler))
        .route("/ui", get(ui_handler))
        .with_state(state)
}

// --- Chat ---

#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    pub message: String,
    #[serde(default)]
    pub history: Vec<Turn>,
}

#[derive(Debug, Serialize)]
pub struct ChatResponse {
    pub reply: String,
    /// Pages the reply was grounded on; empty for error replies
    pub sources: Vec<Source>,
}

/// Always answers 200: provider failures arrive as `Error: …` reply text.
async fn chat_handler(
    State(state): State<SharedState>,
    Json(payload): Json<ChatRequest>,
) -> Json<ChatResponse> {
    info!(
        message_len = payload.message.len(),
        turns = payload.history.len(),
        "v1/chat request"
    );

    let reply = state.app.reply(&payload.message, &payload.history).await;
    Json(ChatResponse {
        reply: reply.text,
        sources: reply.sources,
    })
}

// --- Mood journal ---

#[derive(Debug, Deserialize)]
pub struct MoodRequest {
    #[serde(default)]
    pub mood: String,
    #[serde(default)]
    pub note: String,
}

/// `rendered` and `count` always describe the same journal state.
async fn log_mood_handler(
    State(state): State<SharedState>,
    Json(payload): Json<MoodRequest>,
) -> Json<MoodSnapshot> {
    let snapshot = state.app.log_mood_snapshot(&payload.mood, &payload.note);
    info!(count = snapshot.count, "v1/mood entry logged");
    Json(snapshot)
}

async fn mood_history_handler(State(state): State<SharedState>) -> Json<MoodSnapshot> {
    Json(state.app.mood_snapshot())
}

// --- Static content ---

#[derive(Debug, Serialize)]
pub struct ResourcesResponse {
    pub markdown: String,
    pub emergency_numbers: &'static [&'static str],
    pub resources: &'static [CrisisResource],
    pub disclaimer: &'static str,
}

async fn resources_handler() -> Json<ResourcesResponse> {
    Json(ResourcesResponse {
        markdown: resources::crisis_markdown(),
        emergency_numbers: &resources::EMERGENCY_NUMBERS,
        resources: &resources::CRISIS_RESOURCES,
        disclaimer: resources::DISCLAIMER,
    })
}

#[derive(Debug, Serialize)]
pub struct MoodOption {
    pub value: MoodLabel,
    pub label: String,
}

#[derive(Debug, Serialize)]
pub struct UiResponse {
    pub title: &'static str,
    pub tagline: &'static str,
    pub chat_description: &'static str,
    pub disclaimer: &'static str,
    pub example_prompts: &'static [&'static str],
    pub mood_labels: Vec<MoodOption>,
    pub ready: bool,
}

async fn ui_handler(State(state): State<SharedState>) -> Json<UiResponse> {
    Json(UiResponse {
        title: persona::APP_TITLE,
        tagline: persona::TAGLINE,
        chat_description: persona::CHAT_DESCRIPTION,
        disclaimer: resources::DISCLAIMER,
        example_prompts: &persona::EXAMPLE_PROMPTS,
        mood_labels: MoodLabel::ALL
            .into_iter()
            .map(|m| MoodOption {
                value: m,
                label: m.display(),
            })
            .collect(),
        ready: state.app.is_ready(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::GatewayState;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use http_body_util::BodyExt;
    use mindcare_agent::{ConversationAssembler, MindcareApp};
    use mindcare_core::error::ProviderError;
    use mindcare_core::message::Message;
    use mindcare_core::provider::{Provider, ProviderRequest, ProviderResponse};
    use std::sync::{Arc, Mutex};
    use tower::ServiceExt;

    /// Replies with the number of messages it was sent.
    struct CountingProvider {
        last: Mutex<Option<ProviderRequest>>,
    }

    #[async_trait::async_trait]
    impl Provider for CountingProvider {
        fn name(&self) -> &str {
            "counting_mock"
        }

        async fn complete(
            &self,
            request: ProviderRequest,
        ) -> Result<ProviderResponse, ProviderError> {
            let count = request.messages.len();
            *self.last.lock().unwrap() = Some(request);
            Ok(ProviderResponse {
                message: Message::assistant(format!("saw {count} messages")),
                usage: None,
                model: "mock".into(),
                sources: Vec::new(),
            })
        }
    }

    /// Replies with a fixed grounded answer.
    struct GroundedProvider;

    #[async_trait::async_trait]
    impl Provider for GroundedProvider {
        fn name(&self) -> &str {
            "grounded_mock"
        }

        async fn complete(&self, _: ProviderRequest) -> Result<ProviderResponse, ProviderError> {
            Ok(ProviderResponse {
                message: Message::assistant("Tele MANAS runs a free 24/7 line."),
                usage: None,
                model: "mock".into(),
                sources: vec![Source {
                    title: "Tele MANAS".into(),
                    uri: "https://telemanas.mohfw.gov.in".into(),
                }],
            })
        }
    }

    struct FailingProvider;

    #[async_trait::async_trait]
    impl Provider for FailingProvider {
        fn name(&self) -> &str {
            "failing_mock"
        }

        async fn complete(&self, _: ProviderRequest) -> Result<ProviderResponse, ProviderError> {
            Err(ProviderError::Network("connection refused".into()))
        }
    }

    fn state_with(provider: Arc<dyn Provider>) -> SharedState {
        let assembler = ConversationAssembler::new(provider, "mock", 0.7, "PERSONA");
        Arc::new(GatewayState {
            app: MindcareApp::ready(assembler),
        })
    }

    fn test_state() -> SharedState {
        state_with(Arc::new(CountingProvider {
            last: Mutex::new(None),
        }))
    }

    fn post_json(uri: &str, body: serde_json::Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(serde_json::to_string(&body).unwrap()))
            .unwrap()
    }

    async fn json_body(response: axum::response::Response) -> serde_json::Value {
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn chat_with_history() {
        let app = v1_router(test_state());
        let body = serde_json::json!({
            "message": "Help me with a breathing exercise",
            "history": [
                {"user": "Hi", "assistant": "Hello, how are you feeling?"},
                {"user": "Anxious"}
            ]
        });

        let response = app.oneshot(post_json("/chat", body)).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let json = json_body(response).await;
        // persona + 3 present sides + new message
        assert_eq!(json["reply"], "saw 5 messages");
        assert_eq!(json["sources"], serde_json::json!([]));
    }

    #[tokio::test]
    async fn chat_returns_grounding_sources() {
        let app = v1_router(state_with(Arc::new(GroundedProvider)));
        let response = app
            .oneshot(post_json("/chat", serde_json::json!({"message": "helplines?"})))
            .await
            .unwrap();

        let json = json_body(response).await;
        assert_eq!(json["reply"], "Tele MANAS runs a free 24/7 line.");
        assert_eq!(
            json["sources"],
            serde_json::json!([{"title": "Tele MANAS", "uri": "https://telemanas.mohfw.gov.in"}])
        );
    }

    #[tokio::test]
    async fn chat_without_history_field() {
        let app = v1_router(test_state());
        let response = app
            .oneshot(post_json("/chat", serde_json::json!({"message": ""})))
            .await
            .unwrap();
        let json = json_body(response).await;
        assert_eq!(json["reply"], "saw 2 messages");
    }

    #[tokio::test]
    async fn chat_provider_failure_is_reply_text() {
        let app = v1_router(state_with(Arc::new(FailingProvider)));
        let response = app
            .oneshot(post_json("/chat", serde_json::json!({"message": "hi"})))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let json = json_body(response).await;
        let reply = json["reply"].as_str().unwrap();
        assert!(reply.starts_with("Error: "));
        assert!(reply.contains("connection refused"));
        assert_eq!(json["sources"], serde_json::json!([]));
    }

    #[tokio::test]
    async fn degraded_chat_and_mood() {
        let state = Arc::new(GatewayState {
            app: MindcareApp::degraded("API Key not found."),
        });

        let response = v1_router(state.clone())
            .oneshot(post_json("/chat", serde_json::json!({"message": "hi"})))
            .await
            .unwrap();
        assert_eq!(json_body(response).await["reply"], "Error: API Key not found.");

        let response = v1_router(state)
            .oneshot(post_json(
                "/mood",
                serde_json::json!({"mood": "😊 Happy", "note": "ok"}),
            ))
            .await
            .unwrap();
        let json = json_body(response).await;
        assert_eq!(json["rendered"], "Error");
        assert_eq!(json["count"], 0);
    }

    #[tokio::test]
    async fn mood_log_newest_first() {
        let state = test_state();

        v1_router(state.clone())
            .oneshot(post_json(
                "/mood",
                serde_json::json!({"mood": "😊 Happy", "note": "good day"}),
            ))
            .await
            .unwrap();
        let response = v1_router(state.clone())
            .oneshot(post_json(
                "/mood",
                serde_json::json!({"mood": "😰 Anxious", "note": "exam tomorrow"}),
            ))
            .await
            .unwrap();

        let json = json_body(response).await;
        assert_eq!(json["count"], 2);
        let rendered = json["rendered"].as_str().unwrap();
        let blocks: Vec<&str> = rendered.split("\n\n").collect();
        assert!(blocks[0].contains("😰 Anxious - *exam tomorrow*"));
        assert!(blocks[1].contains("😊 Happy - *good day*"));
        assert!(blocks[0].starts_with("**"));

        let response = v1_router(state)
            .oneshot(Request::builder().uri("/mood").body(Body::empty()).unwrap())
            .await
            .unwrap();
        let json = json_body(response).await;
        assert_eq!(json["rendered"].as_str().unwrap(), rendered);
        assert_eq!(json["count"], 2);
    }

    #[tokio::test]
    async fn concurrent_mood_posts_report_matching_counts() {
        let state = test_state();
        let posts = (0..16).map(|i| {
            v1_router(state.clone()).oneshot(post_json(
                "/mood",
                serde_json::json!({"mood": "😌 Calm", "note": format!("n{i}")}),
            ))
        });

        let mut counts = Vec::new();
        for response in join_spawned(posts).await {
            let json = json_body(response.unwrap()).await;
            let blocks = json["rendered"].as_str().unwrap().split("\n\n").count();
            let count = json["count"].as_u64().unwrap() as usize;
            assert_eq!(blocks, count);
            counts.push(count);
        }
        counts.sort_unstable();
        assert_eq!(counts, (1..=16).collect::<Vec<_>>());
    }

    async fn join_spawned<F, T>(futures: impl Iterator<Item = F>) -> Vec<T>
    where
        F: std::future::Future<Output = T> + Send + 'static,
        T: Send + 'static,
    {
        let handles: Vec<_> = futures.map(tokio::spawn).collect();
        let mut out = Vec::with_capacity(handles.len());
        for handle in handles {
            out.push(handle.await.unwrap());
        }
        out
    }

    #[tokio::test]
    async fn mood_note_is_optional() {
        let response = v1_router(test_state())
            .oneshot(post_json("/mood", serde_json::json!({"mood": "😌 Calm"})))
            .await
            .unwrap();
        let json = json_body(response).await;
        assert!(json["rendered"].as_str().unwrap().ends_with("😌 Calm - **"));
    }

    #[tokio::test]
    async fn resources_listing() {
        let response = v1_router(test_state())
            .oneshot(Request::builder().uri("/resources").body(Body::empty()).unwrap())
            .await
            .unwrap();
        let json = json_body(response).await;
        assert_eq!(json["resources"].as_array().unwrap().len(), 4);
        assert_eq!(json["resources"][0]["name"], "Tele MANAS");
        assert!(json["markdown"].as_str().unwrap().contains("KIRAN"));
    }

    #[tokio::test]
    async fn ui_metadata() {
        let response = v1_router(test_state())
            .oneshot(Request::builder().uri("/ui").body(Body::empty()).unwrap())
            .await
            .unwrap();
        let json = json_body(response).await;
        assert_eq!(json["mood_labels"].as_array().unwrap().len(), 6);
        assert_eq!(json["mood_labels"][4]["label"], "😰 Anxious");
        assert_eq!(json["mood_labels"][4]["value"], "anxious");
        assert_eq!(json["example_prompts"].as_array().unwrap().len(), 3);
        assert_eq!(json["ready"], true);
    }
}
