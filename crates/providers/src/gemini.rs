//! Google Gemini native provider implementation.
//!
//! Uses the `models/{model}:generateContent` REST endpoint directly.
//!
//! Differences from the OpenAI shape:
//! - `x-goog-api-key` header authentication
//! - System prompt as a top-level `systemInstruction`
//! - Assistant turns use the role `model`
//! - Reply text is split across `parts` of the first candidate
//! - Optional Google Search grounding; cited pages come back in
//!   `groundingMetadata.groundingChunks`

use async_trait::async_trait;
use mindcare_core::error::ProviderError;
use mindcare_core::message::{Message, Role};
use mindcare_core::provider::*;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::time::Duration;
use tracing::{debug, warn};

const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Gemini `generateContent` provider.
pub struct GeminiProvider {
    name: String,
    base_url: String,
    api_key: String,
    google_search: bool,
    client: reqwest::Client,
}

impl GeminiProvider {
    /// Create a new Gemini provider with no request timeout.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            name: "gemini".into(),
            base_url: DEFAULT_BASE_URL.into(),
            api_key: api_key.into(),
            google_search: false,
            client: crate::http_client(None),
        }
    }

    /// Use a custom base URL (e.g., for testing or proxies).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    /// Let the model ground replies with Google Search.
    pub fn with_google_search(mut self, enabled: bool) -> Self {
        self.google_search = enabled;
        self
    }

    /// Apply a client-side timeout to every request.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.client = crate::http_client(Some(timeout));
        self
    }

    /// Split system messages out; Gemini takes them as `systemInstruction`.
    fn extract_system(messages: &[Message]) -> (Option<String>, Vec<&Message>) {
        let mut system_parts: Vec<&str> = Vec::new();
        let mut rest: Vec<&Message> = Vec::new();

        for msg in messages {
            match msg.role {
                Role::System => system_parts.push(&msg.content),
                _ => rest.push(msg),
            }
        }

        let system = if system_parts.is_empty() {
            None
        } else {
            Some(system_parts.join("\n\n"))
        };

        (system, rest)
    }

    fn to_contents(messages: &[&Message]) -> Vec<GeminiContent> {
        messages
            .iter()
            .map(|m| GeminiContent {
                role: Some(
                    match m.role {
                        Role::Assistant => "model",
                        _ => "user",
                    }
                    .into(),
                ),
                parts: vec![GeminiPart {
                    text: Some(m.content.clone()),
                }],
            })
            .collect()
    }

    fn build_body(request: &ProviderRequest, google_search: bool) -> serde_json::Value {
        let (system, messages) = Self::extract_system(&request.messages);

        let mut generation_config = serde_json::json!({
            "temperature": request.temperature,
        });
        if let Some(max_tokens) = request.max_tokens {
            generation_config["maxOutputTokens"] = serde_json::json!(max_tokens);
        }

        let mut body = serde_json::json!({
            "contents": Self::to_contents(&messages),
            "generationConfig": generation_config,
        });

        if let Some(sys) = system {
            body["systemInstruction"] = serde_json::json!({
                "parts": [{ "text": sys }]
            });
        }

        if google_search {
            body["tools"] = serde_json::json!([{ "google_search": {} }]);
        }

        body
    }

    fn parse_response(
        api_resp: GenerateContentResponse,
        requested_model: &str,
    ) -> Result<ProviderResponse, ProviderError> {
        if let Some(reason) = api_resp.prompt_feedback.and_then(|f| f.block_reason) {
            return Err(ProviderError::Blocked(reason));
        }

        let candidate = api_resp
            .candidates
            .into_iter()
            .next()
            .ok_or_else(|| ProviderError::MalformedResponse("No candidates in response".into()))?;

        let text: String = candidate
            .content
            .map(|c| c.parts.into_iter().filter_map(|p| p.text).collect())
            .unwrap_or_default();

        if text.is_empty() {
            if let Some(reason) = candidate.finish_reason.filter(|r| r != "STOP") {
                return Err(ProviderError::Blocked(reason));
            }
        }

        let sources = candidate
            .grounding_metadata
            .map(|m| collect_sources(m.grounding_chunks))
            .unwrap_or_default();

        let usage = api_resp.usage_metadata.map(|u| Usage {
            prompt_tokens: u.prompt_token_count,
            completion_tokens: u.candidates_token_count,
            total_tokens: u.total_token_count,
        });

        Ok(ProviderResponse {
            message: Message::assistant(text),
            usage,
            model: api_resp
                .model_version
                .unwrap_or_else(|| requested_model.to_string()),
            sources,
        })
    }
}

/// Web chunks in citation order, first occurrence of each URI kept.
fn collect_sources(chunks: Vec<GroundingChunk>) -> Vec<Source> {
    let mut seen = HashSet::new();
    chunks
        .into_iter()
        .filter_map(|c| c.web)
        .filter_map(|w| {
            let uri = w.uri.filter(|u| !u.is_empty())?;
            if !seen.insert(uri.clone()) {
                return None;
            }
            let title = w.title.filter(|t| !t.is_empty()).unwrap_or_else(|| uri.clone());
            Some(Source { title, uri })
        })
        .collect()
}

#[async_trait]
impl mindcare_core::Provider for GeminiProvider {
    fn name(&self) -> &str {
        &self.name
    }

    async fn complete(&self, request: ProviderRequest) -> Result<ProviderResponse, ProviderError> {
        let url = format!("{}/models/{}:generateContent", self.base_url, request.model);
        let body = Self::build_body(&request, self.google_search);

        debug!(
            provider = %self.name,
            model = %request.model,
            messages = request.messages.len(),
            google_search = self.google_search,
            "Sending generateContent request"
        );

        let response = self
            .client
            .post(&url)
            .header("x-goog-api-key", &self.api_key)
            .header("Content-Type", "application/json")
            .json(&body)
            .send()
            .await
            .map_err(|e| ProviderError::Network(e.to_string()))?;

        let status = response.status().as_u16();

        if status == 429 {
            return Err(ProviderError::RateLimited);
        }
        if status == 401 || status == 403 {
            return Err(ProviderError::AuthenticationFailed(
                "Invalid Gemini API key or insufficient permissions".into(),
            ));
        }
        if status != 200 {
            let error_body = response.text().await.unwrap_or_default();
            // Gemini reports a bad key as 400 with this reason code
            if error_body.contains("API_KEY_INVALID") {
                return Err(ProviderError::AuthenticationFailed(
                    "Invalid Gemini API key".into(),
                ));
            }
            warn!(status, body = %error_body, "Gemini API error");
            return Err(ProviderError::ApiError {
                status_code: status,
                message: error_body,
            });
        }

        let api_resp: GenerateContentResponse = response.json().await.map_err(|e| {
            ProviderError::MalformedResponse(format!("Failed to parse Gemini response: {e}"))
        })?;

        Self::parse_response(api_resp, &request.model)
    }

    async fn health_check(&self) -> Result<bool, ProviderError> {
        let url = format!("{}/models", self.base_url);
        let response = self
            .client
            .get(&url)
            .header("x-goog-api-key", &self.api_key)
            .send()
            .await
            .map_err(|e| ProviderError::Network(e.to_string()))?;

        Ok(response.status().is_success())
    }
}

// --- Gemini API types (internal) ---

#[derive(Debug, Serialize, Deserialize)]
struct GeminiContent {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    role: Option<String>,
    #[serde(default)]
    parts: Vec<GeminiPart>,
}

#[derive(Debug, Serialize, Deserialize)]
struct GeminiPart {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<GeminiCandidate>,
    #[serde(default)]
    usage_metadata: Option<GeminiUsage>,
    #[serde(default)]
    model_version: Option<String>,
    #[serde(default)]
    prompt_feedback: Option<PromptFeedback>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeminiCandidate {
    #[serde(default)]
    content: Option<GeminiContent>,
    #[serde(default)]
    finish_reason: Option<String>,
    #[serde(default)]
    grounding_metadata: Option<GroundingMetadata>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GroundingMetadata {
    #[serde(default)]
    grounding_chunks: Vec<GroundingChunk>,
}

#[derive(Debug, Deserialize)]
struct GroundingChunk {
    #[serde(default)]
    web: Option<WebChunk>,
}

#[derive(Debug, Deserialize)]
struct WebChunk {
    #[serde(default)]
    uri: Option<String>,
    #[serde(default)]
    title: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeminiUsage {
    #[serde(default)]
    prompt_token_count: u32,
    #[serde(default)]
    candidates_token_count: u32,
    #[serde(default)]
    total_token_count: u32,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PromptFeedback {
    #[serde(default)]
    block_reason: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use mindcare_core::Provider;

    fn request(messages: Vec<Message>) -> ProviderRequest {
        ProviderRequest {
            model: "gemini-3-flash-preview".into(),
            messages,
            temperature: 0.7,
            max_tokens: None,
        }
    }

    #[test]
    fn constructor() {
        let provider = GeminiProvider::new("AIza-test");
        assert_eq!(provider.name(), "gemini");
        assert!(provider.base_url.contains("generativelanguage.googleapis.com"));
    }

    #[test]
    fn constructor_with_base_url() {
        let provider = GeminiProvider::new("k").with_base_url("http://localhost:9999/v1beta/");
        assert_eq!(provider.base_url, "http://localhost:9999/v1beta");
    }

    #[test]
    fn system_goes_to_system_instruction() {
        let body = GeminiProvider::build_body(&request(vec![
            Message::system("Be warm."),
            Message::user("Hi"),
            Message::assistant("Hello!"),
            Message::user("I feel anxious"),
        ]), false);

        assert_eq!(body["systemInstruction"]["parts"][0]["text"], "Be warm.");
        let contents = body["contents"].as_array().unwrap();
        assert_eq!(contents.len(), 3);
        assert_eq!(contents[0]["role"], "user");
        assert_eq!(contents[1]["role"], "model");
        assert_eq!(contents[1]["parts"][0]["text"], "Hello!");
        assert_eq!(contents[2]["parts"][0]["text"], "I feel anxious");
    }

    #[test]
    fn generation_config_carries_parameters() {
        let mut req = request(vec![Message::user("Hi")]);
        req.max_tokens = Some(256);
        let body = GeminiProvider::build_body(&req, false);
        assert!((body["generationConfig"]["temperature"].as_f64().unwrap() - 0.7).abs() < 1e-6);
        assert_eq!(body["generationConfig"]["maxOutputTokens"], 256);
        assert!(body.get("systemInstruction").is_none());
        assert!(body.get("tools").is_none());
    }

    #[test]
    fn google_search_adds_tool() {
        let body = GeminiProvider::build_body(&request(vec![Message::user("Clinics in Pune?")]), true);
        assert_eq!(body["tools"], serde_json::json!([{ "google_search": {} }]));
    }

    #[test]
    fn grounding_chunks_become_unique_sources() {
        let data = r#"{
            "candidates": [{
                "content": {"parts": [{"text": "Tele MANAS is free and 24/7."}]},
                "finishReason": "STOP",
                "groundingMetadata": {
                    "webSearchQueries": ["tele manas helpline"],
                    "groundingChunks": [
                        {"web": {"uri": "https://telemanas.mohfw.gov.in", "title": "Tele MANAS"}},
                        {"web": {"uri": "https://example.org/kiran", "title": ""}},
                        {"web": {"uri": "https://telemanas.mohfw.gov.in", "title": "Tele MANAS again"}},
                        {"retrievedContext": {"uri": "gs://ignored"}}
                    ]
                }
            }]
        }"#;
        let parsed: GenerateContentResponse = serde_json::from_str(data).unwrap();
        let resp = GeminiProvider::parse_response(parsed, "m").unwrap();

        assert_eq!(
            resp.sources,
            vec![
                Source {
                    title: "Tele MANAS".into(),
                    uri: "https://telemanas.mohfw.gov.in".into()
                },
                Source {
                    title: "https://example.org/kiran".into(),
                    uri: "https://example.org/kiran".into()
                },
            ]
        );
    }

    #[test]
    fn parse_text_response() {
        let data = r#"{
            "candidates": [{
                "content": {"role": "model", "parts": [{"text": "Let's try "}, {"text": "box breathing."}]},
                "finishReason": "STOP"
            }],
            "usageMetadata": {"promptTokenCount": 40, "candidatesTokenCount": 6, "totalTokenCount": 46},
            "modelVersion": "gemini-3-flash-preview-001"
        }"#;
        let parsed: GenerateContentResponse = serde_json::from_str(data).unwrap();
        let resp = GeminiProvider::parse_response(parsed, "gemini-3-flash-preview").unwrap();

        assert_eq!(resp.message.role, Role::Assistant);
        assert_eq!(resp.message.content, "Let's try box breathing.");
        assert_eq!(resp.model, "gemini-3-flash-preview-001");
        assert_eq!(resp.usage.unwrap().total_tokens, 46);
    }

    #[test]
    fn parse_blocked_prompt() {
        let data = r#"{"promptFeedback": {"blockReason": "SAFETY"}}"#;
        let parsed: GenerateContentResponse = serde_json::from_str(data).unwrap();
        let err = GeminiProvider::parse_response(parsed, "m").unwrap_err();
        assert!(matches!(err, ProviderError::Blocked(ref r) if r == "SAFETY"));
    }

    #[test]
    fn parse_empty_candidates_is_malformed() {
        let parsed: GenerateContentResponse = serde_json::from_str("{}").unwrap();
        let err = GeminiProvider::parse_response(parsed, "m").unwrap_err();
        assert!(matches!(err, ProviderError::MalformedResponse(_)));
    }

    #[test]
    fn parse_empty_candidate_with_safety_finish() {
        let data = r#"{"candidates": [{"finishReason": "SAFETY"}]}"#;
        let parsed: GenerateContentResponse = serde_json::from_str(data).unwrap();
        let err = GeminiProvider::parse_response(parsed, "m").unwrap_err();
        assert!(matches!(err, ProviderError::Blocked(_)));
    }

    #[tokio::test]
    async fn unreachable_endpoint_is_network_error() {
        let provider = GeminiProvider::new("k").with_base_url("http://127.0.0.1:1/v1beta");
        let err = provider
            .complete(request(vec![Message::user("Hi")]))
            .await
            .unwrap_err();
        assert!(matches!(err, ProviderError::Network(_)));
    }
}
