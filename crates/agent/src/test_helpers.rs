//! Shared test helpers.

use mindcare_core::error::ProviderError;
use mindcare_core::message::Message;
use mindcare_core::provider::{Provider, ProviderRequest, ProviderResponse, Source, Usage};
use std::sync::Mutex;

/// A mock provider that records every request and answers with a fixed
/// reply, or a fixed error when built with [`RecordingProvider::failing`].
pub struct RecordingProvider {
    reply: Result<String, ProviderError>,
    sources: Vec<Source>,
    requests: Mutex<Vec<ProviderRequest>>,
}

impl RecordingProvider {
    pub fn replying(text: &str) -> Self {
        Self {
            reply: Ok(text.to_string()),
            sources: Vec::new(),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn failing(error: ProviderError) -> Self {
        Self {
            reply: Err(error),
            sources: Vec::new(),
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Attach grounding sources to every successful reply.
    pub fn with_sources(mut self, sources: Vec<Source>) -> Self {
        self.sources = sources;
        self
    }

    pub fn requests(&self) -> Vec<ProviderRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }
}

#[async_trait::async_trait]
impl Provider for RecordingProvider {
    fn name(&self) -> &str {
        "recording_mock"
    }

    async fn complete(&self, request: ProviderRequest) -> Result<ProviderResponse, ProviderError> {
        self.requests.lock().unwrap().push(request);
        let text = self.reply.clone()?;
        Ok(ProviderResponse {
            message: Message::assistant(text),
            usage: Some(Usage {
                prompt_tokens: 10,
                completion_tokens: 5,
                total_tokens: 15,
            }),
            model: "mock-model".into(),
            sources: self.sources.clone(),
        })
    }
}
