//! Conversation assembly: persona + transcript + new message → one request.
//!
//! The assembler keeps no conversation state. The UI host passes the full
//! transcript on every call, which is the only way a conversation continues
//! across turns.
//!
//! # Determinism
//!
//! [`ConversationAssembler::build_messages`] is a pure function of its
//! inputs: identical `(message, transcript)` pairs always produce identical
//! message sequences.

use mindcare_core::error::ProviderError;
use mindcare_core::message::{Message, Turn};
use mindcare_core::provider::{Provider, ProviderRequest, Source};
use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, info};

/// The ordered request messages: persona, then each turn's present sides
/// in order, then `new_message` (always, even when empty).
pub fn assemble_messages(persona: &str, new_message: &str, transcript: &[Turn]) -> Vec<Message> {
    let present: usize = transcript.iter().map(Turn::present_sides).sum();
    let mut messages = Vec::with_capacity(present + 2);

    messages.push(Message::system(persona));
    for turn in transcript {
        if let Some(user) = turn.user_text() {
            messages.push(Message::user(user));
        }
        if let Some(assistant) = turn.assistant_text() {
            messages.push(Message::assistant(assistant));
        }
    }
    messages.push(Message::user(new_message));

    messages
}

/// A model reply and the web pages it was grounded on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChatReply {
    pub text: String,
    pub sources: Vec<Source>,
}

impl ChatReply {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            sources: Vec::new(),
        }
    }
}

/// Builds model requests and forwards them to a provider.
pub struct ConversationAssembler {
    provider: Arc<dyn Provider>,
    model: String,
    temperature: f32,
    max_tokens: Option<u32>,
    persona: String,
}

impl ConversationAssembler {
    pub fn new(
        provider: Arc<dyn Provider>,
        model: impl Into<String>,
        temperature: f32,
        persona: impl Into<String>,
    ) -> Self {
        Self {
            provider,
            model: model.into(),
            temperature,
            max_tokens: None,
            persona: persona.into(),
        }
    }

    pub fn with_max_tokens(mut self, max_tokens: Option<u32>) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    pub fn provider_name(&self) -> &str {
        self.provider.name()
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn persona(&self) -> &str {
        &self.persona
    }

    /// The ordered request messages for one call. See [`assemble_messages`].
    pub fn build_messages(&self, new_message: &str, transcript: &[Turn]) -> Vec<Message> {
        assemble_messages(&self.persona, new_message, transcript)
    }

    /// Ask the provider whether it is reachable. Used by diagnostics only.
    pub async fn health_check(&self) -> Result<bool, ProviderError> {
        self.provider.health_check().await
    }

    /// The full provider request for one call.
    pub fn build_request(&self, new_message: &str, transcript: &[Turn]) -> ProviderRequest {
        ProviderRequest {
            model: self.model.clone(),
            messages: self.build_messages(new_message, transcript),
            temperature: self.temperature,
            max_tokens: self.max_tokens,
        }
    }

    /// Send one request and return the reply text verbatim.
    pub async fn respond(
        &self,
        new_message: &str,
        transcript: &[Turn],
    ) -> Result<String, ProviderError> {
        self.reply(new_message, transcript).await.map(|r| r.text)
    }

    /// Send one request and return the reply with any cited sources.
    ///
    /// Exactly one provider call is made; failures are returned, not retried.
    pub async fn reply(
        &self,
        new_message: &str,
        transcript: &[Turn],
    ) -> Result<ChatReply, ProviderError> {
        let request = self.build_request(new_message, transcript);

        debug!(
            provider = self.provider.name(),
            model = %self.model,
            turns = transcript.len(),
            messages = request.messages.len(),
            message_len = new_message.len(),
            "Assembled chat request"
        );

        let response = self.provider.complete(request).await?;

        if let Some(usage) = &response.usage {
            info!(
                model = %response.model,
                prompt_tokens = usage.prompt_tokens,
                completion_tokens = usage.completion_tokens,
                sources = response.sources.len(),
                "Chat reply received"
            );
        }

        Ok(ChatReply {
            text: response.message.content,
            sources: response.sources,
        })
    }
}
