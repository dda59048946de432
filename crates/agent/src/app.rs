//! The application object handed to UI hosts.
//!
//! This is the single place where chat failures turn into reply text: the
//! assembler returns typed errors, `MindcareApp::respond` formats them as
//! `Error: …`, and callers only ever receive strings.

use crate::assembler::{ChatReply, ConversationAssembler};
use crate::mood::{MoodLog, MoodSnapshot};
use mindcare_core::message::Turn;
use serde::Serialize;
use tracing::{error, warn};

/// Reply returned by [`MindcareApp::log_mood`] in degraded mode.
pub const MOOD_ERROR: &str = "Error";

enum Mode {
    Ready(ConversationAssembler),
    Degraded { reason: String },
}

/// Health summary for status endpoints and `doctor`.
#[derive(Debug, Clone, Serialize)]
pub struct AppStatus {
    pub ready: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub provider: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    pub mood_entries: usize,
}

/// Process-lifetime application state.
pub struct MindcareApp {
    mode: Mode,
    moods: MoodLog,
}

impl MindcareApp {
    /// A working app backed by `assembler`.
    pub fn ready(assembler: ConversationAssembler) -> Self {
        Self {
            mode: Mode::Ready(assembler),
            moods: MoodLog::new(),
        }
    }

    /// An app that failed to initialize. Every call answers with a fixed
    /// error string built from `reason`.
    pub fn degraded(reason: impl Into<String>) -> Self {
        let reason = reason.into();
        warn!(reason = %reason, "Starting in degraded mode");
        Self {
            mode: Mode::Degraded { reason },
            moods: MoodLog::new(),
        }
    }

    pub fn is_ready(&self) -> bool {
        matches!(self.mode, Mode::Ready(_))
    }

    pub fn assembler(&self) -> Option<&ConversationAssembler> {
        match &self.mode {
            Mode::Ready(asm) => Some(asm),
            Mode::Degraded { .. } => None,
        }
    }

    pub fn status(&self) -> AppStatus {
        match &self.mode {
            Mode::Ready(asm) => AppStatus {
                ready: true,
                provider: Some(asm.provider_name().to_string()),
                model: Some(asm.model().to_string()),
                reason: None,
                mood_entries: self.moods.len(),
            },
            Mode::Degraded { reason } => AppStatus {
                ready: false,
                provider: None,
                model: None,
                reason: Some(reason.clone()),
                mood_entries: 0,
            },
        }
    }

    /// Answer one chat message. Never fails: errors become the reply text.
    pub async fn respond(&self, message: &str, transcript: &[Turn]) -> String {
        self.reply(message, transcript).await.text
    }

    /// Like [`respond`](Self::respond), keeping any grounding sources.
    /// Error replies never carry sources.
    pub async fn reply(&self, message: &str, transcript: &[Turn]) -> ChatReply {
        match &self.mode {
            Mode::Ready(asm) => match asm.reply(message, transcript).await {
                Ok(reply) => reply,
                Err(e) => {
                    error!(error = %e, "Chat request failed");
                    ChatReply::text(format!("Error: {e}"))
                }
            },
            Mode::Degraded { reason } => ChatReply::text(format!("Error: {reason}")),
        }
    }

    /// Record a mood and return the rendered journal, newest first.
    pub fn log_mood(&self, mood: &str, note: &str) -> String {
        self.log_mood_snapshot(mood, note).rendered
    }

    /// Record a mood and return the journal with its entry count.
    pub fn log_mood_snapshot(&self, mood: &str, note: &str) -> MoodSnapshot {
        match &self.mode {
            Mode::Ready(_) => self.moods.log_snapshot(mood, note),
            Mode::Degraded { .. } => degraded_snapshot(),
        }
    }

    /// The current journal without adding to it.
    pub fn mood_history(&self) -> String {
        self.mood_snapshot().rendered
    }

    pub fn mood_snapshot(&self) -> MoodSnapshot {
        match &self.mode {
            Mode::Ready(_) => self.moods.snapshot(),
            Mode::Degraded { .. } => degraded_snapshot(),
        }
    }

    pub fn mood_count(&self) -> usize {
        self.moods.len()
    }
}

fn degraded_snapshot() -> MoodSnapshot {
    MoodSnapshot {
        rendered: MOOD_ERROR.to_string(),
        count: 0,
    }
}
