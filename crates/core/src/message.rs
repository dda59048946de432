//! Message, Turn and Transcript domain types.
//!
//! These are the value objects that flow through the chat path:
//! the UI host keeps a [`Transcript`] of [`Turn`]s, the assembler flattens it
//! into [`Message`]s, and a provider turns those into a reply.

use serde::{Deserialize, Serialize};

/// The role of a message sender in a model request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// The end user
    User,
    /// The AI assistant
    Assistant,
    /// System instructions (persona, rules)
    System,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Assistant => "assistant",
            Role::System => "system",
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single message in a model request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    /// Who sent this message
    pub role: Role,

    /// The text content
    pub content: String,
}

impl Message {
    /// Create a new user message.
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }

    /// Create a new assistant message.
    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
        }
    }

    /// Create a new system message.
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: content.into(),
        }
    }
}

/// One exchange in a conversation: what the user said and what the
/// assistant answered. Either side may be missing, e.g. when the UI host
/// records a user message whose reply never arrived.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Turn {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assistant: Option<String>,
}

impl Turn {
    pub fn new(user: Option<String>, assistant: Option<String>) -> Self {
        Self { user, assistant }
    }

    /// A complete exchange with both sides present.
    pub fn exchange(user: impl Into<String>, assistant: impl Into<String>) -> Self {
        Self {
            user: Some(user.into()),
            assistant: Some(assistant.into()),
        }
    }

    /// The user side, if present. Empty text counts as absent.
    pub fn user_text(&self) -> Option<&str> {
        self.user.as_deref().filter(|s| !s.is_empty())
    }

    /// The assistant side, if present. Empty text counts as absent.
    pub fn assistant_text(&self) -> Option<&str> {
        self.assistant.as_deref().filter(|s| !s.is_empty())
    }

    /// Number of sides that become request messages (0, 1 or 2).
    pub fn present_sides(&self) -> usize {
        usize::from(self.user_text().is_some()) + usize::from(self.assistant_text().is_some())
    }
}

/// A chronological sequence of turns, owned by the UI host.
pub type Transcript = Vec<Turn>;
