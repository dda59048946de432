//! # Mindcare Core
//!
//! Domain types, traits, and error definitions for the MindcareAI companion.
//! This crate has **no framework dependencies**: it defines the domain model
//! that every other crate implements against.
//!
//! - [`message`]: chat messages, turns and transcripts
//! - [`provider`]: the abstraction over hosted chat-completion backends
//! - [`error`]: provider failure types

pub mod error;
pub mod message;
pub mod provider;

// Re-export key types at crate root for ergonomics
pub use error::ProviderError;
pub use message::{Message, Role, Transcript, Turn};
pub use provider::{Provider, ProviderRequest, ProviderResponse, Source, Usage};
