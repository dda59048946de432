//! Security module for MindcareAI.
//!
//! Provides:
//! - **Secrets**: resolve named credentials through an ordered chain of
//!   sources (secrets file, process environment, config fallback)

pub mod secrets;

pub use secrets::{
    EnvSource, ResolvedSecret, SecretError, SecretResolver, SecretSource, SecretValue,
    SecretsFileSource, StaticSource, is_placeholder,
};
