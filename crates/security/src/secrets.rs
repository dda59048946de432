//! Named-secret resolution through an ordered list of sources.
//!
//! The resolver asks each [`SecretSource`] in turn and returns the first
//! usable value. A source that fails (unreadable file, bad TOML) behaves as
//! if the secret were absent; the failure is only logged at `debug`.

use mindcare_config::AppConfig;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tracing::debug;

/// A resolved secret value. `Debug` never prints the value.
#[derive(Clone, PartialEq, Eq)]
pub struct SecretValue(String);

impl SecretValue {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Debug for SecretValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("SecretValue([REDACTED])")
    }
}

/// A secret together with the name of the source that supplied it.
#[derive(Debug, Clone)]
pub struct ResolvedSecret {
    pub value: SecretValue,
    pub source: String,
}

/// One provider of named secrets.
pub trait SecretSource: Send + Sync {
    /// Short label used in logs and `doctor` output.
    fn name(&self) -> &str;

    /// Look up a secret. Any failure is reported as `None`.
    fn get(&self, key: &str) -> Option<String>;
}

/// Values that are clearly not real credentials.
///
/// Deployment templates often leave `YOUR_API_KEY` or a stringified
/// `undefined`/`null` behind; those count as missing.
pub fn is_placeholder(value: &str) -> bool {
    let trimmed = value.trim();
    trimmed.is_empty()
        || trimmed == "undefined"
        || trimmed == "null"
        || trimmed.starts_with("YOUR_")
}

/// Reads secrets from the process environment.
#[derive(Debug, Default)]
pub struct EnvSource;

impl EnvSource {
    pub fn new() -> Self {
        Self
    }
}

impl SecretSource for EnvSource {
    fn name(&self) -> &str {
        "environment"
    }

    fn get(&self, key: &str) -> Option<String> {
        std::env::var(key).ok()
    }
}

/// Reads secrets from a flat TOML table such as `~/.mindcare/secrets.toml`:
///
/// ```toml
/// API_KEY = "AIza..."
/// ```
#[derive(Debug)]
pub struct SecretsFileSource {
    path: PathBuf,
    values: HashMap<String, String>,
}

impl SecretsFileSource {
    /// Load the file, surfacing read and parse failures.
    pub fn try_load(path: &Path) -> Result<Self, SecretError> {
        let content = std::fs::read_to_string(path).map_err(|e| SecretError::Read {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        let table: toml::Table = toml::from_str(&content).map_err(|e| SecretError::Parse {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        let values = table
            .into_iter()
            .filter_map(|(k, v)| match v {
                toml::Value::String(s) => Some((k, s)),
                _ => None,
            })
            .collect();

        Ok(Self {
            path: path.to_path_buf(),
            values,
        })
    }

    /// Load the file; any failure yields an empty source.
    pub fn load(path: &Path) -> Self {
        match Self::try_load(path) {
            Ok(source) => source,
            Err(e) => {
                debug!(error = %e, "Secrets file unavailable, treating as empty");
                Self {
                    path: path.to_path_buf(),
                    values: HashMap::new(),
                }
            }
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl SecretSource for SecretsFileSource {
    fn name(&self) -> &str {
        "secrets-file"
    }

    fn get(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }
}

/// Fixed in-memory secrets, e.g. the `api_key` fallback from `config.toml`.
#[derive(Debug, Default)]
pub struct StaticSource {
    label: String,
    values: HashMap<String, String>,
}

impl StaticSource {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            values: HashMap::new(),
        }
    }

    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.values.insert(key.into(), value.into());
        self
    }
}

impl SecretSource for StaticSource {
    fn name(&self) -> &str {
        &self.label
    }

    fn get(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }
}

/// Tries each source in order and returns the first usable value.
#[derive(Default)]
pub struct SecretResolver {
    sources: Vec<Box<dyn SecretSource>>,
}

impl SecretResolver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a source to the end of the chain.
    pub fn with_source(mut self, source: impl SecretSource + 'static) -> Self {
        self.sources.push(Box::new(source));
        self
    }

    /// The standard chain: secrets file, then environment, then the
    /// `api_key` from config.
    pub fn from_config(config: &AppConfig) -> Self {
        let mut fallback = StaticSource::new("config");
        if let Some(key) = &config.api_key {
            fallback = fallback.with(config.api_key_name.clone(), key.clone());
        }

        Self::new()
            .with_source(SecretsFileSource::load(&config.secrets_path()))
            .with_source(EnvSource::new())
            .with_source(fallback)
    }

    /// Names of the configured sources, in lookup order.
    pub fn source_names(&self) -> Vec<&str> {
        self.sources.iter().map(|s| s.name()).collect()
    }

    pub fn resolve(&self, key: &str) -> Option<ResolvedSecret> {
        for source in &self.sources {
            match source.get(key) {
                Some(value) if !is_placeholder(&value) => {
                    debug!(key, source = source.name(), "Secret resolved");
                    return Some(ResolvedSecret {
                        value: SecretValue::new(value.trim()),
                        source: source.name().to_string(),
                    });
                }
                Some(_) => {
                    debug!(key, source = source.name(), "Ignoring placeholder secret value");
                }
                None => {}
            }
        }
        debug!(key, "Secret not found in any source");
        None
    }
}

/// Errors from loading a secrets file.
#[derive(Debug, thiserror::Error)]
pub enum SecretError {
    #[error("Failed to read secrets file at {path}: {reason}")]
    Read { path: PathBuf, reason: String },

    #[error("Failed to parse secrets file at {path}: {reason}")]
    Parse { path: PathBuf, reason: String },
}
