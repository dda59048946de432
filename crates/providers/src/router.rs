//! Provider router: selects the correct chat-completion provider based on config.

use crate::gemini::GeminiProvider;
use crate::openai_compat::OpenAiCompatProvider;
use mindcare_config::{AppConfig, ProviderConfig};
use mindcare_core::provider::Provider;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

/// Routes chat requests to the configured provider.
pub struct ProviderRouter {
    providers: HashMap<String, Arc<dyn Provider>>,
    default_provider: String,
}

impl ProviderRouter {
    /// Create a new router with a default provider name.
    pub fn new(default_provider: impl Into<String>) -> Self {
        Self {
            providers: HashMap::new(),
            default_provider: default_provider.into(),
        }
    }

    /// Register a provider.
    pub fn register(&mut self, name: impl Into<String>, provider: Arc<dyn Provider>) {
        self.providers.insert(name.into(), provider);
    }

    /// Get the default provider.
    pub fn default(&self) -> Option<Arc<dyn Provider>> {
        self.providers.get(&self.default_provider).cloned()
    }

    /// Get a specific provider by name.
    pub fn get(&self, name: &str) -> Option<Arc<dyn Provider>> {
        self.providers.get(name).cloned()
    }
}

/// Build providers from configuration, all sharing one resolved API key.
///
/// Providers without a known endpoint and no `api_url` are skipped, so an
/// unknown `default_provider` leaves the router without a default.
pub fn build_from_config(config: &AppConfig, api_key: &str) -> ProviderRouter {
    let mut router = ProviderRouter::new(&config.default_provider);
    let timeout = config.request_timeout_secs.map(Duration::from_secs);

    let mut names: Vec<&str> = config.providers.keys().map(String::as_str).collect();
    if !config.providers.contains_key(&config.default_provider) {
        names.push(&config.default_provider);
    }

    for name in names {
        let settings = config.providers.get(name).cloned().unwrap_or_default();

        if let Some(provider) = build_provider(name, settings, api_key, timeout) {
            router.register(name, provider);
        } else {
            tracing::warn!(provider = name, "Unknown provider without api_url, skipping");
        }
    }

    router
}

fn build_provider(
    name: &str,
    settings: ProviderConfig,
    api_key: &str,
    timeout: Option<Duration>,
) -> Option<Arc<dyn Provider>> {
    if name == "gemini" {
        let mut p =
            GeminiProvider::new(api_key).with_google_search(settings.google_search.unwrap_or(true));
        if let Some(url) = settings.api_url {
            p = p.with_base_url(url);
        }
        if let Some(t) = timeout {
            p = p.with_timeout(t);
        }
        return Some(Arc::new(p));
    }

    let base_url = settings.api_url.or_else(|| default_base_url(name).map(String::from))?;
    let mut p = OpenAiCompatProvider::new(name, base_url, api_key);
    if let Some(t) = timeout {
        p = p.with_timeout(t);
    }
    Some(Arc::new(p))
}

/// The model to request: a per-provider `default_model` beats the global one.
pub fn resolve_model(config: &AppConfig) -> String {
    config
        .providers
        .get(&config.default_provider)
        .and_then(|p| p.default_model.clone())
        .unwrap_or_else(|| config.default_model.clone())
}

/// Get the default base URL for well-known OpenAI-compatible providers.
fn default_base_url(provider_name: &str) -> Option<&'static str> {
    match provider_name {
        "openrouter" => Some("https://openrouter.ai/api/v1"),
        "openai" => Some("https://api.openai.com/v1"),
        "ollama" => Some("http://localhost:11434/v1"),
        "groq" => Some("https://api.groq.com/openai/v1"),
        "together" => Some("https://api.together.xyz/v1"),
        "vllm" => Some("http://localhost:8000/v1"),
        _ => None,
    }
}
