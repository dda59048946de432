//! Startup wiring: config + secret chain → [`MindcareApp`].
//!
//! Startup never fails. A missing credential or an unusable provider
//! produces a degraded app instead of an error.

use crate::app::MindcareApp;
use crate::assembler::ConversationAssembler;
use crate::persona;
use mindcare_config::AppConfig;
use mindcare_providers::router;
use mindcare_security::SecretResolver;
use tracing::info;

/// Build the application object for `config`, resolving the API key through
/// `resolver`.
pub fn build_app(config: &AppConfig, resolver: &SecretResolver) -> MindcareApp {
    let Some(secret) = resolver.resolve(&config.api_key_name) else {
        return MindcareApp::degraded(format!(
            "API Key not found. Please add '{}' to {} or the environment.",
            config.api_key_name,
            config.secrets_path().display()
        ));
    };

    info!(source = %secret.source, key = %config.api_key_name, "API key resolved");

    let providers = router::build_from_config(config, secret.value.expose());
    let Some(provider) = providers.default() else {
        return MindcareApp::degraded(format!(
            "Provider '{}' is not configured. Set providers.{}.api_url in config.toml.",
            config.default_provider, config.default_provider
        ));
    };

    let persona = persona::resolve(config.persona.system_prompt_override.as_deref());
    let assembler = ConversationAssembler::new(
        provider,
        router::resolve_model(config),
        config.default_temperature,
        persona,
    )
    .with_max_tokens(config.default_max_tokens);

    info!(
        provider = assembler.provider_name(),
        model = assembler.model(),
        "Mindcare app ready"
    );

    MindcareApp::ready(assembler)
}
