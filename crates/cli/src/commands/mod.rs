pub mod chat;
pub mod doctor;
pub mod gateway;
pub mod onboard;

use mindcare_agent::MindcareApp;
use mindcare_config::AppConfig;
use mindcare_security::SecretResolver;

/// Load config and build the app the same way for every command.
pub fn load_app() -> Result<(AppConfig, MindcareApp), Box<dyn std::error::Error>> {
    let config = AppConfig::load().map_err(|e| format!("Failed to load config: {e}"))?;
    let resolver = SecretResolver::from_config(&config);
    let app = mindcare_agent::build_app(&config, &resolver);
    Ok((config, app))
}
