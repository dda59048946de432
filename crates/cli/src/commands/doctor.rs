//! `mindcare doctor`: diagnose configuration and credentials.

use mindcare_config::AppConfig;
use mindcare_security::{SecretResolver, SecretsFileSource};

pub async fn run() -> Result<(), Box<dyn std::error::Error>> {
    println!("🩺 MindcareAI Doctor");
    println!("===================\n");

    let mut issues = 0;

    let config_path = AppConfig::config_dir().join("config.toml");
    let config = match AppConfig::load() {
        Ok(config) => {
            if config_path.exists() {
                println!("  ✅ Config file valid: {}", config_path.display());
            } else {
                println!("  ⚠️  No config file, using defaults (run `mindcare onboard`)");
            }
            config
        }
        Err(e) => {
            println!("  ❌ Config invalid: {e}");
            println!("\n  ⚠️  Fix the config before continuing.");
            return Ok(());
        }
    };

    let secrets_path = config.secrets_path();
    if secrets_path.exists() {
        match SecretsFileSource::try_load(&secrets_path) {
            Ok(source) => println!(
                "  ✅ Secrets file readable: {} ({} entries)",
                secrets_path.display(),
                source.len()
            ),
            Err(e) => {
                println!("  ❌ Secrets file unusable: {e}");
                issues += 1;
            }
        }
    } else {
        println!("  ⚠️  No secrets file at {}", secrets_path.display());
    }

    let resolver = SecretResolver::from_config(&config);
    match resolver.resolve(&config.api_key_name) {
        Some(secret) => println!(
            "  ✅ {} supplied by: {}",
            config.api_key_name, secret.source
        ),
        None => {
            println!(
                "  ❌ {} not found (searched: {})",
                config.api_key_name,
                resolver.source_names().join(" → ")
            );
            issues += 1;
        }
    }

    let app = mindcare_agent::build_app(&config, &resolver);
    let status = app.status();
    match (&status.provider, &status.model) {
        (Some(provider), Some(model)) => {
            println!("  ✅ Provider: {provider}, model: {model}");
        }
        _ => {
            if let Some(reason) = &status.reason {
                println!("  ❌ Chat unavailable: {reason}");
            }
            issues += 1;
        }
    }

    if let Some(asm) = app.assembler() {
        match asm.health_check().await {
            Ok(true) => println!("  ✅ Provider reachable"),
            Ok(false) => {
                println!("  ⚠️  Provider answered but reported itself unhealthy");
                issues += 1;
            }
            Err(e) => {
                println!("  ❌ Provider unreachable: {e}");
                issues += 1;
            }
        }
    }

    println!();
    if issues == 0 {
        println!("  🎉 All checks passed!");
    } else {
        println!("  ⚠️  {issues} issue(s) found. See above for details.");
    }

    Ok(())
}
