//! `mindcare onboard`: first-time setup.

use mindcare_config::AppConfig;
use std::path::Path;

const SECRETS_HEADER: &str = "\
# MindcareAI secrets. Keep this file private.
# Get a Gemini key at https://aistudio.google.com/apikey
";

/// Secrets file body with a placeholder under `key_name`.
fn secrets_template(key_name: &str) -> String {
    let key = if !key_name.is_empty()
        && key_name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
    {
        key_name.to_string()
    } else {
        toml::Value::String(key_name.to_string()).to_string()
    };
    format!("{SECRETS_HEADER}{key} = \"YOUR_API_KEY\"\n")
}

pub async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let config_dir = AppConfig::config_dir();

    println!("🌿 MindcareAI: First-Time Setup");
    println!("===============================\n");

    let (created, key_name) = scaffold(&config_dir)?;
    for path in &created {
        println!("✅ Created {}", path.display());
    }
    if created.is_empty() {
        println!("  Everything already exists in {}", config_dir.display());
    }

    println!("\n📝 Next steps:");
    println!(
        "   1. Replace YOUR_API_KEY in {}",
        config_dir.join("secrets.toml").display()
    );
    println!("      (or export {key_name} in your environment)");
    println!("   2. Run: mindcare doctor");
    println!("   3. Run: mindcare chat  or  mindcare gateway\n");

    Ok(())
}

/// Create `dir`, `config.toml` and `secrets.toml`, never overwriting existing
/// files. The secrets placeholder uses the `api_key_name` of whichever
/// `config.toml` ends up in `dir`.
///
/// Returns the paths that were created and the key name used.
pub fn scaffold(dir: &Path) -> Result<(Vec<std::path::PathBuf>, String), Box<dyn std::error::Error>> {
    let mut created = Vec::new();

    if !dir.exists() {
        std::fs::create_dir_all(dir)?;
        created.push(dir.to_path_buf());
    }

    let config_path = dir.join("config.toml");
    if !config_path.exists() {
        std::fs::write(&config_path, AppConfig::default_toml())?;
        created.push(config_path.clone());
    }

    let key_name = AppConfig::load_from(&config_path)?.api_key_name;

    let secrets_path = dir.join("secrets.toml");
    if !secrets_path.exists() {
        std::fs::write(&secrets_path, secrets_template(&key_name))?;
        restrict_permissions(&secrets_path)?;
        created.push(secrets_path);
    }

    Ok((created, key_name))
}

#[cfg(unix)]
fn restrict_permissions(path: &Path) -> std::io::Result<()> {
    use std::os::unix::fs::PermissionsExt;
    std::fs::set_permissions(path, std::fs::Permissions::from_mode(0o600))
}

#[cfg(not(unix))]
fn restrict_permissions(_path: &Path) -> std::io::Result<()> {
    Ok(())
}
