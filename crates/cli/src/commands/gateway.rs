//! `mindcare gateway`: start the web UI and HTTP API.

use mindcare_agent::persona;

pub async fn run(port_override: Option<u16>) -> Result<(), Box<dyn std::error::Error>> {
    let (mut config, app) = super::load_app()?;

    if let Some(port) = port_override {
        config.gateway.port = port;
    }

    println!("{} Gateway", persona::APP_TITLE);
    println!("   Listening: http://{}:{}", config.gateway.host, config.gateway.port);
    match app.status().reason {
        None => println!("   Status:    ready"),
        Some(reason) => println!("   Status:    degraded ({reason})"),
    }

    mindcare_gateway::start(&config, app).await?;

    Ok(())
}
