//! HTTP gateway for MindcareAI.
//!
//! Serves the embedded single-page UI plus a small JSON API over one shared
//! [`MindcareApp`]. The server keeps no conversation state: clients send the
//! full transcript with every chat request.

pub mod api_v1;
pub mod frontend;

use axum::extract::DefaultBodyLimit;
use axum::http::{HeaderValue, Method, header, request::Parts};
use axum::{Router, extract::State, response::Json, routing::get};
use mindcare_agent::MindcareApp;
use mindcare_config::AppConfig;
use serde::Serialize;
use std::sync::Arc;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tracing::{info, warn};

/// Shared state handed to every handler.
pub struct GatewayState {
    pub app: MindcareApp,
}

pub type SharedState = Arc<GatewayState>;

#[derive(Debug, thiserror::Error)]
pub enum GatewayError {
    #[error(
        "refusing to bind to non-loopback host '{0}'; set gateway.allow_public_bind = true to expose MindcareAI publicly"
    )]
    PublicBindRefused(String),

    #[error("server I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Build the full router: health, embedded frontend and the v1 API.
///
/// Layers applied:
/// - CORS limited to localhost origins
/// - Request body size limit (1 MB)
/// - HTTP trace logging
pub fn build_router(state: SharedState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(AllowOrigin::predicate(is_local_origin))
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([header::CONTENT_TYPE])
        .max_age(std::time::Duration::from_secs(3600));

    Router::new()
        .route("/health", get(health_handler))
        .with_state(state.clone())
        .nest("/v1", api_v1::v1_router(state))
        .merge(frontend::frontend_router())
        .layer(DefaultBodyLimit::max(1024 * 1024))
        .layer(cors)
        .layer(tower_http::trace::TraceLayer::new_for_http())
}

fn is_local_origin(origin: &HeaderValue, _parts: &Parts) -> bool {
    origin.to_str().is_ok_and(is_local_origin_str)
}

/// `scheme://host[:port]` where host is localhost, 127.0.0.1 or `[::1]`.
fn is_local_origin_str(origin: &str) -> bool {
    let Some(authority) = origin
        .strip_prefix("http://")
        .or_else(|| origin.strip_prefix("https://"))
    else {
        return false;
    };
    // A bracketed IPv6 host may itself contain colons; the port follows `]`.
    let host = match authority.find(']') {
        Some(end) => {
            let (host, rest) = authority.split_at(end + 1);
            if !(rest.is_empty() || rest.starts_with(':')) {
                return false;
            }
            host
        }
        None => authority.rsplit_once(':').map_or(authority, |(h, _)| h),
    };
    matches!(host, "localhost" | "127.0.0.1" | "[::1]")
}

/// `host:port`, bracketing bare IPv6 hosts so the result parses as a socket address.
fn bind_addr(host: &str, port: u16) -> String {
    if host.contains(':') && !host.starts_with('[') {
        format!("[{host}]:{port}")
    } else {
        format!("{host}:{port}")
    }
}

/// Start the gateway HTTP server and serve until the process exits.
pub async fn start(config: &AppConfig, app: MindcareApp) -> Result<(), GatewayError> {
    let host = config.gateway.host.clone();
    let port = config.gateway.port;

    if !config.gateway.is_loopback() {
        if !config.gateway.allow_public_bind {
            return Err(GatewayError::PublicBindRefused(host));
        }
        warn!(host = %host, "Binding to a public interface");
    }

    let addr = bind_addr(&host, port);
    let ready = app.is_ready();
    let router = build_router(Arc::new(GatewayState { app }));

    info!(addr = %addr, ready, "Gateway starting");
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, router).await?;

    Ok(())
}

// --- Handlers ---

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    version: &'static str,
    ready: bool,
}

async fn health_handler(State(state): State<SharedState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
        ready: state.app.is_ready(),
    })
}
