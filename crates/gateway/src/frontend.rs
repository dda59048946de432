//! Embedded static frontend assets.
//!
//! The files under `frontend/` are compiled into the binary with
//! `include_str!`, so the gateway ships as a single executable.

use axum::{
    Router,
    http::{StatusCode, header},
    response::{Html, IntoResponse, Response},
    routing::get,
};

const INDEX_HTML: &str = include_str!("../../../frontend/index.html");
const STYLE_CSS: &str = include_str!("../../../frontend/style.css");
const APP_JS: &str = include_str!("../../../frontend/app.js");

const CSP: &str = "default-src 'self'; style-src 'self'; script-src 'self'; connect-src 'self'";

/// Router serving the chat, mood journal and help page.
pub fn frontend_router() -> Router {
    Router::new()
        .route("/", get(index_handler))
        .route("/static/style.css", get(css_handler))
        .route("/static/app.js", get(js_handler))
}

async fn index_handler() -> Response {
    (
        [(header::CONTENT_SECURITY_POLICY, CSP)],
        Html(INDEX_HTML),
    )
        .into_response()
}

async fn css_handler() -> Response {
    asset("text/css; charset=utf-8", STYLE_CSS)
}

async fn js_handler() -> Response {
    asset("application/javascript; charset=utf-8", APP_JS)
}

fn asset(content_type: &'static str, body: &'static str) -> Response {
    (StatusCode::OK, [(header::CONTENT_TYPE, content_type)], body).into_response()
}
