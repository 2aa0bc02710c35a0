//! The user-facing HTTP server.
//!
//! Exposes `POST /process-image` (multipart: `image` file, optional `prompt`)
//! and `GET /health`, wrapped in CORS and request tracing layers.

mod error;
mod routes;

use anyhow::Context;
use axum::extract::DefaultBodyLimit;
use axum::http::HeaderValue;
use axum::routing::{get, post};
use axum::Router;
use glimpse_core::config::ServerConfig;
use glimpse_core::Relay;
use std::sync::Arc;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;

/// Room for multipart boundaries and part headers.
const FORM_OVERHEAD_BYTES: u64 = 64 * 1024;

/// Application state shared across routes.
#[derive(Clone)]
pub struct AppState {
    pub relay: Arc<Relay>,
}

impl AppState {
    pub fn new(relay: Relay) -> Self {
        Self {
            relay: Arc::new(relay),
        }
    }
}

/// Build the application router.
pub fn router(state: AppState, server: &ServerConfig) -> anyhow::Result<Router> {
    let body_limit = state
        .relay
        .max_upload_bytes()
        .saturating_add(state.relay.max_prompt_bytes())
        .saturating_add(FORM_OVERHEAD_BYTES);

    Ok(Router::new()
        .route("/process-image", post(routes::process_image))
        .route("/health", get(routes::health))
        .layer(DefaultBodyLimit::max(body_limit as usize))
        .layer(cors_layer(&server.allowed_origins)?)
        .layer(TraceLayer::new_for_http())
        .with_state(state))
}

/// CORS policy from `server.allowed_origins`; `"*"` allows any origin.
fn cors_layer(origins: &[String]) -> anyhow::Result<CorsLayer> {
    let allow_origin = if origins.is_empty() || origins.iter().any(|o| o == "*") {
        AllowOrigin::from(Any)
    } else {
        let values = origins
            .iter()
            .map(|o| {
                HeaderValue::from_str(o).with_context(|| format!("Invalid CORS origin: {o}"))
            })
            .collect::<anyhow::Result<Vec<_>>>()?;
        AllowOrigin::list(values)
    };

    Ok(CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_methods(Any)
        .allow_headers(Any))
}
