//! HTTP server for the set-color endpoint.
//!
//! - `/api/set-color`: OPTIONS pre-flight, POST updates the color, anything else is 405
//! - `/health`: liveness
//!
//! A POST runs Authenticate -> Validate -> Fetch -> Mutate -> Commit -> Respond,
//! and the first failing stage short-circuits to an error response.

use anyhow::Result;
use axum::{
    Json, Router,
    body::Bytes,
    extract::State,
    http::{
        HeaderMap, HeaderValue, Method, StatusCode,
        header::{
            ACCESS_CONTROL_ALLOW_HEADERS, ACCESS_CONTROL_ALLOW_METHODS,
            ACCESS_CONTROL_ALLOW_ORIGIN, AUTHORIZATION,
        },
    },
    response::{IntoResponse, Response},
    routing::{any, get},
};
use reqwest::Client;
use serde::Serialize;
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::{set_header::SetResponseHeaderLayer, trace::TraceLayer};
use tracing::{debug, info, warn};

use crate::backend::{self, Commit, FileLocation};
use crate::config::Config;
use crate::error::SetColorError;
use crate::{auth, document, request};

/// Shared across handlers; read-only after startup.
pub struct AppState {
    pub config: Config,
    pub http: Client,
}

impl AppState {
    pub fn new(config: Config) -> Result<Self> {
        let http = Client::builder()
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self { config, http })
    }
}

pub fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/api/set-color", any(set_color_handler))
        .route("/health", get(health_handler))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(SetResponseHeaderLayer::overriding(
                    ACCESS_CONTROL_ALLOW_ORIGIN,
                    HeaderValue::from_static("*"),
                ))
                .layer(SetResponseHeaderLayer::overriding(
                    ACCESS_CONTROL_ALLOW_HEADERS,
                    HeaderValue::from_static("Content-Type, Authorization"),
                ))
                .layer(SetResponseHeaderLayer::overriding(
                    ACCESS_CONTROL_ALLOW_METHODS,
                    HeaderValue::from_static("POST, OPTIONS"),
                )),
        )
        .with_state(state)
}

pub async fn run_server(state: Arc<AppState>, addr: &str) -> Result<()> {
    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("palette-push listening on {addr}");

    axum::serve(listener, app).await?;

    Ok(())
}

// ============================================================================
// Handlers
// ============================================================================

#[derive(Debug, Serialize)]
struct HealthResponse {
    status: &'static str,
    version: &'static str,
}

#[derive(Debug, Serialize)]
struct SetColorResponse {
    ok: bool,
    color: String,
}

async fn health_handler() -> impl IntoResponse {
    Json(HealthResponse {
        status: "healthy",
        version: env!("CARGO_PKG_VERSION"),
    })
}

async fn set_color_handler(
    State(state): State<Arc<AppState>>,
    method: Method,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    // pre-flight skips auth entirely
    if method == Method::OPTIONS {
        return StatusCode::NO_CONTENT.into_response();
    }

    match set_color(&state, &method, &headers, &body).await {
        Ok(color) => (StatusCode::OK, Json(SetColorResponse { ok: true, color })).into_response(),
        Err(err) => {
            warn!(status = %err.status(), error = %err, "set-color request rejected");
            err.into_response()
        }
    }
}

async fn set_color(
    state: &AppState,
    method: &Method,
    headers: &HeaderMap,
    body: &[u8],
) -> Result<String, SetColorError> {
    if method != Method::POST {
        return Err(SetColorError::MethodNotAllowed);
    }

    let config = &state.config;
    let authorization = headers.get(AUTHORIZATION).and_then(|v| v.to_str().ok());
    auth::authorize(authorization, config.admin_secret.as_deref())?;

    let color = request::parse_color(body)?;
    let location = FileLocation::resolve(config.backend, &config.repo)?;

    let mut file = backend::fetch(config.backend, &state.http, &location).await?;
    debug!(
        field = %config.target,
        previous = ?config.target.current(&file.document),
        "Fetched config document"
    );
    config.target.apply(&mut file.document, &color);

    let commit = Commit {
        content: document::encode_content(&file.document)?,
        message: format!("chore: set {} to {}", config.target, color),
        sha: file.sha.as_deref(),
    };
    backend::commit(config.backend, &state.http, &location, &commit).await?;

    info!(
        backend = %config.backend,
        file = location.file_path,
        branch = location.branch,
        field = %config.target,
        %color,
        "Committed color update"
    );
    Ok(color)
}

// ============================================================================
// Tests
// ============================================================================
