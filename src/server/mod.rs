//! # Search Endpoint
//!
//! `POST /api/search` answers a semantic search question with the configured
//! provider, keeping the API key on the server. The TUI's remote backend
//! talks to this.
//!
//! ```text
//! {query, context} ──► validate ──► provider.search() ──► {explanation, verseIds}
//!                         │                 │
//!                         ▼                 ▼
//!                   400 {error}        500 {error}
//! ```

use std::fmt;
use std::sync::Arc;

use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::post;
use axum::{Json, Router};
use log::{error, info, warn};
use serde_json::json;

use crate::core::config::ResolvedConfig;
use crate::inference::{SearchProvider, SearchRequest, build_gemini};

const MISSING_FIELDS: &str = "Missing query or context";
const MISSING_KEY: &str = "Server missing API key configuration.";

#[derive(Clone)]
pub struct ServerState {
    provider: Option<Arc<dyn SearchProvider>>,
}

#[derive(Debug)]
pub enum ServerError {
    Bind { addr: String, source: std::io::Error },
    Serve(std::io::Error),
}

impl fmt::Display for ServerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ServerError::Bind { addr, source } => write!(f, "failed to bind {addr}: {source}"),
            ServerError::Serve(e) => write!(f, "server error: {e}"),
        }
    }
}

impl std::error::Error for ServerError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ServerError::Bind { source, .. } => Some(source),
            ServerError::Serve(e) => Some(e),
        }
    }
}

fn error_response(status: StatusCode, message: &str) -> Response {
    (status, Json(json!({ "error": message }))).into_response()
}

async fn method_not_allowed() -> Response {
    error_response(StatusCode::METHOD_NOT_ALLOWED, "Method Not Allowed")
}

async fn search(
    State(state): State<ServerState>,
    payload: Result<Json<SearchRequest>, JsonRejection>,
) -> Response {
    let request = match payload {
        Ok(Json(request))
            if !request.query.trim().is_empty() && !request.context.trim().is_empty() =>
        {
            request
        }
        Ok(_) => return error_response(StatusCode::BAD_REQUEST, MISSING_FIELDS),
        Err(rejection) => {
            warn!("Rejected search body: {}", rejection);
            return error_response(StatusCode::BAD_REQUEST, MISSING_FIELDS);
        }
    };

    let Some(provider) = state.provider else {
        error!("Server configuration error: Missing GEMINI_API_KEY");
        return error_response(StatusCode::INTERNAL_SERVER_ERROR, MISSING_KEY);
    };

    info!("Search via {}: {:?}", provider.name(), request.query);
    match provider.search(&request).await {
        Ok(answer) => (StatusCode::OK, Json(answer)).into_response(),
        Err(e) => {
            error!("Search failed: {}", e);
            error_response(StatusCode::INTERNAL_SERVER_ERROR, &e.to_string())
        }
    }
}

/// Router with the single search route. Any method other than POST gets 405.
pub fn router(provider: Option<Arc<dyn SearchProvider>>) -> Router {
    Router::new()
        .route("/api/search", post(search).fallback(method_not_allowed))
        .with_state(ServerState { provider })
}

/// Bind and serve until the process is stopped. The endpoint always uses the
/// Gemini provider; pointing it at another remote endpoint would loop.
pub async fn serve(config: &ResolvedConfig) -> Result<(), ServerError> {
    let provider = build_gemini(config);
    if provider.is_none() {
        warn!("GEMINI_API_KEY is not set; /api/search will answer 500");
    }

    let listener = tokio::net::TcpListener::bind(&config.bind)
        .await
        .map_err(|source| ServerError::Bind {
            addr: config.bind.clone(),
            source,
        })?;
    info!("Listening on http://{}/api/search", config.bind);

    axum::serve(listener, router(provider))
        .await
        .map_err(ServerError::Serve)
}
