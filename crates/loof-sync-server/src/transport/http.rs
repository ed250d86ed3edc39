//! HTTP transport: the `/api/loof-sync` lookup endpoint and `/health`.
//!
//! The endpoint validates the chip number itself and only then calls the
//! registry client. Every outcome, including a crashed lookup task, leaves as
//! a `{success, data | error}` JSON body.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    extract::{RawQuery, State},
    http::StatusCode,
    response::{IntoResponse, Json as AxumJson, Response},
    routing::get,
    Router,
};
use tokio::task::JoinError;
use tower_http::cors::{Any, CorsLayer};

use loof_sync::{ChipId, LookupOutcome, RegistryClient};

use crate::types::{
    ServerError, ServerResult, INVALID_CHIP_MESSAGE, MISSING_CHIP_MESSAGE, SERVER_ERROR_MESSAGE,
};

/// Shared server state passed to all handlers via axum State.
pub struct ServerState {
    pub client: RegistryClient,
}

/// Build the axum Router with all endpoints.
pub fn router(client: RegistryClient) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/api/loof-sync", get(handle_sync))
        .route("/health", get(handle_health))
        .layer(cors)
        .with_state(Arc::new(ServerState { client }))
}

/// HTTP transport serving the lookup endpoint.
pub struct HttpTransport {
    client: RegistryClient,
}

impl HttpTransport {
    pub fn new(client: RegistryClient) -> Self {
        Self { client }
    }

    /// Run the HTTP server on the given address until it fails.
    pub async fn run(&self, addr: &str) -> ServerResult<()> {
        let socket: SocketAddr = addr.parse().map_err(|e: std::net::AddrParseError| {
            ServerError::InvalidAddr {
                addr: addr.to_string(),
                reason: e.to_string(),
            }
        })?;

        let listener = tokio::net::TcpListener::bind(socket).await?;
        tracing::info!(
            registry = %self.client.search_url(),
            "HTTP transport listening on http://{socket}"
        );

        axum::serve(listener, router(self.client.clone()))
            .await
            .map_err(|e| ServerError::Transport(e.to_string()))?;

        Ok(())
    }
}

/// First `puce` value of the query string, percent-decoded.
///
/// Repeated or unknown parameters are tolerated so that every request still
/// gets a JSON answer.
pub fn chip_param(query: Option<&str>) -> Option<String> {
    url::form_urlencoded::parse(query.unwrap_or_default().as_bytes())
        .find(|(key, _)| key == "puce")
        .map(|(_, value)| value.into_owned())
}

async fn handle_sync(
    State(state): State<Arc<ServerState>>,
    RawQuery(query): RawQuery,
) -> Response {
    let raw = match chip_param(query.as_deref()) {
        Some(raw) if !raw.is_empty() => raw,
        _ => return reject(StatusCode::BAD_REQUEST, MISSING_CHIP_MESSAGE),
    };

    let chip = match ChipId::parse(&raw) {
        Ok(chip) => chip,
        Err(e) => {
            tracing::debug!(puce = %raw, "rejected chip number: {e}");
            return reject(StatusCode::BAD_REQUEST, INVALID_CHIP_MESSAGE);
        }
    };

    // Spawned so that a panicking lookup surfaces as a JoinError, not a
    // dropped connection.
    let client = state.client.clone();
    let task = tokio::spawn(async move { client.lookup(chip.as_str()).await });

    outcome_response(task.await)
}

/// 200 with the lookup outcome, or 500 when the lookup task died.
fn outcome_response(result: Result<LookupOutcome, JoinError>) -> Response {
    match result {
        Ok(outcome) => (StatusCode::OK, AxumJson(outcome)).into_response(),
        Err(e) => {
            tracing::error!("lookup task failed: {e}");
            reject(StatusCode::INTERNAL_SERVER_ERROR, SERVER_ERROR_MESSAGE)
        }
    }
}

/// Health check endpoint.
async fn handle_health() -> AxumJson<serde_json::Value> {
    AxumJson(serde_json::json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

fn reject(status: StatusCode, message: &str) -> Response {
    (status, AxumJson(LookupOutcome::failed(message))).into_response()
}
