//! Manifest relay HTTP endpoint
//!
//! `GET /proxy?url=<absolute URL>` — relays playlists (rewritten) and
//! segments so the web client never talks to the origin CDN directly.

use axum::{
    body::Body,
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Deserialize;
use url::Url;

use crate::http::error::{AppError, AppResult};
use crate::http::AppState;
use kicktv_proxy::RelayOutcome;

/// Path the relay wraps nested playlist references with.
pub const PROXY_ENDPOINT: &str = "/proxy";

/// Manifests mutate continuously while live; clients must not cache them.
const PLAYLIST_CACHE_CONTROL: &str = "no-store, no-cache, must-revalidate, proxy-revalidate";

#[derive(Debug, Deserialize)]
pub struct ProxyQuery {
    pub url: Option<String>,
}

/// GET /proxy - Relay a playlist or segment from the origin
pub async fn proxy_fetch(
    State(state): State<AppState>,
    Query(query): Query<ProxyQuery>,
) -> AppResult<Response> {
    // Reject before any upstream call is made.
    let raw = query
        .url
        .ok_or_else(|| AppError::bad_request("Missing url parameter"))?;

    let target = Url::parse(&raw).map_err(|_| AppError::bad_request("Invalid url parameter"))?;
    if !matches!(target.scheme(), "http" | "https") {
        return Err(AppError::bad_request("Invalid url parameter"));
    }

    let outcome = state.relay.fetch_and_relay(&target, PROXY_ENDPOINT).await?;

    let response = match outcome {
        RelayOutcome::Playlist { body } => Response::builder()
            .status(StatusCode::OK)
            .header("Content-Type", "application/vnd.apple.mpegurl")
            .header("Cache-Control", PLAYLIST_CACHE_CONTROL)
            .body(Body::from(body)),
        RelayOutcome::Opaque { body, content_type } => Response::builder()
            .status(StatusCode::OK)
            .header("Content-Type", content_type)
            // Segments are immutable once published, safe to cache.
            .header(
                "Cache-Control",
                format!("public, max-age={}", state.config.relay.segment_cache_seconds),
            )
            .body(Body::from(body)),
    };

    response.map_err(|e| {
        tracing::error!("Failed to build relay response: {e}");
        AppError::internal_server_error("Internal Server Error")
    })
}

/// OPTIONS /proxy - CORS preflight
pub async fn proxy_options_preflight() -> impl IntoResponse {
    StatusCode::NO_CONTENT
}
