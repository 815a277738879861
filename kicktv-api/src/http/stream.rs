//! Stream resolution HTTP endpoint
//!
//! `GET /api/stream?channel=<slug>` — resolves a channel to a
//! relay-wrapped manifest URL the player can open directly.

use axum::{
    extract::{Query, State},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::http::error::{AppError, AppResult};
use crate::http::proxy::PROXY_ENDPOINT;
use crate::http::AppState;

#[derive(Debug, Deserialize)]
pub struct StreamQuery {
    pub channel: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StreamResponse {
    /// Relay-wrapped manifest URL for the player.
    pub url: String,
    pub is_live: bool,
    /// ISO-8601 broadcast start, absent when unknown.
    pub start_time: Option<String>,
    pub display_name: String,
    pub title: String,
    pub category: String,
    pub viewers: u64,
    pub thumbnail: Option<String>,
}

/// GET /api/stream - Resolve a channel to a proxied playback URL
pub async fn get_stream(
    State(state): State<AppState>,
    Query(query): Query<StreamQuery>,
) -> AppResult<Json<StreamResponse>> {
    let slug = query
        .channel
        .ok_or_else(|| AppError::bad_request("Missing channel parameter"))?;

    let info = state.resolver.resolve(&slug).await?;

    // Wrap the manifest URL in the relay so the client never hits the
    // origin (and its CORS policy) directly.
    let playback_url = info
        .playback_url
        .as_ref()
        .ok_or_else(|| AppError::not_found("Channel is offline"))?;
    let url = kicktv_proxy::wrap_url(PROXY_ENDPOINT, playback_url);

    Ok(Json(StreamResponse {
        url,
        is_live: info.is_live,
        start_time: info.start_time.map(|t| t.to_rfc3339()),
        display_name: info.display_name,
        title: info.title,
        category: info.category,
        viewers: info.viewers,
        thumbnail: info.thumbnail,
    }))
}
