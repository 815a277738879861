//! Channel resolver for the Kick public API
//!
//! Resolves a channel slug to its current playback manifest URL plus the
//! live metadata the player needs (stream start time, title, viewers).
//! The upstream JSON is validated through a narrow typed schema instead of
//! ad hoc optional chaining; see [`types`].

pub mod types;

use std::sync::LazyLock;
use std::time::Duration;

use chrono::{DateTime, NaiveDateTime, Utc};
use reqwest::Client;
use url::Url;

use crate::config::ResolverConfig;
use crate::error::{Error, Result};
use types::ChannelResponse;

const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) \
                          AppleWebKit/537.36 (KHTML, like Gecko) \
                          Chrome/122.0.0.0 Safari/537.36";

/// Shared HTTP client for all resolver requests (connection pooling)
static SHARED_CLIENT: LazyLock<Client> = LazyLock::new(|| {
    Client::builder()
        .user_agent(USER_AGENT)
        .connect_timeout(Duration::from_secs(10))
        .timeout(Duration::from_secs(30))
        .pool_max_idle_per_host(10)
        .build()
        .expect("Failed to build resolver shared HTTP client")
});

/// Resolved channel metadata consumed by the HTTP layer and the player.
#[derive(Debug, Clone)]
pub struct ChannelInfo {
    pub slug: String,
    pub display_name: String,
    pub is_live: bool,
    /// Absolute manifest URL, absent when the channel is offline.
    pub playback_url: Option<Url>,
    pub title: String,
    pub category: String,
    pub viewers: u64,
    pub thumbnail: Option<String>,
    /// Wall-clock broadcast start, absent for channels with unknown start.
    pub start_time: Option<DateTime<Utc>>,
}

/// Channel resolver against the Kick public API
pub struct ChannelResolver {
    client: Client,
    api_base: String,
}

impl ChannelResolver {
    #[must_use]
    pub fn new(config: &ResolverConfig) -> Self {
        Self {
            client: SHARED_CLIENT.clone(),
            api_base: config.api_base.trim_end_matches('/').to_string(),
        }
    }

    /// Resolve a channel slug to its playback metadata.
    ///
    /// Fresh lookup on every call; playback URLs rotate, so responses must
    /// never be served from a cache.
    pub async fn resolve(&self, slug: &str) -> Result<ChannelInfo> {
        if slug.is_empty() {
            return Err(Error::MissingParameter("channel".to_string()));
        }

        let url = format!("{}/channels/{}", self.api_base, slug);
        tracing::debug!(%slug, "Resolving channel");

        let response = self
            .client
            .get(&url)
            .header("Cache-Control", "no-store")
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(Error::Upstream {
                status: status.as_u16(),
                message: format!("Channel lookup failed: {status}"),
            });
        }

        let raw: ChannelResponse = response.json().await?;
        Ok(channel_info_from_response(slug, raw))
    }
}

fn channel_info_from_response(slug: &str, raw: ChannelResponse) -> ChannelInfo {
    let live = raw.livestream.as_ref();

    let playback_url = raw
        .playback_url
        .as_deref()
        .and_then(|u| Url::parse(u).ok());

    let title = live
        .and_then(|l| l.session_title.clone())
        .or_else(|| {
            raw.previous_livestreams
                .first()
                .and_then(|p| p.session_title.clone())
        })
        .unwrap_or_default();

    let category = live
        .and_then(|l| l.categories.first().and_then(|c| c.name.clone()))
        .or_else(|| {
            raw.recent_categories
                .first()
                .and_then(|c| c.name.clone())
        })
        .unwrap_or_else(|| "Just Chatting".to_string());

    let thumbnail = live
        .and_then(|l| l.thumbnail.as_ref().and_then(|t| t.url.clone()))
        .or_else(|| raw.user.as_ref().and_then(|u| u.profile_pic.clone()));

    // Start time falls back from start_time to created_at; both may be
    // missing, in which case the elapsed-stream clock stays off.
    let start_time = live
        .and_then(|l| l.start_time.as_deref().or(l.created_at.as_deref()))
        .and_then(parse_timestamp);

    ChannelInfo {
        slug: raw.slug.unwrap_or_else(|| slug.to_string()),
        display_name: raw
            .user
            .and_then(|u| u.username)
            .unwrap_or_else(|| slug.to_string()),
        is_live: live.is_some_and(|l| l.is_live),
        playback_url,
        title,
        category,
        viewers: live.map_or(0, |l| l.viewer_count),
        thumbnail,
        start_time,
    }
}

/// Parse the API's timestamp formats (RFC 3339 or `YYYY-MM-DD HH:MM:SS` UTC).
fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S")
        .ok()
        .map(|naive| naive.and_utc())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn offline_response() -> ChannelResponse {
        serde_json::from_str(r#"{"slug": "chan", "playback_url": null}"#).expect("valid")
    }

    #[test]
    fn test_offline_channel_maps_to_absent_playback() {
        let info = channel_info_from_response("chan", offline_response());

        assert!(!info.is_live);
        assert!(info.playback_url.is_none());
        assert!(info.start_time.is_none());
        assert_eq!(info.category, "Just Chatting");
    }

    #[test]
    fn test_start_time_fallback_to_created_at() {
        let raw: ChannelResponse = serde_json::from_str(
            r#"{
                "slug": "chan",
                "playback_url": "https://cdn.example/live/chan/index.m3u8",
                "livestream": {
                    "is_live": true,
                    "start_time": null,
                    "created_at": "2026-08-30 10:15:00"
                }
            }"#,
        )
        .expect("valid");

        let info = channel_info_from_response("chan", raw);
        assert!(info.is_live);
        let start = info.start_time.expect("created_at fallback");
        assert_eq!(start.to_rfc3339(), "2026-08-30T10:15:00+00:00");
    }

    #[test]
    fn test_invalid_playback_url_is_none() {
        let raw: ChannelResponse =
            serde_json::from_str(r#"{"slug": "chan", "playback_url": "not a url"}"#)
                .expect("valid");

        let info = channel_info_from_response("chan", raw);
        assert!(info.playback_url.is_none());
    }

    #[test]
    fn test_parse_timestamp_formats() {
        assert!(parse_timestamp("2026-08-30T10:15:00Z").is_some());
        assert!(parse_timestamp("2026-08-30 10:15:00").is_some());
        assert!(parse_timestamp("yesterday").is_none());
    }
}
