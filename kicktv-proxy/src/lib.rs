//! Manifest relay
//!
//! Stateless per-request proxy for HLS playlists. Fetches a playlist or
//! segment by URL with the headers the streaming platform requires, and
//! when the content is a playlist, rewrites it so nested playlists route
//! back through the relay while media segments go direct to the CDN (only
//! small text manifests transit the relay; bulk media bypasses it).

pub mod rewrite;

use std::sync::LazyLock;
use std::time::Duration;

use bytes::Bytes;
use kicktv_core::config::RelayConfig;
use kicktv_core::{Error, Result};
use reqwest::Client;
use url::Url;

pub use rewrite::{is_nested_playlist, rewrite_playlist, wrap_url};

/// Shared HTTP client for all relay fetches (connection pooling)
static SHARED_CLIENT: LazyLock<Client> = LazyLock::new(|| {
    Client::builder()
        .connect_timeout(Duration::from_secs(10))
        .pool_max_idle_per_host(10)
        .build()
        .expect("Failed to build relay shared HTTP client")
});

/// What the relay hands back to the HTTP layer.
#[derive(Debug)]
pub enum RelayOutcome {
    /// A rewritten playlist; served as mpegurl with caching disabled.
    Playlist { body: String },
    /// Opaque bytes (segments, keys); origin content type preserved.
    Opaque { body: Bytes, content_type: String },
}

/// Stateless relay: one outbound fetch per call, no shared mutable state.
pub struct ManifestRelay {
    client: Client,
    config: RelayConfig,
}

impl ManifestRelay {
    #[must_use]
    pub fn new(config: RelayConfig) -> Self {
        Self {
            client: SHARED_CLIENT.clone(),
            config,
        }
    }

    /// Fetch `target` and rewrite it when it is a playlist.
    ///
    /// `proxy_base` is the relay's own endpoint path, used for wrapped
    /// references. Upstream non-success propagates as
    /// [`Error::Upstream`] with the same status; the relay never retries.
    pub async fn fetch_and_relay(&self, target: &Url, proxy_base: &str) -> Result<RelayOutcome> {
        tracing::debug!(url = %target, "Relay fetching");

        let response = self
            .client
            .get(target.clone())
            .header("User-Agent", &self.config.user_agent)
            .header("Origin", &self.config.origin)
            .header("Referer", &self.config.referer)
            .timeout(Duration::from_secs(self.config.upstream_timeout_seconds))
            .send()
            .await?;

        let status = response.status();
        tracing::debug!(url = %target, %status, "Relay upstream status");

        if !status.is_success() {
            return Err(Error::Upstream {
                status: status.as_u16(),
                message: format!(
                    "Failed to fetch: {}",
                    status.canonical_reason().unwrap_or("upstream error")
                ),
            });
        }

        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
            .to_string();

        if is_playlist(&content_type, target) {
            let text = response.text().await?;
            let body = rewrite_playlist(&text, target, proxy_base);
            Ok(RelayOutcome::Playlist { body })
        } else {
            let body = response.bytes().await?;
            let content_type = if content_type.is_empty() {
                "application/octet-stream".to_string()
            } else {
                content_type
            };
            Ok(RelayOutcome::Opaque { body, content_type })
        }
    }
}

/// Whether a response is a playlist.
///
/// Deliberately permissive: either the declared content type or the URL
/// suffix suffices, because origins are inconsistent about content-type
/// headers on manifests.
#[must_use]
pub fn is_playlist(content_type: &str, url: &Url) -> bool {
    content_type.to_ascii_lowercase().contains("mpegurl") || url.path().ends_with(".m3u8")
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn relay() -> ManifestRelay {
        ManifestRelay::new(RelayConfig::default())
    }

    #[test]
    fn test_is_playlist_permissive() {
        let manifest_url = Url::parse("https://cdn.example/live/index.m3u8").expect("valid");
        let segment_url = Url::parse("https://cdn.example/live/seg1.ts").expect("valid");

        // Either signal suffices.
        assert!(is_playlist("application/vnd.apple.mpegurl", &segment_url));
        assert!(is_playlist("audio/MPEGURL", &segment_url));
        assert!(is_playlist("text/plain", &manifest_url));
        assert!(!is_playlist("video/mp2t", &segment_url));
    }

    #[tokio::test]
    async fn test_playlist_fetch_sends_platform_headers() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/live/index.m3u8"))
            .and(header("Origin", "https://kick.com"))
            .and(header("Referer", "https://kick.com/"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_raw("#EXTM3U\nchunk/720p.m3u8", "application/vnd.apple.mpegurl"),
            )
            .mount(&server)
            .await;

        let target = Url::parse(&format!("{}/live/index.m3u8", server.uri())).expect("valid");
        let outcome = relay()
            .fetch_and_relay(&target, "/proxy")
            .await
            .expect("fetch succeeds");

        match outcome {
            RelayOutcome::Playlist { body } => {
                let lines: Vec<&str> = body.split('\n').collect();
                assert_eq!(lines[0], "#EXTM3U");
                assert!(lines[1].starts_with("/proxy?url="));
                assert!(lines[1].contains("720p.m3u8"));
            }
            RelayOutcome::Opaque { .. } => panic!("expected playlist classification"),
        }
    }

    #[tokio::test]
    async fn test_segment_returned_opaque() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/live/seg1.ts"))
            .respond_with(
                ResponseTemplate::new(200).set_body_raw(vec![0u8, 1, 2, 3], "video/mp2t"),
            )
            .mount(&server)
            .await;

        let target = Url::parse(&format!("{}/live/seg1.ts", server.uri())).expect("valid");
        let outcome = relay()
            .fetch_and_relay(&target, "/proxy")
            .await
            .expect("fetch succeeds");

        match outcome {
            RelayOutcome::Opaque { body, content_type } => {
                assert_eq!(&body[..], &[0u8, 1, 2, 3]);
                assert_eq!(content_type, "video/mp2t");
            }
            RelayOutcome::Playlist { .. } => panic!("expected opaque passthrough"),
        }
    }

    #[tokio::test]
    async fn test_upstream_error_propagates_status() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/live/index.m3u8"))
            .respond_with(ResponseTemplate::new(403))
            .mount(&server)
            .await;

        let target = Url::parse(&format!("{}/live/index.m3u8", server.uri())).expect("valid");
        let err = relay()
            .fetch_and_relay(&target, "/proxy")
            .await
            .expect_err("403 relayed");

        assert_eq!(err.upstream_status(), Some(403));
    }
}
