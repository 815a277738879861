//! M3U8 playlist rewriting
//!
//! Rewrites every URI-reference line of a playlist so nested playlists
//! route back through the relay while media segments resolve to direct CDN
//! URLs. Directive lines (including ones embedding `URI="..."` attributes)
//! pass through untouched, and line order and count are preserved.

use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use url::Url;

/// Characters escaped in a wrapped URL's query value.
///
/// Matches `encodeURIComponent`: everything except alphanumerics and
/// `- _ . ! ~ * ' ( )`.
const QUERY_VALUE: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

/// Whether an absolute URL points at another playlist.
///
/// Suffix-only heuristic; extension-less playlist URLs would be
/// misclassified as segments and served direct.
#[must_use]
pub fn is_nested_playlist(url: &Url) -> bool {
    url.path().ends_with(".m3u8")
}

/// Wrap an absolute URL in a relay reference.
#[must_use]
pub fn wrap_url(proxy_base: &str, url: &Url) -> String {
    format!(
        "{proxy_base}?url={}",
        utf8_percent_encode(url.as_str(), QUERY_VALUE)
    )
}

/// Rewrite a playlist fetched from `source_url`.
///
/// Nested playlists become relay-wrapped references; segments become
/// absolute CDN URLs (bulk media bypasses the relay). A line that fails
/// URL resolution is emitted unchanged; one bad line never corrupts the
/// rest of the manifest.
#[must_use]
pub fn rewrite_playlist(manifest: &str, source_url: &Url, proxy_base: &str) -> String {
    manifest
        .split('\n')
        .map(|raw| {
            let line = raw.strip_suffix('\r').unwrap_or(raw);
            let trimmed = line.trim();

            if trimmed.is_empty() || trimmed.starts_with('#') {
                return line.to_string();
            }

            match source_url.join(trimmed) {
                Ok(absolute) => {
                    if is_nested_playlist(&absolute) {
                        wrap_url(proxy_base, &absolute)
                    } else {
                        absolute.to_string()
                    }
                }
                Err(err) => {
                    tracing::warn!("Failed to resolve playlist line {trimmed:?}: {err}");
                    line.to_string()
                }
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}
