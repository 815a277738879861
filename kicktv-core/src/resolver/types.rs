//! Raw Kick API response schema
//!
//! Narrow view of `GET /api/v1/channels/{slug}` — only the fields the
//! resolver consumes are modeled; everything else is ignored on
//! deserialization. All fields are optional so a partial payload never
//! fails the whole lookup; absence is handled as typed `None` downstream.

use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct ChannelResponse {
    pub slug: Option<String>,
    pub playback_url: Option<String>,
    pub user: Option<ChannelUser>,
    pub livestream: Option<Livestream>,
    #[serde(default)]
    pub recent_categories: Vec<Category>,
    #[serde(default)]
    pub previous_livestreams: Vec<PreviousLivestream>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChannelUser {
    pub username: Option<String>,
    pub profile_pic: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Livestream {
    #[serde(default)]
    pub is_live: bool,
    pub session_title: Option<String>,
    #[serde(default)]
    pub viewer_count: u64,
    pub start_time: Option<String>,
    pub created_at: Option<String>,
    pub thumbnail: Option<Thumbnail>,
    #[serde(default)]
    pub categories: Vec<Category>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Thumbnail {
    pub url: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Category {
    pub name: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PreviousLivestream {
    pub session_title: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_live_channel() {
        let json = r#"{
            "slug": "examplechan",
            "playback_url": "https://cdn.example/live/chan/index.m3u8",
            "user": {"username": "Example", "profile_pic": null, "bio": "x"},
            "livestream": {
                "is_live": true,
                "session_title": "hello",
                "viewer_count": 42,
                "start_time": "2026-08-30 12:00:00",
                "created_at": "2026-08-30 11:59:58",
                "thumbnail": {"url": "https://img.example/t.jpg"},
                "categories": [{"name": "Just Chatting", "id": 1}]
            },
            "unmodeled_field": {"deeply": ["nested"]}
        }"#;

        let resp: ChannelResponse = serde_json::from_str(json).expect("valid schema");
        assert_eq!(resp.slug.as_deref(), Some("examplechan"));
        let live = resp.livestream.expect("livestream present");
        assert!(live.is_live);
        assert_eq!(live.viewer_count, 42);
        assert_eq!(live.categories[0].name.as_deref(), Some("Just Chatting"));
    }

    #[test]
    fn test_deserialize_offline_channel() {
        let json = r#"{"slug": "offline", "playback_url": null, "livestream": null}"#;

        let resp: ChannelResponse = serde_json::from_str(json).expect("valid schema");
        assert!(resp.livestream.is_none());
        assert!(resp.playback_url.is_none());
        assert!(resp.recent_categories.is_empty());
    }
}
