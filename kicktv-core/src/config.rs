use config::{Config as ConfigBuilder, ConfigError, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
    pub logging: LoggingConfig,
    pub relay: RelayConfig,
    pub resolver: ResolverConfig,
    pub player: PlayerConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub http_port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            http_port: 8080,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub format: String, // "json" or "pretty"
    pub file_path: Option<String>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
            file_path: None,
        }
    }
}

/// Manifest relay configuration
///
/// The origin rejects playlist fetches that do not look like a browser on
/// the platform's own pages, so the relay always sends a browser
/// `User-Agent` plus matching `Origin`/`Referer` headers.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RelayConfig {
    pub user_agent: String,
    pub origin: String,
    pub referer: String,
    pub upstream_timeout_seconds: u64,
    /// Cache lifetime handed to clients for opaque (segment) responses.
    pub segment_cache_seconds: u64,
}

impl Default for RelayConfig {
    fn default() -> Self {
        Self {
            user_agent: "Mozilla/5.0 (Windows NT 10.0; Win64; x64) \
                         AppleWebKit/537.36 (KHTML, like Gecko) \
                         Chrome/122.0.0.0 Safari/537.36"
                .to_string(),
            origin: "https://kick.com".to_string(),
            referer: "https://kick.com/".to_string(),
            upstream_timeout_seconds: 30,
            segment_cache_seconds: 3600,
        }
    }
}

/// Channel resolver configuration (Kick public API)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ResolverConfig {
    pub api_base: String,
    pub timeout_seconds: u64,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            api_base: "https://kick.com/api/v1".to_string(),
            timeout_seconds: 30,
        }
    }
}

/// Playback tracker tunables
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerConfig {
    /// Latency above which the session counts as behind the live edge.
    pub behind_live_threshold_seconds: f64,
    /// Progress fraction above which the scrubber snaps to 1.0.
    pub edge_snap_fraction: f64,
    /// Seconds of inactivity before the idle timeout fires.
    pub idle_timeout_seconds: u64,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            behind_live_threshold_seconds: 10.0,
            edge_snap_fraction: 0.995,
            idle_timeout_seconds: 5,
        }
    }
}

impl Config {
    /// Load configuration from an optional file plus environment overrides.
    pub fn load(config_file: Option<&str>) -> Result<Self, ConfigError> {
        let mut builder = ConfigBuilder::builder();

        if let Some(path) = config_file {
            if Path::new(path).exists() {
                builder = builder.add_source(File::with_name(path));
            }
        }

        // Override with environment variables (KICKTV_SERVER_HOST, etc.)
        builder = builder.add_source(
            Environment::with_prefix("KICKTV")
                .separator("_")
                .try_parsing(true),
        );

        let config = builder.build()?;
        config.try_deserialize()
    }

    /// Load from environment variables only (for Docker/K8s)
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::load(None)
    }

    /// Load from file path
    pub fn from_file(path: &str) -> Result<Self, ConfigError> {
        Self::load(Some(path))
    }

    /// Get HTTP listen address
    #[must_use]
    pub fn http_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.http_port)
    }
}
