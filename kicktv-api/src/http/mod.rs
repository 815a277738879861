// Module: http
// HTTP/JSON surface: manifest relay and channel resolution

pub mod error;
pub mod health;
pub mod proxy;
pub mod stream;

use std::sync::Arc;

use axum::{routing::get, Router};
use kicktv_core::{ChannelResolver, Config};
use kicktv_proxy::ManifestRelay;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

pub use error::{AppError, AppResult};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub relay: Arc<ManifestRelay>,
    pub resolver: Arc<ChannelResolver>,
    pub config: Arc<Config>,
}

impl AppState {
    #[must_use]
    pub fn new(config: &Config) -> Self {
        Self {
            relay: Arc::new(ManifestRelay::new(config.relay.clone())),
            resolver: Arc::new(ChannelResolver::new(&config.resolver)),
            config: Arc::new(config.clone()),
        }
    }
}

/// Create the HTTP router with all routes
pub fn create_router(state: AppState) -> axum::Router {
    let router = Router::new()
        // Health check
        .merge(health::create_health_router())
        // Manifest relay
        .route(
            "/proxy",
            get(proxy::proxy_fetch).options(proxy::proxy_options_preflight),
        )
        // Channel resolution
        .route("/api/stream", get(stream::get_stream));

    // Apply layers before state
    let router = router
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(TraceLayer::new_for_http());

    // Apply state to all routes (must be last)
    router.with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use tower::ServiceExt;

    #[tokio::test]
    async fn test_health_check() {
        let app = create_router(AppState::new(&Config::default()));

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/health")
                    .body(Body::empty())
                    .expect("request"),
            )
            .await
            .expect("handler runs");

        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_proxy_preflight() {
        let app = create_router(AppState::new(&Config::default()));

        let response = app
            .oneshot(
                Request::builder()
                    .method("OPTIONS")
                    .uri("/proxy")
                    .body(Body::empty())
                    .expect("request"),
            )
            .await
            .expect("handler runs");

        assert_eq!(response.status(), StatusCode::NO_CONTENT);
    }
}
