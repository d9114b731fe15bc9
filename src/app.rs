use axum::Router;
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::Level;

use crate::config::AppConfig;
use crate::routes::{note_routes, system_routes};
use crate::services::note_service::SharedStore;

/// Build the complete Axum application:
/// - /api      (user registration and note operations)
/// - /system   (alive + version)
///
/// The store is injected here; handlers never reach for global state.
pub fn build_app(store: SharedStore, cfg: AppConfig) -> Router {
    Router::new()
        // /api/*
        .nest("/api", note_routes::routes(store))

        // /system/*
        .nest("/system", system_routes::routes(cfg))

        // Logging middleware
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
}
