//! HTTP API route definitions.

use axum::{routing::get, Router};
use tower::ServiceBuilder;
use tower_http::{catch_panic::CatchPanicLayer, trace::TraceLayer};

use super::docs::swagger_ui;
use super::handlers::{get_health, get_ready, metrics_endpoint, set_health, set_ready, AppState};
use super::API_BASE_PATH;

/// Create the full router: versioned API, docs and the middleware chain.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .nest(API_BASE_PATH, api_router())
        .merge(swagger_ui())
        .route("/metrics", get(metrics_endpoint))
        .with_state(state)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CatchPanicLayer::new()),
        )
}

/// Routes mounted under [`API_BASE_PATH`].
pub fn api_router<S>() -> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    Router::new()
        .route("/health", get(get_health).post(set_health))
        .route("/ready", get(get_ready).post(set_ready))
}
