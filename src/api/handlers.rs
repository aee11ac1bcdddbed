//! HTTP API handlers for the health and ready resources.

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use metrics_exporter_prometheus::PrometheusHandle;
use serde::Serialize;
use serde_json::{Map, Value};
use strum::{Display, IntoStaticStr};
use tracing::info;
use utoipa::ToSchema;

use super::binding::{required_str, ErrorResponse, Schema, Validated};
use crate::error::BindError;
use crate::metrics;

/// Application state shared with handlers.
#[derive(Clone, Default)]
pub struct AppState {
    /// Prometheus handle, present when metrics are enabled.
    pub metrics: Option<PrometheusHandle>,
}

impl AppState {
    /// Create new app state without metrics.
    pub fn new() -> Self {
        Self::default()
    }

    /// Attach a Prometheus handle for the `/metrics` route.
    pub fn with_metrics(handle: PrometheusHandle) -> Self {
        Self {
            metrics: Some(handle),
        }
    }
}

/// Resources exposed under the API prefix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, IntoStaticStr)]
#[strum(serialize_all = "lowercase")]
pub enum Resource {
    /// `/health`
    Health,
    /// `/ready`
    Ready,
}

/// Health payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct Health {
    /// Current health.
    #[schema(example = "very fit")]
    pub health: String,
}

impl Health {
    /// Value reported by `GET /health`.
    pub fn current() -> Self {
        Self {
            health: "foo".to_string(),
        }
    }
}

impl Schema for Health {
    const RESOURCE: Resource = Resource::Health;

    fn from_object(object: &Map<String, Value>) -> Result<Self, BindError> {
        Ok(Self {
            health: required_str(object, "health")?,
        })
    }
}

/// Readiness payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct Ready {
    /// Current readiness.
    #[schema(example = "bar")]
    pub ready: String,
}

impl Ready {
    /// Value reported by `GET /ready`.
    pub fn current() -> Self {
        Self {
            ready: "bar".to_string(),
        }
    }
}

impl Schema for Ready {
    const RESOURCE: Resource = Resource::Ready;

    fn from_object(object: &Map<String, Value>) -> Result<Self, BindError> {
        Ok(Self {
            ready: required_str(object, "ready")?,
        })
    }
}

/// Acknowledgement returned by the POST handlers.
#[derive(Debug, Serialize, ToSchema)]
pub struct Ack {
    /// Always "ok".
    #[schema(example = "ok")]
    pub status: &'static str,
}

impl Ack {
    fn ok() -> Self {
        Self { status: "ok" }
    }
}

/// Get health
#[utoipa::path(
    get,
    path = "/health",
    tag = "health",
    responses(
        (status = 200, description = "Current health", body = Health)
    )
)]
pub async fn get_health() -> Json<Health> {
    Json(Health::current())
}

/// Set health
#[utoipa::path(
    post,
    path = "/health",
    tag = "health",
    request_body(content = Health, description = "New health"),
    responses(
        (status = 200, description = "Health accepted", body = Ack),
        (status = 400, description = "Body failed validation", body = ErrorResponse)
    )
)]
pub async fn set_health(Validated(payload): Validated<Health>) -> Json<Ack> {
    info!(resource = %Resource::Health, health = %payload.health, "got payload");
    metrics::record_accepted(Resource::Health);
    Json(Ack::ok())
}

/// Get readiness
#[utoipa::path(
    get,
    path = "/ready",
    tag = "ready",
    responses(
        (status = 200, description = "Current readiness", body = Ready)
    )
)]
pub async fn get_ready() -> Json<Ready> {
    Json(Ready::current())
}

/// Set readiness
#[utoipa::path(
    post,
    path = "/ready",
    tag = "ready",
    request_body(content = Ready, description = "New readiness"),
    responses(
        (status = 200, description = "Readiness accepted", body = Ack),
        (status = 400, description = "Body failed validation", body = ErrorResponse)
    )
)]
pub async fn set_ready(Validated(payload): Validated<Ready>) -> Json<Ack> {
    info!(resource = %Resource::Ready, ready = %payload.ready, "got payload");
    metrics::record_accepted(Resource::Ready);
    Json(Ack::ok())
}

/// Prometheus scrape handler - 404 when metrics are disabled.
pub async fn metrics_endpoint(State(state): State<AppState>) -> impl IntoResponse {
    match state.metrics {
        Some(handle) => (StatusCode::OK, handle.render()),
        None => (StatusCode::NOT_FOUND, String::new()),
    }
}
