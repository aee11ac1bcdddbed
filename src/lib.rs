//! Health and readiness probe service.
//!
//! Exposes two toy resources under `/api/v1`, each with a GET returning a
//! fixed payload and a POST that validates, logs and acknowledges a single
//! string field:
//!
//! ```text
//! GET  /api/v1/health   -> {"health":"foo"}
//! POST /api/v1/health   {"health":"x"} -> {"status":"ok"}
//! GET  /api/v1/ready    -> {"ready":"bar"}
//! POST /api/v1/ready    {"ready":"x"}  -> {"status":"ok"}
//! ```
//!
//! Swagger UI is served at `/swagger/`.
//!
//! # Modules
//!
//! - [`config`]: Configuration loading from environment
//! - [`error`]: Unified error types
//! - [`api`]: Handlers, body binding, routes and OpenAPI docs
//! - [`server`]: Listener lifecycle and bounded graceful shutdown
//! - [`metrics`]: Prometheus counters
//! - [`utils`]: Shutdown token and signal handling

pub mod api;
pub mod config;
pub mod error;
pub mod metrics;
pub mod server;
pub mod utils;

pub use config::Config;
pub use error::{BindError, Result, ServiceError};
