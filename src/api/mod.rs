//! HTTP API module for the health and ready resources and their docs.

pub mod binding;
pub mod docs;
pub mod handlers;
pub mod routes;

pub use handlers::AppState;
pub use routes::create_router;

/// Versioned prefix every resource is mounted under.
pub const API_BASE_PATH: &str = "/api/v1";
