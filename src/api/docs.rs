//! OpenAPI document and Swagger UI.
//!
//! Browse the API at `/swagger/`; the raw document is served at
//! [`OPENAPI_PATH`].

use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use super::binding::ErrorResponse;
use super::handlers::{self, Ack, Health, Ready};
use crate::error::Result;

/// Mount point of the Swagger UI.
pub const SWAGGER_PATH: &str = "/swagger";

/// Where the generated OpenAPI document is served.
pub const OPENAPI_PATH: &str = "/api-docs/openapi.json";

#[derive(OpenApi)]
#[openapi(
    info(title = "Probe API", version = "1.0"),
    servers((url = "/api/v1")),
    paths(
        handlers::get_health,
        handlers::set_health,
        handlers::get_ready,
        handlers::set_ready,
    ),
    components(schemas(Health, Ready, Ack, ErrorResponse)),
    tags(
        (name = "health", description = "Service health"),
        (name = "ready", description = "Service readiness")
    )
)]
pub struct ApiDoc;

/// Swagger UI router serving both the UI assets and the document.
pub fn swagger_ui() -> SwaggerUi {
    SwaggerUi::new(SWAGGER_PATH).url(OPENAPI_PATH, ApiDoc::openapi())
}

/// The OpenAPI document rendered as pretty JSON.
pub fn openapi_json() -> Result<String> {
    Ok(ApiDoc::openapi().to_pretty_json()?)
}
