//! OpenAPI document aggregation.
//!
//! Defines the [`ApiDoc`] struct generating the OpenAPI specification for
//! the REST API: the auth and health paths, the request/response schemas,
//! and the bearer-token security scheme. Public endpoints (register, login,
//! probes) opt out of the global security requirement with `security([])`.

use utoipa::openapi::security::{Http, HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::domain::{ErrorEnvelope, UserSummary};
use crate::inbound::http::auth::{AuthResponse, LoginRequest, ProfileResponse, RegisterRequest};
use crate::inbound::http::{auth, health};

/// Enrich the generated document with the bearer-token security scheme.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi
            .components
            .get_or_insert_with(utoipa::openapi::Components::default);

        components.add_security_scheme(
            "BearerToken",
            SecurityScheme::Http(http_bearer()),
        );
    }
}

fn http_bearer() -> Http {
    HttpBuilder::new()
        .scheme(HttpAuthScheme::Bearer)
        .bearer_format("JWT")
        .description(Some(
            "Session token issued by POST /api/v1/auth/register and /login.",
        ))
        .build()
}

/// Public OpenAPI surface for tooling and client generation.
#[derive(OpenApi)]
#[openapi(
    modifiers(&SecurityAddon),
    info(
        title = "Wicket backend API",
        description = "HTTP interface for stateless session-token authentication and health probes."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    security(("BearerToken" = [])),
    paths(
        auth::register,
        auth::login,
        auth::me,
        health::ready,
        health::live,
    ),
    components(schemas(
        RegisterRequest,
        LoginRequest,
        AuthResponse,
        ProfileResponse,
        ErrorEnvelope,
        UserSummary,
    )),
    tags(
        (name = "auth", description = "Registration, login, and identity"),
        (name = "health", description = "Orchestration probes")
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn document_lists_every_endpoint() {
        let doc = ApiDoc::openapi();
        let paths: Vec<&String> = doc.paths.paths.keys().collect();
        for expected in [
            "/api/v1/auth/register",
            "/api/v1/auth/login",
            "/api/v1/auth/me",
            "/health/ready",
            "/health/live",
        ] {
            assert!(
                paths.iter().any(|p| *p == expected),
                "missing path {expected} in {paths:?}"
            );
        }
    }

    #[rstest]
    fn document_registers_the_bearer_scheme() {
        let doc = ApiDoc::openapi();
        let components = doc.components.as_ref().expect("components");
        assert!(
            components.security_schemes.contains_key("BearerToken"),
            "bearer scheme must be registered"
        );
    }
}
