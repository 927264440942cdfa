//! Stateless session-token authentication service.
//!
//! Registration and login issue a signed, expiring JWT; later requests
//! present it as a bearer credential. The crate is split the hexagonal way:
//! `domain` holds the validated types and flows, `inbound::http` the REST
//! adapter, `outbound` the store adapters behind the `UserRepository` port.

pub mod doc;
pub mod domain;
pub mod inbound;
pub mod middleware;
pub mod outbound;

/// Public OpenAPI surface used by tooling.
pub use doc::ApiDoc;
/// Request logging middleware attached by the server.
pub use middleware::RequestLog;
