//! Shared HTTP adapter state.
//!
//! Handlers accept this via `actix_web::web::Data` so they depend only on
//! the auth service and remain testable with any store adapter behind it.

use std::sync::Arc;

use crate::domain::AuthService;

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    /// Registration, login, and token verification flows.
    pub auth: Arc<AuthService>,
}

impl HttpState {
    /// Construct state around an auth service.
    pub fn new(auth: Arc<AuthService>) -> Self {
        Self { auth }
    }
}
