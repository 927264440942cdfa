//! Bearer-token identity extraction.
//!
//! Token verification is the sole mechanism handlers use to establish
//! identity; there is no session store. Handlers that require a caller
//! identity take an [`AuthenticatedUser`] parameter and Actix runs the
//! verification before the handler body executes.

use std::future::{Ready, ready};

use actix_web::http::header;
use actix_web::{FromRequest, HttpRequest, dev::Payload, web};

use crate::domain::{Claims, Error, TokenError};

use super::state::HttpState;

/// Identity asserted by a verified bearer token.
#[derive(Debug, Clone)]
pub struct AuthenticatedUser {
    claims: Claims,
}

impl AuthenticatedUser {
    /// Claims recovered from the verified token.
    pub fn claims(&self) -> &Claims {
        &self.claims
    }
}

fn bearer_token(req: &HttpRequest) -> Result<&str, Error> {
    let header = req
        .headers()
        .get(header::AUTHORIZATION)
        .ok_or_else(|| Error::unauthorized("login required"))?;
    let value = header
        .to_str()
        .map_err(|_| Error::unauthorized("login required"))?;
    value
        .strip_prefix("Bearer ")
        .ok_or_else(|| Error::unauthorized("login required"))
}

fn authenticate(req: &HttpRequest) -> Result<AuthenticatedUser, Error> {
    let state = req
        .app_data::<web::Data<HttpState>>()
        .ok_or_else(|| Error::internal("auth state not configured"))?;
    let token = bearer_token(req)?;
    let claims = state.auth.verify_token(token).map_err(|err| match err {
        TokenError::Expired => Error::unauthorized("Token has expired"),
        _ => Error::unauthorized("Invalid token"),
    })?;
    Ok(AuthenticatedUser { claims })
}

impl FromRequest for AuthenticatedUser {
    type Error = Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(authenticate(req))
    }
}
