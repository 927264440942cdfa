//! Domain types and flows.
//!
//! Purpose: define strongly typed entities, the credential primitives, and
//! the registration/login flows, free of transport concerns. Keep types
//! immutable and document invariants and serialisation contracts (serde) in
//! each type's Rustdoc.
//!
//! Public surface:
//! - `Error` / `ErrorCode`: transport-agnostic error payload.
//! - `EmailAddress`, `PersonName`, `UserId`, `UserRecord`, `UserSummary`:
//!   identity model.
//! - `RegistrationDetails`, `LoginCredentials`: validated flow inputs.
//! - `PasswordHasher`: credential hashing.
//! - `TokenService`, `Claims`, `SigningSecret`: session tokens.
//! - `AuthService`: the flows themselves, over a `UserRepository` port.

pub mod auth;
pub mod error;
pub mod password;
pub mod ports;
pub mod service;
pub mod token;
pub mod user;

pub use self::auth::{
    LoginCredentials, LoginValidationError, PASSWORD_MIN, RegistrationDetails,
    RegistrationValidationError,
};
pub use self::error::{Error, ErrorCode, ErrorEnvelope};
pub use self::password::{MAX_PASSWORD_BYTES, PasswordHashError, PasswordHasher};
pub use self::ports::{UserRepository, UserStoreError};
pub use self::service::{AuthService, AuthSuccess, STORE_TIMEOUT};
pub use self::token::{
    Claims, SignedToken, SigningSecret, SigningSecretError, TOKEN_TTL_HOURS, TokenError,
    TokenService,
};
pub use self::user::{
    EmailAddress, PasswordHash, PersonName, UserId, UserRecord, UserSummary, UserValidationError,
};

/// Convenient result alias for flows and handlers.
///
/// # Examples
/// ```
/// use wicket::domain::{ApiResult, Error};
///
/// fn check() -> ApiResult<()> {
///     Err(Error::unauthorized("login required"))
/// }
/// ```
pub type ApiResult<T> = Result<T, Error>;
