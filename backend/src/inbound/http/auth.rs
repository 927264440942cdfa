//! Authentication API handlers.
//!
//! ```text
//! POST /api/v1/auth/register {"email":…,"password":…,"firstName":…,"lastName":…}
//! POST /api/v1/auth/login    {"email":…,"password":…}
//! GET  /api/v1/auth/me       Authorization: Bearer <token>
//! ```
//!
//! Handlers stay thin: parse the DTO, build the validated domain type, run
//! the flow, wrap the outcome in the success envelope. All failure paths go
//! through the central [`Error`] type so clients get one error schema.

use actix_web::{HttpResponse, get, post, web};
use serde::{Deserialize, Serialize};
use serde_json::json;
use utoipa::ToSchema;

use crate::domain::{
    AuthSuccess, Error, ErrorEnvelope, LoginCredentials, LoginValidationError,
    RegistrationDetails, RegistrationValidationError, SignedToken, UserSummary,
};

use super::ApiResult;
use super::identity::AuthenticatedUser;
use super::state::HttpState;

/// Registration request body.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    /// Email address; normalized before lookup and storage.
    #[schema(example = "ada@example.com")]
    pub email: String,
    /// Plaintext password, at least 8 characters.
    #[schema(example = "longenough1")]
    pub password: String,
    /// First name, at least 2 characters.
    #[schema(example = "Ada")]
    pub first_name: String,
    /// Last name, at least 2 characters.
    #[schema(example = "Lovelace")]
    pub last_name: String,
}

impl TryFrom<RegisterRequest> for RegistrationDetails {
    type Error = RegistrationValidationError;

    fn try_from(value: RegisterRequest) -> Result<Self, Self::Error> {
        Self::try_from_parts(
            &value.email,
            &value.password,
            &value.first_name,
            &value.last_name,
        )
    }
}

/// Login request body.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    /// Email address used at registration.
    #[schema(example = "ada@example.com")]
    pub email: String,
    /// Plaintext password.
    #[schema(example = "longenough1")]
    pub password: String,
}

impl TryFrom<LoginRequest> for LoginCredentials {
    type Error = LoginValidationError;

    fn try_from(value: LoginRequest) -> Result<Self, Self::Error> {
        Self::try_from_parts(&value.email, &value.password)
    }
}

/// Identity summary plus its session token.
#[derive(Debug, Serialize, ToSchema)]
pub struct AuthData {
    /// The authenticated identity. Never carries password material.
    user: UserSummary,
    /// Signed session token to present as `Authorization: Bearer <token>`.
    #[schema(value_type = String)]
    token: SignedToken,
}

/// Success envelope for registration and login.
#[derive(Debug, Serialize, ToSchema)]
pub struct AuthResponse {
    /// Always `"success"`.
    #[schema(value_type = String, example = "success")]
    status: &'static str,
    #[schema(value_type = String, example = "Login successful")]
    message: &'static str,
    data: AuthData,
}

impl AuthResponse {
    fn new(message: &'static str, outcome: AuthSuccess) -> Self {
        let AuthSuccess { user, token } = outcome;
        Self {
            status: "success",
            message,
            data: AuthData { user, token },
        }
    }
}

/// Success envelope for the current-user endpoint.
#[derive(Debug, Serialize, ToSchema)]
pub struct ProfileResponse {
    /// Always `"success"`.
    #[schema(value_type = String, example = "success")]
    status: &'static str,
    #[schema(value_type = String, example = "Authenticated")]
    message: &'static str,
    data: ProfileData,
}

/// Identity summary for the current-user endpoint.
#[derive(Debug, Serialize, ToSchema)]
pub struct ProfileData {
    user: UserSummary,
}

impl ProfileResponse {
    fn new(user: UserSummary) -> Self {
        Self {
            status: "success",
            message: "Authenticated",
            data: ProfileData { user },
        }
    }
}

fn registration_error(err: &RegistrationValidationError) -> Error {
    let (field, code) = match err {
        RegistrationValidationError::InvalidEmail => ("email", "invalid_email"),
        RegistrationValidationError::PasswordTooShort { .. } => ("password", "too_short"),
        RegistrationValidationError::PasswordTooLong { .. } => ("password", "too_long"),
        RegistrationValidationError::FirstNameTooShort { .. } => ("firstName", "too_short"),
        RegistrationValidationError::FirstNameTooLong { .. } => ("firstName", "too_long"),
        RegistrationValidationError::LastNameTooShort { .. } => ("lastName", "too_short"),
        RegistrationValidationError::LastNameTooLong { .. } => ("lastName", "too_long"),
    };
    Error::invalid_request(err.to_string()).with_details(json!({ "field": field, "code": code }))
}

fn login_error(err: &LoginValidationError) -> Error {
    let (field, code) = match err {
        LoginValidationError::InvalidEmail => ("email", "invalid_email"),
        LoginValidationError::EmptyPassword => ("password", "empty_password"),
    };
    Error::invalid_request(err.to_string()).with_details(json!({ "field": field, "code": code }))
}

/// Register a new user and issue a session token.
#[utoipa::path(
    post,
    path = "/api/v1/auth/register",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "User registered", body = AuthResponse),
        (status = 400, description = "Validation failed", body = ErrorEnvelope),
        (status = 409, description = "Email already registered", body = ErrorEnvelope),
        (status = 500, description = "Internal server error", body = ErrorEnvelope)
    ),
    tags = ["auth"],
    operation_id = "register",
    security([])
)]
#[post("/auth/register")]
pub async fn register(
    state: web::Data<HttpState>,
    payload: web::Json<RegisterRequest>,
) -> ApiResult<HttpResponse> {
    let details = RegistrationDetails::try_from(payload.into_inner())
        .map_err(|err| registration_error(&err))?;
    let outcome = state.auth.register(details).await?;
    Ok(HttpResponse::Created().json(AuthResponse::new("User registered successfully", outcome)))
}

/// Authenticate a user and issue a session token.
#[utoipa::path(
    post,
    path = "/api/v1/auth/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login success", body = AuthResponse),
        (status = 400, description = "Validation failed", body = ErrorEnvelope),
        (status = 401, description = "Invalid credentials", body = ErrorEnvelope),
        (status = 500, description = "Internal server error", body = ErrorEnvelope)
    ),
    tags = ["auth"],
    operation_id = "login",
    security([])
)]
#[post("/auth/login")]
pub async fn login(
    state: web::Data<HttpState>,
    payload: web::Json<LoginRequest>,
) -> ApiResult<HttpResponse> {
    let credentials =
        LoginCredentials::try_from(payload.into_inner()).map_err(|err| login_error(&err))?;
    let outcome = state.auth.login(credentials).await?;
    Ok(HttpResponse::Ok().json(AuthResponse::new("Login successful", outcome)))
}

/// Return the identity asserted by the presented bearer token.
#[utoipa::path(
    get,
    path = "/api/v1/auth/me",
    responses(
        (status = 200, description = "Authenticated identity", body = ProfileResponse),
        (status = 401, description = "Missing, invalid, or expired token", body = ErrorEnvelope),
        (status = 500, description = "Internal server error", body = ErrorEnvelope)
    ),
    tags = ["auth"],
    operation_id = "currentUser"
)]
#[get("/auth/me")]
pub async fn me(
    identity: AuthenticatedUser,
    state: web::Data<HttpState>,
) -> ApiResult<web::Json<ProfileResponse>> {
    let user = state.auth.current_user(identity.claims()).await?;
    Ok(web::Json(ProfileResponse::new(user)))
}
