//! Registration and login flows.
//!
//! Each flow is a single pass with no retries: validated input in, identity
//! summary plus signed token out. The store is the only suspension point and
//! every call to it carries a timeout; bcrypt work runs on the blocking
//! thread pool so it never stalls the async event loop.

use std::sync::Arc;
use std::time::Duration;

use tokio::task::spawn_blocking;
use tokio::time::timeout;
use tracing::error;
use zeroize::Zeroizing;

use super::ApiResult;
use super::auth::{LoginCredentials, RegistrationDetails};
use super::error::Error;
use super::password::PasswordHasher;
use super::ports::{UserRepository, UserStoreError};
use super::token::{Claims, SignedToken, TokenError, TokenService};
use super::user::{EmailAddress, PasswordHash, UserId, UserRecord, UserSummary};

/// Upper bound on any single user-store call before the flow reports an
/// internal error instead of hanging.
pub const STORE_TIMEOUT: Duration = Duration::from_secs(5);

/// Verified against when a login's email has no record, so the missing-user
/// path costs the same bcrypt verification as a mismatch.
const UNKNOWN_ACCOUNT_PASSWORD: &str = "unknown-account-placeholder";

/// Successful authentication outcome: the identity summary and its token.
#[derive(Debug, Clone)]
pub struct AuthSuccess {
    /// Serializable identity summary.
    pub user: UserSummary,
    /// Signed session token bound to that identity.
    pub token: SignedToken,
}

/// Orchestrates registration, login, and token verification.
pub struct AuthService {
    repository: Arc<dyn UserRepository>,
    hasher: PasswordHasher,
    tokens: TokenService,
    dummy_hash: PasswordHash,
    store_timeout: Duration,
}

impl AuthService {
    /// Service with the production hasher cost.
    pub fn new(repository: Arc<dyn UserRepository>, tokens: TokenService) -> ApiResult<Self> {
        Self::with_hasher(repository, tokens, PasswordHasher::default())
    }

    /// Service with an explicit hasher. Tests pass a cheap cost here; the
    /// running service uses the default.
    pub fn with_hasher(
        repository: Arc<dyn UserRepository>,
        tokens: TokenService,
        hasher: PasswordHasher,
    ) -> ApiResult<Self> {
        let dummy_hash = hasher.hash(UNKNOWN_ACCOUNT_PASSWORD).map_err(|err| {
            error!(error = %err, "failed to prepare dummy credential hash");
            Error::internal("Internal server error")
        })?;
        Ok(Self {
            repository,
            hasher,
            tokens,
            dummy_hash,
            store_timeout: STORE_TIMEOUT,
        })
    }

    /// Register a new user and issue a token for the created identity.
    pub async fn register(&self, details: RegistrationDetails) -> ApiResult<AuthSuccess> {
        if self.lookup(&details).await?.is_some() {
            return Err(Error::conflict("Email already registered"));
        }

        let (email, password, first_name, last_name) = details.into_parts();
        let password_hash = self.hash_password(password).await?;
        let record = UserRecord::new(
            UserId::random(),
            email,
            password_hash,
            first_name,
            last_name,
            chrono::Utc::now(),
        );

        let stored = match timeout(self.store_timeout, self.repository.insert(record)).await {
            Ok(Ok(stored)) => stored,
            // Lost the race against a concurrent registration for the same
            // email: same outcome as the pre-check.
            Ok(Err(UserStoreError::DuplicateEmail)) => {
                return Err(Error::conflict("Email already registered"));
            }
            Ok(Err(err)) => {
                error!(error = %err, "user store insert failed");
                return Err(Error::internal("Internal server error"));
            }
            Err(_) => {
                error!("user store insert timed out");
                return Err(Error::internal("Internal server error"));
            }
        };

        let token = self.issue(&stored)?;
        Ok(AuthSuccess {
            user: UserSummary::from(&stored),
            token,
        })
    }

    /// Authenticate an existing user and issue a token.
    ///
    /// A missing record and a password mismatch produce the same outcome, so
    /// responses carry no signal about which emails exist.
    pub async fn login(&self, credentials: LoginCredentials) -> ApiResult<AuthSuccess> {
        let record = self.find_by_email(credentials.email()).await?;
        let (_, password) = credentials.into_parts();

        let Some(record) = record else {
            let _ = self.verify_password(password, self.dummy_hash.clone()).await;
            return Err(Error::unauthorized("Invalid credentials"));
        };

        if !self
            .verify_password(password, record.password_hash().clone())
            .await?
        {
            return Err(Error::unauthorized("Invalid credentials"));
        }

        let token = self.issue(&record)?;
        Ok(AuthSuccess {
            user: UserSummary::from(&record),
            token,
        })
    }

    /// Verify a presented session token, recovering its claims.
    pub fn verify_token(&self, token: &str) -> Result<Claims, TokenError> {
        self.tokens.verify(token)
    }

    /// Resolve verified claims to the current identity summary.
    pub async fn current_user(&self, claims: &Claims) -> ApiResult<UserSummary> {
        let email = EmailAddress::new(claims.email())
            .map_err(|_| Error::unauthorized("login required"))?;
        match self.find_by_email(&email).await? {
            Some(record) => Ok(UserSummary::from(&record)),
            None => Err(Error::unauthorized("login required")),
        }
    }

    async fn lookup(&self, details: &RegistrationDetails) -> ApiResult<Option<UserRecord>> {
        self.find_by_email(details.email()).await
    }

    async fn find_by_email(&self, email: &EmailAddress) -> ApiResult<Option<UserRecord>> {
        match timeout(self.store_timeout, self.repository.find_by_email(email)).await {
            Ok(Ok(record)) => Ok(record),
            Ok(Err(err)) => {
                error!(error = %err, "user store lookup failed");
                Err(Error::internal("Internal server error"))
            }
            Err(_) => {
                error!("user store lookup timed out");
                Err(Error::internal("Internal server error"))
            }
        }
    }

    async fn hash_password(&self, password: Zeroizing<String>) -> ApiResult<PasswordHash> {
        let hasher = self.hasher;
        let result = spawn_blocking(move || hasher.hash(&password)).await;
        match result {
            Ok(Ok(hash)) => Ok(hash),
            Ok(Err(err)) => {
                error!(error = %err, "password hashing failed");
                Err(Error::internal("Internal server error"))
            }
            Err(err) => {
                error!(error = %err, "password hashing task failed");
                Err(Error::internal("Internal server error"))
            }
        }
    }

    async fn verify_password(
        &self,
        password: Zeroizing<String>,
        hash: PasswordHash,
    ) -> ApiResult<bool> {
        let hasher = self.hasher;
        let result = spawn_blocking(move || hasher.verify(&password, &hash)).await;
        match result {
            Ok(Ok(matched)) => Ok(matched),
            Ok(Err(err)) => {
                error!(error = %err, "password verification failed");
                Err(Error::internal("Internal server error"))
            }
            Err(err) => {
                error!(error = %err, "password verification task failed");
                Err(Error::internal("Internal server error"))
            }
        }
    }

    fn issue(&self, record: &UserRecord) -> ApiResult<SignedToken> {
        self.tokens.issue(record.id(), record.email()).map_err(|err| {
            error!(error = %err, "token issuance failed");
            Error::internal("Internal server error")
        })
    }
}
