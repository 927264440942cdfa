//! Session token issuance and verification.
//!
//! Tokens are compact signed strings (JWT, HS256) asserting a user identity
//! for a bounded time. Both halves are pure CPU-bound functions sharing a
//! process-wide secret threaded in as configuration; nothing here touches a
//! store, so issue and verify are thread-safe without locking.

use std::fmt;

use chrono::{Duration, Utc};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use zeroize::Zeroizing;

use super::user::{EmailAddress, UserId};

/// Token lifetime. A credential expires this long after issuance and is
/// never explicitly revoked (no revocation list in this design).
pub const TOKEN_TTL_HOURS: i64 = 24;

/// Validation error raised when constructing a [`SigningSecret`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SigningSecretError {
    /// Secret material was empty.
    Empty,
}

impl fmt::Display for SigningSecretError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => write!(f, "token signing secret must not be empty"),
        }
    }
}

impl std::error::Error for SigningSecretError {}

/// Process-wide token signing secret, wiped from memory on drop.
pub struct SigningSecret(Zeroizing<Vec<u8>>);

impl fmt::Debug for SigningSecret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("SigningSecret").field(&"<redacted>").finish()
    }
}

impl SigningSecret {
    /// Construct a secret from raw key material.
    pub fn new(material: impl Into<Vec<u8>>) -> Result<Self, SigningSecretError> {
        let material = material.into();
        if material.is_empty() {
            return Err(SigningSecretError::Empty);
        }
        Ok(Self(Zeroizing::new(material)))
    }

    fn as_bytes(&self) -> &[u8] {
        &self.0
    }
}

/// Failures raised by token verification or issuance.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TokenError {
    /// Signature did not match; the token contents were never examined.
    #[error("token signature is invalid")]
    InvalidSignature,
    /// Signature was valid but the expiry time has passed.
    #[error("token has expired")]
    Expired,
    /// Signing a new token failed.
    #[error("token signing failed: {message}")]
    Signing { message: String },
}

/// Claim set embedded in a signed token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    sub: String,
    email: String,
    iat: i64,
    exp: i64,
}

impl Claims {
    /// Asserted user identifier.
    pub fn subject(&self) -> &str {
        self.sub.as_str()
    }

    /// Asserted email address.
    pub fn email(&self) -> &str {
        self.email.as_str()
    }

    /// Issuance time, seconds since the Unix epoch.
    pub fn issued_at(&self) -> i64 {
        self.iat
    }

    /// Expiry time, seconds since the Unix epoch.
    pub fn expires_at(&self) -> i64 {
        self.exp
    }
}

/// A signed, serialized token as returned to clients.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct SignedToken(String);

impl SignedToken {
    /// Borrow the encoded token.
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for SignedToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<SignedToken> for String {
    fn from(value: SignedToken) -> Self {
        value.0
    }
}

/// Issues and verifies signed session tokens.
#[derive(Clone)]
pub struct TokenService {
    encoding: EncodingKey,
    decoding: DecodingKey,
    ttl: Duration,
}

impl TokenService {
    /// Service with the standard [`TOKEN_TTL_HOURS`] lifetime.
    pub fn new(secret: &SigningSecret) -> Self {
        Self::with_ttl(secret, Duration::hours(TOKEN_TTL_HOURS))
    }

    /// Service with an explicit lifetime. Intended for expiry tests; the
    /// running service always uses [`TOKEN_TTL_HOURS`].
    pub fn with_ttl(secret: &SigningSecret, ttl: Duration) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            ttl,
        }
    }

    /// Issue a signed token asserting the given identity.
    pub fn issue(
        &self,
        subject: &UserId,
        email: &EmailAddress,
    ) -> Result<SignedToken, TokenError> {
        let now = Utc::now();
        let claims = Claims {
            sub: subject.to_string(),
            email: email.as_str().to_owned(),
            iat: now.timestamp(),
            exp: (now + self.ttl).timestamp(),
        };
        encode(&Header::default(), &claims, &self.encoding)
            .map(SignedToken)
            .map_err(|error| TokenError::Signing {
                message: error.to_string(),
            })
    }

    /// Verify a presented token, recovering its claims.
    ///
    /// The signature is checked before any claim is examined, so tampered
    /// tokens are rejected without a semantic oracle. Expiry is checked with
    /// zero leeway against `exp`.
    pub fn verify(&self, token: &str) -> Result<Claims, TokenError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;
        decode::<Claims>(token, &self.decoding, &validation)
            .map(|data| data.claims)
            .map_err(|error| match error.kind() {
                ErrorKind::ExpiredSignature => TokenError::Expired,
                _ => TokenError::InvalidSignature,
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::{fixture, rstest};

    fn secret() -> SigningSecret {
        SigningSecret::new("a-test-secret-of-reasonable-length").expect("non-empty secret")
    }

    #[fixture]
    fn service() -> TokenService {
        TokenService::new(&secret())
    }

    fn identity() -> (UserId, EmailAddress) {
        (
            UserId::random(),
            EmailAddress::new("ada@example.com").expect("fixture email"),
        )
    }

    #[rstest]
    fn empty_secret_is_rejected() {
        assert_eq!(
            SigningSecret::new(Vec::new()).expect_err("empty secret must fail"),
            SigningSecretError::Empty
        );
    }

    #[rstest]
    fn issued_token_verifies_to_same_identity(service: TokenService) {
        let (id, email) = identity();
        let token = service.issue(&id, &email).expect("issue");
        let claims = service.verify(token.as_str()).expect("verify");
        assert_eq!(claims.subject(), id.to_string());
        assert_eq!(claims.email(), email.as_str());
        assert_eq!(
            claims.expires_at() - claims.issued_at(),
            TOKEN_TTL_HOURS * 3600
        );
    }

    #[rstest]
    fn expired_token_is_rejected_as_expired() {
        let service = TokenService::with_ttl(&secret(), Duration::seconds(-5));
        let (id, email) = identity();
        let token = service.issue(&id, &email).expect("issue");
        assert_eq!(
            service.verify(token.as_str()).expect_err("must be expired"),
            TokenError::Expired
        );
    }

    /// Flip the first character of the signature segment.
    fn tamper(token: &str) -> String {
        let (payload, signature) = token.rsplit_once('.').expect("three-segment token");
        let first = signature.chars().next().expect("non-empty signature");
        let flipped = if first == 'A' { 'B' } else { 'A' };
        format!("{payload}.{flipped}{}", &signature[1..])
    }

    #[rstest]
    fn tampered_signature_is_rejected(service: TokenService) {
        let (id, email) = identity();
        let token = String::from(service.issue(&id, &email).expect("issue"));
        assert_eq!(
            service
                .verify(&tamper(&token))
                .expect_err("must be rejected"),
            TokenError::InvalidSignature
        );
    }

    #[rstest]
    fn expired_and_tampered_token_reports_invalid_signature() {
        let service = TokenService::with_ttl(&secret(), Duration::seconds(-5));
        let (id, email) = identity();
        let token = String::from(service.issue(&id, &email).expect("issue"));
        // Signature integrity is checked first even though the token is
        // also past its expiry.
        assert_eq!(
            service
                .verify(&tamper(&token))
                .expect_err("must be rejected"),
            TokenError::InvalidSignature
        );
    }

    #[rstest]
    fn token_signed_with_other_secret_is_rejected(service: TokenService) {
        let other = TokenService::new(
            &SigningSecret::new("an-entirely-different-secret").expect("non-empty secret"),
        );
        let (id, email) = identity();
        let token = other.issue(&id, &email).expect("issue");
        assert_eq!(
            service.verify(token.as_str()).expect_err("must be rejected"),
            TokenError::InvalidSignature
        );
    }
}
