//! User identity model.
//!
//! Keep inbound payload parsing outside the domain by exposing constructors
//! that validate string inputs before a record is built or persisted. Email
//! addresses are normalized (lower-cased) on construction so uniqueness
//! comparisons never depend on caller casing.

use std::fmt;
use std::sync::OnceLock;

use chrono::{DateTime, Utc};
use regex::Regex;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

/// Validation errors returned by the user model constructors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserValidationError {
    /// Identifier was empty.
    EmptyId,
    /// Identifier was not a valid UUID.
    InvalidId,
    /// Email address failed the well-formedness check.
    InvalidEmail,
    /// Email address exceeded the storage bound.
    EmailTooLong { max: usize },
    /// Name was shorter than the minimum once trimmed.
    NameTooShort { min: usize },
    /// Name exceeded the storage bound.
    NameTooLong { max: usize },
}

impl fmt::Display for UserValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyId => write!(f, "user id must not be empty"),
            Self::InvalidId => write!(f, "user id must be a valid UUID"),
            Self::InvalidEmail => write!(f, "email must be a valid address"),
            Self::EmailTooLong { max } => {
                write!(f, "email must be at most {max} characters")
            }
            Self::NameTooShort { min } => {
                write!(f, "name must be at least {min} characters")
            }
            Self::NameTooLong { max } => {
                write!(f, "name must be at most {max} characters")
            }
        }
    }
}

impl std::error::Error for UserValidationError {}

/// Stable user identifier stored as a UUID.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct UserId(Uuid);

impl UserId {
    /// Validate and construct a [`UserId`] from borrowed input.
    pub fn new(id: impl AsRef<str>) -> Result<Self, UserValidationError> {
        let raw = id.as_ref();
        if raw.is_empty() {
            return Err(UserValidationError::EmptyId);
        }
        let parsed = Uuid::parse_str(raw).map_err(|_| UserValidationError::InvalidId)?;
        Ok(Self(parsed))
    }

    /// Generate a new random [`UserId`].
    pub fn random() -> Self {
        Self(Uuid::new_v4())
    }

    /// Access the underlying UUID.
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<UserId> for String {
    fn from(value: UserId) -> Self {
        value.to_string()
    }
}

impl TryFrom<String> for UserId {
    type Error = UserValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Maximum accepted email length, matching common mailbox limits.
pub const EMAIL_MAX: usize = 254;

static EMAIL_RE: OnceLock<Regex> = OnceLock::new();

fn email_regex() -> &'static Regex {
    EMAIL_RE.get_or_init(|| {
        // Well-formedness only: one `@`, no whitespace, a dotted domain.
        let pattern = r"^[^@\s]+@[^@\s]+\.[^@\s]+$";
        Regex::new(pattern)
            .unwrap_or_else(|error| panic!("email regex failed to compile: {error}"))
    })
}

/// Normalized email address used for lookups and uniqueness comparisons.
///
/// ## Invariants
/// - Stored lower-cased and trimmed; two addresses differing only in case
///   compare equal.
/// - Matches the well-formedness pattern (local part, `@`, dotted domain).
///
/// # Examples
/// ```
/// use wicket::domain::EmailAddress;
///
/// let email = EmailAddress::new("Jo@Example.com").unwrap();
/// assert_eq!(email.as_str(), "jo@example.com");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct EmailAddress(String);

impl EmailAddress {
    /// Validate, normalize, and construct an [`EmailAddress`].
    pub fn new(value: impl AsRef<str>) -> Result<Self, UserValidationError> {
        let normalized = value.as_ref().trim().to_lowercase();
        if normalized.chars().count() > EMAIL_MAX {
            return Err(UserValidationError::EmailTooLong { max: EMAIL_MAX });
        }
        if !email_regex().is_match(&normalized) {
            return Err(UserValidationError::InvalidEmail);
        }
        Ok(Self(normalized))
    }

    /// Borrow the normalized address.
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl AsRef<str> for EmailAddress {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl fmt::Display for EmailAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<EmailAddress> for String {
    fn from(value: EmailAddress) -> Self {
        value.0
    }
}

impl TryFrom<String> for EmailAddress {
    type Error = UserValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Minimum allowed length for a personal name.
pub const NAME_MIN: usize = 2;
/// Maximum allowed length for a personal name.
pub const NAME_MAX: usize = 64;

/// A first or last name, trimmed and length-bounded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct PersonName(String);

impl PersonName {
    /// Validate and construct a [`PersonName`].
    pub fn new(value: impl AsRef<str>) -> Result<Self, UserValidationError> {
        let trimmed = value.as_ref().trim();
        let length = trimmed.chars().count();
        if length < NAME_MIN {
            return Err(UserValidationError::NameTooShort { min: NAME_MIN });
        }
        if length > NAME_MAX {
            return Err(UserValidationError::NameTooLong { max: NAME_MAX });
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Borrow the name.
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl AsRef<str> for PersonName {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl fmt::Display for PersonName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<PersonName> for String {
    fn from(value: PersonName) -> Self {
        value.0
    }
}

impl TryFrom<String> for PersonName {
    type Error = UserValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Opaque password hash as produced by the credential hasher.
///
/// ## Invariants
/// - Never the plaintext password.
/// - Has no serde implementations, so no response or log serialization path
///   can carry it.
#[derive(Clone, PartialEq, Eq)]
pub struct PasswordHash(String);

impl PasswordHash {
    /// Wrap an encoded hash string.
    pub fn new(encoded: impl Into<String>) -> Self {
        Self(encoded.into())
    }

    /// Borrow the encoded hash for verification.
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Debug for PasswordHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("PasswordHash(redacted)")
    }
}

/// Stored user record, owned by the user store.
///
/// Created by the registration flow and never mutated afterwards. The record
/// is not serializable; responses carry a [`UserSummary`] projection instead.
#[derive(Debug, Clone)]
pub struct UserRecord {
    id: UserId,
    email: EmailAddress,
    password_hash: PasswordHash,
    first_name: PersonName,
    last_name: PersonName,
    created_at: DateTime<Utc>,
}

impl UserRecord {
    /// Build a record from validated components.
    pub fn new(
        id: UserId,
        email: EmailAddress,
        password_hash: PasswordHash,
        first_name: PersonName,
        last_name: PersonName,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            email,
            password_hash,
            first_name,
            last_name,
            created_at,
        }
    }

    /// Stable user identifier.
    pub fn id(&self) -> &UserId {
        &self.id
    }

    /// Normalized email address.
    pub fn email(&self) -> &EmailAddress {
        &self.email
    }

    /// Stored password hash.
    pub fn password_hash(&self) -> &PasswordHash {
        &self.password_hash
    }

    /// First name.
    pub fn first_name(&self) -> &PersonName {
        &self.first_name
    }

    /// Last name.
    pub fn last_name(&self) -> &PersonName {
        &self.last_name
    }

    /// Creation timestamp.
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}

/// Serializable projection of a [`UserRecord`] returned in responses.
///
/// ## Invariants
/// - Carries no password material.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
#[serde(deny_unknown_fields)]
#[serde(try_from = "UserSummaryDto", into = "UserSummaryDto")]
pub struct UserSummary {
    #[schema(value_type = String, example = "3fa85f64-5717-4562-b3fc-2c963f66afa6")]
    id: UserId,
    #[schema(value_type = String, example = "ada@example.com")]
    email: EmailAddress,
    #[schema(value_type = String, example = "Ada")]
    first_name: PersonName,
    #[schema(value_type = String, example = "Lovelace")]
    last_name: PersonName,
}

impl UserSummary {
    /// Build a summary from validated components.
    pub fn new(
        id: UserId,
        email: EmailAddress,
        first_name: PersonName,
        last_name: PersonName,
    ) -> Self {
        Self {
            id,
            email,
            first_name,
            last_name,
        }
    }

    /// Stable user identifier.
    pub fn id(&self) -> &UserId {
        &self.id
    }

    /// Normalized email address.
    pub fn email(&self) -> &EmailAddress {
        &self.email
    }

    /// First name.
    pub fn first_name(&self) -> &PersonName {
        &self.first_name
    }

    /// Last name.
    pub fn last_name(&self) -> &PersonName {
        &self.last_name
    }
}

impl From<&UserRecord> for UserSummary {
    fn from(record: &UserRecord) -> Self {
        Self {
            id: record.id().clone(),
            email: record.email().clone(),
            first_name: record.first_name().clone(),
            last_name: record.last_name().clone(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
struct UserSummaryDto {
    id: String,
    email: String,
    first_name: String,
    last_name: String,
}

impl From<UserSummary> for UserSummaryDto {
    fn from(value: UserSummary) -> Self {
        let UserSummary {
            id,
            email,
            first_name,
            last_name,
        } = value;
        Self {
            id: id.to_string(),
            email: email.into(),
            first_name: first_name.into(),
            last_name: last_name.into(),
        }
    }
}

impl TryFrom<UserSummaryDto> for UserSummary {
    type Error = UserValidationError;

    fn try_from(value: UserSummaryDto) -> Result<Self, Self::Error> {
        Ok(UserSummary {
            id: UserId::new(value.id)?,
            email: EmailAddress::new(value.email)?,
            first_name: PersonName::new(value.first_name)?,
            last_name: PersonName::new(value.last_name)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use serde_json::{Value, json};

    #[rstest]
    #[case("Jo@Example.com", "jo@example.com")]
    #[case("  MIXED@Case.Org  ", "mixed@case.org")]
    #[case("plain@domain.net", "plain@domain.net")]
    fn email_is_normalized(#[case] raw: &str, #[case] expected: &str) {
        let email = EmailAddress::new(raw).expect("valid email");
        assert_eq!(email.as_str(), expected);
    }

    #[rstest]
    #[case("")]
    #[case("no-at-sign")]
    #[case("two@@signs@x.com")]
    #[case("spaces in@local.com")]
    #[case("missing@tld")]
    fn malformed_email_is_rejected(#[case] raw: &str) {
        let err = EmailAddress::new(raw).expect_err("malformed email must fail");
        assert_eq!(err, UserValidationError::InvalidEmail);
    }

    #[rstest]
    fn overlong_email_is_rejected() {
        let raw = format!("{}@example.com", "a".repeat(EMAIL_MAX));
        let err = EmailAddress::new(raw).expect_err("overlong email must fail");
        assert_eq!(err, UserValidationError::EmailTooLong { max: EMAIL_MAX });
    }

    #[rstest]
    #[case("")]
    #[case(" ")]
    #[case("J")]
    fn short_name_is_rejected(#[case] raw: &str) {
        let err = PersonName::new(raw).expect_err("short name must fail");
        assert_eq!(err, UserValidationError::NameTooShort { min: NAME_MIN });
    }

    #[rstest]
    fn name_is_trimmed() {
        let name = PersonName::new("  Ada  ").expect("valid name");
        assert_eq!(name.as_str(), "Ada");
    }

    #[rstest]
    #[case("not-a-uuid")]
    #[case("3fa85f64")]
    fn invalid_user_id_is_rejected(#[case] raw: &str) {
        let err = UserId::new(raw).expect_err("invalid id must fail");
        assert_eq!(err, UserValidationError::InvalidId);
    }

    #[rstest]
    fn random_ids_are_distinct() {
        assert_ne!(UserId::random(), UserId::random());
    }

    #[rstest]
    fn password_hash_debug_is_redacted() {
        let hash = PasswordHash::new("$2b$12$abcdefghijklmnopqrstuv");
        assert_eq!(format!("{hash:?}"), "PasswordHash(redacted)");
    }

    #[rstest]
    fn summary_serializes_camel_case() {
        let summary = UserSummary::new(
            UserId::new("3fa85f64-5717-4562-b3fc-2c963f66afa6").expect("fixture id"),
            EmailAddress::new("ada@example.com").expect("fixture email"),
            PersonName::new("Ada").expect("fixture name"),
            PersonName::new("Lovelace").expect("fixture name"),
        );
        let value = serde_json::to_value(&summary).expect("serialize summary");
        assert_eq!(
            value,
            json!({
                "id": "3fa85f64-5717-4562-b3fc-2c963f66afa6",
                "email": "ada@example.com",
                "firstName": "Ada",
                "lastName": "Lovelace",
            })
        );
    }

    #[rstest]
    fn summary_round_trips_through_json() {
        let summary = UserSummary::new(
            UserId::random(),
            EmailAddress::new("jo@li.dev").expect("fixture email"),
            PersonName::new("Jo").expect("fixture name"),
            PersonName::new("Li").expect("fixture name"),
        );
        let raw = serde_json::to_string(&summary).expect("serialize summary");
        let parsed: UserSummary = serde_json::from_str(&raw).expect("deserialize summary");
        assert_eq!(parsed, summary);
    }

    #[rstest]
    fn summary_rejects_invalid_payload() {
        let raw: Value = json!({
            "id": "not-a-uuid",
            "email": "ada@example.com",
            "firstName": "Ada",
            "lastName": "Lovelace",
        });
        let result: Result<UserSummary, _> = serde_json::from_value(raw);
        assert!(result.is_err(), "invalid id must not deserialize");
    }
}
