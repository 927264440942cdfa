//! Authentication input types.
//!
//! Keep inbound payload parsing outside the domain by exposing constructors
//! that validate string inputs before a handler talks to the auth service.
//! Plaintext passwords live in [`Zeroizing`] buffers so they are wiped when
//! dropped.

use std::fmt;

use zeroize::Zeroizing;

use super::password::MAX_PASSWORD_BYTES;
use super::user::{EmailAddress, NAME_MAX, NAME_MIN, PersonName, UserValidationError};

/// Minimum accepted password length, in characters.
pub const PASSWORD_MIN: usize = 8;

/// Domain error returned when registration payload values are invalid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegistrationValidationError {
    /// Email failed the well-formedness check.
    InvalidEmail,
    /// Password shorter than [`PASSWORD_MIN`] characters.
    PasswordTooShort { min: usize },
    /// Password longer than the hasher input bound.
    PasswordTooLong { max: usize },
    /// First name shorter than the minimum once trimmed.
    FirstNameTooShort { min: usize },
    /// First name over the storage bound.
    FirstNameTooLong { max: usize },
    /// Last name shorter than the minimum once trimmed.
    LastNameTooShort { min: usize },
    /// Last name over the storage bound.
    LastNameTooLong { max: usize },
}

impl fmt::Display for RegistrationValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidEmail => write!(f, "email must be a valid address"),
            Self::PasswordTooShort { min } => {
                write!(f, "password must be at least {min} characters")
            }
            Self::PasswordTooLong { max } => {
                write!(f, "password must be at most {max} bytes")
            }
            Self::FirstNameTooShort { min } => {
                write!(f, "first name must be at least {min} characters")
            }
            Self::FirstNameTooLong { max } => {
                write!(f, "first name must be at most {max} characters")
            }
            Self::LastNameTooShort { min } => {
                write!(f, "last name must be at least {min} characters")
            }
            Self::LastNameTooLong { max } => {
                write!(f, "last name must be at most {max} characters")
            }
        }
    }
}

impl std::error::Error for RegistrationValidationError {}

/// Validated registration input.
///
/// ## Invariants
/// - `email` is normalized and well-formed.
/// - `password` is between [`PASSWORD_MIN`] characters and the hasher bound,
///   retained verbatim (no trimming) so the stored credential matches what
///   the caller will present at login.
/// - Names are trimmed and within their length bounds.
#[derive(Debug, Clone)]
pub struct RegistrationDetails {
    email: EmailAddress,
    password: Zeroizing<String>,
    first_name: PersonName,
    last_name: PersonName,
}

impl RegistrationDetails {
    /// Construct registration details from raw string inputs.
    pub fn try_from_parts(
        email: &str,
        password: &str,
        first_name: &str,
        last_name: &str,
    ) -> Result<Self, RegistrationValidationError> {
        let email =
            EmailAddress::new(email).map_err(|_| RegistrationValidationError::InvalidEmail)?;
        if password.chars().count() < PASSWORD_MIN {
            return Err(RegistrationValidationError::PasswordTooShort { min: PASSWORD_MIN });
        }
        if password.len() > MAX_PASSWORD_BYTES {
            return Err(RegistrationValidationError::PasswordTooLong {
                max: MAX_PASSWORD_BYTES,
            });
        }
        let first_name = PersonName::new(first_name).map_err(map_first_name_error)?;
        let last_name = PersonName::new(last_name).map_err(map_last_name_error)?;

        Ok(Self {
            email,
            password: Zeroizing::new(password.to_owned()),
            first_name,
            last_name,
        })
    }

    /// Normalized email address.
    pub fn email(&self) -> &EmailAddress {
        &self.email
    }

    /// Consume the details, yielding their parts for the registration flow.
    pub fn into_parts(self) -> (EmailAddress, Zeroizing<String>, PersonName, PersonName) {
        let Self {
            email,
            password,
            first_name,
            last_name,
        } = self;
        (email, password, first_name, last_name)
    }
}

fn map_first_name_error(err: UserValidationError) -> RegistrationValidationError {
    match err {
        UserValidationError::NameTooLong { .. } => {
            RegistrationValidationError::FirstNameTooLong { max: NAME_MAX }
        }
        _ => RegistrationValidationError::FirstNameTooShort { min: NAME_MIN },
    }
}

fn map_last_name_error(err: UserValidationError) -> RegistrationValidationError {
    match err {
        UserValidationError::NameTooLong { .. } => {
            RegistrationValidationError::LastNameTooLong { max: NAME_MAX }
        }
        _ => RegistrationValidationError::LastNameTooShort { min: NAME_MIN },
    }
}

/// Domain error returned when login payload values are invalid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoginValidationError {
    /// Email failed the well-formedness check.
    InvalidEmail,
    /// Password was blank.
    EmptyPassword,
}

impl fmt::Display for LoginValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidEmail => write!(f, "email must be a valid address"),
            Self::EmptyPassword => write!(f, "password must not be empty"),
        }
    }
}

impl std::error::Error for LoginValidationError {}

/// Validated login credentials.
///
/// ## Invariants
/// - `email` is normalized and well-formed.
/// - `password` is non-empty but retains caller-provided whitespace to avoid
///   surprising credential comparisons.
#[derive(Debug, Clone)]
pub struct LoginCredentials {
    email: EmailAddress,
    password: Zeroizing<String>,
}

impl LoginCredentials {
    /// Construct credentials from raw email/password inputs.
    pub fn try_from_parts(email: &str, password: &str) -> Result<Self, LoginValidationError> {
        let email = EmailAddress::new(email).map_err(|_| LoginValidationError::InvalidEmail)?;
        if password.is_empty() {
            return Err(LoginValidationError::EmptyPassword);
        }
        Ok(Self {
            email,
            password: Zeroizing::new(password.to_owned()),
        })
    }

    /// Normalized email address used for the store lookup.
    pub fn email(&self) -> &EmailAddress {
        &self.email
    }

    /// Consume the credentials, yielding email and password.
    pub fn into_parts(self) -> (EmailAddress, Zeroizing<String>) {
        let Self { email, password } = self;
        (email, password)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("not-an-email", "longenough1", "Jo", "Li", RegistrationValidationError::InvalidEmail)]
    #[case("a@b.com", "short", "Jo", "Li", RegistrationValidationError::PasswordTooShort { min: PASSWORD_MIN })]
    #[case("a@b.com", "longenough1", "J", "Li", RegistrationValidationError::FirstNameTooShort { min: NAME_MIN })]
    #[case("a@b.com", "longenough1", "Jo", "", RegistrationValidationError::LastNameTooShort { min: NAME_MIN })]
    fn invalid_registration_input(
        #[case] email: &str,
        #[case] password: &str,
        #[case] first_name: &str,
        #[case] last_name: &str,
        #[case] expected: RegistrationValidationError,
    ) {
        let err = RegistrationDetails::try_from_parts(email, password, first_name, last_name)
            .expect_err("invalid inputs must fail");
        assert_eq!(err, expected);
    }

    #[rstest]
    fn oversized_password_is_rejected_before_hashing() {
        let oversized = "x".repeat(MAX_PASSWORD_BYTES + 1);
        let err = RegistrationDetails::try_from_parts("a@b.com", &oversized, "Jo", "Li")
            .expect_err("oversized password must fail");
        assert_eq!(
            err,
            RegistrationValidationError::PasswordTooLong {
                max: MAX_PASSWORD_BYTES
            }
        );
    }

    #[rstest]
    fn registration_normalizes_email() {
        let details =
            RegistrationDetails::try_from_parts("A@B.com", "longenough1", "Jo", "Li")
                .expect("valid inputs");
        assert_eq!(details.email().as_str(), "a@b.com");
    }

    #[rstest]
    #[case("", "pw", LoginValidationError::InvalidEmail)]
    #[case("not-an-email", "pw", LoginValidationError::InvalidEmail)]
    #[case("a@b.com", "", LoginValidationError::EmptyPassword)]
    fn invalid_login_input(
        #[case] email: &str,
        #[case] password: &str,
        #[case] expected: LoginValidationError,
    ) {
        let err =
            LoginCredentials::try_from_parts(email, password).expect_err("invalid inputs must fail");
        assert_eq!(err, expected);
    }

    #[rstest]
    fn login_password_keeps_whitespace() {
        let credentials =
            LoginCredentials::try_from_parts("a@b.com", "  padded  ").expect("valid inputs");
        let (_, password) = credentials.into_parts();
        assert_eq!(password.as_str(), "  padded  ");
    }
}
