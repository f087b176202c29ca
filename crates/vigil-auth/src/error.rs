//! Auth-specific error types.

use thiserror::Error;
use vigil_core::error::VigilError;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum AuthError {
    /// Unknown user or wrong password — deliberately indistinguishable.
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Account is disabled")]
    AccountDisabled,

    #[error("Password too short: minimum {minimum} characters")]
    PasswordTooShort { minimum: usize },

    #[error("Cryptography error: {0}")]
    Crypto(String),
}

impl From<AuthError> for VigilError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::Crypto(msg) => VigilError::Crypto(msg),
            other => VigilError::AuthenticationFailed {
                reason: other.to_string(),
            },
        }
    }
}
