//! Authentication service — login orchestration.
//!
//! The credential check is identical for every data source: look the user
//! up through the repository trait, verify the Argon2id hash, check the
//! enabled flag, issue an opaque session. No backend path falls back to
//! field-equality comparison.

use tracing::info;
use uuid::Uuid;
use vigil_core::error::VigilResult;
use vigil_core::repository::UserRepository;

use crate::config::AuthConfig;
use crate::error::AuthError;
use crate::password;
use crate::session::Session;

/// Input for the login flow.
#[derive(Debug)]
pub struct LoginInput {
    pub tenant_id: Uuid,
    pub username_or_email: String,
    pub password: String,
}

/// Successful login result.
#[derive(Debug)]
pub struct LoginOutput {
    pub session: Session,
}

/// Authentication service.
///
/// Generic over the repository implementation so that the auth layer has
/// no dependency on the store crate.
pub struct AuthService<U: UserRepository> {
    users: U,
    config: AuthConfig,
}

impl<U: UserRepository> AuthService<U> {
    pub fn new(users: U, config: AuthConfig) -> Self {
        Self { users, config }
    }

    /// Authenticate with username/email + password and issue a session.
    pub async fn login(&self, input: LoginInput) -> VigilResult<LoginOutput> {
        // 1. Look up the user. An unknown login and a wrong password must
        //    be indistinguishable to the caller.
        let user = self
            .users
            .find_by_login(input.tenant_id, &input.username_or_email)
            .await?
            .ok_or(AuthError::InvalidCredentials)?;

        // 2. Verify the password.
        let valid = password::verify_password(
            &input.password,
            &user.password_hash,
            self.config.pepper.as_deref(),
        )
        .unwrap_or(false);
        if !valid {
            return Err(AuthError::InvalidCredentials.into());
        }

        // 3. Check the account flag.
        if !user.enabled {
            return Err(AuthError::AccountDisabled.into());
        }

        let session = Session::issue(user.id, user.tenant_id, self.config.session_lifetime_secs);
        info!(user = %user.username, tenant = %user.tenant_id, "login succeeded");
        Ok(LoginOutput { session })
    }

    /// Hash a new password for provisioning, enforcing the length policy.
    pub fn hash_new_password(&self, password: &str) -> Result<String, AuthError> {
        if password.chars().count() < self.config.min_password_length {
            return Err(AuthError::PasswordTooShort {
                minimum: self.config.min_password_length,
            });
        }
        password::hash_password(password, self.config.pepper.as_deref())
    }
}
