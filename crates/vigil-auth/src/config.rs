//! Auth service configuration.

#[derive(Debug, Clone)]
pub struct AuthConfig {
    /// Optional application-wide pepper prepended before hashing and
    /// verification.
    pub pepper: Option<String>,
    /// Session lifetime in seconds.
    pub session_lifetime_secs: u64,
    pub min_password_length: usize,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            pepper: None,
            session_lifetime_secs: 3600,
            min_password_length: 12,
        }
    }
}
