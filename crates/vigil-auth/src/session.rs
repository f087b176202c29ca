//! Opaque session tokens.

use argon2::password_hash::rand_core::{OsRng, RngCore};
use chrono::{DateTime, Duration, Utc};
use uuid::Uuid;

/// An issued session. The token is opaque; the cookie gate in front of
/// the protected routes only checks presence and expiry.
#[derive(Debug, Clone)]
pub struct Session {
    pub token: String,
    pub user_id: Uuid,
    pub tenant_id: Uuid,
    pub issued_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

impl Session {
    pub fn issue(user_id: Uuid, tenant_id: Uuid, lifetime_secs: u64) -> Self {
        let now = Utc::now();
        Self {
            token: random_token(),
            user_id,
            tenant_id,
            issued_at: now,
            expires_at: now + Duration::seconds(lifetime_secs as i64),
        }
    }

    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }
}

/// 32 random bytes, hex-encoded.
fn random_token() -> String {
    let mut bytes = [0u8; 32];
    OsRng.fill_bytes(&mut bytes);
    bytes.iter().map(|b| format!("{b:02x}")).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tokens_are_unique_and_hex() {
        let a = random_token();
        let b = random_token();
        assert_ne!(a, b);
        assert_eq!(a.len(), 64);
        assert!(a.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn session_expiry() {
        let session = Session::issue(Uuid::new_v4(), Uuid::new_v4(), 60);
        assert!(!session.is_expired(session.issued_at));
        assert!(session.is_expired(session.expires_at + Duration::seconds(1)));
    }
}
