//! User domain model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    pub tenant_id: Uuid,
    pub username: String,
    pub email: String,
    /// Argon2id PHC-format hash. Every backend stores hashes, never
    /// plaintext, and every login path verifies against this field.
    pub password_hash: String,
    pub enabled: bool,
    /// Department or org-unit label, used for access-review context.
    pub department: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
