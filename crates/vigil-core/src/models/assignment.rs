//! Assignment domain model — an entitlement granted to a user.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Assignment {
    pub id: Uuid,
    pub tenant_id: Uuid,
    pub user_id: Uuid,
    pub entitlement_id: Uuid,
    pub granted_at: DateTime<Utc>,
    /// Who approved the grant (display name or user id).
    pub granted_by: String,
}
