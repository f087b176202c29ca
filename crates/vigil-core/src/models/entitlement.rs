//! Entitlement domain model — a grantable permission on a resource.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::resource::Criticality;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Entitlement {
    pub id: Uuid,
    pub tenant_id: Uuid,
    pub resource_id: Uuid,
    pub name: String,
    pub description: String,
    /// Risk level attached to holding this entitlement.
    pub risk_level: Criticality,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
