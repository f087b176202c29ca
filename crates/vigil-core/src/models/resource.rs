//! Resource domain model — an IT system or application under governance.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Criticality {
    Low,
    Medium,
    High,
    Critical,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Resource {
    pub id: Uuid,
    pub tenant_id: Uuid,
    pub name: String,
    /// Resource kind (e.g. `application`, `database`, `fileshare`).
    pub kind: String,
    /// Responsible owner (display name or user id).
    pub owner: String,
    pub criticality: Criticality,
    pub description: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
