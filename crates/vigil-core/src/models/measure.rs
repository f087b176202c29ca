//! Measure domain model — a mitigation action attached to a risk.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MeasureStatus {
    Planned,
    InProgress,
    Done,
    Discarded,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Measure {
    pub id: Uuid,
    pub tenant_id: Uuid,
    pub risk_id: Uuid,
    pub title: String,
    pub description: String,
    pub status: MeasureStatus,
    pub due_date: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
