//! Risk domain model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskStatus {
    Open,
    Mitigating,
    Accepted,
    Closed,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Risk {
    pub id: Uuid,
    pub tenant_id: Uuid,
    pub title: String,
    pub description: String,
    /// Likelihood of occurrence, 1 (rare) to 5 (almost certain).
    pub probability: u8,
    /// Damage on occurrence, 1 (negligible) to 5 (existential).
    pub impact: u8,
    pub status: RiskStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Risk {
    /// Probability × impact, the score shown on the risk matrix.
    pub fn score(&self) -> u8 {
        self.probability.saturating_mul(self.impact)
    }
}
