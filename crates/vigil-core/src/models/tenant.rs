//! Tenant domain model.
//!
//! Tenants provide full data isolation. All domain entities (users,
//! resources, entitlements, risks, measures) are scoped to a tenant.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Connection settings for an external user directory.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DirectoryIntegration {
    /// Directory server URL (e.g. `ldaps://ad.example.com:636`).
    pub server_url: String,
    pub bind_dn: String,
    pub bind_password: String,
    /// Directory attribute name → VIGIL field name.
    pub attribute_mappings: serde_json::Map<String, serde_json::Value>,
}

/// An isolated organizational unit.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Tenant {
    pub id: Uuid,
    /// Human-readable name.
    pub name: String,
    /// Regulatory framework this tenant is audited against
    /// (e.g. `ISO27001`, `BSI-Grundschutz`, `DORA`).
    pub regulatory_framework: String,
    /// Free-text description of the company, fed to the AI flows as
    /// context for tenant-specific advice.
    pub company_description: String,
    pub directory_integration: Option<DirectoryIntegration>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
