//! Mock backend — static fixture data behind an artificial delay.
//!
//! Fixtures simulate a small GRC tenant so the console is usable without
//! any running database. Every call sleeps for a fixed latency first to
//! keep loading states honest. Saves and deletes mutate an in-process
//! copy so write round-trips behave like the real backends.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use serde_json::{Map, Value, json};
use tokio::sync::Mutex;
use uuid::Uuid;
use vigil_core::record::Record;

use crate::error::StoreError;
use crate::source::CollectionBackend;

/// Simulated backend latency.
const DEFAULT_LATENCY: Duration = Duration::from_millis(300);

const TENANT_ID: &str = "11111111-1111-4111-8111-111111111111";
const USER_ALICE: &str = "22222222-2222-4222-8222-222222222221";
const USER_BOB: &str = "22222222-2222-4222-8222-222222222222";
const RES_ERP: &str = "33333333-3333-4333-8333-333333333331";
const RES_AD: &str = "33333333-3333-4333-8333-333333333332";
const ENT_ERP_ADMIN: &str = "44444444-4444-4444-8444-444444444441";
const ENT_AD_RESET: &str = "44444444-4444-4444-8444-444444444442";
const RISK_RANSOM: &str = "55555555-5555-4555-8555-555555555551";

#[derive(Clone)]
pub struct MockBackend {
    latency: Duration,
    data: Arc<Mutex<HashMap<String, Vec<Record>>>>,
}

impl MockBackend {
    pub fn new() -> Self {
        Self::with_latency(DEFAULT_LATENCY)
    }

    /// Tests shorten the latency; the default stays realistic.
    pub fn with_latency(latency: Duration) -> Self {
        Self {
            latency,
            data: Arc::new(Mutex::new(fixtures())),
        }
    }
}

impl Default for MockBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl CollectionBackend for MockBackend {
    async fn fetch(&self, collection: &str) -> Result<Vec<Record>, StoreError> {
        tokio::time::sleep(self.latency).await;
        let data = self.data.lock().await;
        Ok(data.get(collection).cloned().unwrap_or_default())
    }

    async fn save(
        &self,
        collection: &str,
        id: Option<&str>,
        fields: Map<String, Value>,
    ) -> Result<Record, StoreError> {
        tokio::time::sleep(self.latency).await;
        let id = id
            .map(str::to_string)
            .unwrap_or_else(|| Uuid::new_v4().to_string());
        let record = Record::new(id.clone(), fields);

        let mut data = self.data.lock().await;
        let records = data.entry(collection.to_string()).or_default();
        match records.iter_mut().find(|r| r.id == id) {
            Some(existing) => *existing = record.clone(),
            None => records.push(record.clone()),
        }
        Ok(record)
    }

    async fn delete(&self, collection: &str, id: &str) -> Result<(), StoreError> {
        tokio::time::sleep(self.latency).await;
        let mut data = self.data.lock().await;
        if let Some(records) = data.get_mut(collection) {
            records.retain(|r| r.id != id);
        }
        Ok(())
    }
}

fn record(id: &str, fields: Value) -> Record {
    match fields {
        Value::Object(map) => Record::new(id, map),
        _ => unreachable!("fixtures are objects"),
    }
}

/// Demo tenant: two users, two resources, two entitlements, one granted
/// assignment, one open risk with a planned measure. The AI settings
/// collection starts empty so the default cloud provider applies.
fn fixtures() -> HashMap<String, Vec<Record>> {
    let mut data = HashMap::new();

    data.insert(
        "tenants".to_string(),
        vec![record(
            TENANT_ID,
            json!({
                "name": "Musterfirma GmbH",
                "regulatory_framework": "ISO27001",
                "company_description": "Mittelständischer Maschinenbauer mit 250 Mitarbeitenden, \
                 Produktion in Deutschland, SAP-zentrierte IT-Landschaft.",
                "directory_integration": null,
                "created_at": "2024-01-15T09:00:00Z",
                "updated_at": "2024-01-15T09:00:00Z",
            }),
        )],
    );

    data.insert(
        "users".to_string(),
        vec![
            record(
                USER_ALICE,
                json!({
                    "tenant_id": TENANT_ID,
                    "username": "a.schmidt",
                    "email": "a.schmidt@musterfirma.de",
                    "password_hash": "$argon2id$v=19$m=19456,t=2,p=1$placeholder$placeholder",
                    "enabled": true,
                    "department": "Finance",
                    "created_at": "2024-02-01T08:30:00Z",
                    "updated_at": "2024-02-01T08:30:00Z",
                }),
            ),
            record(
                USER_BOB,
                json!({
                    "tenant_id": TENANT_ID,
                    "username": "b.meier",
                    "email": "b.meier@musterfirma.de",
                    "password_hash": "$argon2id$v=19$m=19456,t=2,p=1$placeholder$placeholder",
                    "enabled": false,
                    "department": "IT",
                    "created_at": "2024-02-03T10:15:00Z",
                    "updated_at": "2024-06-20T07:45:00Z",
                }),
            ),
        ],
    );

    data.insert(
        "resources".to_string(),
        vec![
            record(
                RES_ERP,
                json!({
                    "tenant_id": TENANT_ID,
                    "name": "SAP ERP",
                    "kind": "application",
                    "owner": "a.schmidt",
                    "criticality": "critical",
                    "description": "Zentrales ERP-System (Finanzbuchhaltung, Einkauf).",
                    "created_at": "2024-01-20T12:00:00Z",
                    "updated_at": "2024-01-20T12:00:00Z",
                }),
            ),
            record(
                RES_AD,
                json!({
                    "tenant_id": TENANT_ID,
                    "name": "Active Directory",
                    "kind": "directory",
                    "owner": "b.meier",
                    "criticality": "high",
                    "description": "Zentrale Benutzer- und Rechteverwaltung.",
                    "created_at": "2024-01-20T12:05:00Z",
                    "updated_at": "2024-01-20T12:05:00Z",
                }),
            ),
        ],
    );

    data.insert(
        "entitlements".to_string(),
        vec![
            record(
                ENT_ERP_ADMIN,
                json!({
                    "tenant_id": TENANT_ID,
                    "resource_id": RES_ERP,
                    "name": "SAP_ALL",
                    "description": "Vollzugriff auf alle SAP-Module.",
                    "risk_level": "critical",
                    "created_at": "2024-01-21T09:00:00Z",
                    "updated_at": "2024-01-21T09:00:00Z",
                }),
            ),
            record(
                ENT_AD_RESET,
                json!({
                    "tenant_id": TENANT_ID,
                    "resource_id": RES_AD,
                    "name": "Password-Reset-Operator",
                    "description": "Darf Passwörter anderer Benutzer zurücksetzen.",
                    "risk_level": "high",
                    "created_at": "2024-01-21T09:10:00Z",
                    "updated_at": "2024-01-21T09:10:00Z",
                }),
            ),
        ],
    );

    data.insert(
        "assignments".to_string(),
        vec![record(
            "66666666-6666-4666-8666-666666666661",
            json!({
                "tenant_id": TENANT_ID,
                "user_id": USER_ALICE,
                "entitlement_id": ENT_ERP_ADMIN,
                "granted_at": "2024-03-01T11:00:00Z",
                "granted_by": "b.meier",
            }),
        )],
    );

    data.insert(
        "risks".to_string(),
        vec![record(
            RISK_RANSOM,
            json!({
                "tenant_id": TENANT_ID,
                "title": "Ransomware-Angriff auf Produktionsserver",
                "description": "Verschlüsselung der Fertigungssteuerung durch Schadsoftware.",
                "probability": 3,
                "impact": 5,
                "status": "open",
                "created_at": "2024-04-10T14:00:00Z",
                "updated_at": "2024-04-10T14:00:00Z",
            }),
        )],
    );

    data.insert(
        "measures".to_string(),
        vec![record(
            "77777777-7777-4777-8777-777777777771",
            json!({
                "tenant_id": TENANT_ID,
                "risk_id": RISK_RANSOM,
                "title": "Offline-Backups einführen",
                "description": "Tägliche Offline-Sicherung der Produktionsdaten.",
                "status": "planned",
                "due_date": "2024-09-30T00:00:00Z",
                "created_at": "2024-04-11T08:00:00Z",
                "updated_at": "2024-04-11T08:00:00Z",
            }),
        )],
    );

    data.insert("ai_settings".to_string(), Vec::new());
    data.insert("mail_settings".to_string(), Vec::new());
    data.insert("export_settings".to_string(), Vec::new());

    data
}
