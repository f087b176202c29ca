//! Schema definitions and migration runner for the document backend.
//!
//! Collections are SCHEMALESS because the facade passes records through
//! opaquely; the schema only pins down the collections themselves and the
//! lookup indexes the typed layers rely on. The relational backend runs
//! its own DDL in [`crate::RelationalBackend`].

use serde::Deserialize;
use surrealdb::{Connection, Surreal};
use tracing::info;

use crate::error::StoreError;

/// Every collection the console works with.
pub const COLLECTIONS: &[&str] = &[
    "tenants",
    "users",
    "resources",
    "entitlements",
    "assignments",
    "risks",
    "measures",
    "ai_settings",
    "mail_settings",
    "export_settings",
];

const MIGRATION_TABLE_DDL: &str = "\
DEFINE TABLE IF NOT EXISTS _migration SCHEMAFULL;
DEFINE FIELD IF NOT EXISTS version ON TABLE _migration TYPE int;
DEFINE FIELD IF NOT EXISTS name ON TABLE _migration TYPE string;
DEFINE FIELD IF NOT EXISTS applied_at ON TABLE _migration TYPE datetime \
    DEFAULT time::now();
DEFINE INDEX IF NOT EXISTS idx_migration_version ON TABLE _migration \
    COLUMNS version UNIQUE;
";

#[derive(Debug, Deserialize)]
struct MigrationRecord {
    version: u32,
}

struct Migration {
    version: u32,
    name: &'static str,
    sql: &'static str,
}

static MIGRATIONS: &[Migration] = &[Migration {
    version: 1,
    name: "initial_collections",
    sql: SCHEMA_V1,
}];

const SCHEMA_V1: &str = "\
DEFINE TABLE IF NOT EXISTS tenants SCHEMALESS;
DEFINE TABLE IF NOT EXISTS users SCHEMALESS;
DEFINE INDEX IF NOT EXISTS idx_users_tenant_username ON TABLE users \
    COLUMNS tenant_id, username UNIQUE;
DEFINE TABLE IF NOT EXISTS resources SCHEMALESS;
DEFINE TABLE IF NOT EXISTS entitlements SCHEMALESS;
DEFINE TABLE IF NOT EXISTS assignments SCHEMALESS;
DEFINE TABLE IF NOT EXISTS risks SCHEMALESS;
DEFINE TABLE IF NOT EXISTS measures SCHEMALESS;
DEFINE TABLE IF NOT EXISTS ai_settings SCHEMALESS;
DEFINE TABLE IF NOT EXISTS mail_settings SCHEMALESS;
DEFINE TABLE IF NOT EXISTS export_settings SCHEMALESS;
";

/// Apply all pending migrations to the document database.
pub async fn run_migrations<C: Connection>(db: &Surreal<C>) -> Result<(), StoreError> {
    db.query(MIGRATION_TABLE_DDL)
        .await
        .map_err(|e| StoreError::Document(e.to_string()))?
        .check()
        .map_err(|e| StoreError::Document(e.to_string()))?;

    let mut applied = db
        .query("SELECT version FROM _migration ORDER BY version ASC")
        .await
        .map_err(|e| StoreError::Document(e.to_string()))?;
    let applied: Vec<MigrationRecord> = applied
        .take(0)
        .map_err(|e| StoreError::Document(e.to_string()))?;
    let latest = applied.iter().map(|m| m.version).max().unwrap_or(0);

    for migration in MIGRATIONS.iter().filter(|m| m.version > latest) {
        info!(
            version = migration.version,
            name = migration.name,
            "applying document schema migration"
        );
        db.query(migration.sql)
            .await
            .map_err(|e| StoreError::Document(e.to_string()))?
            .check()
            .map_err(|e| StoreError::Document(e.to_string()))?;

        db.query("CREATE _migration SET version = $version, name = $name")
            .bind(("version", migration.version))
            .bind(("name", migration.name.to_string()))
            .await
            .map_err(|e| StoreError::Document(e.to_string()))?
            .check()
            .map_err(|e| StoreError::Document(e.to_string()))?;
    }

    Ok(())
}
