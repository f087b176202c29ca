//! VIGIL server — application entry point.
//!
//! Initializes tracing, loads the persisted application settings, wires
//! the three store backends into the collection facade and keeps the
//! process alive until interrupted. Permission denials from the document
//! backend are drained from the shared error channel and logged.

use std::path::PathBuf;
use std::sync::Arc;

use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;
use vigil_core::error::{VigilError, VigilResult};
use vigil_core::settings::AppSettings;
use vigil_store::{
    CollectionFacade, DocumentBackend, DocumentConfig, ErrorChannel, MockBackend,
    RelationalBackend,
};

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("vigil=info".parse().unwrap()))
        .json()
        .init();

    if let Err(e) = run().await {
        error!(error = %e, "server exited with error");
        std::process::exit(1);
    }
}

async fn run() -> VigilResult<()> {
    let settings_path = PathBuf::from(env_or("VIGIL_SETTINGS", "vigil.toml"));
    let settings = AppSettings::load(&settings_path)?;
    info!(
        data_source = %settings.data_source,
        active_tenant = ?settings.active_tenant,
        "starting VIGIL server"
    );

    let errors = ErrorChannel::new();

    let relational = RelationalBackend::connect(&env_or(
        "VIGIL_SQLITE_URL",
        "sqlite://vigil.db?mode=rwc",
    ))
    .await?;

    let defaults = DocumentConfig::default();
    let document_config = DocumentConfig {
        url: env_or("VIGIL_SURREAL_URL", &defaults.url),
        namespace: env_or("VIGIL_SURREAL_NS", &defaults.namespace),
        database: env_or("VIGIL_SURREAL_DB", &defaults.database),
        username: env_or("VIGIL_SURREAL_USER", &defaults.username),
        password: env_or("VIGIL_SURREAL_PASS", &defaults.password),
    };
    let document = DocumentBackend::connect(&document_config, errors.clone()).await?;
    vigil_store::run_migrations(document.client()).await?;

    let mock = MockBackend::new();

    let facade = Arc::new(CollectionFacade::new(
        relational,
        document,
        mock,
        settings.data_source,
        errors.clone(),
    ));

    // Surface permission denials as structured log lines for operators.
    let mut permission_rx = errors.subscribe();
    tokio::spawn(async move {
        while let Ok(event) = permission_rx.recv().await {
            warn!(operation = ?event.operation, path = %event.path, "permission denied");
        }
    });

    info!(source = %facade.data_source(), "collection facade ready");

    tokio::signal::ctrl_c()
        .await
        .map_err(|e| VigilError::Internal(format!("signal handler failed: {e}")))?;
    info!("shutdown requested");

    settings.persist(&settings_path)?;
    Ok(())
}
