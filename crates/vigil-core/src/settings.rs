//! Process-wide application settings.
//!
//! The active data source and active tenant are mutable application state
//! persisted to a TOML file. Lifecycle is explicit: [`AppSettings::load`]
//! at startup (missing file yields defaults), [`AppSettings::persist`] on
//! every change. The value itself is passed to consumers explicitly — there
//! is no ambient global.

use std::path::Path;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{VigilError, VigilResult};

/// Which backend the collection facade reads from and writes to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum DataSource {
    /// On-demand fetches against the shared SQLite pool.
    #[default]
    Relational,
    /// Live subscriptions against SurrealDB.
    Document,
    /// Static fixtures behind an artificial delay.
    Mock,
}

impl std::fmt::Display for DataSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Relational => write!(f, "relational"),
            Self::Document => write!(f, "document"),
            Self::Mock => write!(f, "mock"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct AppSettings {
    #[serde(default)]
    pub data_source: DataSource,
    #[serde(default)]
    pub active_tenant: Option<Uuid>,
}

impl AppSettings {
    /// Load settings from `path`. A missing file is not an error: the
    /// defaults apply until the first persist.
    pub fn load(path: &Path) -> VigilResult<Self> {
        let raw = match std::fs::read_to_string(path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Ok(Self::default());
            }
            Err(e) => {
                return Err(VigilError::Settings(format!(
                    "cannot read {}: {e}",
                    path.display()
                )));
            }
        };
        toml::from_str(&raw)
            .map_err(|e| VigilError::Settings(format!("malformed settings file: {e}")))
    }

    /// Write the current settings back to `path`.
    pub fn persist(&self, path: &Path) -> VigilResult<()> {
        let raw = toml::to_string_pretty(self)
            .map_err(|e| VigilError::Settings(format!("cannot serialize settings: {e}")))?;
        std::fs::write(path, raw).map_err(|e| {
            VigilError::Settings(format!("cannot write {}: {e}", path.display()))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let settings = AppSettings::load(&dir.path().join("absent.toml")).unwrap();
        assert_eq!(settings, AppSettings::default());
        assert_eq!(settings.data_source, DataSource::Relational);
    }

    #[test]
    fn persist_then_load_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.toml");
        let settings = AppSettings {
            data_source: DataSource::Document,
            active_tenant: Some(Uuid::new_v4()),
        };
        settings.persist(&path).unwrap();
        assert_eq!(AppSettings::load(&path).unwrap(), settings);
    }

    #[test]
    fn malformed_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.toml");
        std::fs::write(&path, "data_source = 42").unwrap();
        assert!(AppSettings::load(&path).is_err());
    }
}
