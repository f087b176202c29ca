//! Facade-backed implementations of the core repository traits.

use std::sync::Arc;

use surrealdb::Connection;
use vigil_core::error::VigilResult;
use vigil_core::models::config::AiProviderConfig;
use vigil_core::models::user::User;
use vigil_core::repository::{ConfigRepository, UserRepository};
use vigil_core::settings::DataSource;
use uuid::Uuid;

use crate::facade::CollectionFacade;

/// User lookup through the collection facade. The data source is fixed at
/// construction (callers pass their per-request hint); `None` follows the
/// facade's current setting.
#[derive(Clone)]
pub struct StoreUserRepository<C: Connection> {
    facade: Arc<CollectionFacade<C>>,
    data_source: Option<DataSource>,
}

impl<C: Connection> StoreUserRepository<C> {
    pub fn new(facade: Arc<CollectionFacade<C>>, data_source: Option<DataSource>) -> Self {
        Self {
            facade,
            data_source,
        }
    }

    fn source(&self) -> DataSource {
        self.data_source.unwrap_or_else(|| self.facade.data_source())
    }
}

impl<C: Connection> UserRepository for StoreUserRepository<C> {
    async fn find_by_login(
        &self,
        tenant_id: Uuid,
        username_or_email: &str,
    ) -> VigilResult<Option<User>> {
        let records = self.facade.fetch_from("users", self.source()).await?;
        let tenant = tenant_id.to_string();

        for record in records {
            let in_tenant = record
                .get("tenant_id")
                .and_then(|v| v.as_str())
                .is_some_and(|t| t == tenant);
            if !in_tenant {
                continue;
            }
            let matches = [record.get("username"), record.get("email")]
                .into_iter()
                .flatten()
                .filter_map(|v| v.as_str())
                .any(|v| v == username_or_email);
            if matches {
                return Ok(Some(record.deserialize_into::<User>()?));
            }
        }
        Ok(None)
    }
}

/// Active AI configuration through the collection facade: first record of
/// `ai_settings` wins, an empty collection means defaults apply. The
/// data source comes from the per-request hint, defaulting to relational.
#[derive(Clone)]
pub struct StoreConfigRepository<C: Connection> {
    facade: Arc<CollectionFacade<C>>,
}

impl<C: Connection> StoreConfigRepository<C> {
    pub fn new(facade: Arc<CollectionFacade<C>>) -> Self {
        Self { facade }
    }
}

impl<C: Connection> ConfigRepository for StoreConfigRepository<C> {
    async fn active_ai_config(
        &self,
        source_hint: Option<DataSource>,
    ) -> VigilResult<Option<AiProviderConfig>> {
        let source = source_hint.unwrap_or(DataSource::Relational);
        let records = self.facade.fetch_from("ai_settings", source).await?;
        match records.first() {
            Some(record) => Ok(Some(record.deserialize_into::<AiProviderConfig>()?)),
            None => Ok(None),
        }
    }
}
