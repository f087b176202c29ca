//! Document backend — SurrealDB with live subscriptions.
//!
//! One shared client instance per process. Reads select generic records
//! with `meta::id(id)` surfaced as the conventional `id`; a LIVE query
//! stream signals remote changes in arrival order. Permission denials are
//! converted into [`StoreError::Permission`] and broadcast once on the
//! shared error channel.

use futures::StreamExt;
use serde_json::{Map, Value};
use surrealdb::engine::remote::ws::{Client, Ws};
use surrealdb::opt::auth::Root;
use surrealdb::{Connection, Surreal};
use tracing::info;
use uuid::Uuid;
use vigil_core::record::Record;

use crate::error::{StoreError, StoreOp, classify_document};
use crate::events::{ErrorChannel, PermissionEvent};
use crate::source::CollectionBackend;

/// Configuration for connecting to SurrealDB.
#[derive(Debug, Clone)]
pub struct DocumentConfig {
    /// WebSocket URL (e.g. `127.0.0.1:8000`).
    pub url: String,
    pub namespace: String,
    pub database: String,
    pub username: String,
    pub password: String,
}

impl Default for DocumentConfig {
    fn default() -> Self {
        Self {
            url: "127.0.0.1:8000".into(),
            namespace: "vigil".into(),
            database: "main".into(),
            username: "root".into(),
            password: "root".into(),
        }
    }
}

#[derive(Clone)]
pub struct DocumentBackend<C: Connection> {
    db: Surreal<C>,
    errors: ErrorChannel,
}

impl DocumentBackend<Client> {
    /// Connect to a remote SurrealDB over WebSocket, authenticate as root
    /// and select the configured namespace and database.
    pub async fn connect(
        config: &DocumentConfig,
        errors: ErrorChannel,
    ) -> Result<Self, StoreError> {
        info!(
            url = %config.url,
            namespace = %config.namespace,
            database = %config.database,
            "Connecting to SurrealDB"
        );

        let db = Surreal::new::<Ws>(config.url.as_str())
            .await
            .map_err(|e| StoreError::Document(e.to_string()))?;

        db.signin(Root {
            username: &config.username,
            password: &config.password,
        })
        .await
        .map_err(|e| StoreError::Document(e.to_string()))?;

        db.use_ns(&config.namespace)
            .use_db(&config.database)
            .await
            .map_err(|e| StoreError::Document(e.to_string()))?;

        Ok(Self::new(db, errors))
    }
}

impl<C: Connection> DocumentBackend<C> {
    pub fn new(db: Surreal<C>, errors: ErrorChannel) -> Self {
        Self { db, errors }
    }

    pub fn client(&self) -> &Surreal<C> {
        &self.db
    }

    /// Classify a driver error; permission denials are broadcast exactly
    /// once, right here, before the typed error is returned.
    fn fail(&self, operation: StoreOp, path: &str, err: &surrealdb::Error) -> StoreError {
        let classified = classify_document(operation, path, err);
        if let StoreError::Permission { operation, ref path } = classified {
            self.errors.emit(PermissionEvent {
                operation,
                path: path.clone(),
            });
        }
        classified
    }

    /// Open a live query on `collection`. Each element of the returned
    /// stream is one remote change notification; callers re-fetch on every
    /// tick. The stream ends when dropped or when the server closes it.
    pub async fn changes(
        &self,
        collection: &str,
    ) -> Result<impl futures::Stream<Item = ()> + Send + Unpin + use<C>, StoreError> {
        let stream = self
            .db
            .select::<Vec<Value>>(collection.to_string())
            .live()
            .await
            .map_err(|e| self.fail(StoreOp::Subscribe, collection, &e))?;

        Ok(stream.map(|_notification| ()))
    }

    fn rows_to_records(collection: &str, rows: Vec<Value>) -> Result<Vec<Record>, StoreError> {
        rows.into_iter()
            .map(|row| {
                let mut fields = match row {
                    Value::Object(map) => map,
                    other => {
                        return Err(StoreError::MalformedRecord {
                            collection: collection.to_string(),
                            message: format!("expected object row, got {other}"),
                        });
                    }
                };
                let id = match fields.remove("record_id") {
                    Some(Value::String(s)) => s,
                    Some(other) => other.to_string(),
                    None => {
                        return Err(StoreError::MalformedRecord {
                            collection: collection.to_string(),
                            message: "row is missing record_id".into(),
                        });
                    }
                };
                Ok(Record::new(id, fields))
            })
            .collect()
    }
}

impl<C: Connection> CollectionBackend for DocumentBackend<C> {
    async fn fetch(&self, collection: &str) -> Result<Vec<Record>, StoreError> {
        let result = self
            .db
            .query("SELECT meta::id(id) AS record_id, * OMIT id FROM type::table($tbl)")
            .bind(("tbl", collection.to_string()))
            .await
            .map_err(|e| self.fail(StoreOp::Fetch, collection, &e))?;

        let mut result = result
            .check()
            .map_err(|e| self.fail(StoreOp::Fetch, collection, &e))?;

        let rows: Vec<Value> = result
            .take(0)
            .map_err(|e| self.fail(StoreOp::Fetch, collection, &e))?;

        Self::rows_to_records(collection, rows)
    }

    async fn save(
        &self,
        collection: &str,
        id: Option<&str>,
        fields: Map<String, Value>,
    ) -> Result<Record, StoreError> {
        let id = id
            .map(str::to_string)
            .unwrap_or_else(|| Uuid::new_v4().to_string());

        let result = self
            .db
            .query("UPSERT type::thing($tbl, $id) CONTENT $fields")
            .bind(("tbl", collection.to_string()))
            .bind(("id", id.clone()))
            .bind(("fields", Value::Object(fields.clone())))
            .await
            .map_err(|e| self.fail(StoreOp::Save, collection, &e))?;

        result
            .check()
            .map_err(|e| self.fail(StoreOp::Save, collection, &e))?;

        Ok(Record::new(id, fields))
    }

    async fn delete(&self, collection: &str, id: &str) -> Result<(), StoreError> {
        let result = self
            .db
            .query("DELETE type::thing($tbl, $id)")
            .bind(("tbl", collection.to_string()))
            .bind(("id", id.to_string()))
            .await
            .map_err(|e| self.fail(StoreOp::Delete, collection, &e))?;

        result
            .check()
            .map_err(|e| self.fail(StoreOp::Delete, collection, &e))?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use surrealdb::engine::local::Mem;

    async fn backend() -> (DocumentBackend<surrealdb::engine::local::Db>, ErrorChannel) {
        let db = Surreal::new::<Mem>(()).await.unwrap();
        db.use_ns("test").use_db("test").await.unwrap();
        let errors = ErrorChannel::new();
        (DocumentBackend::new(db, errors.clone()), errors)
    }

    fn permission_denied() -> surrealdb::Error {
        surrealdb::error::Api::Query(
            "Not enough permissions to perform this action".to_string(),
        )
        .into()
    }

    #[tokio::test]
    async fn permission_denial_is_typed_and_broadcast_once() {
        let (backend, errors) = backend().await;
        let mut rx = errors.subscribe();

        let err = backend.fail(StoreOp::Fetch, "users", &permission_denied());
        assert_eq!(
            err,
            StoreError::Permission {
                operation: StoreOp::Fetch,
                path: "users".into(),
            }
        );

        let event = rx.recv().await.unwrap();
        assert_eq!(event.operation, StoreOp::Fetch);
        assert_eq!(event.path, "users");
        // Exactly once per failure.
        assert!(matches!(
            rx.try_recv(),
            Err(tokio::sync::broadcast::error::TryRecvError::Empty)
        ));
    }

    #[tokio::test]
    async fn other_driver_errors_stay_generic_and_silent() {
        let (backend, errors) = backend().await;
        let mut rx = errors.subscribe();

        let err = backend.fail(
            StoreOp::Fetch,
            "users",
            &surrealdb::error::Api::Query("connection reset".to_string()).into(),
        );
        assert!(matches!(err, StoreError::Document(_)));
        assert!(matches!(
            rx.try_recv(),
            Err(tokio::sync::broadcast::error::TryRecvError::Empty)
        ));
    }
}
