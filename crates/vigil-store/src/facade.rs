//! The pluggable collection facade.
//!
//! [`CollectionFacade`] is the single place where the process-wide
//! data-source setting selects a backend. [`CollectionFacade::open`]
//! returns a [`CollectionHandle`] whose state `{data, is_loading, error}`
//! updates through a watch channel: live-pushed for the document backend,
//! refresh-driven for the relational and mock backends.
//!
//! Switching the data source tears the previous subscription down before
//! the new backend starts; change ticks are tagged with a generation
//! counter so a notification from a torn-down subscription can never
//! update state.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use futures::StreamExt;
use serde_json::{Map, Value};
use surrealdb::Connection;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tracing::{debug, warn};
use vigil_core::record::Record;
use vigil_core::settings::DataSource;

use crate::backend::document::DocumentBackend;
use crate::backend::mock::MockBackend;
use crate::backend::relational::RelationalBackend;
use crate::error::StoreError;
use crate::events::ErrorChannel;
use crate::source::CollectionBackend;

/// Uniform result shape every consumer sees, regardless of backend.
#[derive(Debug, Clone, PartialEq)]
pub struct CollectionState {
    pub data: Option<Vec<Record>>,
    pub is_loading: bool,
    pub error: Option<StoreError>,
}

impl CollectionState {
    fn initial() -> Self {
        Self {
            data: None,
            is_loading: true,
            error: None,
        }
    }
}

pub struct CollectionFacade<C: Connection> {
    relational: RelationalBackend,
    document: DocumentBackend<C>,
    mock: MockBackend,
    source_tx: watch::Sender<DataSource>,
    errors: ErrorChannel,
}

impl<C: Connection> CollectionFacade<C> {
    pub fn new(
        relational: RelationalBackend,
        document: DocumentBackend<C>,
        mock: MockBackend,
        initial: DataSource,
        errors: ErrorChannel,
    ) -> Self {
        let (source_tx, _) = watch::channel(initial);
        Self {
            relational,
            document,
            mock,
            source_tx,
            errors,
        }
    }

    pub fn data_source(&self) -> DataSource {
        *self.source_tx.borrow()
    }

    /// Switch the active data source. Every open handle tears down its
    /// current subscription and re-reads from the new backend.
    pub fn set_data_source(&self, source: DataSource) {
        let switched = self.source_tx.send_if_modified(|current| {
            if *current == source {
                false
            } else {
                *current = source;
                true
            }
        });
        if switched {
            debug!(source = %source, "data source switched");
        }
    }

    /// The shared permission-error side channel.
    pub fn errors(&self) -> &ErrorChannel {
        &self.errors
    }

    /// One-shot read against the current data source.
    pub async fn fetch(&self, collection: &str) -> Result<Vec<Record>, StoreError> {
        self.fetch_from(collection, self.data_source()).await
    }

    /// One-shot read against an explicit data source. This is the only
    /// place the backend branch exists.
    pub async fn fetch_from(
        &self,
        collection: &str,
        source: DataSource,
    ) -> Result<Vec<Record>, StoreError> {
        match source {
            DataSource::Relational => self.relational.fetch(collection).await,
            DataSource::Document => self.document.fetch(collection).await,
            DataSource::Mock => self.mock.fetch(collection).await,
        }
    }

    /// Upsert against the current data source (last-write-wins).
    pub async fn save(
        &self,
        collection: &str,
        id: Option<&str>,
        fields: Map<String, Value>,
    ) -> Result<Record, StoreError> {
        self.save_to(collection, id, fields, self.data_source())
            .await
    }

    pub async fn save_to(
        &self,
        collection: &str,
        id: Option<&str>,
        fields: Map<String, Value>,
        source: DataSource,
    ) -> Result<Record, StoreError> {
        match source {
            DataSource::Relational => self.relational.save(collection, id, fields).await,
            DataSource::Document => self.document.save(collection, id, fields).await,
            DataSource::Mock => self.mock.save(collection, id, fields).await,
        }
    }

    pub async fn delete(&self, collection: &str, id: &str) -> Result<(), StoreError> {
        self.delete_from(collection, id, self.data_source()).await
    }

    pub async fn delete_from(
        &self,
        collection: &str,
        id: &str,
        source: DataSource,
    ) -> Result<(), StoreError> {
        match source {
            DataSource::Relational => self.relational.delete(collection, id).await,
            DataSource::Document => self.document.delete(collection, id).await,
            DataSource::Mock => self.mock.delete(collection, id).await,
        }
    }

    /// Open a live handle on `collection`.
    ///
    /// The driver task (re)subscribes whenever the data source changes and
    /// exits when the handle is dropped.
    pub fn open(self: &Arc<Self>, collection: &str) -> CollectionHandle {
        let facade = Arc::clone(self);
        let collection = collection.to_string();
        let (state_tx, state_rx) = watch::channel(CollectionState::initial());
        let (refresh_tx, mut refresh_rx) = mpsc::channel::<()>(8);
        let mut source_rx = self.source_tx.subscribe();
        let generation = Arc::new(AtomicU64::new(0));

        let driver = tokio::spawn(async move {
            'outer: loop {
                let source = *source_rx.borrow_and_update();
                let current_gen = generation.fetch_add(1, Ordering::SeqCst) + 1;
                debug!(
                    collection = %collection,
                    source = %source,
                    generation = current_gen,
                    "starting collection subscription"
                );

                // Live change feed exists for the document backend only.
                let mut watcher: Option<JoinHandle<()>> = None;
                let mut tick_rx: Option<mpsc::Receiver<u64>> = None;
                // A failed subscription is sticky for this generation: live
                // push is dead, and a later successful fetch must not make
                // the handle look healthy again.
                let mut live_error: Option<StoreError> = None;
                if source == DataSource::Document {
                    match facade.document.changes(&collection).await {
                        Ok(mut stream) => {
                            let (tx, rx) = mpsc::channel(16);
                            watcher = Some(tokio::spawn(async move {
                                while stream.next().await.is_some() {
                                    if tx.send(current_gen).await.is_err() {
                                        break;
                                    }
                                }
                            }));
                            tick_rx = Some(rx);
                        }
                        Err(e) => {
                            warn!(collection = %collection, error = %e, "live subscription failed");
                            live_error = Some(e);
                        }
                    }
                }

                refresh_into(&facade, source, &collection, &state_tx, live_error.as_ref()).await;

                loop {
                    tokio::select! {
                        changed = source_rx.changed() => {
                            if changed.is_err() {
                                break 'outer;
                            }
                            // Tear down before the new backend starts.
                            break;
                        }
                        msg = refresh_rx.recv() => {
                            match msg {
                                Some(()) => {
                                    refresh_into(&facade, source, &collection, &state_tx, live_error.as_ref()).await;
                                }
                                // Handle dropped.
                                None => break 'outer,
                            }
                        }
                        tick = recv_tick(tick_rx.as_mut()) => {
                            match tick {
                                Some(g) if g == generation.load(Ordering::SeqCst) => {
                                    refresh_into(&facade, source, &collection, &state_tx, live_error.as_ref()).await;
                                }
                                // Tick from a torn-down subscription.
                                Some(_) => {}
                                // Change stream ended.
                                None => tick_rx = None,
                            }
                        }
                    }
                }

                if let Some(w) = watcher.take() {
                    w.abort();
                }
            }
        });

        CollectionHandle {
            state_rx,
            refresh_tx,
            driver,
        }
    }
}

async fn recv_tick(rx: Option<&mut mpsc::Receiver<u64>>) -> Option<u64> {
    match rx {
        Some(rx) => rx.recv().await,
        None => std::future::pending().await,
    }
}

async fn refresh_into<C: Connection>(
    facade: &CollectionFacade<C>,
    source: DataSource,
    collection: &str,
    state_tx: &watch::Sender<CollectionState>,
    live_error: Option<&StoreError>,
) {
    state_tx.send_modify(|s| s.is_loading = true);
    match facade.fetch_from(collection, source).await {
        Ok(records) => state_tx.send_modify(|s| {
            s.data = Some(records);
            s.is_loading = false;
            s.error = live_error.cloned();
        }),
        Err(e) => {
            warn!(collection = %collection, source = %source, error = %e, "collection fetch failed");
            state_tx.send_modify(|s| {
                s.is_loading = false;
                s.error = Some(e);
            });
        }
    }
}

/// A live view onto one collection. Dropping the handle stops the driver
/// task and with it any live subscription.
pub struct CollectionHandle {
    state_rx: watch::Receiver<CollectionState>,
    refresh_tx: mpsc::Sender<()>,
    driver: JoinHandle<()>,
}

impl CollectionHandle {
    /// Snapshot of the current state.
    pub fn state(&self) -> CollectionState {
        self.state_rx.borrow().clone()
    }

    /// Ask the driver to re-fetch (relational and mock backends have no
    /// push, this is their only update path).
    pub async fn refresh(&self) {
        let _ = self.refresh_tx.send(()).await;
    }

    /// Wait for the next state change.
    pub async fn changed(&mut self) {
        let _ = self.state_rx.changed().await;
    }

    /// Wait until a load has settled (data or error present, not loading).
    pub async fn wait_loaded(&mut self) -> CollectionState {
        loop {
            let snapshot = self.state_rx.borrow_and_update().clone();
            if !snapshot.is_loading && (snapshot.data.is_some() || snapshot.error.is_some()) {
                return snapshot;
            }
            if self.state_rx.changed().await.is_err() {
                return snapshot;
            }
        }
    }
}

impl Drop for CollectionHandle {
    fn drop(&mut self) {
        self.driver.abort();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    use sqlx::sqlite::SqlitePoolOptions;

    use crate::backend::document::DocumentBackend;
    use crate::backend::mock::MockBackend;
    use crate::backend::relational::RelationalBackend;

    async fn facade() -> CollectionFacade<surrealdb::engine::local::Db> {
        let errors = ErrorChannel::new();
        // Unconnected document client; these tests only touch the mock.
        let document = DocumentBackend::new(surrealdb::Surreal::init(), errors.clone());
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .unwrap();
        let relational = RelationalBackend::with_pool(pool).await.unwrap();
        let mock = MockBackend::with_latency(Duration::from_millis(1));
        CollectionFacade::new(relational, document, mock, DataSource::Mock, errors)
    }

    #[tokio::test]
    async fn successful_fetch_keeps_a_standing_subscription_error() {
        let facade = facade().await;
        let (state_tx, state_rx) = watch::channel(CollectionState::initial());
        let live = StoreError::Document("live query refused".into());

        refresh_into(&facade, DataSource::Mock, "risks", &state_tx, Some(&live)).await;

        let state = state_rx.borrow().clone();
        assert!(!state.is_loading);
        assert_eq!(state.data.map(|d| d.len()), Some(1));
        assert_eq!(state.error, Some(live));
    }

    #[tokio::test]
    async fn successful_fetch_clears_a_previous_fetch_error() {
        let facade = facade().await;
        let (state_tx, state_rx) = watch::channel(CollectionState::initial());
        state_tx.send_modify(|s| s.error = Some(StoreError::Document("gone".into())));

        refresh_into(&facade, DataSource::Mock, "risks", &state_tx, None).await;

        assert_eq!(state_rx.borrow().error, None);
    }
}
