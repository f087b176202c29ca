//! Integration tests for the collection facade: backend switching,
//! subscription teardown, live push and refresh semantics.

use std::sync::Arc;
use std::time::Duration;

use serde_json::json;
use sqlx::sqlite::SqlitePoolOptions;
use surrealdb::Surreal;
use surrealdb::engine::local::Mem;
use vigil_core::settings::DataSource;
use vigil_store::{
    CollectionFacade, DocumentBackend, ErrorChannel, MockBackend, RelationalBackend, StoreError,
};

type TestFacade = Arc<CollectionFacade<surrealdb::engine::local::Db>>;

/// Spin up all three backends: in-memory SurrealDB, single-connection
/// in-memory SQLite, mock fixtures with a short latency.
async fn setup(initial: DataSource) -> TestFacade {
    let db = Surreal::new::<Mem>(()).await.unwrap();
    db.use_ns("test").use_db("test").await.unwrap();
    vigil_store::run_migrations(&db).await.unwrap();

    let errors = ErrorChannel::new();
    let document = DocumentBackend::new(db, errors.clone());

    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await
        .unwrap();
    let relational = RelationalBackend::with_pool(pool).await.unwrap();

    let mock = MockBackend::with_latency(Duration::from_millis(10));

    Arc::new(CollectionFacade::new(
        relational, document, mock, initial, errors,
    ))
}

fn fields(value: serde_json::Value) -> serde_json::Map<String, serde_json::Value> {
    match value {
        serde_json::Value::Object(map) => map,
        _ => panic!("expected object"),
    }
}

#[tokio::test]
async fn mock_backend_loads_fixtures() {
    let facade = setup(DataSource::Mock).await;
    let mut handle = facade.open("users");

    let state = handle.wait_loaded().await;
    assert!(!state.is_loading);
    assert!(state.error.is_none());
    let users = state.data.unwrap();
    assert_eq!(users.len(), 2);
    assert!(
        users
            .iter()
            .any(|u| u.get("username") == Some(&json!("a.schmidt")))
    );
}

#[tokio::test]
async fn relational_backend_updates_only_on_refresh() {
    let facade = setup(DataSource::Relational).await;
    let mut handle = facade.open("risks");

    let state = handle.wait_loaded().await;
    assert_eq!(state.data, Some(Vec::new()));

    facade
        .save(
            "risks",
            None,
            fields(json!({"title": "Phishing-Kampagne", "probability": 4, "impact": 3})),
        )
        .await
        .unwrap();

    // No push for the relational backend: state is unchanged until refresh.
    tokio::time::sleep(Duration::from_millis(50)).await;
    assert_eq!(handle.state().data, Some(Vec::new()));

    handle.refresh().await;
    let state = wait_for_len(&mut handle, 1).await;
    assert_eq!(
        state.data.unwrap()[0].get("title"),
        Some(&json!("Phishing-Kampagne"))
    );
}

#[tokio::test]
async fn document_backend_pushes_remote_changes() {
    let facade = setup(DataSource::Document).await;
    let mut handle = facade.open("measures");

    let state = handle.wait_loaded().await;
    assert_eq!(state.data, Some(Vec::new()));

    facade
        .save(
            "measures",
            None,
            fields(json!({"title": "MFA erzwingen", "status": "planned"})),
        )
        .await
        .unwrap();

    // The live subscription must deliver the change without a refresh.
    let state = wait_for_len(&mut handle, 1).await;
    assert_eq!(
        state.data.unwrap()[0].get("title"),
        Some(&json!("MFA erzwingen"))
    );
}

#[tokio::test]
async fn switching_source_tears_down_previous_subscription() {
    let facade = setup(DataSource::Document).await;
    let mut handle = facade.open("risks");
    handle.wait_loaded().await;

    facade.set_data_source(DataSource::Mock);
    let state = wait_for_len(&mut handle, 1).await;
    let titles: Vec<_> = state
        .data
        .as_ref()
        .unwrap()
        .iter()
        .filter_map(|r| r.get("title").cloned())
        .collect();
    assert_eq!(
        titles,
        vec![json!("Ransomware-Angriff auf Produktionsserver")]
    );

    // A change in the torn-down document backend must never reach the
    // handle again.
    facade
        .save_to(
            "risks",
            None,
            fields(json!({"title": "Innentäter", "probability": 2, "impact": 4})),
            DataSource::Document,
        )
        .await
        .unwrap();
    tokio::time::sleep(Duration::from_millis(200)).await;

    let state = handle.state();
    let titles: Vec<_> = state
        .data
        .unwrap()
        .iter()
        .filter_map(|r| r.get("title").cloned())
        .collect();
    assert!(!titles.contains(&json!("Innentäter")));
}

#[tokio::test]
async fn switching_back_resubscribes_to_document() {
    let facade = setup(DataSource::Mock).await;
    let mut handle = facade.open("measures");
    wait_for_len(&mut handle, 1).await; // mock fixture measure

    facade.set_data_source(DataSource::Document);
    let state = wait_for_len(&mut handle, 0).await;
    assert_eq!(state.data, Some(Vec::new()));

    // Live push works on the fresh subscription.
    facade
        .save(
            "measures",
            None,
            fields(json!({"title": "Notfallplan testen", "status": "planned"})),
        )
        .await
        .unwrap();
    wait_for_len(&mut handle, 1).await;
}

#[tokio::test]
async fn unknown_collection_is_empty_not_an_error() {
    let facade = setup(DataSource::Relational).await;
    // Unknown collections are simply empty for the generic records table.
    let records = facade.fetch("does_not_exist").await.unwrap();
    assert!(records.is_empty());
}

#[tokio::test]
async fn backend_failures_surface_in_handle_state() {
    // Build the facade by hand so the test keeps a handle on the pool.
    let db = Surreal::new::<Mem>(()).await.unwrap();
    db.use_ns("test").use_db("test").await.unwrap();
    vigil_store::run_migrations(&db).await.unwrap();
    let errors = ErrorChannel::new();
    let document = DocumentBackend::new(db, errors.clone());
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await
        .unwrap();
    let relational = RelationalBackend::with_pool(pool.clone()).await.unwrap();
    let mock = MockBackend::with_latency(Duration::from_millis(10));
    let facade: TestFacade = Arc::new(CollectionFacade::new(
        relational,
        document,
        mock,
        DataSource::Relational,
        errors,
    ));

    let mut handle = facade.open("risks");
    handle.wait_loaded().await;
    facade
        .save(
            "risks",
            None,
            fields(json!({"title": "Lieferantenausfall", "probability": 2, "impact": 3})),
        )
        .await
        .unwrap();
    handle.refresh().await;
    wait_for_len(&mut handle, 1).await;

    // Kill the backend under the handle: the failure must land in the
    // state's error field, with the last good data untouched.
    pool.close().await;
    handle.refresh().await;
    let state = wait_for_error(&mut handle).await;
    assert!(matches!(state.error, Some(StoreError::Relational(_))));
    assert_eq!(state.data.as_ref().map(|d| d.len()), Some(1));
    assert!(!state.is_loading);
}

/// Poll the handle until its state carries an error.
async fn wait_for_error(
    handle: &mut vigil_store::CollectionHandle,
) -> vigil_store::CollectionState {
    tokio::time::timeout(Duration::from_secs(5), async {
        loop {
            let state = handle.state();
            if state.error.is_some() && !state.is_loading {
                return state;
            }
            handle.changed().await;
        }
    })
    .await
    .expect("timed out waiting for an error in collection state")
}

/// Poll the handle until its data has exactly `len` records.
async fn wait_for_len(
    handle: &mut vigil_store::CollectionHandle,
    len: usize,
) -> vigil_store::CollectionState {
    tokio::time::timeout(Duration::from_secs(5), async {
        loop {
            let state = handle.state();
            if let Some(data) = &state.data {
                if data.len() == len && !state.is_loading {
                    return state;
                }
            }
            handle.changed().await;
        }
    })
    .await
    .expect("timed out waiting for collection state")
}
