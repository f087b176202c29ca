//! The uniform backend contract.

use serde_json::{Map, Value};
use vigil_core::record::Record;

use crate::error::StoreError;

/// One interchangeable storage backend.
///
/// Records are passed through opaquely; backends only guarantee that the
/// backend-assigned identifier surfaces under the record's `id`. Saving
/// is an upsert with last-write-wins semantics, no optimistic check.
pub trait CollectionBackend: Send + Sync {
    fn fetch(
        &self,
        collection: &str,
    ) -> impl Future<Output = Result<Vec<Record>, StoreError>> + Send;

    /// Upsert. `id: None` creates a record with a fresh identifier.
    fn save(
        &self,
        collection: &str,
        id: Option<&str>,
        fields: Map<String, Value>,
    ) -> impl Future<Output = Result<Record, StoreError>> + Send;

    fn delete(
        &self,
        collection: &str,
        id: &str,
    ) -> impl Future<Output = Result<(), StoreError>> + Send;
}
