//! VIGIL store — the pluggable collection facade.
//!
//! One uniform read/subscribe interface over three interchangeable
//! backends, selected by the process-wide data-source setting:
//!
//! - relational ([`RelationalBackend`], sqlx/SQLite, on-demand fetch)
//! - document ([`DocumentBackend`], SurrealDB, live subscriptions)
//! - mock ([`MockBackend`], static fixtures behind an artificial delay)
//!
//! Backend branching happens in exactly one place, the
//! [`CollectionFacade`]; everything above it works against
//! [`vigil_core::record::Record`] and the uniform handle state.

mod backend;
mod error;
mod events;
mod facade;
mod schema;
mod source;
mod users;

pub use backend::document::{DocumentBackend, DocumentConfig};
pub use backend::mock::MockBackend;
pub use backend::relational::RelationalBackend;
pub use error::{StoreError, StoreOp};
pub use events::{ErrorChannel, PermissionEvent};
pub use facade::{CollectionFacade, CollectionHandle, CollectionState};
pub use schema::{COLLECTIONS, run_migrations};
pub use source::CollectionBackend;
pub use users::{StoreConfigRepository, StoreUserRepository};
