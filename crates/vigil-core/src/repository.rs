//! Repository trait definitions for data access abstraction.
//!
//! All repository operations are async. The store crate implements these
//! traits over the pluggable collection facade so that the auth and AI
//! layers have no dependency on any concrete backend.

use uuid::Uuid;

use crate::error::VigilResult;
use crate::models::config::AiProviderConfig;
use crate::models::user::User;
use crate::settings::DataSource;

/// User lookup for authentication.
pub trait UserRepository: Send + Sync {
    /// Find a user within a tenant by username or email. `Ok(None)` means
    /// no such user; callers must not distinguish that from a bad password
    /// in anything user-visible.
    fn find_by_login(
        &self,
        tenant_id: Uuid,
        username_or_email: &str,
    ) -> impl Future<Output = VigilResult<Option<User>>> + Send;
}

/// Read access to the active AI provider configuration.
pub trait ConfigRepository: Send + Sync {
    /// The first record of the configuration collection, or `None` when
    /// the collection is empty (defaults apply). The configuration is
    /// fetched per request via the caller's data-source hint; `None`
    /// defaults to the relational backend.
    fn active_ai_config(
        &self,
        source_hint: Option<DataSource>,
    ) -> impl Future<Output = VigilResult<Option<AiProviderConfig>>> + Send;
}
