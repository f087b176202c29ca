//! Error types for the VIGIL system.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum VigilError {
    #[error("Entity not found: {entity} with id {id}")]
    NotFound { entity: String, id: String },

    #[error("Validation error: {message}")]
    Validation { message: String },

    #[error("Authentication failed: {reason}")]
    AuthenticationFailed { reason: String },

    #[error("Store error: {0}")]
    Store(String),

    #[error("Model provider error: {0}")]
    Provider(String),

    #[error("Cryptography error: {0}")]
    Crypto(String),

    #[error("Settings error: {0}")]
    Settings(String),

    #[error("Tenant context missing or invalid")]
    TenantContext,

    #[error("Internal error: {0}")]
    Internal(String),
}

pub type VigilResult<T> = Result<T, VigilError>;
