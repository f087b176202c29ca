//! Store-layer error types and conversions.
//!
//! Errors carry strings rather than driver error types so that the
//! facade can hand them out through watch channels (the handle state must
//! be cloneable). Permission failures are a distinct variant because they
//! are additionally broadcast on the shared error channel.

use vigil_core::error::VigilError;

/// Which operation a backend was performing when it failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreOp {
    Fetch,
    Save,
    Delete,
    Subscribe,
}

impl std::fmt::Display for StoreOp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Fetch => write!(f, "fetch"),
            Self::Save => write!(f, "save"),
            Self::Delete => write!(f, "delete"),
            Self::Subscribe => write!(f, "subscribe"),
        }
    }
}

/// Store-layer error type.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    /// Document-backend permission failure. Carries the failing operation
    /// and collection path; also broadcast on the shared error channel.
    #[error("Permission denied: {operation} on '{path}'")]
    Permission { operation: StoreOp, path: String },

    #[error("Document backend error: {0}")]
    Document(String),

    #[error("Relational backend error: {0}")]
    Relational(String),

    #[error("Record not found: {collection} with id {id}")]
    NotFound { collection: String, id: String },

    #[error("Malformed record in '{collection}': {message}")]
    MalformedRecord { collection: String, message: String },
}

impl From<StoreError> for VigilError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound { collection, id } => VigilError::NotFound {
                entity: collection,
                id,
            },
            other => VigilError::Store(other.to_string()),
        }
    }
}

/// Classify a SurrealDB error: permission denials become the typed
/// permission variant, everything else stays a generic document error.
pub(crate) fn classify_document(
    operation: StoreOp,
    path: &str,
    err: &surrealdb::Error,
) -> StoreError {
    let message = err.to_string();
    let lower = message.to_ascii_lowercase();
    if lower.contains("not enough permissions") || lower.contains("iam error") {
        StoreError::Permission {
            operation,
            path: path.to_string(),
        }
    } else {
        StoreError::Document(message)
    }
}

pub(crate) fn relational(err: sqlx::Error) -> StoreError {
    StoreError::Relational(err.to_string())
}
