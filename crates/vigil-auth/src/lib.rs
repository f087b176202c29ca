//! VIGIL auth — login and session issuance.
//!
//! Credential verification is uniform across every data source: an
//! Argon2id hash check plus the account's enabled flag, resolved through
//! the [`vigil_core::repository::UserRepository`] trait so this crate has
//! no dependency on any concrete backend.

pub mod config;
pub mod error;
pub mod password;
pub mod service;
pub mod session;

pub use config::AuthConfig;
pub use error::AuthError;
pub use service::{AuthService, LoginInput, LoginOutput};
pub use session::Session;
