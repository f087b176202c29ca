//! VIGIL core — shared types for the GRC/IAM console backend.
//!
//! This crate holds the domain models, the error taxonomy, the generic
//! collection record the store facade passes through opaquely, the
//! persisted application settings, and the repository traits that the
//! store layer implements.

pub mod error;
pub mod models;
pub mod record;
pub mod repository;
pub mod settings;
