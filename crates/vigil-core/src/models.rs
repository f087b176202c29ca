//! Domain models for VIGIL.
//!
//! These are the core types shared across all crates. The store facade
//! never interprets them; typed layers convert generic records into these
//! shapes at their own boundaries.

pub mod assignment;
pub mod config;
pub mod entitlement;
pub mod measure;
pub mod resource;
pub mod risk;
pub mod tenant;
pub mod user;
