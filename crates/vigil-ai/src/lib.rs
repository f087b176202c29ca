//! VIGIL AI — provider selection and the advisory flows.
//!
//! Four request/response flows (access advice, form suggestions, IAM
//! audit, risk advice) share one contract: strict input validation (fail
//! closed), a prompt assembled from domain data, a provider resolved per
//! request from the tenant's stored configuration, and a schema-conforming
//! German fallback payload on any provider or schema failure. A flow never
//! lets a provider error escape to its caller.

pub mod error;
pub mod flows;
pub mod provider;
pub mod providers;
pub mod select;
pub mod service;

pub use error::AiError;
pub use provider::{GenerationRequest, ModelProvider, SelectedProvider};
pub use select::{resolve, select};
pub use service::AiService;
