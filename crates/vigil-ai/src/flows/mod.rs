//! The advisory flows.
//!
//! Every flow follows the same shape: strict input validation (fail
//! closed, returned as an error to the caller), prompt assembly, provider
//! invocation, strict output deserialization, and a documented fallback
//! payload on any provider or schema failure. Callers never see a
//! provider error.

pub mod access_advisor;
pub mod audit;
pub mod form_assistant;
pub mod risk_advisor;

/// Render a list as indented bullet lines for prompt interpolation.
pub(crate) fn bullet_list<'a>(items: impl IntoIterator<Item = &'a str>) -> String {
    items
        .into_iter()
        .map(|item| format!("- {item}"))
        .collect::<Vec<_>>()
        .join("\n")
}
