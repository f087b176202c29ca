//! Access Advisor — reviews a user's entitlement assignments.

use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use tracing::warn;
use vigil_core::settings::DataSource;

use crate::error::AiError;
use crate::flows::bullet_list;
use crate::provider::{GenerationRequest, ModelProvider};

/// One granted entitlement, as shown to the model.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssignmentContext {
    pub entitlement: String,
    pub resource: String,
    /// Risk level tag of the entitlement (free text, e.g. `critical`).
    pub risk_level: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccessAdvisorInput {
    pub username: String,
    #[serde(default)]
    pub department: Option<String>,
    /// Tenant's company description, used as context.
    #[serde(default)]
    pub company_description: Option<String>,
    pub assignments: Vec<AssignmentContext>,
    #[serde(default)]
    pub data_source: Option<DataSource>,
}

impl AccessAdvisorInput {
    pub fn validate(&self) -> Result<(), AiError> {
        if self.username.trim().is_empty() {
            return Err(AiError::Validation("username must not be empty".into()));
        }
        if self.assignments.is_empty() {
            return Err(AiError::Validation(
                "at least one assignment is required".into(),
            ));
        }
        for (i, a) in self.assignments.iter().enumerate() {
            if a.entitlement.trim().is_empty() || a.resource.trim().is_empty() {
                return Err(AiError::Validation(format!(
                    "assignment {i} is missing entitlement or resource"
                )));
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AccessAdvisorOutput {
    /// 0 (harmless) to 100 (critical accumulation).
    pub risk_score: u8,
    pub summary: String,
    pub concerns: Vec<String>,
    pub recommendations: Vec<String>,
}

pub fn output_schema() -> Value {
    json!({
        "type": "object",
        "properties": {
            "risk_score": {"type": "integer", "minimum": 0, "maximum": 100},
            "summary": {"type": "string"},
            "concerns": {"type": "array", "items": {"type": "string"}},
            "recommendations": {"type": "array", "items": {"type": "string"}},
        },
        "required": ["risk_score", "summary", "concerns", "recommendations"],
    })
}

const SYSTEM: &str = "Du bist ein IAM-Sicherheitsanalyst. Bewerte die \
Berechtigungen eines Benutzers auf Risikohäufung und Verletzungen der \
Funktionstrennung. Antworte ausschließlich mit einem JSON-Objekt mit den \
Feldern risk_score (0-100), summary, concerns, recommendations.";

fn build_prompt(input: &AccessAdvisorInput) -> String {
    let assignments: Vec<String> = input
        .assignments
        .iter()
        .map(|a| format!("{} auf {} (Risikostufe: {})", a.entitlement, a.resource, a.risk_level))
        .collect();
    let mut prompt = format!(
        "Benutzer: {}\nAbteilung: {}\n\nZugewiesene Berechtigungen:\n{}",
        input.username,
        input.department.as_deref().unwrap_or("unbekannt"),
        bullet_list(assignments.iter().map(String::as_str)),
    );
    if let Some(company) = &input.company_description {
        prompt.push_str(&format!("\n\nUnternehmenskontext: {company}"));
    }
    prompt
}

/// Fallback: mid-range score, manual review required.
pub fn fallback() -> AccessAdvisorOutput {
    AccessAdvisorOutput {
        risk_score: 50,
        summary: "Die KI-Analyse ist derzeit nicht verfügbar. Bitte prüfen Sie \
                  die Verbindung zum KI-Dienst."
            .into(),
        concerns: vec!["Automatische Risikobewertung konnte nicht durchgeführt werden.".into()],
        recommendations: vec![
            "Berechtigungen manuell im Rahmen der Rezertifizierung prüfen.".into(),
            "KI-Konfiguration in den Einstellungen kontrollieren.".into(),
        ],
    }
}

async fn attempt<P: ModelProvider>(
    provider: &P,
    input: &AccessAdvisorInput,
) -> Result<AccessAdvisorOutput, AiError> {
    let request = GenerationRequest {
        system: SYSTEM.to_string(),
        prompt: build_prompt(input),
        schema: output_schema(),
    };
    let value = provider.generate_json(&request).await?;
    let output: AccessAdvisorOutput = serde_json::from_value(value)
        .map_err(|e| AiError::Schema(format!("access advice does not match schema: {e}")))?;
    if output.risk_score > 100 {
        return Err(AiError::Schema(format!(
            "risk_score {} out of range",
            output.risk_score
        )));
    }
    Ok(output)
}

/// Run the flow. Validation failures are returned to the caller; every
/// other failure becomes the fallback payload.
pub async fn run<P: ModelProvider>(
    provider: &P,
    input: &AccessAdvisorInput,
) -> Result<AccessAdvisorOutput, AiError> {
    input.validate()?;
    match attempt(provider, input).await {
        Ok(output) => Ok(output),
        Err(e) => {
            warn!(model = provider.model(), error = %e, "access advisor falling back");
            Ok(fallback())
        }
    }
}
