//! Risk Advisor — assesses a risk and proposes mitigation measures.

use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use tracing::warn;
use vigil_core::settings::DataSource;

use crate::error::AiError;
use crate::flows::bullet_list;
use crate::provider::{GenerationRequest, ModelProvider};

/// Closed threat-level set; out-of-set provider values trigger the
/// fallback.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThreatLevel {
    Low,
    Medium,
    High,
    Critical,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RiskAdvisorInput {
    pub title: String,
    pub description: String,
    /// Likelihood, 1 to 5.
    pub probability: u8,
    /// Damage, 1 to 5.
    pub impact: u8,
    #[serde(default)]
    pub existing_measures: Vec<String>,
    #[serde(default)]
    pub company_description: Option<String>,
    #[serde(default)]
    pub data_source: Option<DataSource>,
}

impl RiskAdvisorInput {
    pub fn validate(&self) -> Result<(), AiError> {
        if self.title.trim().is_empty() {
            return Err(AiError::Validation("title must not be empty".into()));
        }
        if !(1..=5).contains(&self.probability) {
            return Err(AiError::Validation(format!(
                "probability {} out of range 1..=5",
                self.probability
            )));
        }
        if !(1..=5).contains(&self.impact) {
            return Err(AiError::Validation(format!(
                "impact {} out of range 1..=5",
                self.impact
            )));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskAdvisorOutput {
    pub assessment: String,
    pub threat_level: ThreatLevel,
    /// Proposed mitigation measures.
    pub measures: Vec<String>,
    pub gap_analysis: String,
}

pub fn output_schema() -> Value {
    json!({
        "type": "object",
        "properties": {
            "assessment": {"type": "string"},
            "threat_level": {"type": "string", "enum": ["low", "medium", "high", "critical"]},
            "measures": {"type": "array", "items": {"type": "string"}},
            "gap_analysis": {"type": "string"},
        },
        "required": ["assessment", "threat_level", "measures", "gap_analysis"],
    })
}

const SYSTEM: &str = "Du bist ein Risikomanagement-Berater. Bewerte das \
beschriebene Risiko und schlage Maßnahmen vor. Antworte ausschließlich \
mit einem JSON-Objekt mit den Feldern assessment, threat_level (low/\
medium/high/critical), measures und gap_analysis.";

fn build_prompt(input: &RiskAdvisorInput) -> String {
    let mut prompt = format!(
        "Risiko: {}\nBeschreibung: {}\nEintrittswahrscheinlichkeit: {}/5\nSchadenshöhe: {}/5",
        input.title, input.description, input.probability, input.impact,
    );
    if !input.existing_measures.is_empty() {
        prompt.push_str(&format!(
            "\n\nBestehende Maßnahmen:\n{}",
            bullet_list(input.existing_measures.iter().map(String::as_str)),
        ));
    }
    if let Some(company) = &input.company_description {
        prompt.push_str(&format!("\n\nUnternehmenskontext: {company}"));
    }
    prompt
}

/// Fallback: neutral assessment, threat level forced to medium, one
/// manual-review measure.
pub fn fallback() -> RiskAdvisorOutput {
    RiskAdvisorOutput {
        assessment: "Die KI-Risikoanalyse ist derzeit nicht verfügbar. Das Risiko \
                     sollte manuell bewertet werden."
            .into(),
        threat_level: ThreatLevel::Medium,
        measures: vec![
            "Manuelle Risikobewertung durch den Risikoverantwortlichen durchführen.".into(),
        ],
        gap_analysis: "Keine automatische Lückenanalyse möglich. Bitte prüfen Sie \
                       die Verbindung zum KI-Dienst."
            .into(),
    }
}

async fn attempt<P: ModelProvider>(
    provider: &P,
    input: &RiskAdvisorInput,
) -> Result<RiskAdvisorOutput, AiError> {
    let request = GenerationRequest {
        system: SYSTEM.to_string(),
        prompt: build_prompt(input),
        schema: output_schema(),
    };
    let value = provider.generate_json(&request).await?;
    serde_json::from_value(value)
        .map_err(|e| AiError::Schema(format!("risk advice does not match schema: {e}")))
}

pub async fn run<P: ModelProvider>(
    provider: &P,
    input: &RiskAdvisorInput,
) -> Result<RiskAdvisorOutput, AiError> {
    input.validate()?;
    match attempt(provider, input).await {
        Ok(output) => Ok(output),
        Err(e) => {
            warn!(model = provider.model(), error = %e, "risk advisor falling back");
            Ok(fallback())
        }
    }
}
