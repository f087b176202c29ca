//! IAM Audit — checks entities against compliance criteria.

use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use tracing::warn;
use vigil_core::settings::DataSource;

use crate::error::AiError;
use crate::flows::bullet_list;
use crate::provider::{GenerationRequest, ModelProvider};

/// Closed severity set. Any other value from a provider is a schema
/// violation and triggers the fallback, never a pass-through.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Low,
    Medium,
    High,
    Critical,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditEntity {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditInput {
    /// Compliance criteria to check against (e.g. framework controls).
    pub criteria: Vec<String>,
    pub entities: Vec<AuditEntity>,
    #[serde(default)]
    pub company_description: Option<String>,
    #[serde(default)]
    pub data_source: Option<DataSource>,
}

impl AuditInput {
    pub fn validate(&self) -> Result<(), AiError> {
        if self.criteria.is_empty() {
            return Err(AiError::Validation(
                "at least one audit criterion is required".into(),
            ));
        }
        if self.entities.is_empty() {
            return Err(AiError::Validation(
                "at least one entity is required".into(),
            ));
        }
        for (i, e) in self.entities.iter().enumerate() {
            if e.id.trim().is_empty() || e.name.trim().is_empty() {
                return Err(AiError::Validation(format!(
                    "entity {i} is missing id or name"
                )));
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Finding {
    pub entity_id: String,
    pub entity_name: String,
    pub finding: String,
    pub severity: Severity,
    pub recommendation: String,
    /// Which input criterion this finding matched.
    pub criterion: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuditOutput {
    /// 0 (non-compliant) to 100 (fully compliant).
    pub compliance_score: u8,
    pub summary: String,
    pub findings: Vec<Finding>,
}

pub fn output_schema() -> Value {
    json!({
        "type": "object",
        "properties": {
            "compliance_score": {"type": "integer", "minimum": 0, "maximum": 100},
            "summary": {"type": "string"},
            "findings": {
                "type": "array",
                "items": {
                    "type": "object",
                    "properties": {
                        "entity_id": {"type": "string"},
                        "entity_name": {"type": "string"},
                        "finding": {"type": "string"},
                        "severity": {"type": "string", "enum": ["low", "medium", "high", "critical"]},
                        "recommendation": {"type": "string"},
                        "criterion": {"type": "string"},
                    },
                    "required": ["entity_id", "entity_name", "finding", "severity", "recommendation", "criterion"],
                },
            },
        },
        "required": ["compliance_score", "summary", "findings"],
    })
}

const SYSTEM: &str = "Du bist ein IAM-Auditor. Prüfe die übergebenen \
Entitäten gegen die Prüfkriterien. Antworte ausschließlich mit einem \
JSON-Objekt mit den Feldern compliance_score (0-100), summary und \
findings (entity_id, entity_name, finding, severity aus low/medium/high/\
critical, recommendation, criterion).";

fn build_prompt(input: &AuditInput) -> String {
    let entities: Vec<String> = input
        .entities
        .iter()
        .map(|e| match &e.description {
            Some(d) => format!("{} ({}): {d}", e.name, e.id),
            None => format!("{} ({})", e.name, e.id),
        })
        .collect();
    let mut prompt = format!(
        "Prüfkriterien:\n{}\n\nZu prüfende Entitäten:\n{}",
        bullet_list(input.criteria.iter().map(String::as_str)),
        bullet_list(entities.iter().map(String::as_str)),
    );
    if let Some(company) = &input.company_description {
        prompt.push_str(&format!("\n\nUnternehmenskontext: {company}"));
    }
    prompt
}

/// Fallback: score 0, no findings, the caught error embedded verbatim in
/// the summary so the user sees why the audit did not run.
pub fn fallback(error: &AiError) -> AuditOutput {
    AuditOutput {
        compliance_score: 0,
        summary: format!(
            "Die automatische Prüfung konnte nicht durchgeführt werden ({error}). \
             Bitte prüfen Sie die Verbindung zum KI-Dienst und führen Sie eine \
             manuelle Prüfung durch."
        ),
        findings: Vec::new(),
    }
}

async fn attempt<P: ModelProvider>(provider: &P, input: &AuditInput) -> Result<AuditOutput, AiError> {
    let request = GenerationRequest {
        system: SYSTEM.to_string(),
        prompt: build_prompt(input),
        schema: output_schema(),
    };
    let value = provider.generate_json(&request).await?;
    let output: AuditOutput = serde_json::from_value(value)
        .map_err(|e| AiError::Schema(format!("audit result does not match schema: {e}")))?;
    if output.compliance_score > 100 {
        return Err(AiError::Schema(format!(
            "compliance_score {} out of range",
            output.compliance_score
        )));
    }
    Ok(output)
}

pub async fn run<P: ModelProvider>(
    provider: &P,
    input: &AuditInput,
) -> Result<AuditOutput, AiError> {
    input.validate()?;
    match attempt(provider, input).await {
        Ok(output) => Ok(output),
        Err(e) => {
            warn!(model = provider.model(), error = %e, "audit falling back");
            Ok(fallback(&e))
        }
    }
}
