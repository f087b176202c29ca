//! Form Assistant — suggests values for empty form fields.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value, json};
use tracing::warn;
use vigil_core::settings::DataSource;

use crate::error::AiError;
use crate::flows::bullet_list;
use crate::provider::{GenerationRequest, ModelProvider};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FormAssistantInput {
    /// Which form is being filled (e.g. `risk`, `resource`, `measure`).
    pub form_kind: String,
    /// Names of the fields suggestions are wanted for.
    pub fields: Vec<String>,
    /// What the user has already entered, plus tenant context.
    #[serde(default)]
    pub context: Option<String>,
    #[serde(default)]
    pub data_source: Option<DataSource>,
}

impl FormAssistantInput {
    pub fn validate(&self) -> Result<(), AiError> {
        if self.form_kind.trim().is_empty() {
            return Err(AiError::Validation("form_kind must not be empty".into()));
        }
        if self.fields.is_empty() {
            return Err(AiError::Validation(
                "at least one field name is required".into(),
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FormAssistantOutput {
    /// Field name → suggested value.
    pub suggestions: Map<String, Value>,
    pub explanation: String,
}

pub fn output_schema() -> Value {
    json!({
        "type": "object",
        "properties": {
            "suggestions": {"type": "object", "additionalProperties": {"type": "string"}},
            "explanation": {"type": "string"},
        },
        "required": ["suggestions", "explanation"],
    })
}

const SYSTEM: &str = "Du bist ein Assistent für GRC-Formulare. Schlage \
plausible Werte für die angefragten Felder vor. Antworte ausschließlich \
mit einem JSON-Objekt mit den Feldern suggestions (Feldname zu Wert) und \
explanation.";

fn build_prompt(input: &FormAssistantInput) -> String {
    let mut prompt = format!(
        "Formular: {}\nGewünschte Felder:\n{}",
        input.form_kind,
        bullet_list(input.fields.iter().map(String::as_str)),
    );
    if let Some(context) = &input.context {
        prompt.push_str(&format!("\n\nBereits vorhandene Angaben: {context}"));
    }
    prompt
}

/// Fallback: no suggestions, manual entry.
pub fn fallback() -> FormAssistantOutput {
    FormAssistantOutput {
        suggestions: Map::new(),
        explanation: "Es konnten keine Vorschläge erstellt werden. Bitte füllen \
                      Sie das Formular manuell aus und prüfen Sie die Verbindung \
                      zum KI-Dienst."
            .into(),
    }
}

async fn attempt<P: ModelProvider>(
    provider: &P,
    input: &FormAssistantInput,
) -> Result<FormAssistantOutput, AiError> {
    let request = GenerationRequest {
        system: SYSTEM.to_string(),
        prompt: build_prompt(input),
        schema: output_schema(),
    };
    let value = provider.generate_json(&request).await?;
    serde_json::from_value(value)
        .map_err(|e| AiError::Schema(format!("form suggestions do not match schema: {e}")))
}

pub async fn run<P: ModelProvider>(
    provider: &P,
    input: &FormAssistantInput,
) -> Result<FormAssistantOutput, AiError> {
    input.validate()?;
    match attempt(provider, input).await {
        Ok(output) => Ok(output),
        Err(e) => {
            warn!(model = provider.model(), error = %e, "form assistant falling back");
            Ok(fallback())
        }
    }
}
