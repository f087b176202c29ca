//! Flow contract tests: strict validation fails closed, provider and
//! schema failures always surface as the documented fallback payloads,
//! never as errors.

use serde_json::{Value, json};
use vigil_ai::error::AiError;
use vigil_ai::flows::access_advisor::{self, AccessAdvisorInput, AssignmentContext};
use vigil_ai::flows::audit::{self, AuditEntity, AuditInput, Severity};
use vigil_ai::flows::form_assistant::{self, FormAssistantInput};
use vigil_ai::flows::risk_advisor::{self, RiskAdvisorInput, ThreatLevel};
use vigil_ai::provider::{GenerationRequest, ModelProvider};

/// Provider that always fails like an unreachable endpoint.
struct FailingProvider;

impl ModelProvider for FailingProvider {
    async fn generate_json(&self, _request: &GenerationRequest) -> Result<Value, AiError> {
        Err(AiError::Provider("connection refused".into()))
    }

    fn model(&self) -> &str {
        "failing-stub"
    }
}

/// Provider that returns a fixed JSON value.
struct CannedProvider(Value);

impl ModelProvider for CannedProvider {
    async fn generate_json(&self, _request: &GenerationRequest) -> Result<Value, AiError> {
        Ok(self.0.clone())
    }

    fn model(&self) -> &str {
        "canned-stub"
    }
}

fn access_input() -> AccessAdvisorInput {
    AccessAdvisorInput {
        username: "a.schmidt".into(),
        department: Some("Finance".into()),
        company_description: None,
        assignments: vec![AssignmentContext {
            entitlement: "SAP_ALL".into(),
            resource: "SAP ERP".into(),
            risk_level: "critical".into(),
        }],
        data_source: None,
    }
}

fn audit_input() -> AuditInput {
    AuditInput {
        criteria: vec!["Jeder Benutzer hat einen Genehmiger".into()],
        entities: vec![AuditEntity {
            id: "u-1".into(),
            name: "a.schmidt".into(),
            description: None,
        }],
        company_description: None,
        data_source: None,
    }
}

fn risk_input() -> RiskAdvisorInput {
    RiskAdvisorInput {
        title: "Ransomware".into(),
        description: "Verschlüsselung der Produktionsserver".into(),
        probability: 3,
        impact: 5,
        existing_measures: vec![],
        company_description: None,
        data_source: None,
    }
}

// -----------------------------------------------------------------------
// Provider failure → documented fallback, never an error
// -----------------------------------------------------------------------

#[tokio::test]
async fn access_advisor_falls_back_on_provider_failure() {
    let out = access_advisor::run(&FailingProvider, &access_input())
        .await
        .unwrap();
    assert_eq!(out, access_advisor::fallback());
    assert_eq!(out.risk_score, 50);
    assert_eq!(out.concerns.len(), 1);
    assert_eq!(out.recommendations.len(), 2);
    assert!(out.summary.contains("nicht verfügbar"));
}

#[tokio::test]
async fn form_assistant_falls_back_on_provider_failure() {
    let input = FormAssistantInput {
        form_kind: "risk".into(),
        fields: vec!["description".into(), "probability".into()],
        context: None,
        data_source: None,
    };
    let out = form_assistant::run(&FailingProvider, &input).await.unwrap();
    assert!(out.suggestions.is_empty());
    assert!(out.explanation.contains("manuell"));
}

#[tokio::test]
async fn audit_fallback_embeds_the_error_message_verbatim() {
    let out = audit::run(&FailingProvider, &audit_input()).await.unwrap();
    assert_eq!(out.compliance_score, 0);
    assert!(out.findings.is_empty());
    // The caught error's display output appears verbatim in the summary.
    assert!(
        out.summary
            .contains("Provider request failed: connection refused")
    );
}

#[tokio::test]
async fn audit_fallback_embeds_json_parse_errors() {
    // What the router provider raises when the completion body is prose.
    struct NotJsonProvider;
    impl ModelProvider for NotJsonProvider {
        async fn generate_json(&self, _request: &GenerationRequest) -> Result<Value, AiError> {
            let body = json!({"choices": [{"message": {"content": "Sorry, I cannot help."}}]});
            let content = body["choices"][0]["message"]["content"].as_str().unwrap();
            serde_json::from_str(content).map_err(|e| {
                AiError::Schema(format!("completion content is not valid JSON: {e}"))
            })
        }
        fn model(&self) -> &str {
            "router-stub"
        }
    }

    let out = audit::run(&NotJsonProvider, &audit_input()).await.unwrap();
    assert!(out.summary.contains("completion content is not valid JSON"));
}

#[tokio::test]
async fn risk_advisor_falls_back_with_medium_threat_level() {
    let out = risk_advisor::run(&FailingProvider, &risk_input())
        .await
        .unwrap();
    assert_eq!(out.threat_level, ThreatLevel::Medium);
    assert_eq!(out.measures.len(), 1);
    assert!(out.assessment.contains("manuell"));
}

// -----------------------------------------------------------------------
// Schema conformance
// -----------------------------------------------------------------------

#[tokio::test]
async fn valid_provider_output_is_passed_through() {
    let provider = CannedProvider(json!({
        "risk_score": 85,
        "summary": "Kritische Rechtehäufung.",
        "concerns": ["SAP_ALL ohne Funktionstrennung"],
        "recommendations": ["SAP_ALL entziehen"],
    }));
    let out = access_advisor::run(&provider, &access_input()).await.unwrap();
    assert_eq!(out.risk_score, 85);
    assert_eq!(out.concerns, vec!["SAP_ALL ohne Funktionstrennung"]);
}

#[tokio::test]
async fn out_of_range_score_triggers_fallback() {
    let provider = CannedProvider(json!({
        "risk_score": 250,
        "summary": "s",
        "concerns": [],
        "recommendations": [],
    }));
    let out = access_advisor::run(&provider, &access_input()).await.unwrap();
    assert_eq!(out, access_advisor::fallback());
}

#[tokio::test]
async fn severity_outside_the_closed_set_triggers_fallback() {
    let provider = CannedProvider(json!({
        "compliance_score": 70,
        "summary": "ok",
        "findings": [{
            "entity_id": "u-1",
            "entity_name": "a.schmidt",
            "finding": "kein Genehmiger",
            "severity": "catastrophic",
            "recommendation": "Genehmiger eintragen",
            "criterion": "Jeder Benutzer hat einen Genehmiger",
        }],
    }));
    let out = audit::run(&provider, &audit_input()).await.unwrap();
    // Hard-fail, never clamp or pass through.
    assert_eq!(out.compliance_score, 0);
    assert!(out.findings.is_empty());
}

#[tokio::test]
async fn valid_severity_values_deserialize() {
    let provider = CannedProvider(json!({
        "compliance_score": 40,
        "summary": "Lücken gefunden.",
        "findings": [{
            "entity_id": "u-1",
            "entity_name": "a.schmidt",
            "finding": "kein Genehmiger",
            "severity": "high",
            "recommendation": "Genehmiger eintragen",
            "criterion": "Jeder Benutzer hat einen Genehmiger",
        }],
    }));
    let out = audit::run(&provider, &audit_input()).await.unwrap();
    assert_eq!(out.findings[0].severity, Severity::High);
}

// -----------------------------------------------------------------------
// Validation fails closed
// -----------------------------------------------------------------------

#[tokio::test]
async fn empty_assignments_are_rejected_not_defaulted() {
    let mut input = access_input();
    input.assignments.clear();
    let err = access_advisor::run(&FailingProvider, &input)
        .await
        .unwrap_err();
    assert!(matches!(err, AiError::Validation(_)));
}

#[tokio::test]
async fn out_of_range_probability_is_rejected() {
    let mut input = risk_input();
    input.probability = 9;
    let err = risk_advisor::run(&FailingProvider, &input).await.unwrap_err();
    assert!(matches!(err, AiError::Validation(_)));
}

#[tokio::test]
async fn empty_criteria_are_rejected() {
    let mut input = audit_input();
    input.criteria.clear();
    let err = audit::run(&FailingProvider, &input).await.unwrap_err();
    assert!(matches!(err, AiError::Validation(_)));
}
