//! AI service — the entry point the presentation layer calls.
//!
//! Generic over the configuration repository so the AI layer has no
//! dependency on the store crate. Every call re-selects the provider from
//! the active configuration using the input's data-source hint.

use vigil_core::repository::ConfigRepository;

use crate::error::AiError;
use crate::flows::access_advisor::{self, AccessAdvisorInput, AccessAdvisorOutput};
use crate::flows::audit::{self, AuditInput, AuditOutput};
use crate::flows::form_assistant::{self, FormAssistantInput, FormAssistantOutput};
use crate::flows::risk_advisor::{self, RiskAdvisorInput, RiskAdvisorOutput};
use crate::select::select;

pub struct AiService<R: ConfigRepository> {
    config_repo: R,
}

impl<R: ConfigRepository> AiService<R> {
    pub fn new(config_repo: R) -> Self {
        Self { config_repo }
    }

    /// An `Err` here is always a validation failure; provider failures
    /// surface as the flow's fallback payload.
    pub async fn access_advice(
        &self,
        input: AccessAdvisorInput,
    ) -> Result<AccessAdvisorOutput, AiError> {
        let provider = select(&self.config_repo, input.data_source).await;
        access_advisor::run(&provider, &input).await
    }

    pub async fn form_suggestions(
        &self,
        input: FormAssistantInput,
    ) -> Result<FormAssistantOutput, AiError> {
        let provider = select(&self.config_repo, input.data_source).await;
        form_assistant::run(&provider, &input).await
    }

    pub async fn iam_audit(&self, input: AuditInput) -> Result<AuditOutput, AiError> {
        let provider = select(&self.config_repo, input.data_source).await;
        audit::run(&provider, &input).await
    }

    pub async fn risk_advice(
        &self,
        input: RiskAdvisorInput,
    ) -> Result<RiskAdvisorOutput, AiError> {
        let provider = select(&self.config_repo, input.data_source).await;
        risk_advisor::run(&provider, &input).await
    }
}
