//! Entry points for the content pipeline.
//!
//! Flow per call: aggregate tenant context (when the task needs it), build
//! the transcript, invoke the model once, then parse with fallback. Nothing
//! here writes state and nothing is retried.

use tracing::{error, info, instrument, warn};

use agencyos_core::TenantId;

use crate::context::{AgencyReader, ContextAggregator};
use crate::fallback::{self, StructuredReport};
use crate::gateway::{GatewayError, ModelGateway};
use crate::insights::Insights;
use crate::prompt::{self, HistoryEntry, PromptTranscript};
use crate::request::{GenerationRequest, OnboardingInput, ProposalInput, ReportInput};
use crate::result::{GenerationError, GenerationResult, GenerationTask};

/// Content generation over an injected data reader and model gateway.
#[derive(Debug, Clone)]
pub struct ContentService<R, G> {
    context: ContextAggregator<R>,
    gateway: G,
}

impl<R, G> ContentService<R, G>
where
    R: AgencyReader,
    G: ModelGateway,
{
    pub fn new(reader: R, gateway: G) -> Self {
        Self {
            context: ContextAggregator::new(reader),
            gateway,
        }
    }

    /// Draft a proposal. The model text is returned unchanged.
    #[instrument(skip_all, fields(task = "proposal"))]
    pub async fn generate_proposal(&self, input: &ProposalInput) -> Result<String, GenerationError> {
        let transcript = prompt::proposal_transcript(input);
        self.call_model(GenerationTask::Proposal, &transcript).await
    }

    /// Draft a client report split into summary, risks and next steps.
    ///
    /// Missing sections are defaulted; only a failed model call is an error.
    #[instrument(skip_all, fields(task = "report"))]
    pub async fn generate_report(
        &self,
        input: &ReportInput,
    ) -> Result<StructuredReport, GenerationError> {
        let transcript = prompt::report_transcript(input);
        let raw = self.call_model(GenerationTask::Report, &transcript).await?;

        let resolved = fallback::report_from_text(&raw);
        if resolved.used_fallback() {
            warn!(fields = ?resolved.fallbacks, "report sections missing; using defaults");
        }
        Ok(resolved.into_value())
    }

    /// Suggest onboarding tasks. Never fails: any model failure or unusable
    /// output yields the default list.
    #[instrument(skip_all, fields(task = "onboarding_tasks", tier = %input.service_tier))]
    pub async fn generate_onboarding_tasks(&self, input: &OnboardingInput) -> Vec<String> {
        let transcript = prompt::onboarding_transcript(input);

        let raw = match self.call_model(GenerationTask::OnboardingTasks, &transcript).await {
            Ok(raw) => raw,
            Err(_) => return fallback::default_onboarding_tasks(),
        };

        let resolved = fallback::onboarding_tasks_from_text(&raw);
        if resolved.used_fallback() {
            warn!(
                cause = resolved.cause.as_deref().unwrap_or("unknown"),
                "onboarding task output was not a JSON array; using defaults"
            );
        }
        resolved.into_value()
    }

    /// Answer an assistant message with the tenant's current business state
    /// as context.
    #[instrument(skip_all, fields(task = "chat", tenant = %tenant_id, history = history.len()))]
    pub async fn process_query(
        &self,
        tenant_id: TenantId,
        message: &str,
        history: &[HistoryEntry],
    ) -> Result<String, GenerationError> {
        let snapshot = self.context.snapshot(tenant_id).await?;
        let transcript = prompt::chat_transcript(&snapshot, message, history);
        self.call_model(GenerationTask::Chat, &transcript).await
    }

    /// Rule-based insights over a fresh snapshot. Only a failed read errors.
    #[instrument(skip_all, fields(task = "insights", tenant = %tenant_id))]
    pub async fn generate_insights(&self, tenant_id: TenantId) -> Result<Insights, GenerationError> {
        let snapshot = self.context.snapshot(tenant_id).await?;
        Ok(Insights::from_snapshot(&snapshot))
    }

    /// Dispatch a tagged request to its operation.
    pub async fn generate(
        &self,
        request: &GenerationRequest,
    ) -> Result<GenerationResult, GenerationError> {
        match request {
            GenerationRequest::ProposalDraft(input) => {
                self.generate_proposal(input).await.map(GenerationResult::RawText)
            }
            GenerationRequest::ReportDraft(input) => self
                .generate_report(input)
                .await
                .map(GenerationResult::StructuredReport),
            GenerationRequest::OnboardingTasks(input) => Ok(GenerationResult::TaskList(
                self.generate_onboarding_tasks(input).await,
            )),
            GenerationRequest::ChatTurn(chat) => self
                .process_query(chat.tenant_id, &chat.message, &chat.history)
                .await
                .map(GenerationResult::RawText),
            GenerationRequest::Insights { tenant_id } => self
                .generate_insights(*tenant_id)
                .await
                .map(GenerationResult::Insights),
        }
    }

    async fn call_model(
        &self,
        task: GenerationTask,
        transcript: &PromptTranscript,
    ) -> Result<String, GenerationError> {
        let result = self
            .gateway
            .invoke(transcript)
            .await
            .and_then(|text| crate::gateway::usable_text(Some(text)));

        match result {
            Ok(text) => {
                info!(task = task.as_str(), chars = text.len(), "model call succeeded");
                Ok(text)
            }
            Err(e) => {
                log_gateway_failure(task, &e);
                Err(GenerationError::gateway(task, e))
            }
        }
    }
}

fn log_gateway_failure(task: GenerationTask, e: &GatewayError) {
    error!(task = task.as_str(), kind = e.kind(), error = %e, "model call failed");
}
