use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::context::ReadError;
use crate::fallback::StructuredReport;
use crate::gateway::GatewayError;
use crate::insights::Insights;

/// The generation task a call belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GenerationTask {
    Proposal,
    Report,
    OnboardingTasks,
    Chat,
    Insights,
}

impl GenerationTask {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Proposal => "proposal",
            Self::Report => "report",
            Self::OnboardingTasks => "onboarding_tasks",
            Self::Chat => "chat",
            Self::Insights => "insights",
        }
    }

    /// What the end user is told when the model call fails.
    pub const fn failure_message(&self) -> &'static str {
        match self {
            Self::Proposal => "Failed to generate the proposal. Please try again.",
            Self::Report => "Failed to generate the report. Please try again.",
            Self::OnboardingTasks => "Failed to generate onboarding tasks. Please try again.",
            Self::Chat => "I'm having trouble processing your request. Please try again.",
            Self::Insights => "Failed to generate insights. Please try again.",
        }
    }
}

/// Output of one generation call.
///
/// This is *not* persisted here; callers decide what to store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum GenerationResult {
    RawText(String),
    StructuredReport(StructuredReport),
    TaskList(Vec<String>),
    Insights(Insights),
}

#[derive(Debug, Error)]
pub enum GenerationError {
    /// The model call failed. `Display` is the generic user-facing message;
    /// the cause is only reachable through `source()`.
    #[error("{}", .task.failure_message())]
    Gateway {
        task: GenerationTask,
        #[source]
        source: GatewayError,
    },

    /// Tenant data could not be read.
    #[error(transparent)]
    Aggregation(#[from] ReadError),
}

impl GenerationError {
    pub fn gateway(task: GenerationTask, source: GatewayError) -> Self {
        Self::Gateway { task, source }
    }

    pub fn gateway_failure(&self) -> Option<&GatewayError> {
        match self {
            Self::Gateway { source, .. } => Some(source),
            Self::Aggregation(_) => None,
        }
    }
}
