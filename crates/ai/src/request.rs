use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use agencyos_agency::{Client, Engagement};
use agencyos_core::{Cents, TenantId};

use crate::prompt::HistoryEntry;
use crate::result::GenerationTask;

/// The client identity a prompt is written about.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientProfile {
    pub name: String,
    #[serde(default)]
    pub industry: Option<String>,
    #[serde(default)]
    pub website: Option<String>,
}

impl ClientProfile {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            industry: None,
            website: None,
        }
    }

    pub fn with_industry(mut self, industry: impl Into<String>) -> Self {
        self.industry = Some(industry.into());
        self
    }

    pub fn with_website(mut self, website: impl Into<String>) -> Self {
        self.website = Some(website.into());
        self
    }
}

impl From<&Client> for ClientProfile {
    fn from(client: &Client) -> Self {
        Self {
            name: client.name.clone(),
            industry: client.industry.clone(),
            website: client.website.clone(),
        }
    }
}

/// Input for drafting a proposal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProposalInput {
    pub client: ClientProfile,
    pub title: String,
    #[serde(default)]
    pub brief: Option<String>,
    #[serde(default)]
    pub service_tier: Option<String>,
    /// Monthly fee in cents.
    #[serde(default)]
    pub fee: Option<Cents>,
}

impl ProposalInput {
    pub fn new(client: ClientProfile, title: impl Into<String>) -> Self {
        Self {
            client,
            title: title.into(),
            brief: None,
            service_tier: None,
            fee: None,
        }
    }

    pub fn with_brief(mut self, brief: impl Into<String>) -> Self {
        self.brief = Some(brief.into());
        self
    }

    pub fn with_service_tier(mut self, tier: impl Into<String>) -> Self {
        self.service_tier = Some(tier.into());
        self
    }

    pub fn with_fee(mut self, fee: Cents) -> Self {
        self.fee = Some(fee);
        self
    }
}

/// The engagement terms a report is written against.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngagementTerms {
    pub service_tier: String,
    pub fee: Cents,
    pub start_date: DateTime<Utc>,
}

impl From<&Engagement> for EngagementTerms {
    fn from(engagement: &Engagement) -> Self {
        Self {
            service_tier: engagement.service_tier.clone(),
            fee: engagement.fee,
            start_date: engagement.start_date,
        }
    }
}

/// Input for drafting a client report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportInput {
    pub client: ClientProfile,
    pub engagement: EngagementTerms,
    #[serde(default)]
    pub recent_activity: Vec<String>,
    #[serde(default)]
    pub completed_tasks: Vec<String>,
}

impl ReportInput {
    pub fn new(client: ClientProfile, engagement: EngagementTerms) -> Self {
        Self {
            client,
            engagement,
            recent_activity: Vec::new(),
            completed_tasks: Vec::new(),
        }
    }
}

/// Input for suggesting onboarding tasks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OnboardingInput {
    pub service_tier: String,
    #[serde(default)]
    pub client_industry: Option<String>,
}

/// One assistant turn: the new message plus earlier conversation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatInput {
    pub tenant_id: TenantId,
    pub message: String,
    #[serde(default)]
    pub history: Vec<HistoryEntry>,
}

/// A generation call, tagged by task kind.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum GenerationRequest {
    ProposalDraft(ProposalInput),
    ReportDraft(ReportInput),
    OnboardingTasks(OnboardingInput),
    ChatTurn(ChatInput),
    Insights { tenant_id: TenantId },
}

impl GenerationRequest {
    pub fn task(&self) -> GenerationTask {
        match self {
            Self::ProposalDraft(_) => GenerationTask::Proposal,
            Self::ReportDraft(_) => GenerationTask::Report,
            Self::OnboardingTasks(_) => GenerationTask::OnboardingTasks,
            Self::ChatTurn(_) => GenerationTask::Chat,
            Self::Insights { .. } => GenerationTask::Insights,
        }
    }
}
