use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use agencyos_core::{EngagementId, ReportId, TenantId};

use crate::client::Client;
use crate::engagement::Engagement;

/// A client report stored against an engagement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Report {
    pub id: ReportId,
    pub tenant_id: TenantId,
    pub engagement_id: EngagementId,
    pub title: String,
    pub summary: String,
    #[serde(default)]
    pub risks: Option<String>,
    pub next_steps: String,
    pub created_at: DateTime<Utc>,
}

impl Report {
    pub fn new(
        engagement: &Engagement,
        title: impl Into<String>,
        summary: impl Into<String>,
        next_steps: impl Into<String>,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: ReportId::new(),
            tenant_id: engagement.tenant_id,
            engagement_id: engagement.id,
            title: title.into(),
            summary: summary.into(),
            risks: None,
            next_steps: next_steps.into(),
            created_at,
        }
    }
}

/// Report row joined with its engagement and that engagement's client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportWithContext {
    pub report: Report,
    pub engagement: Engagement,
    pub client: Client,
}
