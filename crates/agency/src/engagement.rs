use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use agencyos_core::{Cents, ClientId, EngagementId, TenantId};

use crate::client::Client;

/// Engagement status lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EngagementStatus {
    Onboarding,
    Active,
    Paused,
    Complete,
}

impl EngagementStatus {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Onboarding => "onboarding",
            Self::Active => "active",
            Self::Paused => "paused",
            Self::Complete => "complete",
        }
    }
}

/// A recurring paid service relationship with a client.
///
/// `fee` is the monthly fee in cents.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Engagement {
    pub id: EngagementId,
    pub tenant_id: TenantId,
    pub client_id: ClientId,
    pub service_tier: String,
    pub fee: Cents,
    pub start_date: DateTime<Utc>,
    #[serde(default)]
    pub end_date: Option<DateTime<Utc>>,
    pub status: EngagementStatus,
    #[serde(default)]
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Engagement {
    /// Build an engagement for `client` with a fresh id.
    pub fn new(
        client: &Client,
        service_tier: impl Into<String>,
        fee: Cents,
        status: EngagementStatus,
        start_date: DateTime<Utc>,
    ) -> Self {
        Self {
            id: EngagementId::new(),
            tenant_id: client.tenant_id,
            client_id: client.id,
            service_tier: service_tier.into(),
            fee,
            start_date,
            end_date: None,
            status,
            notes: None,
            created_at: start_date,
        }
    }

    pub fn with_created_at(mut self, created_at: DateTime<Utc>) -> Self {
        self.created_at = created_at;
        self
    }

    pub fn is_active(&self) -> bool {
        self.status == EngagementStatus::Active
    }
}

/// Engagement row joined with its client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngagementWithClient {
    pub engagement: Engagement,
    pub client: Client,
}
