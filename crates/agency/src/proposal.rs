use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use agencyos_core::{ClientId, ProposalId, TenantId};

use crate::client::Client;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProposalStatus {
    Draft,
    Sent,
    Approved,
    Rejected,
}

/// A proposal drafted for a client. `Sent` proposals are awaiting a response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Proposal {
    pub id: ProposalId,
    pub tenant_id: TenantId,
    pub client_id: ClientId,
    pub title: String,
    #[serde(default)]
    pub brief: Option<String>,
    #[serde(default)]
    pub content: Option<String>,
    pub status: ProposalStatus,
    #[serde(default = "first_version")]
    pub version: u32,
    pub created_at: DateTime<Utc>,
}

fn first_version() -> u32 {
    1
}

impl Proposal {
    pub fn new(
        client: &Client,
        title: impl Into<String>,
        status: ProposalStatus,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: ProposalId::new(),
            tenant_id: client.tenant_id,
            client_id: client.id,
            title: title.into(),
            brief: None,
            content: None,
            status,
            version: first_version(),
            created_at,
        }
    }

    pub fn is_pending(&self) -> bool {
        self.status == ProposalStatus::Sent
    }
}

/// Proposal row joined with its client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProposalWithClient {
    pub proposal: Proposal,
    pub client: Client,
}
