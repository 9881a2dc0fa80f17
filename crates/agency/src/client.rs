use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use agencyos_core::{ClientId, DomainError, DomainResult, TenantId};

/// Client status lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ClientStatus {
    Prospect,
    Active,
    Paused,
    Churned,
}

impl ClientStatus {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Prospect => "prospect",
            Self::Active => "active",
            Self::Paused => "paused",
            Self::Churned => "churned",
        }
    }
}

impl core::fmt::Display for ClientStatus {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A client of the agency.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Client {
    pub id: ClientId,
    pub tenant_id: TenantId,
    pub name: String,
    #[serde(default)]
    pub industry: Option<String>,
    #[serde(default)]
    pub website: Option<String>,
    pub status: ClientStatus,
    #[serde(default)]
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Client {
    /// Build a client record with a fresh id.
    ///
    /// Rejects blank names.
    pub fn new(
        tenant_id: TenantId,
        name: impl Into<String>,
        status: ClientStatus,
        created_at: DateTime<Utc>,
    ) -> DomainResult<Self> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(DomainError::validation("client name cannot be empty"));
        }

        Ok(Self {
            id: ClientId::new(),
            tenant_id,
            name,
            industry: None,
            website: None,
            status,
            notes: None,
            created_at,
        })
    }

    pub fn with_industry(mut self, industry: impl Into<String>) -> Self {
        self.industry = Some(industry.into());
        self
    }

    pub fn with_website(mut self, website: impl Into<String>) -> Self {
        self.website = Some(website.into());
        self
    }

    pub fn is_active(&self) -> bool {
        self.status == ClientStatus::Active
    }
}
