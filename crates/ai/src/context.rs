//! Tenant context aggregation.
//!
//! Builds a [`TenantSnapshot`] by reading the four agency collections
//! concurrently and joining them before any prompt is rendered. The snapshot
//! is request-scoped: it is rebuilt on every call and never cached.

use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;
use tracing::{debug, instrument, warn};

use agencyos_agency::{
    Client, ClientStatus, EngagementStatus, EngagementWithClient, ProposalWithClient,
    ReportWithContext,
};
use agencyos_core::{Cents, TenantId};

/// Clients shown by name in the assistant context.
pub const CLIENT_DISPLAY_LIMIT: usize = 5;

/// Active engagements shown individually in the assistant context.
pub const ENGAGEMENT_DISPLAY_LIMIT: usize = 3;

/// Failure of one tenant-data read.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ReadError {
    #[error("failed to read {collection}: {message}")]
    Backend {
        collection: &'static str,
        message: String,
    },
}

impl ReadError {
    pub fn backend(collection: &'static str, message: impl Into<String>) -> Self {
        Self::Backend {
            collection,
            message: message.into(),
        }
    }
}

/// Read-only, tenant-scoped access to agency data.
///
/// Every list is ordered most recently created first.
#[async_trait]
pub trait AgencyReader: Send + Sync {
    async fn list_clients(&self, tenant_id: TenantId) -> Result<Vec<Client>, ReadError>;

    async fn list_engagements(
        &self,
        tenant_id: TenantId,
    ) -> Result<Vec<EngagementWithClient>, ReadError>;

    async fn list_proposals(&self, tenant_id: TenantId) -> Result<Vec<ProposalWithClient>, ReadError>;

    async fn list_reports(&self, tenant_id: TenantId) -> Result<Vec<ReportWithContext>, ReadError>;
}

#[async_trait]
impl<R> AgencyReader for Arc<R>
where
    R: AgencyReader + ?Sized,
{
    async fn list_clients(&self, tenant_id: TenantId) -> Result<Vec<Client>, ReadError> {
        (**self).list_clients(tenant_id).await
    }

    async fn list_engagements(
        &self,
        tenant_id: TenantId,
    ) -> Result<Vec<EngagementWithClient>, ReadError> {
        (**self).list_engagements(tenant_id).await
    }

    async fn list_proposals(&self, tenant_id: TenantId) -> Result<Vec<ProposalWithClient>, ReadError> {
        (**self).list_proposals(tenant_id).await
    }

    async fn list_reports(&self, tenant_id: TenantId) -> Result<Vec<ReportWithContext>, ReadError> {
        (**self).list_reports(tenant_id).await
    }
}

/// Point-in-time view of one tenant's business state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TenantSnapshot {
    pub tenant_id: TenantId,
    pub clients: Vec<Client>,
    pub engagements: Vec<EngagementWithClient>,
    pub proposals: Vec<ProposalWithClient>,
    pub reports: Vec<ReportWithContext>,
}

/// Counts and revenue derived from a snapshot in one pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AgencyMetrics {
    pub total_clients: usize,
    pub active_clients: usize,
    pub prospect_clients: usize,
    pub total_engagements: usize,
    pub active_engagements: usize,
    pub onboarding_engagements: usize,
    /// Sum of active engagement fees, still in cents.
    pub monthly_recurring_revenue: Cents,
    pub total_proposals: usize,
    pub pending_proposals: usize,
    pub total_reports: usize,
}

/// A display list cut to a fixed length, remembering how many were dropped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TruncatedList {
    pub items: Vec<String>,
    pub remaining: usize,
}

impl TruncatedList {
    fn take<I>(iter: I, limit: usize) -> Self
    where
        I: ExactSizeIterator<Item = String>,
    {
        let total = iter.len();
        let items: Vec<String> = iter.take(limit).collect();
        let remaining = total - items.len();
        Self { items, remaining }
    }

    /// The `... and N more` line, when anything was cut.
    pub fn suffix(&self) -> Option<String> {
        (self.remaining > 0).then(|| format!("... and {} more", self.remaining))
    }

    /// Items followed by the suffix line, if any.
    pub fn lines(&self) -> Vec<String> {
        let mut lines = self.items.clone();
        lines.extend(self.suffix());
        lines
    }
}

impl TenantSnapshot {
    /// A tenant with no records. Valid input everywhere.
    pub fn empty(tenant_id: TenantId) -> Self {
        Self {
            tenant_id,
            clients: Vec::new(),
            engagements: Vec::new(),
            proposals: Vec::new(),
            reports: Vec::new(),
        }
    }

    pub fn metrics(&self) -> AgencyMetrics {
        let mut m = AgencyMetrics {
            total_clients: self.clients.len(),
            total_engagements: self.engagements.len(),
            total_proposals: self.proposals.len(),
            total_reports: self.reports.len(),
            ..AgencyMetrics::default()
        };

        for client in &self.clients {
            match client.status {
                ClientStatus::Active => m.active_clients += 1,
                ClientStatus::Prospect => m.prospect_clients += 1,
                ClientStatus::Paused | ClientStatus::Churned => {}
            }
        }

        for row in &self.engagements {
            match row.engagement.status {
                EngagementStatus::Active => {
                    m.active_engagements += 1;
                    m.monthly_recurring_revenue = m.monthly_recurring_revenue + row.engagement.fee;
                }
                EngagementStatus::Onboarding => m.onboarding_engagements += 1,
                EngagementStatus::Paused | EngagementStatus::Complete => {}
            }
        }

        m.pending_proposals = self.proposals.iter().filter(|p| p.proposal.is_pending()).count();
        m
    }

    pub fn active_engagements(&self) -> impl Iterator<Item = &EngagementWithClient> {
        self.engagements.iter().filter(|row| row.engagement.is_active())
    }

    /// First five clients as `- Name (status, industry)` lines.
    pub fn client_list(&self) -> TruncatedList {
        TruncatedList::take(self.clients.iter().map(client_line), CLIENT_DISPLAY_LIMIT)
    }

    /// First three active engagements as `- Client: tier - $fee/mo` lines.
    pub fn active_engagement_list(&self) -> TruncatedList {
        let active: Vec<String> = self.active_engagements().map(engagement_line).collect();
        TruncatedList::take(active.into_iter(), ENGAGEMENT_DISPLAY_LIMIT)
    }
}

fn client_line(client: &Client) -> String {
    match client.industry.as_deref().filter(|s| !s.trim().is_empty()) {
        Some(industry) => format!("- {} ({}, {})", client.name, client.status, industry),
        None => format!("- {} ({})", client.name, client.status),
    }
}

fn engagement_line(row: &EngagementWithClient) -> String {
    format!(
        "- {}: {} - {}/mo",
        row.client.name, row.engagement.service_tier, row.engagement.fee
    )
}

/// Fans out the four tenant reads and joins them into a snapshot.
#[derive(Debug, Clone)]
pub struct ContextAggregator<R> {
    reader: R,
}

impl<R: AgencyReader> ContextAggregator<R> {
    pub fn new(reader: R) -> Self {
        Self { reader }
    }

    /// Read all four collections concurrently.
    ///
    /// All-or-nothing: the first failing read fails the whole snapshot.
    #[instrument(skip(self), fields(tenant = %tenant_id))]
    pub async fn snapshot(&self, tenant_id: TenantId) -> Result<TenantSnapshot, ReadError> {
        let result = tokio::try_join!(
            self.reader.list_clients(tenant_id),
            self.reader.list_engagements(tenant_id),
            self.reader.list_proposals(tenant_id),
            self.reader.list_reports(tenant_id),
        );

        let (clients, engagements, proposals, reports) = match result {
            Ok(parts) => parts,
            Err(e) => {
                warn!(tenant = %tenant_id, error = ?e, "tenant context aggregation failed");
                return Err(e);
            }
        };

        debug!(
            clients = clients.len(),
            engagements = engagements.len(),
            proposals = proposals.len(),
            reports = reports.len(),
            "tenant snapshot loaded"
        );

        Ok(TenantSnapshot {
            tenant_id,
            clients,
            engagements,
            proposals,
            reports,
        })
    }
}
