use std::cmp::Reverse;
use std::collections::HashMap;
use std::sync::{RwLock, RwLockReadGuard};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

use agencyos_agency::{
    Client, Engagement, EngagementWithClient, Proposal, ProposalWithClient, Report,
    ReportWithContext,
};
use agencyos_ai::{AgencyReader, ReadError};
use agencyos_core::{ClientId, EngagementId, ProposalId, ReportId, TenantId};

/// Records to preload into a store, e.g. from a JSON fixture file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AgencySeed {
    #[serde(default)]
    pub clients: Vec<Client>,
    #[serde(default)]
    pub engagements: Vec<Engagement>,
    #[serde(default)]
    pub proposals: Vec<Proposal>,
    #[serde(default)]
    pub reports: Vec<Report>,
}

#[derive(Debug, Default)]
struct Tables {
    clients: HashMap<(TenantId, ClientId), Client>,
    engagements: HashMap<(TenantId, EngagementId), Engagement>,
    proposals: HashMap<(TenantId, ProposalId), Proposal>,
    reports: HashMap<(TenantId, ReportId), Report>,
}

impl Tables {
    fn client(&self, tenant_id: TenantId, id: ClientId) -> Option<&Client> {
        self.clients.get(&(tenant_id, id))
    }

    fn engagement(&self, tenant_id: TenantId, id: EngagementId) -> Option<&Engagement> {
        self.engagements.get(&(tenant_id, id))
    }
}

/// Tenant-isolated in-memory agency data for tests/dev.
///
/// Records are keyed by their own `tenant_id`; a row is never visible to
/// another tenant. Joined reads skip rows whose parent record is missing.
#[derive(Debug, Default)]
pub struct InMemoryAgencyStore {
    inner: RwLock<Tables>,
}

impl InMemoryAgencyStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_seed(seed: AgencySeed) -> Self {
        let store = Self::new();
        store.load(seed);
        store
    }

    pub fn load(&self, seed: AgencySeed) {
        debug!(
            clients = seed.clients.len(),
            engagements = seed.engagements.len(),
            proposals = seed.proposals.len(),
            reports = seed.reports.len(),
            "loading agency seed"
        );
        seed.clients.into_iter().for_each(|c| self.upsert_client(c));
        seed.engagements.into_iter().for_each(|e| self.upsert_engagement(e));
        seed.proposals.into_iter().for_each(|p| self.upsert_proposal(p));
        seed.reports.into_iter().for_each(|r| self.upsert_report(r));
    }

    pub fn upsert_client(&self, client: Client) {
        if let Ok(mut t) = self.inner.write() {
            t.clients.insert((client.tenant_id, client.id), client);
        }
    }

    pub fn upsert_engagement(&self, engagement: Engagement) {
        if let Ok(mut t) = self.inner.write() {
            t.engagements.insert((engagement.tenant_id, engagement.id), engagement);
        }
    }

    pub fn upsert_proposal(&self, proposal: Proposal) {
        if let Ok(mut t) = self.inner.write() {
            t.proposals.insert((proposal.tenant_id, proposal.id), proposal);
        }
    }

    pub fn upsert_report(&self, report: Report) {
        if let Ok(mut t) = self.inner.write() {
            t.reports.insert((report.tenant_id, report.id), report);
        }
    }

    /// Clear all records for a tenant.
    pub fn clear_tenant(&self, tenant_id: TenantId) {
        if let Ok(mut t) = self.inner.write() {
            t.clients.retain(|(tenant, _), _| *tenant != tenant_id);
            t.engagements.retain(|(tenant, _), _| *tenant != tenant_id);
            t.proposals.retain(|(tenant, _), _| *tenant != tenant_id);
            t.reports.retain(|(tenant, _), _| *tenant != tenant_id);
        }
    }

    fn tables(&self, collection: &'static str) -> Result<RwLockReadGuard<'_, Tables>, ReadError> {
        self.inner
            .read()
            .map_err(|_| ReadError::backend(collection, "store lock poisoned"))
    }
}

/// Ids have no ordering of their own; their UUID bytes break `created_at` ties.
fn newest_first<T>(rows: &mut [T], key: impl Fn(&T) -> (DateTime<Utc>, [u8; 16])) {
    rows.sort_by_key(|row| Reverse(key(row)));
}

#[async_trait]
impl AgencyReader for InMemoryAgencyStore {
    async fn list_clients(&self, tenant_id: TenantId) -> Result<Vec<Client>, ReadError> {
        let t = self.tables("clients")?;
        let mut rows: Vec<Client> = t
            .clients
            .iter()
            .filter(|((tenant, _), _)| *tenant == tenant_id)
            .map(|(_, c)| c.clone())
            .collect();
        newest_first(&mut rows, |c| (c.created_at, *c.id.as_uuid().as_bytes()));
        Ok(rows)
    }

    async fn list_engagements(
        &self,
        tenant_id: TenantId,
    ) -> Result<Vec<EngagementWithClient>, ReadError> {
        let t = self.tables("engagements")?;
        let mut rows: Vec<EngagementWithClient> = t
            .engagements
            .iter()
            .filter(|((tenant, _), _)| *tenant == tenant_id)
            .filter_map(|(_, e)| {
                let client = t.client(tenant_id, e.client_id)?;
                Some(EngagementWithClient {
                    engagement: e.clone(),
                    client: client.clone(),
                })
            })
            .collect();
        newest_first(&mut rows, |r| {
            (r.engagement.created_at, *r.engagement.id.as_uuid().as_bytes())
        });
        Ok(rows)
    }

    async fn list_proposals(&self, tenant_id: TenantId) -> Result<Vec<ProposalWithClient>, ReadError> {
        let t = self.tables("proposals")?;
        let mut rows: Vec<ProposalWithClient> = t
            .proposals
            .iter()
            .filter(|((tenant, _), _)| *tenant == tenant_id)
            .filter_map(|(_, p)| {
                let client = t.client(tenant_id, p.client_id)?;
                Some(ProposalWithClient {
                    proposal: p.clone(),
                    client: client.clone(),
                })
            })
            .collect();
        newest_first(&mut rows, |r| {
            (r.proposal.created_at, *r.proposal.id.as_uuid().as_bytes())
        });
        Ok(rows)
    }

    async fn list_reports(&self, tenant_id: TenantId) -> Result<Vec<ReportWithContext>, ReadError> {
        let t = self.tables("reports")?;
        let mut rows: Vec<ReportWithContext> = t
            .reports
            .iter()
            .filter(|((tenant, _), _)| *tenant == tenant_id)
            .filter_map(|(_, r)| {
                let engagement = t.engagement(tenant_id, r.engagement_id)?;
                let client = t.client(tenant_id, engagement.client_id)?;
                Some(ReportWithContext {
                    report: r.clone(),
                    engagement: engagement.clone(),
                    client: client.clone(),
                })
            })
            .collect();
        newest_first(&mut rows, |r| {
            (r.report.created_at, *r.report.id.as_uuid().as_bytes())
        });
        Ok(rows)
    }
}
