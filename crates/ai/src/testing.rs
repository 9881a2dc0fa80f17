//! Test doubles for the pipeline's unit tests.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;

use agencyos_agency::{
    Client, ClientStatus, EngagementStatus, EngagementWithClient, ProposalStatus,
    ProposalWithClient, ReportWithContext,
};
use agencyos_core::TenantId;

use crate::context::{AgencyReader, ReadError};
use crate::gateway::{GatewayError, ModelGateway};
use crate::prompt::PromptTranscript;

pub mod fixtures {
    use super::*;
    use agencyos_agency::{Engagement, Proposal, Report};
    use agencyos_core::Cents;
    use chrono::{DateTime, Duration as ChronoDuration, TimeZone, Utc};

    fn base_time() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 6, 1, 9, 0, 0).unwrap()
    }

    /// `age_hours` orders fixtures: larger is older.
    pub fn client(tenant: TenantId, name: &str, status: ClientStatus, age_hours: i64) -> Client {
        Client::new(tenant, name, status, base_time() - ChronoDuration::hours(age_hours)).unwrap()
    }

    pub fn engagement(client: &Client, fee: i64, status: EngagementStatus) -> EngagementWithClient {
        EngagementWithClient {
            engagement: Engagement::new(client, "Growth", Cents::new(fee), status, base_time()),
            client: client.clone(),
        }
    }

    pub fn proposal(client: &Client, status: ProposalStatus) -> ProposalWithClient {
        ProposalWithClient {
            proposal: Proposal::new(client, "Retainer proposal", status, base_time()),
            client: client.clone(),
        }
    }

    pub fn report(row: &EngagementWithClient) -> ReportWithContext {
        ReportWithContext {
            report: Report::new(&row.engagement, "May report", "Good", "More", base_time()),
            engagement: row.engagement.clone(),
            client: row.client.clone(),
        }
    }
}

/// Serves fixed collections regardless of tenant. With a delay set, every
/// read sleeps that long before answering.
#[derive(Debug, Clone, Default)]
pub struct StaticReader {
    pub clients: Vec<Client>,
    pub engagements: Vec<EngagementWithClient>,
    pub proposals: Vec<ProposalWithClient>,
    pub reports: Vec<ReportWithContext>,
    pub delay: Option<Duration>,
}

impl StaticReader {
    pub fn with_sample(tenant: TenantId) -> Self {
        let acme = fixtures::client(tenant, "Acme", ClientStatus::Active, 0).with_industry("Retail");
        let globex = fixtures::client(tenant, "Globex", ClientStatus::Prospect, 1);
        let active = fixtures::engagement(&acme, 500_000, EngagementStatus::Active);
        let onboarding = fixtures::engagement(&globex, 150_000, EngagementStatus::Onboarding);

        Self {
            reports: vec![fixtures::report(&active)],
            proposals: vec![fixtures::proposal(&globex, ProposalStatus::Sent)],
            engagements: vec![active, onboarding],
            clients: vec![acme, globex],
            delay: None,
        }
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    async fn serve<T: Clone>(&self, rows: &[T]) -> Result<Vec<T>, ReadError> {
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        Ok(rows.to_vec())
    }
}

#[async_trait]
impl AgencyReader for StaticReader {
    async fn list_clients(&self, _tenant_id: TenantId) -> Result<Vec<Client>, ReadError> {
        self.serve(&self.clients).await
    }

    async fn list_engagements(
        &self,
        _tenant_id: TenantId,
    ) -> Result<Vec<EngagementWithClient>, ReadError> {
        self.serve(&self.engagements).await
    }

    async fn list_proposals(&self, _tenant_id: TenantId) -> Result<Vec<ProposalWithClient>, ReadError> {
        self.serve(&self.proposals).await
    }

    async fn list_reports(&self, _tenant_id: TenantId) -> Result<Vec<ReportWithContext>, ReadError> {
        self.serve(&self.reports).await
    }
}

/// Fails the named collection; every other read succeeds empty.
#[derive(Debug, Clone)]
pub struct FailingReader {
    collection: &'static str,
}

impl FailingReader {
    pub fn on(collection: &'static str) -> Self {
        Self { collection }
    }

    fn read<T>(&self, collection: &'static str) -> Result<Vec<T>, ReadError> {
        if collection == self.collection {
            Err(ReadError::backend(collection, "injected failure"))
        } else {
            Ok(Vec::new())
        }
    }
}

#[async_trait]
impl AgencyReader for FailingReader {
    async fn list_clients(&self, _tenant_id: TenantId) -> Result<Vec<Client>, ReadError> {
        self.read("clients")
    }

    async fn list_engagements(
        &self,
        _tenant_id: TenantId,
    ) -> Result<Vec<EngagementWithClient>, ReadError> {
        self.read("engagements")
    }

    async fn list_proposals(&self, _tenant_id: TenantId) -> Result<Vec<ProposalWithClient>, ReadError> {
        self.read("proposals")
    }

    async fn list_reports(&self, _tenant_id: TenantId) -> Result<Vec<ReportWithContext>, ReadError> {
        self.read("reports")
    }
}

/// Returns one scripted outcome and records every transcript it was sent.
#[derive(Debug, Clone)]
pub struct ScriptedGateway {
    reply: Result<String, GatewayError>,
    seen: Arc<Mutex<Vec<PromptTranscript>>>,
}

impl ScriptedGateway {
    pub fn replying(text: &str) -> Self {
        Self {
            reply: Ok(text.to_string()),
            seen: Arc::default(),
        }
    }

    pub fn failing(error: GatewayError) -> Self {
        Self {
            reply: Err(error),
            seen: Arc::default(),
        }
    }

    pub fn transcripts(&self) -> Vec<PromptTranscript> {
        self.seen.lock().unwrap().clone()
    }
}

#[async_trait]
impl ModelGateway for ScriptedGateway {
    async fn invoke(&self, transcript: &PromptTranscript) -> Result<String, GatewayError> {
        self.seen.lock().unwrap().push(transcript.clone());
        self.reply.clone()
    }
}
