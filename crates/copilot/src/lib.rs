//! Terminal front end for the content pipeline.
//!
//! ```text
//! agencyos-copilot [--tenant <uuid>] insights
//! agencyos-copilot [--tenant <uuid>] ask <message...>
//! agencyos-copilot request <file.json>
//! ```
//!
//! Tenant data comes from the JSON seed named by `AGENCY_SEED_FILE`.
//! Without `--tenant` the first seeded client's tenant is used.

use std::path::{Path, PathBuf};

use anyhow::Context as _;
use thiserror::Error;
use tracing::{info, warn};

use agencyos_ai::{AgencyReader, ChatInput, ContentService, GenerationRequest, ModelGateway};
use agencyos_core::TenantId;
use agencyos_infra::read_model::AgencySeed;

pub const SEED_FILE_ENV: &str = "AGENCY_SEED_FILE";

pub const USAGE: &str = "usage: agencyos-copilot [--tenant <uuid>] (insights | ask <message...> | request <file.json>)";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum UsageError {
    #[error("no command given")]
    MissingCommand,

    #[error("unknown command {0:?}")]
    UnknownCommand(String),

    #[error("{0} needs a value")]
    MissingValue(&'static str),

    #[error("invalid tenant id: {0}")]
    InvalidTenant(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Insights,
    Ask(String),
    /// A serialized [`GenerationRequest`] read from a file.
    Request(PathBuf),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub tenant: Option<TenantId>,
    pub command: Command,
}

/// Parse arguments after the program name.
pub fn parse_args<I>(args: I) -> Result<Invocation, UsageError>
where
    I: IntoIterator<Item = String>,
{
    let mut args = args.into_iter().peekable();
    let mut tenant = None;

    if args.peek().map(String::as_str) == Some("--tenant") {
        args.next();
        let raw = args.next().ok_or(UsageError::MissingValue("--tenant"))?;
        let id = raw
            .parse::<TenantId>()
            .map_err(|e| UsageError::InvalidTenant(e.to_string()))?;
        tenant = Some(id);
    }

    let command = match args.next().as_deref() {
        None => return Err(UsageError::MissingCommand),
        Some("insights") => Command::Insights,
        Some("ask") => {
            let message = args.collect::<Vec<_>>().join(" ");
            if message.trim().is_empty() {
                return Err(UsageError::MissingValue("ask"));
            }
            Command::Ask(message)
        }
        Some("request") => {
            let path = args.next().ok_or(UsageError::MissingValue("request"))?;
            Command::Request(PathBuf::from(path))
        }
        Some(other) => return Err(UsageError::UnknownCommand(other.to_owned())),
    };

    Ok(Invocation { tenant, command })
}

/// Read the seed file, or start empty when none is configured.
pub fn load_seed(path: Option<&Path>) -> anyhow::Result<AgencySeed> {
    let Some(path) = path else {
        warn!("{SEED_FILE_ENV} is not set; starting with no tenant data");
        return Ok(AgencySeed::default());
    };

    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read seed file {}", path.display()))?;
    let seed: AgencySeed = serde_json::from_str(&raw)
        .with_context(|| format!("failed to parse seed file {}", path.display()))?;

    info!(
        path = %path.display(),
        clients = seed.clients.len(),
        engagements = seed.engagements.len(),
        "seed loaded"
    );
    Ok(seed)
}

/// Explicit tenant, else the tenant of the first seeded client.
pub fn resolve_tenant(explicit: Option<TenantId>, seed: &AgencySeed) -> anyhow::Result<TenantId> {
    explicit
        .or_else(|| seed.clients.first().map(|c| c.tenant_id))
        .context("no tenant given and the seed has no clients; pass --tenant <uuid>")
}

/// Turn an invocation into a pipeline request.
pub fn build_request(invocation: &Invocation, seed: &AgencySeed) -> anyhow::Result<GenerationRequest> {
    match &invocation.command {
        Command::Insights => Ok(GenerationRequest::Insights {
            tenant_id: resolve_tenant(invocation.tenant, seed)?,
        }),
        Command::Ask(message) => Ok(GenerationRequest::ChatTurn(ChatInput {
            tenant_id: resolve_tenant(invocation.tenant, seed)?,
            message: message.clone(),
            history: Vec::new(),
        })),
        Command::Request(path) => {
            let raw = std::fs::read_to_string(path)
                .with_context(|| format!("failed to read request file {}", path.display()))?;
            serde_json::from_str(&raw)
                .with_context(|| format!("failed to parse request file {}", path.display()))
        }
    }
}

/// Run one request and render the result as pretty JSON.
pub async fn run<R, G>(
    service: &ContentService<R, G>,
    request: &GenerationRequest,
) -> anyhow::Result<String>
where
    R: AgencyReader,
    G: ModelGateway,
{
    info!(task = request.task().as_str(), "running generation request");
    let result = service.generate(request).await?;
    Ok(serde_json::to_string_pretty(&result)?)
}
