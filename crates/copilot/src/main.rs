use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use agencyos_ai::ContentService;
use agencyos_copilot::{SEED_FILE_ENV, USAGE};
use agencyos_infra::{GatewayConfig, InMemoryAgencyStore, OpenAiCompatibleGateway};

#[tokio::main]
async fn main() -> ExitCode {
    agencyos_observability::init();

    match run().await {
        Ok(output) => {
            println!("{output}");
            ExitCode::SUCCESS
        }
        Err(e) => {
            tracing::error!(error = ?e, "copilot failed");
            eprintln!("{e}");
            ExitCode::FAILURE
        }
    }
}

async fn run() -> anyhow::Result<String> {
    let invocation = agencyos_copilot::parse_args(std::env::args().skip(1))
        .map_err(|e| anyhow::anyhow!("{e}\n{USAGE}"))?;

    let seed_path = std::env::var_os(SEED_FILE_ENV).map(PathBuf::from);
    let seed = agencyos_copilot::load_seed(seed_path.as_deref())?;
    let request = agencyos_copilot::build_request(&invocation, &seed)?;

    let store = Arc::new(InMemoryAgencyStore::from_seed(seed));
    let gateway = OpenAiCompatibleGateway::new(GatewayConfig::from_env()?)?;
    let service = ContentService::new(store, gateway);

    agencyos_copilot::run(&service, &request).await
}
