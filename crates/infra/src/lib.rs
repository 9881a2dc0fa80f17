//! Infrastructure layer: tenant data store, model provider client, config.

pub mod config;
pub mod llm;
pub mod read_model;

pub use config::{ConfigError, GatewayConfig};
pub use llm::OpenAiCompatibleGateway;
pub use read_model::InMemoryAgencyStore;
