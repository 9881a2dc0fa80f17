//! `agencyos-ai`
//!
//! **Responsibility:** the AI-assisted content pipeline.
//!
//! caller → [`context`] (when the task needs tenant data) → [`prompt`] →
//! [`gateway`] → [`parse`] / [`fallback`] → typed result.
//!
//! This crate does not own persisted state:
//! - It only reads tenant data through an injected [`AgencyReader`].
//! - It never retries a failed model call.
//! - Results are returned to callers, who decide what to store.

pub mod context;
pub mod fallback;
pub mod gateway;
pub mod insights;
pub mod parse;
pub mod prompt;
pub mod request;
pub mod result;
pub mod service;

#[cfg(test)]
mod testing;

pub use context::{AgencyMetrics, AgencyReader, ContextAggregator, ReadError, TenantSnapshot};
pub use fallback::StructuredReport;
pub use gateway::{GatewayError, ModelGateway};
pub use insights::Insights;
pub use parse::{SectionParse, segment_report};
pub use prompt::{HistoryEntry, HistoryRole, PromptMessage, PromptTranscript, Role};
pub use request::{
    ChatInput, ClientProfile, EngagementTerms, GenerationRequest, OnboardingInput, ProposalInput,
    ReportInput,
};
pub use result::{GenerationError, GenerationResult, GenerationTask};
pub use service::ContentService;
