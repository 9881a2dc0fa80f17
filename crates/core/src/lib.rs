//! `agencyos-core` — shared building blocks for the agency workspace.
//!
//! This crate contains **pure** primitives (no infrastructure concerns):
//! tenant-scoped identifiers, the minor-unit money type and the domain error.

pub mod error;
pub mod id;
pub mod money;

pub use error::{DomainError, DomainResult};
pub use id::{ClientId, EngagementId, ProposalId, ReportId, TenantId};
pub use money::Cents;
