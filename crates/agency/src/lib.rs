//! Agency read-model records: clients, engagements, proposals, reports.
//!
//! These are the rows the data-access layer hands to the content pipeline.
//! The pipeline only reads them; writes belong to the callers.

pub mod client;
pub mod engagement;
pub mod proposal;
pub mod report;

pub use client::{Client, ClientStatus};
pub use engagement::{Engagement, EngagementStatus, EngagementWithClient};
pub use proposal::{Proposal, ProposalStatus, ProposalWithClient};
pub use report::{Report, ReportWithContext};
