//! Tenant-isolated read model storage.

pub mod agency_store;

pub use agency_store::{AgencySeed, InMemoryAgencyStore};
