//! Route 53 record management.
//!
//! This module provides:
//! - Provider-neutral value types ([`RecordSnapshot`], [`ChangeRequest`],
//!   [`ChangeRef`], [`ChangeState`], [`ZoneSummary`])
//! - The provider seam consumed by the updater ([`DnsApi`])
//! - The production client over the AWS SDK ([`Route53Client`])
//! - The provider error taxonomy ([`ProviderError`])

mod client;
mod error;
mod types;

#[cfg(test)]
mod types_tests;

pub use client::Route53Client;
pub use error::ProviderError;
pub use types::{ChangeRef, ChangeRequest, ChangeState, RecordSnapshot, ZoneSummary};

/// Trait for the DNS provider's record-management API.
///
/// One method per provider call the updater makes: zone lookup, record-set
/// fetch, batched change submission, and change-status retrieval. The
/// production implementation is [`Route53Client`]; tests substitute
/// scripted implementations.
pub trait DnsApi: Send + Sync {
    /// Fetches the hosted zone by its identifier.
    ///
    /// # Errors
    ///
    /// Returns [`ProviderError::ZoneNotFound`] when the zone does not
    /// exist, or another [`ProviderError`] for API failures.
    fn find_zone(
        &self,
        zone_id: &str,
    ) -> impl std::future::Future<Output = Result<ZoneSummary, ProviderError>> + Send;

    /// Fetches the "A" record-set for the domain, requesting at most one
    /// result.
    ///
    /// Returns `Ok(None)` when the zone holds no matching record-set with
    /// at least one value.
    ///
    /// # Errors
    ///
    /// Returns [`ProviderError`] for API failures or responses this crate
    /// cannot represent (alias record-sets without a TTL, non-IPv4 values).
    fn fetch_record_set(
        &self,
        zone_id: &str,
        domain: &str,
    ) -> impl std::future::Future<Output = Result<Option<RecordSnapshot>, ProviderError>> + Send;

    /// Submits one atomic delete-old/create-new change batch.
    ///
    /// # Errors
    ///
    /// Returns [`ProviderError`] when the provider rejects or fails the
    /// commit.
    fn submit_change(
        &self,
        zone_id: &str,
        request: &ChangeRequest,
    ) -> impl std::future::Future<Output = Result<ChangeRef, ProviderError>> + Send;

    /// Fetches the current propagation status of a submitted change.
    ///
    /// # Errors
    ///
    /// Returns [`ProviderError`] when the status cannot be retrieved.
    fn change_state(
        &self,
        change_id: &str,
    ) -> impl std::future::Future<Output = Result<ChangeState, ProviderError>> + Send;
}
