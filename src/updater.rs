//! The decide-then-update-then-wait-for-propagation sequence.
//!
//! One [`Updater::run`] call performs, in order: public IP discovery,
//! resolver-based drift check, short-circuit on equality, zone and
//! record-set fetch, membership check against the provider's full value
//! set, atomic delete+create submission, and a status poll until the
//! change leaves PENDING.
//!
//! The resolver check and the membership check use different sources
//! (public resolver vs. the provider's authoritative record) and can
//! disagree when the resolver serves a stale cached answer. Both gates
//! are evaluated; an update happens only when both report drift.

use std::net::Ipv4Addr;
use std::time::Duration;

use thiserror::Error;

use crate::discover::{DiscoverError, PublicIpSource};
use crate::resolve::{RecordResolver, ResolveError};
use crate::route53::{ChangeRef, ChangeRequest, ChangeState, DnsApi, ProviderError};

#[cfg(test)]
#[path = "updater_tests.rs"]
mod tests;

/// Identity of the record being managed. The record type is fixed to "A".
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateTarget {
    /// Route 53 hosted zone identifier
    pub zone_id: String,
    /// Domain name whose "A" record is checked and updated
    pub domain: String,
}

/// Timing policy for the propagation poll loop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PollPolicy {
    /// Delay between status polls
    pub interval: Duration,
    /// Maximum number of polls before giving up; `None` polls until the
    /// status leaves PENDING, however long that takes
    pub max_polls: Option<u32>,
}

impl Default for PollPolicy {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(crate::config::defaults::POLL_INTERVAL_SECS),
            max_polls: None,
        }
    }
}

/// Terminal outcome of one updater run. Every variant exits 0.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// The public resolver already serves the discovered IP; nothing done.
    InSync {
        /// The address both sides agree on
        ip: Ipv4Addr,
    },
    /// The provider's record-set already carries the discovered IP.
    AlreadyCurrent {
        /// The discovered address
        ip: Ipv4Addr,
    },
    /// The record was replaced and the change reached INSYNC.
    Updated {
        /// Value set that was deleted
        previous: Vec<Ipv4Addr>,
        /// The address now on record
        current: Ipv4Addr,
    },
    /// The change left PENDING with a status other than INSYNC.
    ///
    /// Soft failure: observable in the log, but the process still exits 0.
    Unconfirmed {
        /// The terminal status the provider reported
        status: ChangeState,
    },
    /// Dry-run mode: drift was found but no change was submitted.
    SkippedDryRun {
        /// Value set that would have been deleted
        previous: Vec<Ipv4Addr>,
        /// The address that would have been created
        current: Ipv4Addr,
    },
}

/// Error type for a failed updater run. Every variant is fatal and maps
/// to a non-zero exit.
#[derive(Debug, Error)]
pub enum UpdateError {
    /// Public IP discovery failed.
    #[error("Public IP discovery failed: {0}")]
    Discover(#[source] DiscoverError),

    /// The resolver-based drift check failed.
    #[error("DNS resolution failed: {0}")]
    Resolve(#[source] ResolveError),

    /// Zone lookup or record fetch failed.
    #[error(transparent)]
    Provider(#[from] ProviderError),

    /// The zone holds no "A" record-set for the domain.
    #[error("No A record-set for '{domain}' in zone {zone_id}")]
    RecordNotFound {
        /// The zone that was searched
        zone_id: String,
        /// The domain that was searched for
        domain: String,
    },

    /// The provider rejected or failed the change submission.
    #[error("Change submission failed: {0}")]
    Submit(#[source] ProviderError),

    /// A status poll failed after the change was submitted.
    #[error("Change status poll failed: {0}")]
    StatusPoll(#[source] ProviderError),

    /// The poll bound was exhausted with the change still PENDING.
    ///
    /// The change was submitted and may still propagate; only the
    /// confirmation is missing.
    #[error("Change {change_id} still PENDING after {attempts} polls")]
    PropagationTimeout {
        /// The unconfirmed change
        change_id: String,
        /// How many polls were made
        attempts: u32,
    },
}

/// Orchestrates one check-and-update pass over a single "A" record.
#[derive(Debug)]
pub struct Updater<S, R, A> {
    target: UpdateTarget,
    ip_source: S,
    resolver: R,
    api: A,
    poll: PollPolicy,
    dry_run: bool,
}

impl<S, R, A> Updater<S, R, A>
where
    S: PublicIpSource,
    R: RecordResolver,
    A: DnsApi,
{
    /// Creates an updater with the default poll policy and dry-run off.
    pub fn new(target: UpdateTarget, ip_source: S, resolver: R, api: A) -> Self {
        Self {
            target,
            ip_source,
            resolver,
            api,
            poll: PollPolicy::default(),
            dry_run: false,
        }
    }

    /// Replaces the propagation poll policy.
    #[must_use]
    pub fn with_poll_policy(mut self, poll: PollPolicy) -> Self {
        self.poll = poll;
        self
    }

    /// Enables or disables dry-run mode.
    #[must_use]
    pub const fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    /// Runs the full sequence once.
    ///
    /// # Errors
    ///
    /// Returns [`UpdateError`] for every fatal condition: discovery or
    /// resolution failure, zone or record not found, submission failure,
    /// status-poll failure, or an exhausted poll bound.
    pub async fn run(&self) -> Result<Outcome, UpdateError> {
        let domain = &self.target.domain;

        let discovered = self
            .ip_source
            .discover()
            .await
            .map_err(UpdateError::Discover)?;
        tracing::debug!("Public IP service reports {discovered}");

        let resolved = self
            .resolver
            .resolve_a(domain)
            .await
            .map_err(UpdateError::Resolve)?;

        // Cheap gate: the provider API costs quota per call, so a matching
        // public-resolver answer ends the run before any provider call.
        if resolved == discovered {
            tracing::debug!(
                "DNS answer ({resolved}) and public IP ({discovered}) are the same, nothing to do"
            );
            return Ok(Outcome::InSync { ip: discovered });
        }

        let zone = self.api.find_zone(&self.target.zone_id).await?;
        tracing::debug!("Zone is {zone:?}");

        let record = self
            .api
            .fetch_record_set(&self.target.zone_id, domain)
            .await?
            .ok_or_else(|| UpdateError::RecordNotFound {
                zone_id: self.target.zone_id.clone(),
                domain: domain.clone(),
            })?;

        // Second gate, against the provider's authoritative value set: a
        // stale resolver answer must not trigger a redundant change.
        if record.values.contains(&discovered) {
            tracing::debug!(
                "Record-set for {domain} already carries {discovered}, nothing to change"
            );
            return Ok(Outcome::AlreadyCurrent { ip: discovered });
        }

        tracing::info!("Found new IP: {discovered}");
        let request = ChangeRequest::replace(&record, discovered);

        if self.dry_run {
            tracing::info!(
                "Dry-run: would delete {:?} and create {} for {} (ttl {})",
                request.delete_values,
                request.create_value,
                domain,
                request.ttl,
            );
            return Ok(Outcome::SkippedDryRun {
                previous: record.values,
                current: discovered,
            });
        }

        let change = self
            .api
            .submit_change(&self.target.zone_id, &request)
            .await
            .map_err(UpdateError::Submit)?;
        tracing::debug!("Change {} submitted with status {}", change.id, change.state);

        let terminal = self.await_propagation(&change).await?;

        match terminal {
            ChangeState::InSync => {
                let previous_display = record
                    .values
                    .first()
                    .map_or_else(|| "<none>".to_string(), ToString::to_string);
                tracing::info!("Changed A {domain}: {previous_display} -> {discovered}");
                Ok(Outcome::Updated {
                    previous: record.values,
                    current: discovered,
                })
            }
            status => {
                tracing::warn!("Unknown status for change {}: {status}", change.id);
                tracing::debug!("Terminal status payload: {status:?}");
                Ok(Outcome::Unconfirmed { status })
            }
        }
    }

    /// Polls the change status until it leaves PENDING, sleeping
    /// `poll.interval` between polls.
    async fn await_propagation(&self, change: &ChangeRef) -> Result<ChangeState, UpdateError> {
        let mut state = change.state.clone();
        let mut polls: u32 = 0;

        while state.is_pending() {
            if let Some(max) = self.poll.max_polls {
                if polls >= max {
                    return Err(UpdateError::PropagationTimeout {
                        change_id: change.id.clone(),
                        attempts: polls,
                    });
                }
            }

            tokio::time::sleep(self.poll.interval).await;
            polls += 1;

            state = self
                .api
                .change_state(&change.id)
                .await
                .map_err(UpdateError::StatusPoll)?;
            tracing::debug!("Change {} status after poll {polls}: {state}", change.id);
        }

        Ok(state)
    }
}
