//! Application execution logic.
//!
//! Wires the production IP source, resolver, and Route 53 client into a
//! single updater pass.

use thiserror::Error;

use ddns_r53::config::ValidatedConfig;
use ddns_r53::discover::{DiscoverError, HttpIpSource};
use ddns_r53::resolve::PublicResolver;
use ddns_r53::route53::Route53Client;
use ddns_r53::updater::{Outcome, PollPolicy, UpdateError, UpdateTarget, Updater};

/// Error type for runtime execution failures.
#[derive(Debug, Error)]
pub enum RunError {
    /// Failed to build the public IP discovery client.
    #[error("Failed to build IP discovery client: {0}")]
    IpSource(#[source] DiscoverError),

    /// The update pass failed.
    #[error(transparent)]
    Update(#[from] UpdateError),
}

/// Executes one check-and-update pass.
///
/// # Errors
///
/// Returns an error if the discovery client cannot be built or the
/// update pass fails.
///
/// # Coverage Note
///
/// This function is excluded from coverage because it requires real
/// network access and AWS credentials; the pass itself is covered
/// through the updater's tests.
#[cfg(not(tarpaulin_include))]
pub async fn execute(config: ValidatedConfig) -> Result<(), RunError> {
    let ip_source = HttpIpSource::new(config.ip_service.clone()).map_err(RunError::IpSource)?;
    let resolver = PublicResolver::new();
    let api = Route53Client::new(&config.access_key_id, &config.secret_access_key);

    let target = UpdateTarget {
        zone_id: config.zone_id.clone(),
        domain: config.domain.clone(),
    };

    if config.dry_run {
        tracing::info!("Dry-run mode enabled - changes will be logged but not submitted");
    }

    let updater = Updater::new(target, ip_source, resolver, api)
        .with_poll_policy(PollPolicy {
            interval: config.poll_interval,
            max_polls: config.max_polls,
        })
        .with_dry_run(config.dry_run);

    let outcome = updater.run().await?;
    log_outcome(&outcome);

    Ok(())
}

/// Logs a one-line summary of the pass for outcomes the updater itself
/// reports only at debug level.
fn log_outcome(outcome: &Outcome) {
    match outcome {
        Outcome::InSync { ip } => {
            tracing::info!("Record is in sync at {ip}, nothing to do");
        }
        Outcome::AlreadyCurrent { ip } => {
            tracing::info!("Record already carries {ip}, nothing to change");
        }
        // The updater already logged these at info or warn level.
        Outcome::Updated { .. } | Outcome::Unconfirmed { .. } | Outcome::SkippedDryRun { .. } => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::net::Ipv4Addr;

    #[test]
    fn run_error_preserves_update_source() {
        let err = RunError::from(UpdateError::RecordNotFound {
            zone_id: "Z1".to_string(),
            domain: "example.com".to_string(),
        });

        assert!(err.to_string().contains("example.com"));
    }

    #[test]
    fn log_outcome_accepts_every_variant() {
        log_outcome(&Outcome::InSync {
            ip: Ipv4Addr::new(1, 2, 3, 4),
        });
        log_outcome(&Outcome::AlreadyCurrent {
            ip: Ipv4Addr::new(1, 2, 3, 4),
        });
        log_outcome(&Outcome::Updated {
            previous: vec![Ipv4Addr::new(1, 2, 3, 4)],
            current: Ipv4Addr::new(5, 6, 7, 8),
        });
    }
}
