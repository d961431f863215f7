//! Tests for the update sequence.
//!
//! The three seams (IP source, resolver, provider API) are replaced with
//! scripted implementations that record every provider call, so each test
//! can assert both the outcome and which API calls were (not) made.

use std::collections::VecDeque;
use std::net::Ipv4Addr;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use crate::discover::{DiscoverError, PublicIpSource};
use crate::resolve::{RecordResolver, ResolveError};
use crate::route53::{
    ChangeRef, ChangeRequest, ChangeState, DnsApi, ProviderError, RecordSnapshot, ZoneSummary,
};

use super::{Outcome, PollPolicy, UpdateError, UpdateTarget, Updater};

const OLD_IP: Ipv4Addr = Ipv4Addr::new(1, 2, 3, 4);
const NEW_IP: Ipv4Addr = Ipv4Addr::new(5, 6, 7, 8);

fn target() -> UpdateTarget {
    UpdateTarget {
        zone_id: "Z119WBBTVP5WFX".to_string(),
        domain: "host.example.com".to_string(),
    }
}

fn record(values: &[Ipv4Addr]) -> RecordSnapshot {
    RecordSnapshot {
        name: "host.example.com.".to_string(),
        ttl: 300,
        values: values.to_vec(),
    }
}

#[derive(Clone, Copy)]
struct FixedIp(Ipv4Addr);

impl PublicIpSource for FixedIp {
    async fn discover(&self) -> Result<Ipv4Addr, DiscoverError> {
        Ok(self.0)
    }
}

struct FailingIp;

impl PublicIpSource for FailingIp {
    async fn discover(&self) -> Result<Ipv4Addr, DiscoverError> {
        Err(DiscoverError::NotAnAddress {
            body: "<html>".to_string(),
        })
    }
}

#[derive(Clone, Copy)]
struct FixedResolver(Ipv4Addr);

impl RecordResolver for FixedResolver {
    async fn resolve_a(&self, _domain: &str) -> Result<Ipv4Addr, ResolveError> {
        Ok(self.0)
    }
}

struct FailingResolver;

impl RecordResolver for FailingResolver {
    async fn resolve_a(&self, domain: &str) -> Result<Ipv4Addr, ResolveError> {
        Err(ResolveError::EmptyAnswer {
            domain: domain.to_string(),
        })
    }
}

/// Scripted provider API with call recording.
#[derive(Default)]
struct ScriptedApi {
    zone_missing: bool,
    record: Option<RecordSnapshot>,
    fail_submit: bool,
    /// Status reported in the commit response; defaults to PENDING
    initial_state: Option<ChangeState>,
    /// Statuses returned by successive `change_state` calls; when the
    /// queue runs dry the API reports INSYNC
    poll_states: Mutex<VecDeque<ChangeState>>,
    calls: Mutex<Vec<&'static str>>,
    submitted: Mutex<Option<ChangeRequest>>,
}

impl ScriptedApi {
    fn calls(&self) -> Vec<&'static str> {
        self.calls.lock().unwrap().clone()
    }

    fn submitted(&self) -> Option<ChangeRequest> {
        self.submitted.lock().unwrap().clone()
    }

    fn poll_count(&self) -> usize {
        self.calls().iter().filter(|c| **c == "change_state").count()
    }
}

impl DnsApi for Arc<ScriptedApi> {
    async fn find_zone(&self, zone_id: &str) -> Result<ZoneSummary, ProviderError> {
        self.calls.lock().unwrap().push("find_zone");
        if self.zone_missing {
            return Err(ProviderError::ZoneNotFound {
                zone_id: zone_id.to_string(),
            });
        }
        Ok(ZoneSummary {
            id: zone_id.to_string(),
            name: "example.com.".to_string(),
        })
    }

    async fn fetch_record_set(
        &self,
        _zone_id: &str,
        _domain: &str,
    ) -> Result<Option<RecordSnapshot>, ProviderError> {
        self.calls.lock().unwrap().push("fetch_record_set");
        Ok(self.record.clone())
    }

    async fn submit_change(
        &self,
        _zone_id: &str,
        request: &ChangeRequest,
    ) -> Result<ChangeRef, ProviderError> {
        self.calls.lock().unwrap().push("submit_change");
        if self.fail_submit {
            return Err(ProviderError::InvalidChange {
                message: "rejected".to_string(),
            });
        }
        *self.submitted.lock().unwrap() = Some(request.clone());
        let state = self.initial_state.clone().unwrap_or(ChangeState::Pending);
        Ok(ChangeRef::new("/change/C2682N5HXP0BZ4", state))
    }

    async fn change_state(&self, _change_id: &str) -> Result<ChangeState, ProviderError> {
        self.calls.lock().unwrap().push("change_state");
        let next = self.poll_states.lock().unwrap().pop_front();
        Ok(next.unwrap_or(ChangeState::InSync))
    }
}

fn updater(
    discovered: Ipv4Addr,
    resolved: Ipv4Addr,
    api: &Arc<ScriptedApi>,
) -> Updater<FixedIp, FixedResolver, Arc<ScriptedApi>> {
    Updater::new(
        target(),
        FixedIp(discovered),
        FixedResolver(resolved),
        Arc::clone(api),
    )
}

mod short_circuit {
    use super::*;

    #[tokio::test]
    async fn matching_resolver_answer_makes_no_provider_calls() {
        let api = Arc::new(ScriptedApi::default());

        let outcome = updater(OLD_IP, OLD_IP, &api).run().await.unwrap();

        assert_eq!(outcome, Outcome::InSync { ip: OLD_IP });
        assert!(api.calls().is_empty());
    }

    #[tokio::test]
    async fn stale_resolver_answer_still_respects_provider_record() {
        // The resolver lags behind: it reports the old IP while the
        // provider's record already carries the new one.
        let api = Arc::new(ScriptedApi {
            record: Some(record(&[NEW_IP])),
            ..ScriptedApi::default()
        });

        let outcome = updater(NEW_IP, OLD_IP, &api).run().await.unwrap();

        assert_eq!(outcome, Outcome::AlreadyCurrent { ip: NEW_IP });
        assert_eq!(api.calls(), ["find_zone", "fetch_record_set"]);
    }

    #[tokio::test]
    async fn second_run_after_convergence_is_a_no_op() {
        let api = Arc::new(ScriptedApi {
            record: Some(record(&[OLD_IP])),
            poll_states: Mutex::new(VecDeque::from([ChangeState::InSync])),
            ..ScriptedApi::default()
        });

        let first = updater(NEW_IP, OLD_IP, &api).run().await.unwrap();
        assert!(matches!(first, Outcome::Updated { .. }));
        let calls_after_first = api.calls().len();

        // Once the resolver sees the new IP, the next run short-circuits.
        let second = updater(NEW_IP, NEW_IP, &api).run().await.unwrap();
        assert_eq!(second, Outcome::InSync { ip: NEW_IP });
        assert_eq!(api.calls().len(), calls_after_first);
    }
}

mod change_submission {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn drift_replaces_record_with_observed_values() {
        let api = Arc::new(ScriptedApi {
            record: Some(record(&[OLD_IP, Ipv4Addr::new(9, 9, 9, 9)])),
            poll_states: Mutex::new(VecDeque::from([ChangeState::InSync])),
            ..ScriptedApi::default()
        });

        let outcome = updater(NEW_IP, OLD_IP, &api).run().await.unwrap();

        assert_eq!(
            outcome,
            Outcome::Updated {
                previous: vec![OLD_IP, Ipv4Addr::new(9, 9, 9, 9)],
                current: NEW_IP,
            }
        );

        let change = api.submitted().unwrap();
        assert_eq!(change.delete_values, [OLD_IP, Ipv4Addr::new(9, 9, 9, 9)]);
        assert_eq!(change.create_value, NEW_IP);
        assert_eq!(change.ttl, 300);
        assert_eq!(change.name, "host.example.com.");
    }

    #[tokio::test]
    async fn submission_failure_is_fatal() {
        let api = Arc::new(ScriptedApi {
            record: Some(record(&[OLD_IP])),
            fail_submit: true,
            ..ScriptedApi::default()
        });

        let err = updater(NEW_IP, OLD_IP, &api).run().await.unwrap_err();

        assert!(matches!(err, UpdateError::Submit(_)));
    }

    #[tokio::test]
    async fn dry_run_submits_nothing() {
        let api = Arc::new(ScriptedApi {
            record: Some(record(&[OLD_IP])),
            ..ScriptedApi::default()
        });

        let outcome = updater(NEW_IP, OLD_IP, &api)
            .with_dry_run(true)
            .run()
            .await
            .unwrap();

        assert_eq!(
            outcome,
            Outcome::SkippedDryRun {
                previous: vec![OLD_IP],
                current: NEW_IP,
            }
        );
        assert!(!api.calls().contains(&"submit_change"));
    }
}

mod propagation {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn poll_loop_stops_on_first_terminal_status() {
        let api = Arc::new(ScriptedApi {
            record: Some(record(&[OLD_IP])),
            poll_states: Mutex::new(VecDeque::from([
                ChangeState::Pending,
                ChangeState::Other("FAILED".to_string()),
                ChangeState::InSync,
            ])),
            ..ScriptedApi::default()
        });

        let outcome = updater(NEW_IP, OLD_IP, &api).run().await.unwrap();

        // The third scripted status is never fetched.
        assert_eq!(api.poll_count(), 2);
        assert_eq!(
            outcome,
            Outcome::Unconfirmed {
                status: ChangeState::Other("FAILED".to_string()),
            }
        );
    }

    #[tokio::test]
    async fn insync_at_submission_skips_polling() {
        let api = Arc::new(ScriptedApi {
            record: Some(record(&[OLD_IP])),
            initial_state: Some(ChangeState::InSync),
            ..ScriptedApi::default()
        });

        let outcome = updater(NEW_IP, OLD_IP, &api).run().await.unwrap();

        assert!(matches!(outcome, Outcome::Updated { .. }));
        assert_eq!(api.poll_count(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn exhausted_poll_bound_is_fatal() {
        let api = Arc::new(ScriptedApi {
            record: Some(record(&[OLD_IP])),
            poll_states: Mutex::new(VecDeque::from(vec![ChangeState::Pending; 10])),
            ..ScriptedApi::default()
        });

        let err = updater(NEW_IP, OLD_IP, &api)
            .with_poll_policy(PollPolicy {
                interval: Duration::from_secs(2),
                max_polls: Some(3),
            })
            .run()
            .await
            .unwrap_err();

        match err {
            UpdateError::PropagationTimeout {
                change_id,
                attempts,
            } => {
                assert_eq!(change_id, "C2682N5HXP0BZ4");
                assert_eq!(attempts, 3);
            }
            other => panic!("Expected PropagationTimeout, got {other:?}"),
        }
        assert_eq!(api.poll_count(), 3);
    }
}

mod fatal_lookups {
    use super::*;

    #[tokio::test]
    async fn zone_not_found_stops_before_record_fetch() {
        let api = Arc::new(ScriptedApi {
            zone_missing: true,
            ..ScriptedApi::default()
        });

        let err = updater(NEW_IP, OLD_IP, &api).run().await.unwrap_err();

        assert!(matches!(
            err,
            UpdateError::Provider(ProviderError::ZoneNotFound { .. })
        ));
        assert_eq!(api.calls(), ["find_zone"]);
    }

    #[tokio::test]
    async fn missing_record_set_is_fatal() {
        let api = Arc::new(ScriptedApi::default());

        let err = updater(NEW_IP, OLD_IP, &api).run().await.unwrap_err();

        match err {
            UpdateError::RecordNotFound { zone_id, domain } => {
                assert_eq!(zone_id, "Z119WBBTVP5WFX");
                assert_eq!(domain, "host.example.com");
            }
            other => panic!("Expected RecordNotFound, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn discovery_failure_is_fatal_before_any_lookup() {
        let api = Arc::new(ScriptedApi::default());
        let updater = Updater::new(target(), FailingIp, FixedResolver(OLD_IP), Arc::clone(&api));

        let err = updater.run().await.unwrap_err();

        assert!(matches!(err, UpdateError::Discover(_)));
        assert!(api.calls().is_empty());
    }

    #[tokio::test]
    async fn resolution_failure_is_fatal_before_any_lookup() {
        let api = Arc::new(ScriptedApi::default());
        let updater = Updater::new(target(), FixedIp(NEW_IP), FailingResolver, Arc::clone(&api));

        let err = updater.run().await.unwrap_err();

        assert!(matches!(err, UpdateError::Resolve(_)));
        assert!(api.calls().is_empty());
    }
}
