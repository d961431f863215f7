//! Default values for configuration options.
//!
//! Centralized constants to avoid magic numbers scattered across the
//! codebase.

/// Default what-is-my-IP service endpoint.
pub const IP_SERVICE_URL: &str = "http://icanhazip.com";

/// Default delay between change-status polls, in seconds.
pub const POLL_INTERVAL_SECS: u64 = 2;
