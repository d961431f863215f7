//! DDNS-R53: Dynamic DNS updater for Route 53
//!
//! A library for keeping a Route 53 "A" record pointed at this host's
//! public IP address. One invocation discovers the public IP, checks the
//! published DNS answer, and replaces the record through the Route 53
//! change API when the two drift apart.

pub mod config;
pub mod discover;
pub mod resolve;
pub mod route53;
pub mod updater;
