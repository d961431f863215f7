//! Provider-neutral value types for record management.

use std::fmt;
use std::net::Ipv4Addr;

/// Summary of a hosted zone, as returned by zone lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ZoneSummary {
    /// Zone identifier, without the `/hostedzone/` prefix
    pub id: String,
    /// Zone apex name
    pub name: String,
}

/// The provider's view of the live "A" record-set, captured at fetch time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordSnapshot {
    /// Record name as the provider reports it (usually with a trailing dot)
    pub name: String,
    /// Time-to-live in seconds
    pub ttl: i64,
    /// Every address value currently on record
    pub values: Vec<Ipv4Addr>,
}

/// A batched delete-old/create-new instruction.
///
/// Built only through [`ChangeRequest::replace`], which guarantees the
/// delete side carries exactly the value set read from the snapshot and
/// the create side exactly the new address, both at the snapshot's TTL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangeRequest {
    /// Record name the change applies to
    pub name: String,
    /// TTL carried by both the delete and the create entry
    pub ttl: i64,
    /// Full value set to delete, as observed at fetch time
    pub delete_values: Vec<Ipv4Addr>,
    /// The single new value to create
    pub create_value: Ipv4Addr,
}

impl ChangeRequest {
    /// Builds the change that replaces a record-set's values with one new
    /// address.
    #[must_use]
    pub fn replace(record: &RecordSnapshot, new_ip: Ipv4Addr) -> Self {
        Self {
            name: record.name.clone(),
            ttl: record.ttl,
            delete_values: record.values.clone(),
            create_value: new_ip,
        }
    }
}

/// Propagation status of a submitted change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChangeState {
    /// The change is still propagating
    Pending,
    /// The change is authoritative on all provider servers
    InSync,
    /// Any other status the provider may report
    Other(String),
}

impl ChangeState {
    /// Parses the provider's status string.
    #[must_use]
    pub fn parse(raw: &str) -> Self {
        match raw {
            "PENDING" => Self::Pending,
            "INSYNC" => Self::InSync,
            other => Self::Other(other.to_string()),
        }
    }

    /// Returns true while the change is still propagating.
    #[must_use]
    pub const fn is_pending(&self) -> bool {
        matches!(self, Self::Pending)
    }

    /// Returns true once the status can no longer change.
    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        !self.is_pending()
    }
}

impl fmt::Display for ChangeState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pending => f.write_str("PENDING"),
            Self::InSync => f.write_str("INSYNC"),
            Self::Other(raw) => f.write_str(raw),
        }
    }
}

/// Reference to a submitted change: its identifier plus the status the
/// provider reported at submission time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangeRef {
    /// Change identifier, without the `/change/` prefix
    pub id: String,
    /// Status reported in the commit response
    pub state: ChangeState,
}

impl ChangeRef {
    /// Creates a change reference, normalizing identifiers of the form
    /// `/change/C123` to their bare ID.
    #[must_use]
    pub fn new(raw_id: &str, state: ChangeState) -> Self {
        Self {
            id: strip_id_prefix(raw_id).to_string(),
            state,
        }
    }
}

/// Strips the resource-path prefix Route 53 puts on identifiers
/// (`/change/C123`, `/hostedzone/Z123`).
pub(crate) fn strip_id_prefix(raw: &str) -> &str {
    raw.rsplit('/').next().unwrap_or(raw)
}

/// Compares record names the way Route 53 stores them: case-insensitive,
/// trailing dot ignored.
pub(crate) fn names_match(a: &str, b: &str) -> bool {
    a.trim_end_matches('.')
        .eq_ignore_ascii_case(b.trim_end_matches('.'))
}
