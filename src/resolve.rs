//! DNS resolution against fixed public recursive resolvers.
//!
//! The drift check deliberately queries Google's public resolvers
//! (8.8.8.8, 8.8.4.4) instead of the host's own resolver so that the
//! comparison reflects global DNS state rather than a stale local cache.

use std::net::{IpAddr, Ipv4Addr};

use hickory_resolver::TokioAsyncResolver;
use hickory_resolver::config::{NameServerConfigGroup, ResolverConfig, ResolverOpts};
use thiserror::Error;

/// The fixed public resolvers used for the drift check.
pub const NAMESERVERS: [Ipv4Addr; 2] = [Ipv4Addr::new(8, 8, 8, 8), Ipv4Addr::new(8, 8, 4, 4)];

/// Error type for the resolver-based drift check.
#[derive(Debug, Error)]
pub enum ResolveError {
    /// The lookup itself failed (NXDOMAIN, timeout, transport failure).
    #[error("DNS lookup for '{domain}' failed: {source}")]
    Lookup {
        /// The domain that was queried
        domain: String,
        /// Underlying resolver error
        #[source]
        source: hickory_resolver::error::ResolveError,
    },

    /// The lookup succeeded but the answer carried no "A" records.
    #[error("DNS answer for '{domain}' contained no A records")]
    EmptyAnswer {
        /// The domain that was queried
        domain: String,
    },
}

/// Trait for resolving a domain's current "A" answer.
pub trait RecordResolver: Send + Sync {
    /// Resolves the domain and returns the first address of the first
    /// answer record.
    ///
    /// # Errors
    ///
    /// Returns [`ResolveError`] when the lookup fails or the answer is
    /// empty.
    fn resolve_a(
        &self,
        domain: &str,
    ) -> impl std::future::Future<Output = Result<Ipv4Addr, ResolveError>> + Send;
}

/// Production resolver pinned to the public nameservers in [`NAMESERVERS`].
pub struct PublicResolver {
    inner: TokioAsyncResolver,
}

impl PublicResolver {
    /// Creates a resolver that queries only the fixed public nameservers.
    #[must_use]
    pub fn new() -> Self {
        let nameservers: Vec<IpAddr> = NAMESERVERS.iter().copied().map(IpAddr::V4).collect();
        let group = NameServerConfigGroup::from_ips_clear(&nameservers, 53, true);
        let config = ResolverConfig::from_parts(None, vec![], group);

        Self {
            inner: TokioAsyncResolver::tokio(config, ResolverOpts::default()),
        }
    }
}

impl Default for PublicResolver {
    fn default() -> Self {
        Self::new()
    }
}

impl RecordResolver for PublicResolver {
    async fn resolve_a(&self, domain: &str) -> Result<Ipv4Addr, ResolveError> {
        let lookup = self
            .inner
            .ipv4_lookup(domain)
            .await
            .map_err(|e| ResolveError::Lookup {
                domain: domain.to_string(),
                source: e,
            })?;

        lookup
            .iter()
            .next()
            .map(|record| record.0)
            .ok_or_else(|| ResolveError::EmptyAnswer {
                domain: domain.to_string(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nameservers_are_the_google_pair() {
        assert_eq!(
            NAMESERVERS,
            [Ipv4Addr::new(8, 8, 8, 8), Ipv4Addr::new(8, 8, 4, 4)]
        );
    }

    #[test]
    fn resolver_constructs() {
        // TokioAsyncResolver needs a reactor even for construction.
        let runtime = tokio::runtime::Runtime::new().unwrap();
        runtime.block_on(async {
            let _resolver = PublicResolver::new();
        });
    }
}
