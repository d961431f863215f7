//! Public IP discovery via a what-is-my-IP HTTP service.
//!
//! The service contract is minimal: a GET request whose response body is
//! the caller's public IP as a bare literal, possibly followed by a
//! newline. [`parse_ip_body`] handles the trimming and parsing;
//! [`HttpIpSource`] is the production implementation over reqwest.

use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};
use std::time::Duration;

use thiserror::Error;
use url::Url;

#[cfg(test)]
#[path = "discover_tests.rs"]
mod tests;

/// Request timeout for the IP service.
const DISCOVER_TIMEOUT: Duration = Duration::from_secs(30);

/// Maximum response-body length quoted in error messages.
const BODY_QUOTE_LIMIT: usize = 64;

/// Error type for public IP discovery.
///
/// All variants are fatal for the current run; the updater never retries
/// discovery.
#[derive(Debug, Error)]
pub enum DiscoverError {
    /// The HTTP client could not be constructed.
    #[error("Failed to build HTTP client: {0}")]
    ClientBuild(#[source] reqwest::Error),

    /// The IP service could not be reached.
    #[error("Failed to reach IP service at {url}: {source}")]
    Transport {
        /// The service endpoint
        url: Url,
        /// Underlying transport error
        #[source]
        source: reqwest::Error,
    },

    /// The IP service answered with a non-success status.
    #[error("IP service at {url} answered {status}")]
    Status {
        /// The service endpoint
        url: Url,
        /// The HTTP status received
        status: reqwest::StatusCode,
    },

    /// The response body did not parse as an IP address.
    #[error("IP service response is not an IP address: '{body}'")]
    NotAnAddress {
        /// The (truncated) response body
        body: String,
    },

    /// The service reported an IPv6 address, which an "A" record cannot hold.
    #[error("IP service returned an IPv6 address ({addr}); an A record needs IPv4")]
    NotIpv4 {
        /// The IPv6 address received
        addr: Ipv6Addr,
    },
}

/// Trait for discovering this host's public IPv4 address.
///
/// The production implementation is [`HttpIpSource`]; tests substitute
/// fixed or failing sources.
pub trait PublicIpSource: Send + Sync {
    /// Returns the public IPv4 address as seen from outside this host.
    ///
    /// # Errors
    ///
    /// Returns [`DiscoverError`] when the service is unreachable, answers
    /// with an error status, or returns a body that is not an IPv4 literal.
    fn discover(&self) -> impl std::future::Future<Output = Result<Ipv4Addr, DiscoverError>> + Send;
}

/// Production IP source that queries a what-is-my-IP service over HTTP.
#[derive(Debug, Clone)]
pub struct HttpIpSource {
    client: reqwest::Client,
    endpoint: Url,
}

impl HttpIpSource {
    /// Creates an IP source for the given service endpoint.
    ///
    /// # Errors
    ///
    /// Returns [`DiscoverError::ClientBuild`] if the underlying HTTP
    /// client cannot be constructed.
    pub fn new(endpoint: Url) -> Result<Self, DiscoverError> {
        let client = reqwest::Client::builder()
            .timeout(DISCOVER_TIMEOUT)
            .build()
            .map_err(DiscoverError::ClientBuild)?;

        Ok(Self { client, endpoint })
    }

    /// Returns the configured service endpoint.
    #[must_use]
    pub const fn endpoint(&self) -> &Url {
        &self.endpoint
    }
}

impl PublicIpSource for HttpIpSource {
    async fn discover(&self) -> Result<Ipv4Addr, DiscoverError> {
        let response = self
            .client
            .get(self.endpoint.clone())
            .send()
            .await
            .map_err(|e| DiscoverError::Transport {
                url: self.endpoint.clone(),
                source: e,
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(DiscoverError::Status {
                url: self.endpoint.clone(),
                status,
            });
        }

        let body = response.text().await.map_err(|e| DiscoverError::Transport {
            url: self.endpoint.clone(),
            source: e,
        })?;

        parse_ip_body(&body)
    }
}

/// Parses a what-is-my-IP response body into an IPv4 address.
///
/// The full body, trimmed of surrounding whitespace and newlines, must be
/// a single IP literal. IPv6 answers are rejected explicitly since an "A"
/// record cannot carry them.
///
/// # Errors
///
/// Returns [`DiscoverError::NotAnAddress`] for unparsable bodies and
/// [`DiscoverError::NotIpv4`] for IPv6 literals.
pub fn parse_ip_body(raw: &str) -> Result<Ipv4Addr, DiscoverError> {
    let trimmed = raw.trim();

    match trimmed.parse::<IpAddr>() {
        Ok(IpAddr::V4(addr)) => Ok(addr),
        Ok(IpAddr::V6(addr)) => Err(DiscoverError::NotIpv4 { addr }),
        Err(_) => Err(DiscoverError::NotAnAddress {
            body: quote_body(trimmed),
        }),
    }
}

/// Truncates a response body for inclusion in an error message.
fn quote_body(body: &str) -> String {
    if body.len() <= BODY_QUOTE_LIMIT {
        return body.to_string();
    }

    let cut = body
        .char_indices()
        .take_while(|(i, _)| *i < BODY_QUOTE_LIMIT)
        .last()
        .map_or(0, |(i, c)| i + c.len_utf8());

    format!("{}...", &body[..cut])
}
