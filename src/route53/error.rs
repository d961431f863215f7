//! Error taxonomy for the Route 53 client.

use thiserror::Error;

/// Error type for provider API operations.
///
/// Distinguishes the error kinds the updater reacts to (zone not found,
/// rejected change batch) from generic API failures.
#[derive(Debug, Error)]
pub enum ProviderError {
    /// The hosted zone does not exist.
    #[error("Hosted zone not found: {zone_id}")]
    ZoneNotFound {
        /// The zone identifier that was looked up
        zone_id: String,
    },

    /// The provider rejected the change batch as invalid.
    #[error("Change batch rejected: {message}")]
    InvalidChange {
        /// Provider-supplied rejection detail
        message: String,
    },

    /// Any other API failure (auth, transport, throttling, server error).
    #[error("Route 53 API error: {message}")]
    Api {
        /// Formatted error detail, including the provider's context chain
        message: String,
    },

    /// The provider answered with something this crate cannot interpret.
    #[error("Malformed Route 53 response: {0}")]
    MalformedResponse(String),
}

impl ProviderError {
    /// Creates an [`ProviderError::Api`] from any displayable error.
    pub fn api(err: impl std::fmt::Display) -> Self {
        Self::Api {
            message: err.to_string(),
        }
    }

    /// Creates a [`ProviderError::MalformedResponse`].
    pub fn malformed(msg: impl Into<String>) -> Self {
        Self::MalformedResponse(msg.into())
    }
}

impl From<aws_sdk_route53::error::BuildError> for ProviderError {
    fn from(err: aws_sdk_route53::error::BuildError) -> Self {
        Self::malformed(format!("Failed to build change batch: {err}"))
    }
}
