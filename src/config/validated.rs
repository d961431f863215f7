//! Validated configuration after merging CLI, TOML, and environment
//! sources.
//!
//! This module contains the final, validated configuration that is used
//! by the application. All validation is performed during construction.

use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;

use url::Url;

use super::cli::Cli;
use super::defaults;
use super::error::{ConfigError, field};
use super::toml::TomlConfig;

/// AWS credentials captured from the process environment.
///
/// Split out of [`ValidatedConfig::from_parts`] so tests can exercise the
/// merge deterministically, regardless of the test runner's environment.
#[derive(Debug, Default, Clone)]
pub struct EnvCredentials {
    /// `AWS_ACCESS_KEY_ID`, if set
    pub access_key_id: Option<String>,
    /// `AWS_SECRET_ACCESS_KEY`, if set
    pub secret_access_key: Option<String>,
}

impl EnvCredentials {
    /// Reads the standard AWS credential variables from the environment.
    #[must_use]
    pub fn capture() -> Self {
        Self {
            access_key_id: std::env::var("AWS_ACCESS_KEY_ID").ok(),
            secret_access_key: std::env::var("AWS_SECRET_ACCESS_KEY").ok(),
        }
    }
}

/// Fully validated configuration ready for use by the application.
///
/// This struct represents a complete, validated configuration where all
/// required fields are present and all values have been validated.
///
/// # Construction
///
/// Use [`ValidatedConfig::load`] to build from parsed CLI arguments (plus
/// the config file the arguments may point at), or
/// [`ValidatedConfig::from_parts`] with explicit environment credentials.
pub struct ValidatedConfig {
    /// Route 53 hosted zone ID (required)
    pub zone_id: String,

    /// Domain name whose A record is checked and updated (required)
    pub domain: String,

    /// AWS access key ID (required)
    pub access_key_id: String,

    /// AWS secret access key (required; never logged)
    pub secret_access_key: String,

    /// What-is-my-IP service endpoint
    pub ip_service: Url,

    /// Delay between change-status polls
    pub poll_interval: Duration,

    /// Maximum number of status polls; `None` polls until terminal
    pub max_polls: Option<u32>,

    /// Log file path; `None` logs to stderr
    pub log_file: Option<PathBuf>,

    /// Dry-run mode (log the intended change without submitting it)
    pub dry_run: bool,

    /// Verbose logging enabled
    pub verbose: bool,
}

// The secret access key must not leak through Debug output.
impl fmt::Debug for ValidatedConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ValidatedConfig")
            .field("zone_id", &self.zone_id)
            .field("domain", &self.domain)
            .field("access_key_id", &self.access_key_id)
            .field("secret_access_key", &"<redacted>")
            .field("ip_service", &self.ip_service.as_str())
            .field("poll_interval", &self.poll_interval)
            .field("max_polls", &self.max_polls)
            .field("log_file", &self.log_file)
            .field("dry_run", &self.dry_run)
            .field("verbose", &self.verbose)
            .finish()
    }
}

impl fmt::Display for ValidatedConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let max_polls = self
            .max_polls
            .map_or_else(|| "unbounded".to_string(), |n| n.to_string());

        write!(
            f,
            "Config {{ zone: {}, domain: {}, key: {}, ip_service: {}, poll: {}s/{}, dry_run: {} }}",
            self.zone_id,
            self.domain,
            self.access_key_id,
            self.ip_service,
            self.poll_interval.as_secs(),
            max_polls,
            self.dry_run,
        )
    }
}

impl ValidatedConfig {
    /// Loads and merges configuration from CLI, optional config file, and
    /// environment.
    ///
    /// If `cli.config` is set, loads the TOML file from that path.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The config file cannot be read or parsed
    /// - The merged configuration is invalid
    pub fn load(cli: &Cli) -> Result<Self, ConfigError> {
        let toml = if let Some(ref path) = cli.config {
            Some(TomlConfig::load(path)?)
        } else {
            None
        };

        Self::from_parts(cli, toml.as_ref(), &EnvCredentials::capture())
    }

    /// Creates a validated configuration from CLI arguments, optional TOML
    /// config, and explicit environment credentials.
    ///
    /// CLI arguments take precedence over TOML values; the environment is
    /// consulted only for credentials neither source provides.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Required fields are missing after the merge
    /// - The domain name or IP service URL is invalid
    /// - The poll interval is zero, or `max_polls` is zero
    pub fn from_parts(
        cli: &Cli,
        toml: Option<&TomlConfig>,
        env: &EnvCredentials,
    ) -> Result<Self, ConfigError> {
        let zone_id = Self::resolve_zone_id(cli, toml)?;
        let domain = Self::resolve_domain(cli, toml)?;
        let (access_key_id, secret_access_key) = Self::resolve_credentials(cli, toml, env)?;
        let ip_service = Self::resolve_ip_service(cli, toml)?;
        let poll_interval = Self::resolve_poll_interval(cli, toml)?;
        let max_polls = Self::resolve_max_polls(cli, toml)?;

        let log_file = cli
            .log_file
            .clone()
            .or_else(|| toml.and_then(|t| t.log.file.clone()));

        let verbose = cli.verbose || toml.is_some_and(|t| t.log.verbose);

        Ok(Self {
            zone_id,
            domain,
            access_key_id,
            secret_access_key,
            ip_service,
            poll_interval,
            max_polls,
            log_file,
            dry_run: cli.dry_run,
            verbose,
        })
    }

    fn resolve_zone_id(cli: &Cli, toml: Option<&TomlConfig>) -> Result<String, ConfigError> {
        let zone_id = cli
            .zone_id
            .as_deref()
            .or_else(|| toml.and_then(|t| t.target.zone_id.as_deref()))
            .ok_or_else(|| {
                ConfigError::missing(
                    field::ZONE_ID,
                    "Use --zone-id or set target.zone_id in config file",
                )
            })?;

        if zone_id.trim().is_empty() {
            return Err(ConfigError::InvalidValue {
                field: field::ZONE_ID,
                reason: "must not be empty".to_string(),
            });
        }

        Ok(zone_id.to_string())
    }

    fn resolve_domain(cli: &Cli, toml: Option<&TomlConfig>) -> Result<String, ConfigError> {
        let domain = cli
            .domain
            .as_deref()
            .or_else(|| toml.and_then(|t| t.target.domain.as_deref()))
            .ok_or_else(|| {
                ConfigError::missing(
                    field::DOMAIN,
                    "Use --domain or set target.domain in config file",
                )
            })?;

        validate_domain_name(domain)?;
        Ok(domain.to_string())
    }

    fn resolve_credentials(
        cli: &Cli,
        toml: Option<&TomlConfig>,
        env: &EnvCredentials,
    ) -> Result<(String, String), ConfigError> {
        let access_key_id = cli
            .access_key_id
            .clone()
            .or_else(|| toml.and_then(|t| t.credentials.access_key_id.clone()))
            .or_else(|| env.access_key_id.clone())
            .ok_or_else(|| {
                ConfigError::missing(
                    field::ACCESS_KEY_ID,
                    "Use --access-key-id, set credentials.access_key_id in config file, \
                     or export AWS_ACCESS_KEY_ID",
                )
            })?;

        let secret_access_key = cli
            .secret_access_key
            .clone()
            .or_else(|| toml.and_then(|t| t.credentials.secret_access_key.clone()))
            .or_else(|| env.secret_access_key.clone())
            .ok_or_else(|| {
                ConfigError::missing(
                    field::SECRET_ACCESS_KEY,
                    "Use --secret-access-key, set credentials.secret_access_key in config \
                     file, or export AWS_SECRET_ACCESS_KEY",
                )
            })?;

        if access_key_id.trim().is_empty() {
            return Err(ConfigError::InvalidValue {
                field: field::ACCESS_KEY_ID,
                reason: "must not be empty".to_string(),
            });
        }

        if secret_access_key.trim().is_empty() {
            return Err(ConfigError::InvalidValue {
                field: field::SECRET_ACCESS_KEY,
                reason: "must not be empty".to_string(),
            });
        }

        Ok((access_key_id, secret_access_key))
    }

    fn resolve_ip_service(cli: &Cli, toml: Option<&TomlConfig>) -> Result<Url, ConfigError> {
        // Priority: CLI explicit > TOML > default
        let url_str = cli
            .ip_service
            .as_deref()
            .or_else(|| toml.and_then(|t| t.discovery.ip_service.as_deref()))
            .unwrap_or(defaults::IP_SERVICE_URL);

        let url = Url::parse(url_str).map_err(|e| ConfigError::InvalidUrl {
            url: url_str.to_string(),
            reason: e.to_string(),
        })?;

        if url.scheme() != "http" && url.scheme() != "https" {
            return Err(ConfigError::InvalidUrl {
                url: url_str.to_string(),
                reason: format!("unsupported scheme '{}'", url.scheme()),
            });
        }

        Ok(url)
    }

    fn resolve_poll_interval(
        cli: &Cli,
        toml: Option<&TomlConfig>,
    ) -> Result<Duration, ConfigError> {
        // Priority: CLI explicit > TOML > default
        let seconds = cli
            .poll_interval
            .or_else(|| toml.and_then(|t| t.propagation.poll_interval))
            .unwrap_or(defaults::POLL_INTERVAL_SECS);

        if seconds == 0 {
            return Err(ConfigError::InvalidDuration {
                field: "poll_interval",
                reason: "must be greater than 0".to_string(),
            });
        }

        Ok(Duration::from_secs(seconds))
    }

    fn resolve_max_polls(cli: &Cli, toml: Option<&TomlConfig>) -> Result<Option<u32>, ConfigError> {
        let max_polls = cli
            .max_polls
            .or_else(|| toml.and_then(|t| t.propagation.max_polls));

        if max_polls == Some(0) {
            return Err(ConfigError::InvalidValue {
                field: "max_polls",
                reason: "must be greater than 0; omit it to poll until terminal".to_string(),
            });
        }

        Ok(max_polls)
    }
}

/// Validates a domain name per RFC 1035 limits.
///
/// Not a full validator, but catches the common mistakes (empty labels,
/// over-long names, bad characters) before any network call is made. A
/// trailing dot is accepted since Route 53 reports names fully qualified.
fn validate_domain_name(domain: &str) -> Result<(), ConfigError> {
    let invalid = |reason: &str| ConfigError::InvalidDomain {
        domain: domain.to_string(),
        reason: reason.to_string(),
    };

    let name = domain.strip_suffix('.').unwrap_or(domain);

    if name.is_empty() {
        return Err(invalid("must not be empty"));
    }

    if name.len() > 253 {
        return Err(invalid("exceeds 253 characters"));
    }

    for label in name.split('.') {
        if label.is_empty() {
            return Err(invalid("has an empty label"));
        }

        if label.len() > 63 {
            return Err(invalid("has a label longer than 63 characters"));
        }

        if !label.chars().all(|c| c.is_ascii_alphanumeric() || c == '-') {
            return Err(invalid("labels may only contain alphanumerics and hyphens"));
        }

        if label.starts_with('-') || label.ends_with('-') {
            return Err(invalid("labels may not start or end with a hyphen"));
        }
    }

    Ok(())
}

/// Writes the default configuration template to the given path.
///
/// # Errors
///
/// Returns an error if the file cannot be written.
pub fn write_default_config(path: &Path) -> Result<(), ConfigError> {
    std::fs::write(path, super::toml::default_config_template()).map_err(|e| {
        ConfigError::FileWrite {
            path: path.to_path_buf(),
            source: e,
        }
    })
}
