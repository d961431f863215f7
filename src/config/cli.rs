//! CLI argument parsing using clap.
//!
//! Defines the command-line interface with all options and subcommands.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// DDNS-R53: Dynamic DNS updater for Route 53
///
/// Checks whether this host's public IP still matches the domain's "A"
/// record and, if not, replaces the record through the Route 53 change
/// API, waiting for the change to propagate.
#[derive(Debug, Parser)]
#[command(name = "ddns-r53")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Subcommand to run
    #[command(subcommand)]
    pub command: Option<Command>,

    /// Route 53 hosted zone ID (required for run mode)
    #[arg(long = "zone-id", short = 'z', global = true)]
    pub zone_id: Option<String>,

    /// Domain name whose A record is checked and updated (required for run mode)
    #[arg(long, short = 'd', global = true)]
    pub domain: Option<String>,

    /// AWS access key ID (falls back to the AWS_ACCESS_KEY_ID environment variable)
    #[arg(long = "access-key-id")]
    pub access_key_id: Option<String>,

    /// AWS secret access key (falls back to the AWS_SECRET_ACCESS_KEY environment variable)
    #[arg(long = "secret-access-key")]
    pub secret_access_key: Option<String>,

    /// URL of the what-is-my-IP service
    #[arg(long = "ip-service", value_name = "URL")]
    pub ip_service: Option<String>,

    /// Seconds between change-status polls
    #[arg(long = "poll-interval")]
    pub poll_interval: Option<u64>,

    /// Maximum number of status polls before giving up (default: poll until terminal)
    #[arg(long = "max-polls")]
    pub max_polls: Option<u32>,

    /// Append log output to this file instead of stderr
    #[arg(long = "log-file")]
    pub log_file: Option<PathBuf>,

    /// Path to configuration file
    #[arg(long, short)]
    pub config: Option<PathBuf>,

    /// Log the intended change without submitting it
    #[arg(long)]
    pub dry_run: bool,

    /// Enable debug logging
    #[arg(long, short = 'D')]
    pub verbose: bool,
}

/// Subcommands for ddns-r53
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Generate a default configuration file
    Init {
        /// Output path for the configuration file
        #[arg(long, short, default_value = "ddns-r53.toml")]
        output: PathBuf,
    },
}

impl Cli {
    /// Parses CLI arguments from the command line.
    #[must_use]
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Parses CLI arguments from an iterator (useful for testing).
    pub fn parse_from_iter<I, T>(iter: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<std::ffi::OsString> + Clone,
    {
        Self::parse_from(iter)
    }

    /// Returns true if this is the init command.
    #[must_use]
    pub const fn is_init(&self) -> bool {
        matches!(self.command, Some(Command::Init { .. }))
    }
}
