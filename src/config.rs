//! Bootstrap configuration.
//!
//! All settings enter the process here and are handed to constructors as
//! plain values - core logic never reads the environment. `from_env` is the
//! only function in the crate that touches ambient process state.

use std::net::SocketAddr;
use std::time::Duration;

use thiserror::Error;

/// Default sweep interval in minutes.
const DEFAULT_INTERVAL_MINS: u64 = 10;

/// Default bind address for the webhook server.
const DEFAULT_LISTEN_ADDR: &str = "0.0.0.0:8080";

/// Errors produced while reading or validating configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A required variable is absent or empty.
    #[error("{0} is not set")]
    Missing(&'static str),

    /// A variable is present but unusable.
    #[error("{variable} has invalid value {value:?}: {reason}")]
    Invalid {
        variable: &'static str,
        value: String,
        reason: &'static str,
    },
}

/// Validated process configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Shared secret for webhook signature verification, and the secret
    /// embedded in hooks the sweep creates.
    pub shared_secret: String,

    /// Personal access token for the API client.
    pub github_token: String,

    /// Organizations the sweep walks. May be empty when auto-registration
    /// is off.
    pub organizations: Vec<String>,

    /// Public URL this server's webhook endpoint is reachable at.
    pub webhook_url: String,

    /// Enables the registration sweep scheduler.
    pub auto_register: bool,

    /// Sweep logs intended mutations without issuing them.
    pub dry_run: bool,

    /// Interval between sweeps.
    pub sweep_interval: Duration,

    /// Bind address for the HTTP server.
    pub listen_addr: SocketAddr,
}

impl Config {
    /// Reads configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        let config = Config {
            shared_secret: require("SHARED_SECRET")?,
            github_token: require("GITHUB_TOKEN")?,
            organizations: parse_organizations(&optional("ORGANIZATIONS").unwrap_or_default()),
            webhook_url: optional("PUBLIC_WEBHOOK_URL").unwrap_or_default(),
            auto_register: parse_bool("AUTO_REGISTER", optional("AUTO_REGISTER"))?,
            dry_run: parse_bool("DRY_RUN", optional("DRY_RUN"))?,
            sweep_interval: parse_interval_mins(
                "REGISTER_INTERVAL_MINS",
                optional("REGISTER_INTERVAL_MINS"),
            )?,
            listen_addr: parse_listen_addr("LISTEN_ADDR", optional("LISTEN_ADDR"))?,
        };

        config.validate()?;
        Ok(config)
    }

    /// Checks cross-field invariants: auto-registration requires
    /// organizations to walk and an HTTPS callback URL to install.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.auto_register {
            if self.organizations.is_empty() {
                return Err(ConfigError::Missing("ORGANIZATIONS"));
            }
            if !self.webhook_url.starts_with("https://") {
                return Err(ConfigError::Invalid {
                    variable: "PUBLIC_WEBHOOK_URL",
                    value: self.webhook_url.clone(),
                    reason: "must be an https:// URL when AUTO_REGISTER is enabled",
                });
            }
        }
        Ok(())
    }
}

fn require(name: &'static str) -> Result<String, ConfigError> {
    std::env::var(name)
        .ok()
        .filter(|v| !v.is_empty())
        .ok_or(ConfigError::Missing(name))
}

fn optional(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.is_empty())
}

/// Splits a comma-separated organization list, trimming whitespace and
/// dropping empty entries.
fn parse_organizations(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}

fn parse_bool(variable: &'static str, raw: Option<String>) -> Result<bool, ConfigError> {
    match raw.as_deref() {
        None => Ok(false),
        Some("true") | Some("1") => Ok(true),
        Some("false") | Some("0") => Ok(false),
        Some(other) => Err(ConfigError::Invalid {
            variable,
            value: other.to_string(),
            reason: "expected true or false",
        }),
    }
}

fn parse_interval_mins(
    variable: &'static str,
    raw: Option<String>,
) -> Result<Duration, ConfigError> {
    let mins = match raw {
        None => DEFAULT_INTERVAL_MINS,
        Some(value) => match value.parse::<u64>() {
            Ok(mins) if mins > 0 => mins,
            _ => {
                return Err(ConfigError::Invalid {
                    variable,
                    value,
                    reason: "expected a positive number of minutes",
                });
            }
        },
    };
    Ok(Duration::from_secs(mins * 60))
}

fn parse_listen_addr(
    variable: &'static str,
    raw: Option<String>,
) -> Result<SocketAddr, ConfigError> {
    match raw {
        None => Ok(DEFAULT_LISTEN_ADDR
            .parse()
            .expect("default listen address is valid")),
        Some(value) => value.parse().map_err(|_| ConfigError::Invalid {
            variable,
            value,
            reason: "expected host:port",
        }),
    }
}
