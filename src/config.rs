//! Start-up settings read from the process environment.

use std::time::Duration;

/// Optional HTTP timeout in whole seconds.
pub const HTTP_TIMEOUT_VAR: &str = "GRADES_HTTP_TIMEOUT_SECS";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid config value for {var}: {reason}")]
    InvalidValue { var: &'static str, reason: String },
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Settings {
    /// `None` keeps the HTTP client's default.
    pub http_timeout: Option<Duration>,
}

impl Settings {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Build settings from any `name → value` source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let http_timeout = match lookup(HTTP_TIMEOUT_VAR) {
            None => None,
            Some(raw) if raw.trim().is_empty() => None,
            Some(raw) => Some(parse_timeout(&raw)?),
        };
        Ok(Settings { http_timeout })
    }
}

fn parse_timeout(raw: &str) -> Result<Duration, ConfigError> {
    let invalid = |reason: &str| ConfigError::InvalidValue {
        var: HTTP_TIMEOUT_VAR,
        reason: format!("{reason} (got '{raw}')"),
    };
    let secs: u64 = raw.trim().parse().map_err(|_| invalid("expected whole seconds"))?;
    if secs == 0 {
        return Err(invalid("must be greater than zero"));
    }
    Ok(Duration::from_secs(secs))
}
