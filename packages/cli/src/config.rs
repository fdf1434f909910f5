//! Runtime settings read from environment variables.

use std::time::Duration;

use crime_watch_police::{DEFAULT_BASE_URL, encode::DEFAULT_MAX_POINTS};
use thiserror::Error;

/// Default per-request timeout in seconds.
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// An environment variable held a value that could not be used.
#[derive(Debug, Error)]
#[error("Invalid value for {name}: '{value}'")]
pub struct ConfigError {
    /// Variable name.
    pub name: &'static str,
    /// Rejected value.
    pub value: String,
}

/// Settings shared by every subcommand.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// police.uk API root (`POLICE_API_BASE`).
    pub police_base_url: String,
    /// Timeout for each boundary and police request (`HTTP_TIMEOUT_SECS`).
    pub timeout: Duration,
    /// Polygon point cap for the crime search (`MAX_POLY_POINTS`).
    pub max_points: usize,
}

impl Config {
    /// Reads the configuration from the process environment.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if a numeric variable does not parse or is
    /// zero.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let police_base_url = lookup("POLICE_API_BASE")
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());

        let timeout_secs = parse_positive(&lookup, "HTTP_TIMEOUT_SECS")?
            .unwrap_or(DEFAULT_TIMEOUT_SECS);
        let max_points = parse_positive(&lookup, "MAX_POLY_POINTS")?
            .map_or(Ok(DEFAULT_MAX_POINTS), usize::try_from)
            .map_err(|_| ConfigError {
                name: "MAX_POLY_POINTS",
                value: lookup("MAX_POLY_POINTS").unwrap_or_default(),
            })?;

        Ok(Self {
            police_base_url,
            timeout: Duration::from_secs(timeout_secs),
            max_points,
        })
    }
}

fn parse_positive(
    lookup: &impl Fn(&str) -> Option<String>,
    name: &'static str,
) -> Result<Option<u64>, ConfigError> {
    let Some(value) = lookup(name) else {
        return Ok(None);
    };

    match value.trim().parse::<u64>() {
        Ok(n) if n > 0 => Ok(Some(n)),
        _ => Err(ConfigError { name, value }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(vars: &[(&str, &str)]) -> Result<Config, ConfigError> {
        Config::from_lookup(|name| {
            vars.iter()
                .find(|(k, _)| *k == name)
                .map(|(_, v)| (*v).to_string())
        })
    }

    #[test]
    fn defaults_without_variables() {
        let cfg = config(&[]).unwrap();
        assert_eq!(cfg.police_base_url, "https://data.police.uk/api");
        assert_eq!(cfg.timeout, Duration::from_secs(30));
        assert_eq!(cfg.max_points, 45);
    }

    #[test]
    fn reads_overrides() {
        let cfg = config(&[
            ("POLICE_API_BASE", "http://localhost:9000/api"),
            ("HTTP_TIMEOUT_SECS", "5"),
            ("MAX_POLY_POINTS", " 80 "),
        ])
        .unwrap();
        assert_eq!(cfg.police_base_url, "http://localhost:9000/api");
        assert_eq!(cfg.timeout, Duration::from_secs(5));
        assert_eq!(cfg.max_points, 80);
    }

    #[test]
    fn rejects_bad_numbers() {
        let err = config(&[("HTTP_TIMEOUT_SECS", "soon")]).unwrap_err();
        assert_eq!(err.name, "HTTP_TIMEOUT_SECS");
        assert_eq!(err.value, "soon");

        assert!(config(&[("MAX_POLY_POINTS", "0")]).is_err());
    }
}
