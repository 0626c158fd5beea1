//! Runtime settings resolved from flags and `TODOLIST_*` environment
//! variables.

use std::time::Duration;

use reqwest::Url;
use thiserror::Error;

use crate::cmd_args::CommandLineArgs;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("user id is not set")]
    UserIdNotSet,

    #[error("invalid base url {url:?}: {reason}")]
    InvalidBaseUrl { url: String, reason: String },

    #[error("timeout must be at least one second")]
    ZeroTimeout,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub base_url: String,
    pub user_id: u64,
    pub timeout: Duration,
}

impl Config {
    pub fn from_args(args: &CommandLineArgs) -> Result<Self, ConfigError> {
        if args.user_id == 0 {
            return Err(ConfigError::UserIdNotSet);
        }
        if args.timeout_secs == 0 {
            return Err(ConfigError::ZeroTimeout);
        }

        let invalid = |reason: String| ConfigError::InvalidBaseUrl {
            url: args.base_url.clone(),
            reason,
        };
        let url = Url::parse(&args.base_url).map_err(|e| invalid(e.to_string()))?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(invalid(format!("unsupported scheme {}", url.scheme())));
        }

        Ok(Self {
            base_url: args.base_url.clone(),
            user_id: args.user_id,
            timeout: Duration::from_secs(args.timeout_secs),
        })
    }
}

#[cfg(test)]
mod tests {
    use clap::Parser;

    use super::*;

    fn config(extra: &[&str]) -> Result<Config, ConfigError> {
        let args = CommandLineArgs::parse_from(
            ["todo", "--base-url", "http://127.0.0.1:3000"]
                .iter()
                .chain(extra),
        );
        Config::from_args(&args)
    }

    #[test]
    fn accepts_defaults() {
        let config = config(&["--user-id", "1229"]).unwrap();
        assert_eq!(config.base_url, "http://127.0.0.1:3000");
        assert_eq!(config.user_id, 1229);
        assert_eq!(config.timeout, Duration::from_secs(10));
    }

    #[test]
    fn rejects_unset_user() {
        assert_eq!(config(&["--user-id", "0"]), Err(ConfigError::UserIdNotSet));
    }

    #[test]
    fn rejects_zero_timeout() {
        assert_eq!(
            config(&["--user-id", "1", "--timeout-secs", "0"]),
            Err(ConfigError::ZeroTimeout)
        );
    }

    #[test]
    fn rejects_non_http_urls() {
        let args = CommandLineArgs::parse_from(["todo", "--user-id", "1", "--base-url", "ftp://x"]);
        assert!(matches!(
            Config::from_args(&args),
            Err(ConfigError::InvalidBaseUrl { .. })
        ));

        let args = CommandLineArgs::parse_from(["todo", "--user-id", "1", "--base-url", "nope"]);
        assert!(matches!(
            Config::from_args(&args),
            Err(ConfigError::InvalidBaseUrl { .. })
        ));
    }
}
