//! Client configuration.
//!
//! Values come from the environment (see [`ClientConfig::from_env`]); the CLI
//! layers its flags on top.

use std::time::Duration;

use fintrack_observability::LogFormat;
use reqwest::Url;
use thiserror::Error;

/// Base URL used when `FINTRACK_API_URL` is not set.
pub const DEFAULT_API_URL: &str = "http://localhost:5000/api/v1/";

pub const ENV_API_URL: &str = "FINTRACK_API_URL";
pub const ENV_AUTH_TOKEN: &str = "FINTRACK_AUTH_TOKEN";
pub const ENV_TIMEOUT_SECS: &str = "FINTRACK_TIMEOUT_SECS";
pub const ENV_LOG_FORMAT: &str = "FINTRACK_LOG_FORMAT";

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid API base URL `{url}`: {reason}")]
    InvalidUrl { url: String, reason: String },
    #[error("invalid value for {key}: `{value}`")]
    InvalidValue { key: &'static str, value: String },
    #[error("failed to build HTTP client: {0}")]
    Client(String),
}

/// Settings for talking to the ledger API.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base of the six endpoints; always ends in `/`.
    pub base_url: Url,
    /// Bearer token sent with every request, if any.
    pub token: Option<String>,
    /// Per-request timeout. `None` waits indefinitely.
    pub timeout: Option<Duration>,
    pub log_format: LogFormat,
}

impl ClientConfig {
    pub fn new(base_url: &str) -> Result<Self, ConfigError> {
        Ok(Self {
            base_url: parse_base_url(base_url)?,
            token: None,
            timeout: None,
            log_format: LogFormat::default(),
        })
    }

    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Read configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read configuration through `lookup`; blank values count as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let mut config = Self::new(get(ENV_API_URL).as_deref().unwrap_or(DEFAULT_API_URL))?;

        config.token = get(ENV_AUTH_TOKEN);

        if let Some(raw) = get(ENV_TIMEOUT_SECS) {
            let secs = raw.trim().parse::<u64>().map_err(|_| ConfigError::InvalidValue {
                key: ENV_TIMEOUT_SECS,
                value: raw.clone(),
            })?;
            config.timeout = (secs > 0).then(|| Duration::from_secs(secs));
        }

        if let Some(raw) = get(ENV_LOG_FORMAT) {
            config.log_format = raw.parse().map_err(|_| ConfigError::InvalidValue {
                key: ENV_LOG_FORMAT,
                value: raw.clone(),
            })?;
        }

        Ok(config)
    }
}

/// Parse an http(s) base URL and make sure it ends in `/`, so endpoint paths
/// are appended below it rather than replacing its last segment.
pub fn parse_base_url(raw: &str) -> Result<Url, ConfigError> {
    let invalid = |reason: String| ConfigError::InvalidUrl {
        url: raw.to_string(),
        reason,
    };

    let mut url = Url::parse(raw.trim()).map_err(|e| invalid(e.to_string()))?;

    if !matches!(url.scheme(), "http" | "https") {
        return Err(invalid(format!("unsupported scheme `{}`", url.scheme())));
    }
    if url.query().is_some() || url.fragment().is_some() {
        return Err(invalid("query and fragment are not allowed".to_string()));
    }
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }

    Ok(url)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_when_environment_is_empty() {
        let config = ClientConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config.base_url.as_str(), DEFAULT_API_URL);
        assert!(config.token.is_none());
        assert!(config.timeout.is_none());
        assert_eq!(config.log_format, LogFormat::Json);
    }

    #[test]
    fn reads_all_variables() {
        let config = ClientConfig::from_lookup(lookup(&[
            (ENV_API_URL, "https://ledger.example.com/api/v1"),
            (ENV_AUTH_TOKEN, "secret"),
            (ENV_TIMEOUT_SECS, "15"),
            (ENV_LOG_FORMAT, "pretty"),
        ]))
        .unwrap();

        assert_eq!(config.base_url.as_str(), "https://ledger.example.com/api/v1/");
        assert_eq!(config.token.as_deref(), Some("secret"));
        assert_eq!(config.timeout, Some(Duration::from_secs(15)));
        assert_eq!(config.log_format, LogFormat::Pretty);
    }

    #[test]
    fn zero_timeout_disables_it_and_blank_token_is_unset() {
        let config = ClientConfig::from_lookup(lookup(&[
            (ENV_TIMEOUT_SECS, "0"),
            (ENV_AUTH_TOKEN, "  "),
        ]))
        .unwrap();
        assert!(config.timeout.is_none());
        assert!(config.token.is_none());
    }

    #[test]
    fn rejects_bad_values() {
        let err = ClientConfig::from_lookup(lookup(&[(ENV_TIMEOUT_SECS, "soon")])).unwrap_err();
        assert_eq!(
            err,
            ConfigError::InvalidValue {
                key: ENV_TIMEOUT_SECS,
                value: "soon".to_string()
            }
        );

        let err = ClientConfig::from_lookup(lookup(&[(ENV_LOG_FORMAT, "xml")])).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { key: ENV_LOG_FORMAT, .. }));
    }

    #[test]
    fn base_url_validation() {
        assert!(matches!(
            parse_base_url("ftp://host/api/"),
            Err(ConfigError::InvalidUrl { .. })
        ));
        assert!(matches!(
            parse_base_url("not a url"),
            Err(ConfigError::InvalidUrl { .. })
        ));
        assert!(matches!(
            parse_base_url("http://host/api/?x=1"),
            Err(ConfigError::InvalidUrl { .. })
        ));
        assert_eq!(
            parse_base_url("http://127.0.0.1:5000").unwrap().as_str(),
            "http://127.0.0.1:5000/"
        );
    }
}
