//! Configuration for the RT REST client.
//!
//! A `ClientConfig` is built either in code with the `with_*` builder
//! methods or from `RT_*` environment variables. It is immutable once
//! handed to [`RtClient::new`](crate::rt_client::RtClient::new).

use std::env;
use std::fmt;
use std::time::Duration;

use crate::error::RtError;

/// Default request timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Connection settings for an RT server.
///
/// If `token` is non-empty it is used for every request and the
/// username/password pair is ignored. Otherwise HTTP Basic authentication
/// is sent with whatever username and password are configured, even empty.
#[derive(Clone)]
pub struct ClientConfig {
    /// Base URL of the REST API (e.g., `https://rt.example.com/REST/2.0`).
    pub api_url: String,

    /// Total time allowed for a single request, including reading the body.
    pub timeout: Duration,

    /// Username for HTTP Basic authentication.
    pub username: String,

    /// Password for HTTP Basic authentication.
    /// This value must never be logged.
    pub password: String,

    /// Auth token; takes precedence over username/password when non-empty.
    /// This value must never be logged.
    pub token: String,

    /// Emit request and response bodies to the `rt_rest::wire` log target.
    pub debug: bool,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_url: String::new(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            username: String::new(),
            password: String::new(),
            token: String::new(),
            debug: false,
        }
    }
}

impl fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fn redact(secret: &str) -> &'static str {
            if secret.is_empty() {
                ""
            } else {
                "[REDACTED]"
            }
        }

        f.debug_struct("ClientConfig")
            .field("api_url", &self.api_url)
            .field("timeout", &self.timeout)
            .field("username", &self.username)
            .field("password", &redact(&self.password))
            .field("token", &redact(&self.token))
            .field("debug", &self.debug)
            .finish()
    }
}

impl ClientConfig {
    /// Creates a configuration for the given API URL with default settings.
    pub fn new(api_url: impl Into<String>) -> Self {
        Self {
            api_url: api_url.into(),
            ..Self::default()
        }
    }

    /// Sets the username and password for HTTP Basic authentication.
    pub fn with_basic_auth(mut self, username: impl Into<String>, password: impl Into<String>) -> Self {
        self.username = username.into();
        self.password = password.into();
        self
    }

    /// Sets the auth token.
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = token.into();
        self
    }

    /// Sets the request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Enables or disables wire logging.
    pub fn with_debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }

    /// Loads configuration from environment variables.
    ///
    /// # Environment Variables
    ///
    /// - `RT_API_URL` (required): base URL of the REST API
    /// - `RT_TIMEOUT_SECS`: request timeout in seconds (default 30)
    /// - `RT_USERNAME`, `RT_PASSWORD`: Basic auth credentials
    /// - `RT_TOKEN`: auth token, preferred over Basic auth when set
    /// - `RT_DEBUG`: `1`, `true`, `yes` or `on` to enable wire logging
    ///
    /// # Errors
    ///
    /// Returns `RtError::Config` if `RT_API_URL` is missing or if a
    /// numeric or boolean value cannot be parsed.
    pub fn from_env() -> Result<Self, RtError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Builds a configuration from an arbitrary variable lookup.
    fn from_lookup<F>(lookup: F) -> Result<Self, RtError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_url = lookup("RT_API_URL")
            .filter(|value| !value.trim().is_empty())
            .ok_or_else(|| RtError::missing_env("RT_API_URL"))?;

        let mut config = Self::new(api_url.trim());

        if let Some(raw) = lookup("RT_TIMEOUT_SECS") {
            config.timeout = Self::parse_timeout(&raw)?;
        }
        if let Some(username) = lookup("RT_USERNAME") {
            config.username = username;
        }
        if let Some(password) = lookup("RT_PASSWORD") {
            config.password = password;
        }
        if let Some(token) = lookup("RT_TOKEN") {
            config.token = token.trim().to_string();
        }
        if let Some(raw) = lookup("RT_DEBUG") {
            config.debug = Self::parse_flag("RT_DEBUG", &raw)?;
        }

        Ok(config)
    }

    fn parse_timeout(raw: &str) -> Result<Duration, RtError> {
        raw.trim()
            .parse::<u64>()
            .map(Duration::from_secs)
            .map_err(|_| {
                RtError::invalid_config(format!(
                    "RT_TIMEOUT_SECS must be a whole number of seconds, got {:?}",
                    raw
                ))
            })
    }

    fn parse_flag(name: &str, raw: &str) -> Result<bool, RtError> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "1" | "true" | "yes" | "on" => Ok(true),
            "" | "0" | "false" | "no" | "off" => Ok(false),
            _ => Err(RtError::invalid_config(format!(
                "{} must be a boolean, got {:?}",
                name, raw
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| vars.get(name).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = ClientConfig::new("https://rt.example.com/REST/2.0");
        assert_eq!(config.timeout, Duration::from_secs(30));
        assert!(!config.debug);
        assert!(config.token.is_empty());
    }

    #[test]
    fn test_from_lookup_requires_api_url() {
        let err = ClientConfig::from_lookup(lookup_from(&[("RT_TOKEN", "abc")])).unwrap_err();
        assert!(err.to_string().contains("RT_API_URL"));

        let err = ClientConfig::from_lookup(lookup_from(&[("RT_API_URL", "   ")])).unwrap_err();
        assert!(err.to_string().contains("RT_API_URL"));
    }

    #[test]
    fn test_from_lookup_reads_all_fields() {
        let config = ClientConfig::from_lookup(lookup_from(&[
            ("RT_API_URL", "https://rt.example.com/REST/2.0"),
            ("RT_TIMEOUT_SECS", "5"),
            ("RT_USERNAME", "root"),
            ("RT_PASSWORD", "password"),
            ("RT_TOKEN", " 1-14-abcdef "),
            ("RT_DEBUG", "yes"),
        ]))
        .unwrap();

        assert_eq!(config.api_url, "https://rt.example.com/REST/2.0");
        assert_eq!(config.timeout, Duration::from_secs(5));
        assert_eq!(config.username, "root");
        assert_eq!(config.password, "password");
        assert_eq!(config.token, "1-14-abcdef");
        assert!(config.debug);
    }

    #[test]
    fn test_from_lookup_rejects_bad_timeout() {
        let result = ClientConfig::from_lookup(lookup_from(&[
            ("RT_API_URL", "https://rt.example.com"),
            ("RT_TIMEOUT_SECS", "thirty"),
        ]));
        assert!(result.is_err());
    }

    #[test]
    fn test_parse_flag() {
        assert!(ClientConfig::parse_flag("X", "TRUE").unwrap());
        assert!(ClientConfig::parse_flag("X", "on").unwrap());
        assert!(!ClientConfig::parse_flag("X", "0").unwrap());
        assert!(!ClientConfig::parse_flag("X", "").unwrap());
        assert!(ClientConfig::parse_flag("X", "maybe").is_err());
    }

    #[test]
    fn test_debug_redacts_secrets() {
        let config = ClientConfig::new("https://rt.example.com")
            .with_basic_auth("root", "hunter2")
            .with_token("secret-token");
        let rendered = format!("{:?}", config);
        assert!(!rendered.contains("hunter2"));
        assert!(!rendered.contains("secret-token"));
        assert!(rendered.contains("[REDACTED]"));
        assert!(rendered.contains("root"));
    }
}
