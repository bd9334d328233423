//! Configuration structures for the management client.
//!
//! A [`ManagementConfig`] names the management server, the administrator
//! credentials, and the knobs that control transport and task polling.

use crate::Error;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::time::Duration;
use url::Url;
use validator::Validate;

/// Default HTTPS port of the management server.
pub const DEFAULT_PORT: u16 = 443;

/// Path prefix under which every Web API endpoint lives.
pub const WEB_API_PATH: &str = "/web_api/";

/// Default interval between two `show-task` polls, in milliseconds.
pub const DEFAULT_TASK_POLL_INTERVAL_MS: u64 = 2000;

/// Default request timeout, in seconds.
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

/// Configuration for a management client instance.
#[derive(Serialize, Deserialize, Validate)]
pub struct ManagementConfig {
    /// Administrator user name
    pub user: String,

    /// Administrator password
    #[serde(skip_serializing, deserialize_with = "deserialize_secret", default = "empty_secret")]
    pub password: SecretString,

    /// Management server host name or address
    #[validate(length(min = 1))]
    pub server: String,

    /// Management server port
    #[validate(range(min = 1))]
    #[serde(default = "default_port")]
    pub port: u16,

    /// Whether to verify TLS certificates
    #[serde(default = "default_true")]
    pub tls_verify: bool,

    /// Whether calls that spawn server tasks wait for them to finish
    #[serde(default = "default_true")]
    pub wait_for_tasks: bool,

    /// Request timeout in seconds
    #[validate(range(min = 1, max = 600))]
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,

    /// Interval between task polls in milliseconds
    #[validate(range(min = 1))]
    #[serde(default = "default_task_poll_interval_ms")]
    pub task_poll_interval_ms: u64,

    /// Upper bound on polls for a single task; `None` waits indefinitely
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub task_max_polls: Option<u32>,

    /// Explicit API root overriding the `https://<server>:<port>/web_api/` form
    #[validate(url)]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
}

const fn default_port() -> u16 {
    DEFAULT_PORT
}

const fn default_true() -> bool {
    true
}

const fn default_request_timeout_secs() -> u64 {
    DEFAULT_REQUEST_TIMEOUT_SECS
}

const fn default_task_poll_interval_ms() -> u64 {
    DEFAULT_TASK_POLL_INTERVAL_MS
}

fn empty_secret() -> SecretString {
    SecretString::from(String::new())
}

fn deserialize_secret<'de, D>(deserializer: D) -> Result<SecretString, D::Error>
where
    D: Deserializer<'de>,
{
    String::deserialize(deserializer).map(SecretString::from)
}

impl ManagementConfig {
    /// Create a configuration for the given credentials and server.
    ///
    /// # Errors
    ///
    /// Returns an error if validation fails (for example an empty server).
    pub fn new(
        user: impl Into<String>,
        password: impl Into<String>,
        server: impl Into<String>,
    ) -> Result<Self, Error> {
        let config = Self {
            user: user.into(),
            password: SecretString::from(password.into()),
            server: server.into(),
            ..Self::default()
        };

        config
            .validate()
            .map_err(|e| Error::ConfigError(format!("Invalid configuration: {e}")))?;

        Ok(config)
    }

    /// Set the management server port.
    #[must_use]
    pub const fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    /// Set whether to verify TLS certificates.
    #[must_use]
    pub const fn with_tls_verify(mut self, verify: bool) -> Self {
        self.tls_verify = verify;
        self
    }

    /// Enable or disable waiting on server tasks.
    #[must_use]
    pub const fn with_wait_for_tasks(mut self, wait: bool) -> Self {
        self.wait_for_tasks = wait;
        self
    }

    /// Set request timeout in seconds.
    #[must_use]
    pub const fn with_timeout(mut self, seconds: u64) -> Self {
        self.request_timeout_secs = seconds;
        self
    }

    /// Set the interval between task polls.
    #[must_use]
    pub fn with_task_poll_interval(mut self, interval: Duration) -> Self {
        self.task_poll_interval_ms = u64::try_from(interval.as_millis()).unwrap_or(u64::MAX);
        self
    }

    /// Bound the number of polls spent on a single task.
    #[must_use]
    pub const fn with_task_max_polls(mut self, polls: u32) -> Self {
        self.task_max_polls = Some(polls);
        self
    }

    /// Override the API root URL.
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    /// Get the request timeout as a Duration.
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Get the task poll interval as a Duration.
    #[must_use]
    pub const fn task_poll_interval(&self) -> Duration {
        Duration::from_millis(self.task_poll_interval_ms)
    }

    /// Expose the password for building the login payload.
    pub(crate) fn password(&self) -> &str {
        self.password.expose_secret()
    }

    /// Resolve the API root every endpoint name is joined onto.
    ///
    /// # Errors
    ///
    /// Returns an error if the server, port, or override do not form a URL.
    pub fn api_root(&self) -> Result<Url, Error> {
        let raw = match &self.base_url {
            Some(base) if base.ends_with('/') => base.clone(),
            Some(base) => format!("{base}/"),
            None => format!("https://{}:{}{WEB_API_PATH}", self.server, self.port),
        };
        Url::parse(&raw).map_err(|e| Error::InvalidUrl(format!("Invalid API root `{raw}`: {e}")))
    }
}

impl Default for ManagementConfig {
    fn default() -> Self {
        Self {
            user: String::new(),
            password: empty_secret(),
            server: "localhost".to_string(),
            port: DEFAULT_PORT,
            tls_verify: true,
            wait_for_tasks: true,
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
            task_poll_interval_ms: DEFAULT_TASK_POLL_INTERVAL_MS,
            task_max_polls: None,
            base_url: None,
        }
    }
}

impl Clone for ManagementConfig {
    fn clone(&self) -> Self {
        Self {
            user: self.user.clone(),
            password: SecretString::from(self.password.expose_secret().to_string()),
            server: self.server.clone(),
            port: self.port,
            tls_verify: self.tls_verify,
            wait_for_tasks: self.wait_for_tasks,
            request_timeout_secs: self.request_timeout_secs,
            task_poll_interval_ms: self.task_poll_interval_ms,
            task_max_polls: self.task_max_polls,
            base_url: self.base_url.clone(),
        }
    }
}

impl fmt::Debug for ManagementConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ManagementConfig")
            .field("user", &self.user)
            .field("password", &"[REDACTED]")
            .field("server", &self.server)
            .field("port", &self.port)
            .field("tls_verify", &self.tls_verify)
            .field("wait_for_tasks", &self.wait_for_tasks)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .field("task_poll_interval_ms", &self.task_poll_interval_ms)
            .field("task_max_polls", &self.task_max_polls)
            .field("base_url", &self.base_url)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_defaults() {
        let config = ManagementConfig::new("admin", "vpn123", "10.11.12.13").unwrap();
        assert_eq!(config.port, 443);
        assert!(config.tls_verify);
        assert!(config.wait_for_tasks);
        assert_eq!(config.task_poll_interval(), Duration::from_secs(2));
        assert!(config.task_max_polls.is_none());
        assert_eq!(config.timeout(), Duration::from_secs(30));
    }

    #[test]
    fn test_config_rejects_empty_server() {
        let err = ManagementConfig::new("admin", "vpn123", "").unwrap_err();
        assert!(matches!(err, Error::ConfigError(_)));
    }

    #[test]
    fn test_api_root_from_server_and_port() {
        let config = ManagementConfig::new("admin", "vpn123", "10.11.12.13")
            .unwrap()
            .with_port(4434);
        assert_eq!(
            config.api_root().unwrap().as_str(),
            "https://10.11.12.13:4434/web_api/"
        );
    }

    #[test]
    fn test_api_root_override_gets_trailing_slash() {
        let config = ManagementConfig::new("admin", "vpn123", "mgmt")
            .unwrap()
            .with_base_url("http://127.0.0.1:8080/web_api");
        assert_eq!(
            config.api_root().unwrap().as_str(),
            "http://127.0.0.1:8080/web_api/"
        );
    }

    #[test]
    fn test_debug_redacts_password() {
        let config = ManagementConfig::new("admin", "vpn123", "mgmt").unwrap();
        let rendered = format!("{config:?}");
        assert!(!rendered.contains("vpn123"));
        assert!(rendered.contains("[REDACTED]"));
    }

    #[test]
    fn test_deserialize_with_defaults() {
        let config: ManagementConfig = serde_json::from_value(serde_json::json!({
            "user": "admin",
            "password": "vpn123",
            "server": "mgmt.example.com"
        }))
        .unwrap();
        assert_eq!(config.password(), "vpn123");
        assert_eq!(config.port, DEFAULT_PORT);
        assert!(config.validate().is_ok());

        let serialized = serde_json::to_string(&config).unwrap();
        assert!(!serialized.contains("vpn123"));
    }

    #[test]
    fn test_builder_methods() {
        let config = ManagementConfig::new("admin", "vpn123", "mgmt")
            .unwrap()
            .with_tls_verify(false)
            .with_wait_for_tasks(false)
            .with_timeout(5)
            .with_task_poll_interval(Duration::from_millis(25))
            .with_task_max_polls(10);
        assert!(!config.tls_verify);
        assert!(!config.wait_for_tasks);
        assert_eq!(config.request_timeout_secs, 5);
        assert_eq!(config.task_poll_interval_ms, 25);
        assert_eq!(config.task_max_polls, Some(10));
    }
}
