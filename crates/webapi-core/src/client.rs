//! Asynchronous management client and its HTTP transport.
//!
//! Every Web API operation is a JSON `POST` to `<api root>/<endpoint>`.
//! [`ManagementClient::http_post`] is the single primitive all higher layers go
//! through: it attaches the session header, sends the request, decodes the
//! body, and, unless disabled, resolves any server tasks the call spawned.

use crate::config::ManagementConfig;
use crate::error::{Error, Result};
use crate::payload::{merge_payloads, Payload};
use crate::response::ApiResult;
use crate::task::SHOW_TASK_ENDPOINT;
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, CONTENT_TYPE, USER_AGENT as USER_AGENT_HEADER};
use reqwest::{Client, ClientBuilder};
use serde_json::{Map, Value};
use std::sync::{Arc, RwLock};
use std::time::Duration;
use tracing::{debug, warn};
use url::Url;

/// User agent sent with every request.
pub const USER_AGENT: &str = concat!("webapi-core/", env!("CARGO_PKG_VERSION"));

/// Header carrying the session identifier.
pub const SESSION_HEADER: &str = "x-chkp-sid";

/// The one capability object adapters need: post a payload to an endpoint
/// within the current session.
#[async_trait]
pub trait ApiCall: Send + Sync {
    /// Post `payload` to `endpoint`, attaching the session identifier.
    async fn call(&self, endpoint: &str, payload: &Payload) -> Result<ApiResult>;
}

/// Builder for [`ManagementClient`].
#[derive(Debug, Clone)]
pub struct ManagementClientBuilder {
    config: ManagementConfig,
    connect_timeout: Duration,
}

impl ManagementClientBuilder {
    /// Create a builder from a [`ManagementConfig`].
    #[must_use]
    pub fn new(config: ManagementConfig) -> Self {
        Self {
            config,
            connect_timeout: Duration::from_secs(10),
        }
    }

    /// Override the TCP connect timeout.
    #[must_use]
    pub const fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    /// Finalise the builder and create the [`ManagementClient`].
    pub fn build(self) -> Result<ManagementClient> {
        let api_root = self.config.api_root()?;

        let mut builder = ClientBuilder::new()
            .user_agent(USER_AGENT)
            .timeout(self.config.timeout())
            .connect_timeout(self.connect_timeout);

        if !self.config.tls_verify {
            warn!(server = %self.config.server, "TLS verification disabled for management client");
            builder = builder.danger_accept_invalid_certs(true);
        }

        let http = builder.build().map_err(|err| {
            Error::ConfigError(format!("Failed to build management HTTP client: {err}"))
        })?;

        Ok(ManagementClient {
            http,
            api_root,
            config: Arc::new(self.config),
            last_login: Arc::new(RwLock::new(None)),
        })
    }
}

/// Asynchronous client for one management session.
///
/// Clones share the same session.
#[derive(Clone)]
pub struct ManagementClient {
    http: Client,
    api_root: Url,
    pub(crate) config: Arc<ManagementConfig>,
    pub(crate) last_login: Arc<RwLock<Option<ApiResult>>>,
}

impl ManagementClient {
    /// Construct a client directly from the configuration.
    pub fn from_config(config: &ManagementConfig) -> Result<Self> {
        ManagementClientBuilder::new(config.clone()).build()
    }

    /// Start a builder pre-populated with the provided configuration.
    #[must_use]
    pub fn builder(config: ManagementConfig) -> ManagementClientBuilder {
        ManagementClientBuilder::new(config)
    }

    /// The API root every endpoint is joined onto.
    #[must_use]
    pub fn api_root(&self) -> &Url {
        &self.api_root
    }

    /// Whether calls wait for the server tasks they spawn.
    #[must_use]
    pub fn waits_for_tasks(&self) -> bool {
        self.config.wait_for_tasks
    }

    /// Merge two payloads; see [`merge_payloads`].
    #[must_use]
    pub fn merge_payloads(&self, base: &Payload, overrides: &Payload) -> Payload {
        merge_payloads(base, overrides)
    }

    /// Build the full URL for an endpoint name.
    pub fn build_url(&self, endpoint: &str) -> Result<Url> {
        self.api_root
            .join(endpoint)
            .map_err(|err| Error::InvalidUrl(format!("Invalid endpoint `{endpoint}`: {err}")))
    }

    /// Build the request headers.
    ///
    /// The session header is present only when `send_sid` is set and a
    /// successful login has been recorded.
    pub fn build_headers(&self, send_sid: bool) -> Result<HeaderMap> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(USER_AGENT_HEADER, HeaderValue::from_static(USER_AGENT));

        if send_sid {
            if let Some(sid) = self.session_id() {
                let value = HeaderValue::from_str(&sid).map_err(|err| {
                    Error::Http(format!("Session identifier is not a valid header: {err}"))
                })?;
                headers.insert(SESSION_HEADER, value);
            }
        }

        Ok(headers)
    }

    /// Session identifier from the last successful login, if any.
    ///
    /// Taken from the typed [`LoginMessage`](crate::session::LoginMessage),
    /// so a 200 login without a string `sid` yields no session.
    #[must_use]
    pub fn session_id(&self) -> Option<String> {
        self.login_message().map(|login| login.sid)
    }

    /// Post a payload to an endpoint and resolve any tasks it spawned.
    ///
    /// # Errors
    ///
    /// Transport failures are returned as their distinct [`Error`] kinds and a
    /// broken task poll as [`Error::WaitOnTask`]. Non-200 responses are not
    /// errors.
    pub async fn http_post(
        &self,
        endpoint: &str,
        send_sid: bool,
        payload: &Payload,
    ) -> Result<ApiResult> {
        let result = self.post(endpoint, send_sid, payload).await?;

        if self.config.wait_for_tasks
            && endpoint != SHOW_TASK_ENDPOINT
            && result.status_code() == 200
        {
            return self.resolve_tasks(result).await;
        }

        Ok(result)
    }

    /// Issue exactly one POST without any task handling.
    pub(crate) async fn post(
        &self,
        endpoint: &str,
        send_sid: bool,
        payload: &Payload,
    ) -> Result<ApiResult> {
        let url = self.build_url(endpoint)?;
        let headers = self.build_headers(send_sid)?;

        debug!(endpoint = %endpoint, send_sid, "Sending Web API request");

        let response = self
            .http
            .post(url)
            .headers(headers)
            .json(payload)
            .send()
            .await?;

        let status = response.status().as_u16();
        let text = response.text().await?;

        debug!(endpoint = %endpoint, status, "Received Web API response");

        decode_response(endpoint, status, &text)
    }
}

/// Turn a raw response into an [`ApiResult`].
///
/// Error responses that are not JSON objects keep their text as the message.
fn decode_response(endpoint: &str, status: u16, text: &str) -> Result<ApiResult> {
    if text.trim().is_empty() {
        return Ok(ApiResult::new(status, Map::new()));
    }

    match serde_json::from_str::<Value>(text) {
        Ok(Value::Object(body)) => Ok(ApiResult::new(status, body)),
        _ if status != 200 => Ok(ApiResult::new(status, Map::new()).with_message(text.trim())),
        Ok(other) => Err(Error::InvalidResponse(format!(
            "Expected a JSON object from `{endpoint}`, got {other}"
        ))),
        Err(err) => Err(Error::InvalidResponse(format!(
            "Failed to parse response from `{endpoint}`: {err}"
        ))),
    }
}

#[async_trait]
impl ApiCall for ManagementClient {
    async fn call(&self, endpoint: &str, payload: &Payload) -> Result<ApiResult> {
        self.http_post(endpoint, true, payload).await
    }
}
