//! Session lifecycle: login, logout, publish, discard and keepalive.
//!
//! A session starts with `login`, whose result is kept as the "last login".
//! Every later session-scoped call carries the `sid` from that result in the
//! [`SESSION_HEADER`](crate::client::SESSION_HEADER). Failed session calls are
//! reported through the returned [`ApiResult`], never as errors.

use crate::client::ManagementClient;
use crate::error::Result;
use crate::payload::{merge_payloads, Payload, PayloadBuilder};
use crate::response::ApiResult;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::PoisonError;
use tracing::{info, warn};

/// Typed view of a successful `login` response.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "kebab-case")]
pub struct LoginMessage {
    /// Session identifier
    pub sid: String,
    /// Session object UID
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uid: Option<String>,
    /// API URL the session is bound to
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    /// Idle timeout in seconds
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub session_timeout: Option<u64>,
    /// Version of the management API
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_server_version: Option<String>,
    /// Whether the session is read-only
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub read_only: Option<bool>,
    /// When this administrator last logged in
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_login_was_at: Option<LoginTimestamp>,
}

/// Timestamp as reported by the management server.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LoginTimestamp {
    /// Milliseconds since the epoch
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub posix: DateTime<Utc>,
    /// ISO-8601 rendering in the server's zone
    #[serde(rename = "iso-8601", default, skip_serializing_if = "Option::is_none")]
    pub iso_8601: Option<String>,
}

impl ManagementClient {
    /// Log in with the configured credentials.
    ///
    /// `extra` is merged over `{user, password}`; on collision `extra` wins.
    /// The result is recorded as the last login regardless of its status.
    pub async fn login(&self, extra: &Payload) -> Result<ApiResult> {
        let credentials = PayloadBuilder::new()
            .field("user", self.config.user.as_str())
            .field("password", self.config.password())
            .build();
        let payload = merge_payloads(&credentials, extra);

        let result = self.http_post("login", false, &payload).await?;

        if result.status_code() == 200 {
            info!(user = %self.config.user, server = %self.config.server, "Logged in to management server");
        } else {
            warn!(
                user = %self.config.user,
                status = result.status_code(),
                "Login to management server was rejected"
            );
        }

        {
            let mut last_login = self
                .last_login
                .write()
                .unwrap_or_else(PoisonError::into_inner);
            *last_login = Some(result.clone());
        }

        Ok(result)
    }

    /// The most recent login result, if any.
    #[must_use]
    pub fn last_login(&self) -> Option<ApiResult> {
        self.last_login
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// The last login decoded as a [`LoginMessage`], when it succeeded.
    #[must_use]
    pub fn login_message(&self) -> Option<LoginMessage> {
        self.last_login()
            .filter(|login| login.status_code() == 200)
            .and_then(|login| login.parse().ok())
    }

    /// End the current session.
    pub async fn logout(&self) -> Result<ApiResult> {
        let result = self.http_post("logout", true, &Payload::new()).await?;
        info!(status = result.status_code(), "Logged out of management server");
        Ok(result)
    }

    /// Publish the changes of the current session, or of session `uid`.
    pub async fn publish(&self, uid: Option<&str>) -> Result<ApiResult> {
        let payload = PayloadBuilder::new().opt("uid", uid).build();
        self.http_post("publish", true, &payload).await
    }

    /// Discard the changes of the current session, or of session `uid`.
    pub async fn discard(&self, uid: Option<&str>) -> Result<ApiResult> {
        let payload = PayloadBuilder::new().opt("uid", uid).build();
        self.http_post("discard", true, &payload).await
    }

    /// Keep the current session from expiring.
    pub async fn keepalive(&self) -> Result<ApiResult> {
        self.http_post("keepalive", true, &Payload::new()).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::SESSION_HEADER;
    use crate::config::ManagementConfig;
    use serde_json::{json, Value};
    use wiremock::matchers::{body_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const SID: &str = "97BVpRfN4j81ogN-V2XqGYmw3DDwIhoSn0og8PiKDiM";

    fn test_client(server: &MockServer) -> ManagementClient {
        let config = ManagementConfig::new("admin", "vpn123", "10.11.12.13")
            .unwrap()
            .with_tls_verify(false)
            .with_base_url(format!("{}/web_api/", server.uri()));
        ManagementClient::from_config(&config).unwrap()
    }

    fn object(value: Value) -> Payload {
        match value {
            Value::Object(map) => map,
            other => panic!("expected object, got {other}"),
        }
    }

    async fn mount_login(server: &MockServer) {
        Mock::given(method("POST"))
            .and(path("/web_api/login"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "sid": SID,
                "url": "https://10.11.12.13:443/web_api",
                "uid": "7a13a360-9b24-40d7-acd3-5b50247be33e",
                "session-timeout": 600,
                "api-server-version": "1.1",
                "last-login-was-at": {"posix": 1_478_636_363_481_i64, "iso-8601": "2016-11-08T15:19-0500"}
            })))
            .mount(server)
            .await;
    }

    #[tokio::test]
    async fn login_sends_credentials_without_session() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/web_api/login"))
            .and(body_json(json!({"user": "admin", "password": "vpn123"})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"sid": SID})))
            .expect(1)
            .mount(&server)
            .await;

        let client = test_client(&server);
        let result = client.login(&Payload::new()).await.unwrap();

        assert_eq!(result.status_code(), 200);
        assert_eq!(client.session_id().as_deref(), Some(SID));

        let requests = server.received_requests().await.unwrap();
        assert!(requests[0].headers.get(SESSION_HEADER).is_none());
    }

    #[tokio::test]
    async fn login_extra_params_override_base_payload() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/web_api/login"))
            .and(body_json(json!({
                "user": "auditor",
                "password": "vpn123",
                "session-name": "mysessionname",
                "session-timeout": 900
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"sid": SID})))
            .expect(1)
            .mount(&server)
            .await;

        let client = test_client(&server);
        let extra = object(json!({
            "user": "auditor",
            "session-name": "mysessionname",
            "session-timeout": 900
        }));
        let result = client.login(&extra).await.unwrap();
        assert!(result.success());
    }

    #[tokio::test]
    async fn failed_login_is_returned_and_sends_no_sid_later() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/web_api/login"))
            .respond_with(ResponseTemplate::new(400).set_body_json(json!({
                "code": "err_login_failed",
                "message": "Authentication to server failed."
            })))
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/web_api/keepalive"))
            .respond_with(ResponseTemplate::new(401).set_body_json(json!({})))
            .mount(&server)
            .await;

        let client = test_client(&server);
        let result = client.login(&Payload::new()).await.unwrap();
        assert_eq!(result.status_code(), 400);
        assert_eq!(client.last_login().unwrap().status_code(), 400);
        assert!(client.session_id().is_none());
        assert!(client.login_message().is_none());

        client.keepalive().await.unwrap();
        let requests = server.received_requests().await.unwrap();
        assert!(requests[1].headers.get(SESSION_HEADER).is_none());
    }

    #[tokio::test]
    async fn login_message_is_typed() {
        let server = MockServer::start().await;
        mount_login(&server).await;

        let client = test_client(&server);
        client.login(&Payload::new()).await.unwrap();

        let message = client.login_message().unwrap();
        assert_eq!(message.sid, SID);
        assert_eq!(message.session_timeout, Some(600));
        let last = message.last_login_was_at.unwrap();
        assert_eq!(last.posix.timestamp_millis(), 1_478_636_363_481);
    }

    #[tokio::test]
    async fn session_calls_carry_sid() {
        let server = MockServer::start().await;
        mount_login(&server).await;
        for endpoint in ["logout", "keepalive", "publish", "discard"] {
            Mock::given(method("POST"))
                .and(path(format!("/web_api/{endpoint}").as_str()))
                .and(header(SESSION_HEADER, SID))
                .and(body_json(json!({})))
                .respond_with(ResponseTemplate::new(200).set_body_json(json!({"message": "OK"})))
                .expect(1)
                .mount(&server)
                .await;
        }

        let client = test_client(&server);
        client.login(&Payload::new()).await.unwrap();

        assert!(client.publish(None).await.unwrap().success());
        assert!(client.discard(None).await.unwrap().success());
        assert!(client.keepalive().await.unwrap().success());
        let result = client.logout().await.unwrap();
        assert_eq!(result.json()["message"], json!("OK"));
    }

    #[tokio::test]
    async fn publish_and_discard_target_other_session() {
        let server = MockServer::start().await;
        for endpoint in ["publish", "discard"] {
            Mock::given(method("POST"))
                .and(path(format!("/web_api/{endpoint}").as_str()))
                .and(body_json(json!({"uid": "someuid"})))
                .respond_with(ResponseTemplate::new(200).set_body_json(json!({"message": "OK"})))
                .expect(1)
                .mount(&server)
                .await;
        }

        let client = test_client(&server);
        assert!(client.publish(Some("someuid")).await.unwrap().success());
        assert!(client.discard(Some("someuid")).await.unwrap().success());
    }

    #[tokio::test]
    async fn empty_uid_is_still_sent() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/web_api/discard"))
            .and(body_json(json!({"uid": ""})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
            .expect(1)
            .mount(&server)
            .await;

        let client = test_client(&server);
        client.discard(Some("")).await.unwrap();
    }

    #[tokio::test]
    async fn session_id_comes_from_typed_login_message() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/web_api/login"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"sid": 42})))
            .mount(&server)
            .await;

        let client = test_client(&server);
        let result = client.login(&Payload::new()).await.unwrap();

        assert!(result.success());
        assert!(client.login_message().is_none());
        assert!(client.session_id().is_none());
    }
}
