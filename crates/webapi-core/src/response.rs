//! The uniform result envelope returned by every Web API operation.

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::Result;
use crate::payload::Payload;

/// Message attached to a result whose tasks did not all succeed.
pub const TASK_FAILURE_MESSAGE: &str =
    "There was at least one task that failed or partially succeeded";

/// Outcome of a Web API call.
///
/// Synchronous calls and calls resolved by waiting on server tasks return the
/// same shape. A non-200 status is not an error at this level; callers decide
/// what to do with it.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiResult {
    status_code: u16,
    body: Payload,
    success: bool,
    message: Option<String>,
}

impl ApiResult {
    /// Wrap a status code and decoded body.
    ///
    /// `success` starts out true only for status 200.
    #[must_use]
    pub fn new(status_code: u16, body: Payload) -> Self {
        Self {
            status_code,
            body,
            success: status_code == 200,
            message: None,
        }
    }

    /// HTTP status code of the response.
    #[must_use]
    pub const fn status_code(&self) -> u16 {
        self.status_code
    }

    /// Whether the call, and every task it spawned, succeeded.
    #[must_use]
    pub const fn success(&self) -> bool {
        self.success
    }

    /// Optional explanation attached by the client.
    #[must_use]
    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    /// Independent copy of the response body.
    #[must_use]
    pub fn json(&self) -> Payload {
        self.body.clone()
    }

    /// Borrow the response body without copying.
    #[must_use]
    pub fn body(&self) -> &Payload {
        &self.body
    }

    /// Look up a single top-level field of the body.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.body.get(key)
    }

    /// Deserialize the body into a typed value.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidResponse`](crate::Error::InvalidResponse) when the
    /// body does not match `T`.
    pub fn parse<T>(&self) -> Result<T>
    where
        T: DeserializeOwned,
    {
        Ok(serde_json::from_value(Value::Object(self.body.clone()))?)
    }

    /// Mark the result as failed with the fixed task-failure message.
    pub(crate) fn mark_task_failure(&mut self) {
        self.success = false;
        self.message = Some(TASK_FAILURE_MESSAGE.to_string());
    }

    pub(crate) fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }
}
