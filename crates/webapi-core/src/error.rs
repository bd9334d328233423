//! Error types for management Web API operations.
//!
//! Transport failures are split into distinct kinds so callers can react to a
//! certificate problem differently from an unreachable server. Failures the
//! server reports cleanly (a rejected login, a task that finished with a
//! failure status) are not errors; they surface through
//! [`ApiResult`](crate::response::ApiResult).

use std::error::Error as StdError;
use thiserror::Error;

/// Main error type for Web API operations.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    /// TLS handshake or certificate verification failed
    #[error("SSL error: {0}")]
    Ssl(String),

    /// The management server could not be reached
    #[error("Connection error: {0}")]
    Connection(String),

    /// The server answered with something that is not valid HTTP
    #[error("HTTP error: {0}")]
    Http(String),

    /// Any other transport fault, such as a connection dropped mid-response
    #[error("Transport error: {0}")]
    Transport(String),

    /// The request timed out
    #[error("Request timed out: {0}")]
    Timeout(String),

    /// The redirect limit was exceeded
    #[error("Too many redirects: {0}")]
    TooManyRedirects(String),

    /// The request URL could not be built
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// Polling `show-task` itself failed
    #[error("Wait on task failed ({status}): {message}")]
    WaitOnTask {
        /// HTTP status returned by the poll (0 when no poll was answered)
        status: u16,
        /// Description of the failure
        message: String,
    },

    /// A successful response carried a body that is not a JSON object
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Validation error
    #[error("Validation error: {0}")]
    ValidationError(String),
}

/// Specialized result type for Web API operations.
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Returns the error code for this error type.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Ssl(_) => "SSL_ERROR",
            Self::Connection(_) => "CONNECTION_ERROR",
            Self::Http(_) => "HTTP_ERROR",
            Self::Transport(_) => "TRANSPORT_ERROR",
            Self::Timeout(_) => "TIMEOUT",
            Self::TooManyRedirects(_) => "TOO_MANY_REDIRECTS",
            Self::InvalidUrl(_) => "INVALID_URL",
            Self::WaitOnTask { .. } => "WAIT_ON_TASK",
            Self::InvalidResponse(_) => "INVALID_RESPONSE",
            Self::ConfigError(_) => "CONFIG_ERROR",
            Self::ValidationError(_) => "VALIDATION_ERROR",
        }
    }

    /// Returns true for failures raised by the transport layer.
    #[must_use]
    pub const fn is_transport(&self) -> bool {
        matches!(
            self,
            Self::Ssl(_)
                | Self::Connection(_)
                | Self::Http(_)
                | Self::Transport(_)
                | Self::Timeout(_)
                | Self::TooManyRedirects(_)
                | Self::InvalidUrl(_)
        )
    }
}

/// Flattens an error and its source chain into one line.
fn describe(err: &(dyn StdError + 'static)) -> String {
    let mut message = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        let text = cause.to_string();
        if !message.contains(&text) {
            message.push_str(": ");
            message.push_str(&text);
        }
        source = cause.source();
    }
    message
}

/// Causes below the top-level error, which itself embeds the request URL.
fn causes<'a>(err: &'a reqwest::Error) -> impl Iterator<Item = &'a (dyn StdError + 'static)> + 'a {
    std::iter::successors(err.source(), |&cause| cause.source())
}

/// Whether a connect failure happened during the TLS handshake.
///
/// rustls surfaces handshake and certificate failures as `InvalidData` I/O
/// errors; native TLS backends only describe them in their text.
fn is_tls_failure(err: &reqwest::Error) -> bool {
    causes(err).any(|cause| {
        if let Some(io) = cause.downcast_ref::<std::io::Error>() {
            if io.kind() == std::io::ErrorKind::InvalidData {
                return true;
            }
        }
        let text = cause.to_string().to_lowercase();
        ["certificate", "tls", "ssl", "handshake"]
            .iter()
            .any(|needle| text.contains(needle))
    })
}

/// hyper reports unparsable responses as "invalid HTTP ..." or an oversized
/// message head.
fn is_protocol_failure(err: &reqwest::Error) -> bool {
    err.is_body()
        || err.is_decode()
        || causes(err).any(|cause| {
            let text = cause.to_string().to_lowercase();
            text.contains("invalid http") || text.contains("message head")
        })
}

// Conversions from external error types
impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        let message = describe(&err);
        if err.is_timeout() {
            Self::Timeout(message)
        } else if err.is_redirect() {
            Self::TooManyRedirects(message)
        } else if err.is_builder() {
            Self::InvalidUrl(message)
        } else if err.is_connect() {
            if is_tls_failure(&err) {
                Self::Ssl(message)
            } else {
                Self::Connection(message)
            }
        } else if is_protocol_failure(&err) {
            Self::Http(message)
        } else {
            Self::Transport(message)
        }
    }
}

impl From<url::ParseError> for Error {
    fn from(err: url::ParseError) -> Self {
        Self::InvalidUrl(err.to_string())
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Self::InvalidResponse(err.to_string())
    }
}

impl From<validator::ValidationErrors> for Error {
    fn from(err: validator::ValidationErrors) -> Self {
        Self::ValidationError(err.to_string())
    }
}
