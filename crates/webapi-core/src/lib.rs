//! # webapi-core
//!
//! Session, transport and task handling for the firewall management Web API.
//!
//! Every operation of the management API is a JSON `POST` within an
//! authenticated session. This crate provides that single primitive together
//! with the session lifecycle and the adapter that turns asynchronous server
//! tasks into ordinary awaited results.
//!
//! ## Modules
//!
//! - [`error`] - Error types and transport failure mapping
//! - [`config`] - Client configuration
//! - [`client`] - HTTP transport and the [`ApiCall`] seam
//! - [`session`] - Login, logout, publish, discard and keepalive
//! - [`task`] - Waiting on asynchronous server tasks
//! - [`response`] - The [`ApiResult`] envelope
//! - [`payload`] - Payload construction and merging
//! - [`types`] - Shared value types

#![deny(missing_docs)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]

pub mod client;
pub mod config;
pub mod error;
pub mod payload;
pub mod response;
pub mod session;
pub mod task;
pub mod types;

// Re-export commonly used types
pub use client::{ApiCall, ManagementClient, ManagementClientBuilder};
pub use config::ManagementConfig;
pub use error::{Error, Result};
pub use payload::{merge_payloads, Payload, PayloadBuilder};
pub use response::{ApiResult, TASK_FAILURE_MESSAGE};
pub use session::LoginMessage;
pub use task::{TaskEntry, TaskStatus};
pub use types::DetailsLevel;
