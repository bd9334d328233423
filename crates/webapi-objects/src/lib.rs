//! # webapi-objects
//!
//! Typed adapters for the object, rulebase and policy operations of the
//! firewall management Web API.
//!
//! Every adapter borrows anything implementing [`ApiCall`], usually a
//! logged-in [`webapi_core::ManagementClient`], and turns its arguments into a
//! single payload. Caller supplied extra parameters are layered over the
//! seeded fields, so any server option not modelled here can still be sent.
//!
//! ## Example
//!
//! ```no_run
//! use webapi_core::{ManagementClient, ManagementConfig, Payload};
//! use webapi_objects::{Host, HostAddresses, ObjectSelector};
//!
//! # async fn example() -> webapi_core::Result<()> {
//! let config = ManagementConfig::new("admin", "secret", "mgmt.example.com")?;
//! let client = ManagementClient::from_config(&config)?;
//! client.login(&Payload::new()).await?;
//!
//! let hosts = Host::new(&client);
//! hosts
//!     .add("web-01", &HostAddresses::ip("10.0.0.10"), &Payload::new())
//!     .await?;
//! let shown = hosts.show(&ObjectSelector::name("web-01"), None).await?;
//! assert!(shown.success());
//!
//! client.publish(None).await?;
//! client.logout().await?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Modules
//!
//! - [`resource`] - The generic adapter and its parameter types
//! - [`network`] - Hosts, networks, groups, DNS domains and gateways
//! - [`service`] - Service objects and service groups
//! - [`application`] - Application sites, categories and groups
//! - [`threat`] - Threat prevention profiles
//! - [`rulebase`] - Access and NAT rules, sections and layers
//! - [`policy`] - Policy packages, install and verify
//! - [`misc`] - Tasks, scripts and file distribution

#![deny(missing_docs)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]

pub mod resource;

pub mod application;
pub mod misc;
pub mod network;
pub mod policy;
pub mod rulebase;
pub mod service;
pub mod threat;

#[cfg(test)]
pub(crate) mod testing;

pub use webapi_core::{ApiCall, ApiResult, Error, Result};

// Re-export commonly used types
pub use application::{ApplicationSite, ApplicationSiteCategory, ApplicationSiteGroup};
pub use misc::{Misc, PutFileRequest};
pub use network::{DnsDomain, Group, Host, HostAddresses, Network, SimpleGateway};
pub use policy::{InstallPolicyRequest, Policy, PolicyPackage};
pub use resource::{ObjectSelector, OrderBy, Resource, ResourceKind, ShowAllParams};
pub use rulebase::{AccessLayer, AccessRule, AccessSection, NatRule, NatSection, Position};
pub use service::{
    ServiceDceRpc, ServiceGroup, ServiceOther, ServiceRpc, ServiceSctp, ServiceTcp, ServiceUdp,
};
pub use threat::ThreatProfile;
