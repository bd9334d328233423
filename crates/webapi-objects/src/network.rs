//! Network objects: hosts, networks, groups, DNS domains and simple gateways.

use crate::resource::object_adapter;
use crate::Result;
use webapi_core::{ApiCall, ApiResult, Payload, PayloadBuilder};

/// Address fields shared by hosts and gateways.
///
/// Only the fields that are set are sent. `ip_address` lets the server pick
/// the family; the explicit v4/v6 fields pin it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HostAddresses {
    /// `ip-address`
    pub ip_address: Option<String>,
    /// `ipv4-address`
    pub ipv4_address: Option<String>,
    /// `ipv6-address`
    pub ipv6_address: Option<String>,
}

impl HostAddresses {
    /// A single address of either family.
    #[must_use]
    pub fn ip(address: impl Into<String>) -> Self {
        Self {
            ip_address: Some(address.into()),
            ..Self::default()
        }
    }

    /// Explicit IPv4 and/or IPv6 addresses.
    #[must_use]
    pub fn dual(ipv4: Option<&str>, ipv6: Option<&str>) -> Self {
        Self {
            ip_address: None,
            ipv4_address: ipv4.map(str::to_string),
            ipv6_address: ipv6.map(str::to_string),
        }
    }

    fn apply(&self, builder: PayloadBuilder) -> PayloadBuilder {
        builder
            .opt("ip-address", self.ip_address.as_deref())
            .opt("ipv4-address", self.ipv4_address.as_deref())
            .opt("ipv6-address", self.ipv6_address.as_deref())
    }
}

object_adapter!(
    /// Host objects.
    Host,
    "host",
    "hosts"
);

impl<C> Host<'_, C>
where
    C: ApiCall + ?Sized,
{
    /// Add a host.
    pub async fn add(
        &self,
        name: &str,
        addresses: &HostAddresses,
        extra: &Payload,
    ) -> Result<ApiResult> {
        let seed = addresses.apply(PayloadBuilder::new().field("name", name));
        self.resource.add(seed, extra).await
    }
}

object_adapter!(
    /// Network objects.
    Network,
    "network",
    "networks"
);

impl<C> Network<'_, C>
where
    C: ApiCall + ?Sized,
{
    /// Add a network. Subnet and mask are passed through `extra`.
    pub async fn add(&self, name: &str, extra: &Payload) -> Result<ApiResult> {
        self.resource
            .add(PayloadBuilder::new().field("name", name), extra)
            .await
    }
}

object_adapter!(
    /// Group objects.
    Group,
    "group",
    "groups"
);

impl<C> Group<'_, C>
where
    C: ApiCall + ?Sized,
{
    /// Add a group.
    pub async fn add(&self, name: &str, extra: &Payload) -> Result<ApiResult> {
        self.resource
            .add(PayloadBuilder::new().field("name", name), extra)
            .await
    }
}

object_adapter!(
    /// DNS domain objects.
    DnsDomain,
    "dns-domain",
    "dns-domains"
);

impl<C> DnsDomain<'_, C>
where
    C: ApiCall + ?Sized,
{
    /// Add a DNS domain. Names are expected with a leading dot (`.example.com`).
    pub async fn add(&self, name: &str, is_sub_domain: bool, extra: &Payload) -> Result<ApiResult> {
        let seed = PayloadBuilder::new()
            .field("name", name)
            .field("is-sub-domain", is_sub_domain);
        self.resource.add(seed, extra).await
    }
}

object_adapter!(
    /// Simple gateway objects.
    SimpleGateway,
    "simple-gateway",
    "simple-gateways"
);

impl<C> SimpleGateway<'_, C>
where
    C: ApiCall + ?Sized,
{
    /// Add a gateway. SIC and blade settings are passed through `extra`.
    pub async fn add(
        &self,
        name: &str,
        addresses: &HostAddresses,
        extra: &Payload,
    ) -> Result<ApiResult> {
        let seed = addresses.apply(PayloadBuilder::new().field("name", name));
        self.resource.add(seed, extra).await
    }
}
