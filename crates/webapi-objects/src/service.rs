//! Service objects and service groups.

use crate::resource::object_adapter;
use crate::Result;
use webapi_core::{ApiCall, ApiResult, Payload, PayloadBuilder};

/// Generates the port-based `add` shared by TCP, UDP and SCTP services.
macro_rules! port_service {
    ($(#[$meta:meta])* $name:ident, $singular:expr, $plural:expr) => {
        object_adapter!($(#[$meta])* $name, $singular, $plural);

        impl<C> $name<'_, C>
        where
            C: ApiCall + ?Sized,
        {
            /// Add a service on `port`: a number, a range (`"5000-5100"`) or a
            /// comparison (`">1024"`).
            pub async fn add(&self, name: &str, port: &str, extra: &Payload) -> Result<ApiResult> {
                let seed = PayloadBuilder::new().field("name", name).field("port", port);
                self.resource.add(seed, extra).await
            }
        }
    };
}

/// Generates the name-only `add` for the remaining service types.
macro_rules! named_service {
    ($(#[$meta:meta])* $name:ident, $singular:expr, $plural:expr) => {
        object_adapter!($(#[$meta])* $name, $singular, $plural);

        impl<C> $name<'_, C>
        where
            C: ApiCall + ?Sized,
        {
            /// Add a service.
            pub async fn add(&self, name: &str, extra: &Payload) -> Result<ApiResult> {
                self.resource
                    .add(PayloadBuilder::new().field("name", name), extra)
                    .await
            }
        }
    };
}

port_service!(
    /// TCP services.
    ServiceTcp,
    "service-tcp",
    "services-tcp"
);
port_service!(
    /// UDP services.
    ServiceUdp,
    "service-udp",
    "services-udp"
);
port_service!(
    /// SCTP services.
    ServiceSctp,
    "service-sctp",
    "services-sctp"
);
named_service!(
    /// Services identified by IP protocol number.
    ServiceOther,
    "service-other",
    "services-other"
);
named_service!(
    /// Service groups.
    ServiceGroup,
    "service-group",
    "service-groups"
);
named_service!(
    /// DCE-RPC services.
    ServiceDceRpc,
    "service-dce-rpc",
    "services-dce-rpc"
);
named_service!(
    /// RPC services.
    ServiceRpc,
    "service-rpc",
    "services-rpc"
);
