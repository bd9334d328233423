//! Access control and NAT rulebases.
//!
//! Rules and sections live inside a container: an access layer or a policy
//! package. Every request carries the container next to the usual
//! name/uid selector, and `add` also places the entry at a [`Position`].

use crate::resource::{object_adapter, ObjectSelector, ResourceKind};
use crate::Result;
use serde_json::{json, Value};
use std::fmt;
use webapi_core::{ApiCall, ApiResult, Payload, PayloadBuilder};

/// Where a new rule or section is placed in its rulebase.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Position {
    /// First entry
    Top,
    /// Last entry
    Bottom,
    /// Absolute rule number, starting at 1
    Index(u32),
    /// Directly above the named rule or section
    Above(String),
    /// Directly below the named rule or section
    Below(String),
}

impl From<&Position> for Value {
    fn from(position: &Position) -> Self {
        match position {
            Position::Top => json!("top"),
            Position::Bottom => json!("bottom"),
            Position::Index(index) => json!(index),
            Position::Above(anchor) => json!({ "above": anchor }),
            Position::Below(anchor) => json!({ "below": anchor }),
        }
    }
}

impl From<u32> for Position {
    fn from(index: u32) -> Self {
        Self::Index(index)
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Top => write!(f, "top"),
            Self::Bottom => write!(f, "bottom"),
            Self::Index(index) => write!(f, "{index}"),
            Self::Above(anchor) => write!(f, "above {anchor}"),
            Self::Below(anchor) => write!(f, "below {anchor}"),
        }
    }
}

/// Shared request shapes for container-scoped entries.
struct Rulebase<'a, C: ?Sized> {
    client: &'a C,
    kind: ResourceKind,
    container_key: &'static str,
}

impl<'a, C> Rulebase<'a, C>
where
    C: ApiCall + ?Sized,
{
    const fn new(client: &'a C, kind: ResourceKind, container_key: &'static str) -> Self {
        Self {
            client,
            kind,
            container_key,
        }
    }

    async fn add(&self, container: &str, position: &Position, extra: &Payload) -> Result<ApiResult> {
        let payload = PayloadBuilder::new()
            .field(self.container_key, container)
            .field("position", position)
            .merge(extra)
            .build();
        self.client.call(&self.kind.endpoint("add"), &payload).await
    }

    async fn scoped(
        &self,
        verb: &str,
        container: &str,
        selector: &ObjectSelector,
        extra: &Payload,
    ) -> Result<ApiResult> {
        let payload = selector
            .apply(PayloadBuilder::new().field(self.container_key, container))
            .merge(extra)
            .build();
        self.client.call(&self.kind.endpoint(verb), &payload).await
    }

    async fn show_rulebase(&self, name_key: &str, name: &str, extra: &Payload) -> Result<ApiResult> {
        let payload = PayloadBuilder::new().field(name_key, name).merge(extra).build();
        self.client.call(&self.kind.list_endpoint(), &payload).await
    }
}

macro_rules! rulebase_adapter {
    ($(#[$meta:meta])* $name:ident, $singular:literal, $rulebase:literal, $container:literal) => {
        $(#[$meta])*
        pub struct $name<'a, C: ?Sized> {
            rulebase: Rulebase<'a, C>,
        }

        impl<'a, C> $name<'a, C>
        where
            C: ApiCall + ?Sized,
        {
            /// Endpoint naming for this entry type.
            pub const KIND: ResourceKind = ResourceKind::new($singular, $rulebase);

            /// Bind the adapter to a client.
            #[must_use]
            pub const fn new(client: &'a C) -> Self {
                Self {
                    rulebase: Rulebase::new(client, Self::KIND, $container),
                }
            }

            #[doc = concat!("Add an entry to the `", $container, "` at `position`.")]
            pub async fn add(
                &self,
                container: &str,
                position: &Position,
                extra: &Payload,
            ) -> Result<ApiResult> {
                self.rulebase.add(container, position, extra).await
            }

            /// Show an entry. Rule numbers and details level go in `extra`.
            pub async fn show(
                &self,
                container: &str,
                selector: &ObjectSelector,
                extra: &Payload,
            ) -> Result<ApiResult> {
                self.rulebase.scoped("show", container, selector, extra).await
            }

            /// Change an entry.
            pub async fn set(
                &self,
                container: &str,
                selector: &ObjectSelector,
                extra: &Payload,
            ) -> Result<ApiResult> {
                self.rulebase.scoped("set", container, selector, extra).await
            }

            /// Delete an entry.
            pub async fn delete(
                &self,
                container: &str,
                selector: &ObjectSelector,
                extra: &Payload,
            ) -> Result<ApiResult> {
                self.rulebase.scoped("delete", container, selector, extra).await
            }
        }
    };
}

rulebase_adapter!(
    /// Rules of an access control layer.
    AccessRule,
    "access-rule",
    "access-rulebase",
    "layer"
);

impl<C> AccessRule<'_, C>
where
    C: ApiCall + ?Sized,
{
    /// Show the whole rulebase of the named access layer.
    pub async fn show_rulebase(&self, layer: &str, extra: &Payload) -> Result<ApiResult> {
        self.rulebase.show_rulebase("name", layer, extra).await
    }
}

rulebase_adapter!(
    /// Sections of an access control layer.
    AccessSection,
    "access-section",
    "access-rulebase",
    "layer"
);

rulebase_adapter!(
    /// Manual NAT rules of a policy package.
    NatRule,
    "nat-rule",
    "nat-rulebase",
    "package"
);

impl<C> NatRule<'_, C>
where
    C: ApiCall + ?Sized,
{
    /// Show the NAT rulebase of the named package.
    pub async fn show_rulebase(&self, package: &str, extra: &Payload) -> Result<ApiResult> {
        self.rulebase.show_rulebase("package", package, extra).await
    }
}

rulebase_adapter!(
    /// Sections of a NAT rulebase.
    NatSection,
    "nat-section",
    "nat-rulebase",
    "package"
);

object_adapter!(
    /// Access control layers.
    AccessLayer,
    "access-layer",
    "access-layers"
);

impl<C> AccessLayer<'_, C>
where
    C: ApiCall + ?Sized,
{
    /// Add a layer.
    pub async fn add(&self, name: &str, extra: &Payload) -> Result<ApiResult> {
        self.resource
            .add(PayloadBuilder::new().field("name", name), extra)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resource::ShowAllParams;
    use crate::testing::{expect_call, object, MockApi};

    #[test]
    fn position_wire_forms() {
        assert_eq!(Value::from(&Position::Top), json!("top"));
        assert_eq!(Value::from(&Position::Bottom), json!("bottom"));
        assert_eq!(Value::from(&Position::from(3)), json!(3));
        assert_eq!(
            Value::from(&Position::Above("Section One".into())),
            json!({"above": "Section One"})
        );
        assert_eq!(
            Value::from(&Position::Below("Cleanup".into())),
            json!({"below": "Cleanup"})
        );
        assert_eq!(Position::Below("Cleanup".into()).to_string(), "below Cleanup");
    }

    #[tokio::test]
    async fn access_rule_add_seeds_layer_and_position() {
        let mut api = MockApi::new();
        expect_call(
            &mut api,
            "add-access-rule",
            json!({
                "layer": "Network",
                "position": {"above": "Cleanup rule"},
                "name": "allow web",
                "action": "Accept"
            }),
        );

        AccessRule::new(&api)
            .add(
                "Network",
                &Position::Above("Cleanup rule".into()),
                &object(json!({"name": "allow web", "action": "Accept"})),
            )
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn access_rule_scoped_calls_carry_layer() {
        let mut api = MockApi::new();
        expect_call(
            &mut api,
            "show-access-rule",
            json!({"layer": "Network", "rule-number": 1}),
        );
        expect_call(
            &mut api,
            "set-access-rule",
            json!({"layer": "Network", "name": "allow web", "enabled": false}),
        );
        expect_call(
            &mut api,
            "delete-access-rule",
            json!({"layer": "Network", "uid": "r-uid"}),
        );
        expect_call(
            &mut api,
            "show-access-rulebase",
            json!({"name": "Network", "limit": 20}),
        );

        let rules = AccessRule::new(&api);
        rules
            .show("Network", &ObjectSelector::none(), &object(json!({"rule-number": 1})))
            .await
            .unwrap();
        rules
            .set(
                "Network",
                &ObjectSelector::name("allow web"),
                &object(json!({"enabled": false})),
            )
            .await
            .unwrap();
        rules
            .delete("Network", &ObjectSelector::uid("r-uid"), &Payload::new())
            .await
            .unwrap();
        rules
            .show_rulebase("Network", &object(json!({"limit": 20})))
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn access_section_uses_layer() {
        let mut api = MockApi::new();
        expect_call(
            &mut api,
            "add-access-section",
            json!({"layer": "Network", "position": "top", "name": "Web"}),
        );

        AccessSection::new(&api)
            .add("Network", &Position::Top, &object(json!({"name": "Web"})))
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn nat_entries_use_package() {
        let mut api = MockApi::new();
        expect_call(
            &mut api,
            "add-nat-rule",
            json!({"package": "standard", "position": 2, "method": "static"}),
        );
        expect_call(
            &mut api,
            "delete-nat-section",
            json!({"package": "standard", "name": "Outbound"}),
        );
        expect_call(&mut api, "show-nat-rulebase", json!({"package": "standard"}));

        let rules = NatRule::new(&api);
        rules
            .add("standard", &Position::Index(2), &object(json!({"method": "static"})))
            .await
            .unwrap();
        NatSection::new(&api)
            .delete("standard", &ObjectSelector::name("Outbound"), &Payload::new())
            .await
            .unwrap();
        rules.show_rulebase("standard", &Payload::new()).await.unwrap();
    }

    #[tokio::test]
    async fn access_layers() {
        let mut api = MockApi::new();
        expect_call(
            &mut api,
            "add-access-layer",
            json!({"name": "Apps", "applications-and-url-filtering": true}),
        );
        expect_call(&mut api, "show-access-layers", json!({}));

        let layers = AccessLayer::new(&api);
        layers
            .add("Apps", &object(json!({"applications-and-url-filtering": true})))
            .await
            .unwrap();
        layers.show_all(&ShowAllParams::new()).await.unwrap();
    }
}
