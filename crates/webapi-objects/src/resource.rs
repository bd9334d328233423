//! The generic object adapter.
//!
//! Every management object type exposes the same endpoint family
//! (`add-<type>`, `show-<type>`, `set-<type>`, `delete-<type>`,
//! `show-<types>`). A [`ResourceKind`] names that family and a [`Resource`]
//! builds the payloads and dispatches them through an [`ApiCall`].

use crate::Result;
use serde_json::{json, Value};
use webapi_core::{ApiCall, ApiResult, DetailsLevel, Payload, PayloadBuilder};

/// Endpoint naming for one object type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResourceKind {
    /// Singular endpoint suffix (`host`)
    pub singular: &'static str,
    /// Plural endpoint suffix used by `show_all` (`hosts`)
    pub plural: &'static str,
}

impl ResourceKind {
    /// Describe an object type by its endpoint suffixes.
    #[must_use]
    pub const fn new(singular: &'static str, plural: &'static str) -> Self {
        Self { singular, plural }
    }

    /// `<verb>-<singular>`
    #[must_use]
    pub fn endpoint(&self, verb: &str) -> String {
        format!("{verb}-{}", self.singular)
    }

    /// `show-<plural>`
    #[must_use]
    pub fn list_endpoint(&self) -> String {
        format!("show-{}", self.plural)
    }
}

/// Identifies an existing object by name, uid, or both.
///
/// Empty strings are treated as absent.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ObjectSelector {
    name: Option<String>,
    uid: Option<String>,
}

impl ObjectSelector {
    /// Select by name.
    #[must_use]
    pub fn name(name: impl Into<String>) -> Self {
        Self::default().with_name(name)
    }

    /// Select by uid.
    #[must_use]
    pub fn uid(uid: impl Into<String>) -> Self {
        Self::default().with_uid(uid)
    }

    /// Select nothing; the request relies on extra parameters instead.
    #[must_use]
    pub fn none() -> Self {
        Self::default()
    }

    /// Add a name.
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into()).filter(|n: &String| !n.is_empty());
        self
    }

    /// Add a uid.
    #[must_use]
    pub fn with_uid(mut self, uid: impl Into<String>) -> Self {
        self.uid = Some(uid.into()).filter(|u: &String| !u.is_empty());
        self
    }

    /// Whether neither name nor uid is set.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.uid.is_none()
    }

    pub(crate) fn apply(&self, builder: PayloadBuilder) -> PayloadBuilder {
        builder
            .opt("name", self.name.as_deref())
            .opt("uid", self.uid.as_deref())
    }
}

/// Sort direction for `show_all`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OrderBy {
    /// Ascending by field
    Asc(String),
    /// Descending by field
    Desc(String),
}

impl From<&OrderBy> for Value {
    fn from(order: &OrderBy) -> Self {
        match order {
            OrderBy::Asc(field) => json!({ "ASC": field }),
            OrderBy::Desc(field) => json!({ "DESC": field }),
        }
    }
}

/// Pagination and verbosity for `show_all`.
///
/// Anything left unset is omitted from the request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ShowAllParams {
    /// Maximum number of objects (server allows 1 to 500)
    pub limit: Option<u32>,
    /// Number of objects to skip
    pub offset: Option<u32>,
    /// Sort order
    pub order: Vec<OrderBy>,
    /// Verbosity of each object
    pub details_level: Option<DetailsLevel>,
}

impl ShowAllParams {
    /// Empty parameter set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the page size.
    #[must_use]
    pub const fn with_limit(mut self, limit: u32) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Set the page offset.
    #[must_use]
    pub const fn with_offset(mut self, offset: u32) -> Self {
        self.offset = Some(offset);
        self
    }

    /// Append a sort key.
    #[must_use]
    pub fn with_order(mut self, order: OrderBy) -> Self {
        self.order.push(order);
        self
    }

    /// Set the details level.
    #[must_use]
    pub const fn with_details_level(mut self, level: DetailsLevel) -> Self {
        self.details_level = Some(level);
        self
    }

    pub(crate) fn to_payload(&self) -> Payload {
        let order = if self.order.is_empty() {
            None
        } else {
            Some(Value::Array(self.order.iter().map(Value::from).collect()))
        };

        PayloadBuilder::new()
            .opt("limit", self.limit)
            .opt("offset", self.offset)
            .opt("order", order)
            .opt("details-level", self.details_level)
            .build()
    }
}

/// Generic CRUD adapter for one object type.
pub struct Resource<'a, C: ?Sized> {
    client: &'a C,
    kind: ResourceKind,
}

impl<'a, C> Resource<'a, C>
where
    C: ApiCall + ?Sized,
{
    /// Bind an object type to a client.
    #[must_use]
    pub const fn new(client: &'a C, kind: ResourceKind) -> Self {
        Self { client, kind }
    }

    /// The object type this adapter serves.
    #[must_use]
    pub const fn kind(&self) -> ResourceKind {
        self.kind
    }

    /// `add-<type>` with seeded fields; `extra` wins on collision.
    pub async fn add(&self, seed: PayloadBuilder, extra: &Payload) -> Result<ApiResult> {
        let payload = seed.merge(extra).build();
        self.client.call(&self.kind.endpoint("add"), &payload).await
    }

    /// `show-<type>` for the selected object.
    pub async fn show(
        &self,
        selector: &ObjectSelector,
        details_level: Option<DetailsLevel>,
    ) -> Result<ApiResult> {
        self.show_with(selector, details_level, &Payload::new())
            .await
    }

    /// `show-<type>` with additional lookup parameters.
    pub async fn show_with(
        &self,
        selector: &ObjectSelector,
        details_level: Option<DetailsLevel>,
        extra: &Payload,
    ) -> Result<ApiResult> {
        let payload = selector
            .apply(PayloadBuilder::new())
            .opt("details-level", details_level)
            .merge(extra)
            .build();
        self.client.call(&self.kind.endpoint("show"), &payload).await
    }

    /// `set-<type>` for the selected object.
    pub async fn set(&self, selector: &ObjectSelector, extra: &Payload) -> Result<ApiResult> {
        let payload = selector.apply(PayloadBuilder::new()).merge(extra).build();
        self.client.call(&self.kind.endpoint("set"), &payload).await
    }

    /// `delete-<type>` for the selected object.
    pub async fn delete(&self, selector: &ObjectSelector, extra: &Payload) -> Result<ApiResult> {
        let payload = selector.apply(PayloadBuilder::new()).merge(extra).build();
        self.client.call(&self.kind.endpoint("delete"), &payload).await
    }

    /// `show-<types>` with pagination.
    pub async fn show_all(&self, params: &ShowAllParams) -> Result<ApiResult> {
        self.client
            .call(&self.kind.list_endpoint(), &params.to_payload())
            .await
    }
}

/// Generate a typed adapter delegating the uniform operations to [`Resource`].
///
/// Type-specific `add` methods are written next to each invocation.
macro_rules! object_adapter {
    ($(#[$meta:meta])* $name:ident, $singular:expr, $plural:expr) => {
        $(#[$meta])*
        pub struct $name<'a, C: ?Sized> {
            resource: $crate::resource::Resource<'a, C>,
        }

        impl<'a, C> $name<'a, C>
        where
            C: webapi_core::ApiCall + ?Sized,
        {
            /// Endpoint naming for this object type.
            pub const KIND: $crate::resource::ResourceKind =
                $crate::resource::ResourceKind::new($singular, $plural);

            /// Bind the adapter to a client.
            #[must_use]
            pub const fn new(client: &'a C) -> Self {
                Self {
                    resource: $crate::resource::Resource::new(client, Self::KIND),
                }
            }

            /// Show an existing object.
            pub async fn show(
                &self,
                selector: &$crate::resource::ObjectSelector,
                details_level: Option<webapi_core::DetailsLevel>,
            ) -> $crate::Result<webapi_core::ApiResult> {
                self.resource.show(selector, details_level).await
            }

            /// Change an existing object.
            pub async fn set(
                &self,
                selector: &$crate::resource::ObjectSelector,
                extra: &webapi_core::Payload,
            ) -> $crate::Result<webapi_core::ApiResult> {
                self.resource.set(selector, extra).await
            }

            /// Delete an existing object.
            pub async fn delete(
                &self,
                selector: &$crate::resource::ObjectSelector,
                extra: &webapi_core::Payload,
            ) -> $crate::Result<webapi_core::ApiResult> {
                self.resource.delete(selector, extra).await
            }

            /// List objects of this type.
            pub async fn show_all(
                &self,
                params: &$crate::resource::ShowAllParams,
            ) -> $crate::Result<webapi_core::ApiResult> {
                self.resource.show_all(params).await
            }
        }
    };
}

pub(crate) use object_adapter;
