//! Policy packages and the install/verify operations.

use crate::resource::object_adapter;
use crate::Result;
use tracing::info;
use webapi_core::{ApiCall, ApiResult, Payload, PayloadBuilder};

object_adapter!(
    /// Policy packages.
    PolicyPackage,
    "package",
    "packages"
);

impl<C> PolicyPackage<'_, C>
where
    C: ApiCall + ?Sized,
{
    /// Add a policy package.
    pub async fn add(&self, name: &str, extra: &Payload) -> Result<ApiResult> {
        self.resource
            .add(PayloadBuilder::new().field("name", name), extra)
            .await
    }
}

/// Parameters of `install-policy`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstallPolicyRequest {
    /// Install the access control policy
    pub access: bool,
    /// Install the threat prevention policy
    pub threat_prevention: bool,
    /// Package to install; the server default when unset
    pub policy_package: Option<String>,
    /// Gateways to install on; the package's targets when empty
    pub targets: Vec<String>,
}

impl Default for InstallPolicyRequest {
    fn default() -> Self {
        Self {
            access: true,
            threat_prevention: true,
            policy_package: None,
            targets: Vec::new(),
        }
    }
}

impl InstallPolicyRequest {
    /// Install both policy types of `package`.
    #[must_use]
    pub fn package(package: impl Into<String>) -> Self {
        Self {
            policy_package: Some(package.into()),
            ..Self::default()
        }
    }

    /// Restrict the installation to these gateways.
    #[must_use]
    pub fn with_targets<I, S>(mut self, targets: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.targets = targets.into_iter().map(Into::into).collect();
        self
    }

    /// Choose which policy types are installed.
    #[must_use]
    pub const fn with_policies(mut self, access: bool, threat_prevention: bool) -> Self {
        self.access = access;
        self.threat_prevention = threat_prevention;
        self
    }

    fn to_payload(&self) -> Payload {
        let targets = if self.targets.is_empty() {
            None
        } else {
            Some(self.targets.clone())
        };

        PayloadBuilder::new()
            .field("access", self.access)
            .field("threat-prevention", self.threat_prevention)
            .opt("policy-package", self.policy_package.as_deref())
            .opt("targets", targets)
            .build()
    }
}

/// Policy installation and verification.
pub struct Policy<'a, C: ?Sized> {
    client: &'a C,
}

impl<'a, C> Policy<'a, C>
where
    C: ApiCall + ?Sized,
{
    /// Bind to a client.
    #[must_use]
    pub const fn new(client: &'a C) -> Self {
        Self { client }
    }

    /// Install policy on gateways.
    ///
    /// Installation runs as a server task; with task waiting enabled the
    /// result is the final task state.
    pub async fn install_policy(&self, request: &InstallPolicyRequest) -> Result<ApiResult> {
        info!(
            package = request.policy_package.as_deref().unwrap_or("<default>"),
            targets = request.targets.len(),
            "Installing policy"
        );
        self.client
            .call("install-policy", &request.to_payload())
            .await
    }

    /// Verify a policy package without installing it.
    pub async fn verify_policy(&self, package: &str) -> Result<ApiResult> {
        let payload = PayloadBuilder::new().field("policy-package", package).build();
        self.client.call("verify-policy", &payload).await
    }
}
