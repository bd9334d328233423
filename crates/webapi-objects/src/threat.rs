//! Threat prevention profiles.

use crate::resource::object_adapter;
use crate::Result;
use webapi_core::{ApiCall, ApiResult, Payload, PayloadBuilder};

object_adapter!(
    /// Threat prevention profiles.
    ThreatProfile,
    "threat-profile",
    "threat-profiles"
);

impl<C> ThreatProfile<'_, C>
where
    C: ApiCall + ?Sized,
{
    /// Add a profile.
    pub async fn add(&self, name: &str, extra: &Payload) -> Result<ApiResult> {
        self.resource
            .add(PayloadBuilder::new().field("name", name), extra)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resource::ObjectSelector;
    use crate::testing::{expect_call, object, MockApi};
    use serde_json::json;
    use webapi_core::DetailsLevel;

    #[tokio::test]
    async fn profile_lifecycle() {
        let mut api = MockApi::new();
        expect_call(
            &mut api,
            "add-threat-profile",
            json!({"name": "strict", "active-protections-performance-impact": "high"}),
        );
        expect_call(
            &mut api,
            "show-threat-profile",
            json!({"name": "strict", "details-level": "standard"}),
        );
        expect_call(&mut api, "delete-threat-profile", json!({"uid": "p-uid"}));

        let profiles = ThreatProfile::new(&api);
        profiles
            .add(
                "strict",
                &object(json!({"active-protections-performance-impact": "high"})),
            )
            .await
            .unwrap();
        profiles
            .show(&ObjectSelector::name("strict"), Some(DetailsLevel::Standard))
            .await
            .unwrap();
        profiles
            .delete(&ObjectSelector::uid("p-uid"), &Payload::new())
            .await
            .unwrap();
    }
}
