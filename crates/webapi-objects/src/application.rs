//! Application control objects: sites, categories and site groups.

use crate::resource::{object_adapter, ObjectSelector};
use crate::Result;
use serde_json::Value;
use webapi_core::{ApiCall, ApiResult, DetailsLevel, Payload, PayloadBuilder};

fn string_list(values: &[String]) -> Option<Value> {
    if values.is_empty() {
        None
    } else {
        Some(Value::from(values.to_vec()))
    }
}

object_adapter!(
    /// Custom application sites.
    ApplicationSite,
    "application-site",
    "application-sites"
);

impl<C> ApplicationSite<'_, C>
where
    C: ApiCall + ?Sized,
{
    /// Add an application site matched by URL or by signature.
    ///
    /// Empty lists are left out of the request.
    pub async fn add(
        &self,
        name: &str,
        url_list: &[String],
        application_signatures: &[String],
        extra: &Payload,
    ) -> Result<ApiResult> {
        let seed = PayloadBuilder::new()
            .field("name", name)
            .opt("url-list", string_list(url_list))
            .opt("application-signature", string_list(application_signatures));
        self.resource.add(seed, extra).await
    }

    /// Show an application site by its numeric application ID.
    pub async fn show_by_application_id(
        &self,
        application_id: u64,
        details_level: Option<DetailsLevel>,
    ) -> Result<ApiResult> {
        let lookup = PayloadBuilder::new()
            .field("application-id", application_id)
            .build();
        self.resource
            .show_with(&ObjectSelector::none(), details_level, &lookup)
            .await
    }
}

object_adapter!(
    /// Application site categories.
    ApplicationSiteCategory,
    "application-site-category",
    "application-site-categories"
);

impl<C> ApplicationSiteCategory<'_, C>
where
    C: ApiCall + ?Sized,
{
    /// Add a category.
    pub async fn add(&self, name: &str, extra: &Payload) -> Result<ApiResult> {
        self.resource
            .add(PayloadBuilder::new().field("name", name), extra)
            .await
    }
}

object_adapter!(
    /// Groups of application sites and categories.
    ApplicationSiteGroup,
    "application-site-group",
    "application-site-groups"
);

impl<C> ApplicationSiteGroup<'_, C>
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

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resource::ShowAllParams;
    use crate::testing::{expect_call, object, MockApi};
    use serde_json::json;

    #[tokio::test]
    async fn site_add_with_urls() {
        let mut api = MockApi::new();
        expect_call(
            &mut api,
            "add-application-site",
            json!({
                "name": "intranet",
                "url-list": ["intra.example.com", "wiki.example.com"],
                "primary-category": "Business Application"
            }),
        );

        ApplicationSite::new(&api)
            .add(
                "intranet",
                &["intra.example.com".into(), "wiki.example.com".into()],
                &[],
                &object(json!({"primary-category": "Business Application"})),
            )
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn site_add_with_signature_only() {
        let mut api = MockApi::new();
        expect_call(
            &mut api,
            "add-application-site",
            json!({"name": "sig-app", "application-signature": ["[sig 1]"]}),
        );

        ApplicationSite::new(&api)
            .add("sig-app", &[], &["[sig 1]".into()], &Payload::new())
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn site_show_by_application_id() {
        let mut api = MockApi::new();
        expect_call(
            &mut api,
            "show-application-site",
            json!({"application-id": 10_417_440, "details-level": "full"}),
        );

        ApplicationSite::new(&api)
            .show_by_application_id(10_417_440, Some(DetailsLevel::Full))
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn categories_and_groups() {
        let mut api = MockApi::new();
        expect_call(
            &mut api,
            "add-application-site-category",
            json!({"name": "internal", "description": "in-house"}),
        );
        expect_call(&mut api, "show-application-site-categories", json!({"limit": 1}));
        expect_call(
            &mut api,
            "set-application-site-group",
            json!({"name": "apps", "members": {"add": "intranet"}}),
        );

        let categories = ApplicationSiteCategory::new(&api);
        categories
            .add("internal", &object(json!({"description": "in-house"})))
            .await
            .unwrap();
        categories
            .show_all(&ShowAllParams::new().with_limit(1))
            .await
            .unwrap();
        ApplicationSiteGroup::new(&api)
            .set(
                &ObjectSelector::name("apps"),
                &object(json!({"members": {"add": "intranet"}})),
            )
            .await
            .unwrap();
    }
}
