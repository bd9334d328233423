//! Test doubles shared by the adapter tests.

use async_trait::async_trait;
use mockall::mock;
use serde_json::{json, Value};
use webapi_core::{ApiCall, ApiResult, Payload, Result};

mock! {
    pub Api {}

    #[async_trait]
    impl ApiCall for Api {
        async fn call(&self, endpoint: &str, payload: &Payload) -> Result<ApiResult>;
    }
}

pub fn object(value: Value) -> Payload {
    match value {
        Value::Object(map) => map,
        other => panic!("expected object, got {other}"),
    }
}

/// Expect exactly one call to `endpoint` carrying `payload`.
pub fn expect_call(api: &mut MockApi, endpoint: &'static str, payload: Value) {
    api.expect_call()
        .withf(move |called, sent| {
            called.to_string() == endpoint && serde_json::to_value(sent).ok() == Some(payload.clone())
        })
        .times(1)
        .returning(|_, _| Ok(ApiResult::new(200, object(json!({"uid": "generated-uid"})))));
}
