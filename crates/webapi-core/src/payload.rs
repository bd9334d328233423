//! Request payload helpers.
//!
//! Every Web API call carries a JSON object. [`PayloadBuilder`] assembles one
//! from required and optional values so adapters never have to repeat the
//! "insert only when provided" checks, and [`merge_payloads`] layers caller
//! supplied parameters over seeded fields.

use serde_json::{Map, Value};

/// JSON object sent as the body of a Web API call.
pub type Payload = Map<String, Value>;

/// Merge two payloads into a new one.
///
/// Keys present in both take the value from `overrides`. Neither input is
/// modified.
#[must_use]
pub fn merge_payloads(base: &Payload, overrides: &Payload) -> Payload {
    let mut merged = base.clone();
    for (key, value) in overrides {
        merged.insert(key.clone(), value.clone());
    }
    merged
}

/// Builder for assembling request payloads.
#[derive(Debug, Default, Clone)]
pub struct PayloadBuilder {
    fields: Payload,
}

impl PayloadBuilder {
    /// Create a new, empty builder.
    #[must_use]
    pub fn new() -> Self {
        Self {
            fields: Map::new(),
        }
    }

    /// Insert a required key/value pair.
    #[must_use]
    pub fn field<T>(mut self, key: &str, value: T) -> Self
    where
        T: Into<Value>,
    {
        self.fields.insert(key.to_string(), value.into());
        self
    }

    /// Insert a key/value pair when the value is present.
    #[must_use]
    pub fn opt<T>(mut self, key: &str, value: Option<T>) -> Self
    where
        T: Into<Value>,
    {
        if let Some(value) = value {
            self.fields.insert(key.to_string(), value.into());
        }
        self
    }

    /// Insert a string value unless it is empty.
    #[must_use]
    pub fn non_empty(mut self, key: &str, value: &str) -> Self {
        if !value.is_empty() {
            self.fields
                .insert(key.to_string(), Value::String(value.to_string()));
        }
        self
    }

    /// Layer extra parameters over the collected fields.
    #[must_use]
    pub fn merge(self, extra: &Payload) -> Self {
        Self {
            fields: merge_payloads(&self.fields, extra),
        }
    }

    /// Return the collected payload.
    #[must_use]
    pub fn build(self) -> Payload {
        self.fields
    }
}
