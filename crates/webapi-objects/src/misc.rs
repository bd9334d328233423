//! Gateway-side operations and task lookups.

use crate::Result;
use serde_json::Value;
use tracing::{debug, info};
use webapi_core::{ApiCall, ApiResult, DetailsLevel, Payload, PayloadBuilder};

/// Parameters of `put-file`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PutFileRequest {
    /// File content, sent as is
    pub content: String,
    /// File name on the target
    pub name: Option<String>,
    /// Directory on the target
    pub path: Option<String>,
    /// Gateways receiving the file
    pub targets: Vec<String>,
    /// Free-form comment
    pub comments: Option<String>,
}

impl PutFileRequest {
    /// A file with the given content.
    #[must_use]
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            ..Self::default()
        }
    }

    /// Set the file name.
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Set the target directory.
    #[must_use]
    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        self.path = Some(path.into());
        self
    }

    /// Set the receiving gateways.
    #[must_use]
    pub fn with_targets<I, S>(mut self, targets: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.targets = targets.into_iter().map(Into::into).collect();
        self
    }

    /// Set the comment.
    #[must_use]
    pub fn with_comments(mut self, comments: impl Into<String>) -> Self {
        self.comments = Some(comments.into());
        self
    }

    fn to_payload(&self) -> Payload {
        let targets = if self.targets.is_empty() {
            None
        } else {
            Some(self.targets.clone())
        };

        PayloadBuilder::new()
            .field("file-content", self.content.as_str())
            .opt("file-name", self.name.as_deref().filter(|n| !n.is_empty()))
            .opt("file-path", self.path.as_deref().filter(|p| !p.is_empty()))
            .opt("targets", targets)
            .opt("comments", self.comments.as_deref().filter(|c| !c.is_empty()))
            .build()
    }
}

/// Task lookups, remote scripts and file distribution.
pub struct Misc<'a, C: ?Sized> {
    client: &'a C,
}

impl<'a, C> Misc<'a, C>
where
    C: ApiCall + ?Sized,
{
    /// Bind to a client.
    #[must_use]
    pub const fn new(client: &'a C) -> Self {
        Self { client }
    }

    /// Show one task (a string id) or several (an array of ids).
    ///
    /// `show-task` results are never waited on.
    pub async fn show_task(
        &self,
        task_id: impl Into<Value>,
        details_level: Option<DetailsLevel>,
    ) -> Result<ApiResult> {
        let payload = PayloadBuilder::new()
            .field("task-id", task_id)
            .opt("details-level", details_level)
            .build();
        self.client.call("show-task", &payload).await
    }

    /// Run a script on gateways.
    pub async fn run_script(
        &self,
        script: &str,
        name: &str,
        targets: &[String],
        extra: &Payload,
    ) -> Result<ApiResult> {
        info!(script_name = name, targets = targets.len(), "Running script on gateways");
        let payload = PayloadBuilder::new()
            .field("script", script)
            .field("script-name", name)
            .field("targets", targets.to_vec())
            .merge(extra)
            .build();
        self.client.call("run-script", &payload).await
    }

    /// Copy a file to gateways.
    pub async fn put_file(&self, request: &PutFileRequest) -> Result<ApiResult> {
        debug!(
            file_name = request.name.as_deref().unwrap_or_default(),
            bytes = request.content.len(),
            "Putting file on gateways"
        );
        self.client.call("put-file", &request.to_payload()).await
    }
}
