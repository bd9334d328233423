//! Waiting on asynchronous server tasks.
//!
//! Some endpoints (`publish`, `install-policy`, `run-script`, ...) answer with a
//! task handle instead of a final result. When task waiting is enabled the
//! client polls `show-task` until every task has left the "in progress" state
//! and returns that final poll as the call's result, so asynchronous and
//! synchronous calls share one return contract.
//!
//! A body carrying a single `task-id` is polled directly. A body carrying a
//! `tasks` collection is polled task by task, then once more for the whole
//! set; the combined poll is what the caller receives.

use crate::client::ManagementClient;
use crate::error::{Error, Result};
use crate::payload::{Payload, PayloadBuilder};
use crate::response::ApiResult;
use crate::types::DetailsLevel;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use tokio::time::sleep;
use tracing::{debug, warn};

/// Endpoint used to query task status.
pub const SHOW_TASK_ENDPOINT: &str = "show-task";

/// Body key carrying a single task identifier.
pub const TASK_ID_KEY: &str = "task-id";

/// Body key carrying a collection of task entries.
pub const TASKS_KEY: &str = "tasks";

/// Status of a server task.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum TaskStatus {
    /// Still running
    InProgress,
    /// Finished successfully
    Succeeded,
    /// Finished with a failure
    Failed,
    /// Finished with some targets failing
    PartiallySucceeded,
    /// Any other value the server reports
    Other(String),
}

impl TaskStatus {
    /// Returns the wire representation.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::InProgress => "in progress",
            Self::Succeeded => "succeeded",
            Self::Failed => "failed",
            Self::PartiallySucceeded => "partially succeeded",
            Self::Other(status) => status,
        }
    }

    /// Whether the task has stopped running.
    #[must_use]
    pub fn is_terminal(&self) -> bool {
        !matches!(self, Self::InProgress)
    }

    /// Whether the task ended in failure or partial success.
    #[must_use]
    pub fn is_failure(&self) -> bool {
        matches!(self, Self::Failed | Self::PartiallySucceeded)
    }
}

impl From<&str> for TaskStatus {
    fn from(status: &str) -> Self {
        match status {
            "in progress" => Self::InProgress,
            "succeeded" => Self::Succeeded,
            "failed" => Self::Failed,
            "partially succeeded" => Self::PartiallySucceeded,
            other => Self::Other(other.to_string()),
        }
    }
}

impl From<String> for TaskStatus {
    fn from(status: String) -> Self {
        Self::from(status.as_str())
    }
}

impl From<TaskStatus> for String {
    fn from(status: TaskStatus) -> Self {
        status.as_str().to_string()
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One entry of a `show-task` response.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "kebab-case")]
pub struct TaskEntry {
    /// Task identifier
    pub task_id: String,
    /// Human readable task name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub task_name: Option<String>,
    /// Current status
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<TaskStatus>,
    /// Completion percentage
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub progress_percentage: Option<u8>,
}

/// Task handles found in a response body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskMarker {
    /// A single `task-id`
    Single(String),
    /// A `tasks` collection
    Batch(Vec<String>),
}

impl TaskMarker {
    /// Inspect a response body for task handles.
    #[must_use]
    pub fn detect(body: &Payload) -> Option<Self> {
        if let Some(task_id) = body.get(TASK_ID_KEY) {
            let id = match task_id {
                Value::String(id) => id.clone(),
                other => other.to_string(),
            };
            return Some(Self::Single(id));
        }

        let ids: Vec<String> = body
            .get(TASKS_KEY)?
            .as_array()?
            .iter()
            .filter_map(|entry| entry.get(TASK_ID_KEY))
            .filter_map(Value::as_str)
            .map(str::to_string)
            .collect();

        if ids.is_empty() {
            None
        } else {
            Some(Self::Batch(ids))
        }
    }
}

/// Decode the task entries of a `show-task` body.
///
/// Entries that do not carry a `task-id` are skipped.
#[must_use]
pub fn task_entries(body: &Payload) -> Vec<TaskEntry> {
    body.get(TASKS_KEY)
        .and_then(Value::as_array)
        .map(|entries| {
            entries
                .iter()
                .filter_map(|entry| serde_json::from_value(entry.clone()).ok())
                .collect()
        })
        .unwrap_or_default()
}

fn entry_statuses(body: &Payload) -> impl Iterator<Item = Option<TaskStatus>> + '_ {
    body.get(TASKS_KEY)
        .and_then(Value::as_array)
        .into_iter()
        .flatten()
        .map(|entry| {
            entry
                .get("status")
                .and_then(Value::as_str)
                .map(TaskStatus::from)
        })
}

/// Whether every task in a `show-task` body has left "in progress".
#[must_use]
pub fn all_tasks_finished(body: &Payload) -> bool {
    entry_statuses(body).all(|status| !matches!(status, Some(TaskStatus::InProgress)))
}

/// Mark `result` failed when any task failed or partially succeeded.
#[must_use]
pub fn evaluate_tasks(mut result: ApiResult) -> ApiResult {
    let failed = entry_statuses(result.body()).any(|status| status.is_some_and(|s| s.is_failure()));
    if failed {
        result.mark_task_failure();
    }
    result
}

impl ManagementClient {
    /// Show the status of one or more tasks.
    ///
    /// `task_id` may be a single identifier or an array of them.
    pub async fn show_task(
        &self,
        task_id: impl Into<Value>,
        details_level: Option<DetailsLevel>,
    ) -> Result<ApiResult> {
        let payload = PayloadBuilder::new()
            .field(TASK_ID_KEY, task_id)
            .opt("details-level", details_level)
            .build();
        self.http_post(SHOW_TASK_ENDPOINT, true, &payload).await
    }

    /// Replace a response that names tasks with their final status.
    pub(crate) async fn resolve_tasks(&self, result: ApiResult) -> Result<ApiResult> {
        match TaskMarker::detect(result.body()) {
            Some(TaskMarker::Single(task_id)) => self.wait_for_task(&task_id).await,
            Some(TaskMarker::Batch(task_ids)) => self.wait_for_tasks(&task_ids).await,
            None => Ok(result),
        }
    }

    /// Poll a single task until it finishes and evaluate the outcome.
    ///
    /// # Errors
    ///
    /// Returns [`Error::WaitOnTask`] when a poll does not answer 200, or when
    /// the configured poll limit is reached.
    pub async fn wait_for_task(&self, task_id: &str) -> Result<ApiResult> {
        self.poll_until_finished(Value::String(task_id.to_string()), task_id)
            .await
    }

    /// Wait for each task in turn, then poll all of them together.
    ///
    /// The combined poll is the returned result.
    pub async fn wait_for_tasks(&self, task_ids: &[String]) -> Result<ApiResult> {
        for task_id in task_ids {
            let individual = self.wait_for_task(task_id).await?;
            debug!(task_id = %task_id, success = individual.success(), "Task finished");
        }

        let ids = task_ids.iter().cloned().map(Value::String).collect();
        self.poll_until_finished(Value::Array(ids), &task_ids.join(","))
            .await
    }

    async fn poll_until_finished(&self, task_id: Value, label: &str) -> Result<ApiResult> {
        let payload = PayloadBuilder::new()
            .field(TASK_ID_KEY, task_id)
            .field("details-level", DetailsLevel::Full)
            .build();
        let interval = self.config.task_poll_interval();
        let mut polls: u32 = 0;

        loop {
            let result = self.post(SHOW_TASK_ENDPOINT, true, &payload).await?;
            polls += 1;

            if result.status_code() != 200 {
                return Err(Error::WaitOnTask {
                    status: result.status_code(),
                    message: format!(
                        "show-task for `{label}` returned {}: {}",
                        result.status_code(),
                        result.message().unwrap_or("no message")
                    ),
                });
            }

            if all_tasks_finished(result.body()) {
                let result = evaluate_tasks(result);
                if !result.success() {
                    warn!(task_id = %label, "At least one task failed or partially succeeded");
                }
                return Ok(result);
            }

            if let Some(max_polls) = self.config.task_max_polls {
                if polls >= max_polls {
                    return Err(Error::WaitOnTask {
                        status: result.status_code(),
                        message: format!("gave up on `{label}` after {polls} polls"),
                    });
                }
            }

            debug!(task_id = %label, polls, "Task still in progress, waiting {:?}", interval);
            sleep(interval).await;
        }
    }
}
