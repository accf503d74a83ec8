//! Task records exchanged with the remote to-do service.
//!
//! The service owns and validates tasks; these types only mirror its JSON
//! shape so records can be round-tripped.

use serde::{Deserialize, Serialize};

/// A single to-do item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "TaskRecord")]
pub struct Task {
    /// Server-assigned identifier. Some deployments name this field `_id`.
    pub id: String,
    pub title: String,
    #[serde(rename = "isCompleted")]
    pub is_completed: bool,
}

/// Wire shape of a task. Servers may send `id`, `_id`, or both.
#[derive(Debug, Deserialize)]
struct TaskRecord {
    #[serde(default)]
    id: Option<String>,
    #[serde(rename = "_id", default)]
    underscore_id: Option<String>,
    title: String,
    #[serde(rename = "isCompleted", default)]
    is_completed: bool,
}

impl TryFrom<TaskRecord> for Task {
    type Error = String;

    fn try_from(record: TaskRecord) -> Result<Self, Self::Error> {
        let id = record
            .id
            .or(record.underscore_id)
            .ok_or_else(|| "task record has neither `id` nor `_id`".to_string())?;
        Ok(Self {
            id,
            title: record.title,
            is_completed: record.is_completed,
        })
    }
}

impl Task {
    /// Status marker for list display
    pub fn status_marker(&self) -> &'static str {
        if self.is_completed {
            "[x]"
        } else {
            "[ ]"
        }
    }
}

/// Request body for creating a task.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewTask {
    pub title: String,
    #[serde(rename = "isCompleted")]
    pub is_completed: bool,
}

impl NewTask {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            is_completed: false,
        }
    }
}

/// Partial update for a task. Fields left as `None` are omitted from the body.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TaskPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(rename = "isCompleted", skip_serializing_if = "Option::is_none")]
    pub is_completed: Option<bool>,
}

impl TaskPatch {
    pub fn title(title: impl Into<String>) -> Self {
        Self {
            title: Some(title.into()),
            is_completed: None,
        }
    }

    pub fn completed(done: bool) -> Self {
        Self {
            title: None,
            is_completed: Some(done),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.is_completed.is_none()
    }
}
