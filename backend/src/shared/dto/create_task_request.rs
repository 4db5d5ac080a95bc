use serde::Serialize;

use crate::task_status::TaskStatus;

/// Validated create body. Also the payload `TaskClient::create_task` sends.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewTask {
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<TaskStatus>,
}

impl NewTask {
    pub fn titled(title: impl Into<String>) -> Self {
        Self { title: title.into(), description: None, status: None }
    }
}
