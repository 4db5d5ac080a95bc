use serde::Deserialize;
use uuid::Uuid;

use crate::{task::Task, task_status::TaskStatus};

/// Query string exactly as received, before validation.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawTaskQuery {
    pub status: Option<String>,
    pub limit: Option<String>,
    pub cursor: Option<String>,
}

/// Validated listing request.
///
/// Listing walks the store in primary-key order. At most `limit` tasks are
/// returned per call, starting strictly after `cursor`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TaskFilter {
    pub status: Option<TaskStatus>,
    pub limit: usize,
    pub cursor: Option<Uuid>,
}

impl TaskFilter {
    pub fn all(limit: usize) -> Self {
        Self { status: None, limit, cursor: None }
    }

    pub fn with_status(limit: usize, status: TaskStatus) -> Self {
        Self { status: Some(status), limit, cursor: None }
    }

    pub fn matches(&self, task: &Task) -> bool {
        self.status.map_or(true, |status| task.status == status)
    }
}

/// One window of a listing. `next_cursor` is set when more matching tasks remain.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskPage {
    pub tasks: Vec<Task>,
    pub next_cursor: Option<Uuid>,
}
