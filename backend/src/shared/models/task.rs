use chrono::{DateTime, SubsecRound, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{create_task_request::NewTask, task_status::TaskStatus, update_task_request::TaskPatch};

/// The single persisted entity. Serialized the same way on the wire and in the store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: Uuid,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub status: TaskStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Task {
    pub fn new(input: NewTask, now: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            title: input.title,
            description: input.description,
            status: input.status.unwrap_or_default(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Partial merge: only fields present in `patch` are overwritten.
    pub fn merge(self, patch: TaskPatch, now: DateTime<Utc>) -> Self {
        Self {
            id: self.id,
            title: patch.title.unwrap_or(self.title),
            description: patch.description.or(self.description),
            status: patch.status.unwrap_or(self.status),
            created_at: self.created_at,
            updated_at: now.max(self.updated_at),
        }
    }
}

/// Wall-clock time truncated to milliseconds, matching the ISO-8601 strings clients see.
pub fn timestamp_now() -> DateTime<Utc> {
    Utc::now().trunc_subsecs(3)
}
