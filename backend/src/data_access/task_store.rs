use uuid::Uuid;

use crate::{
    task::Task,
    task_list_query::{TaskFilter, TaskPage},
};

/// Key-value store holding one document per task, keyed by task id.
///
/// Implementations give per-key atomicity for each call and nothing more:
/// there are no multi-call transactions, so read-then-write sequences built
/// on top of this trait are last-writer-wins.
pub trait TaskStore: Send + Sync {
    fn get(&self, id: Uuid) -> Result<Option<Task>, StoreError>;

    /// Insert or overwrite the document stored under `task.id`.
    fn put(&self, task: &Task) -> Result<(), StoreError>;

    /// Returns whether a document was actually removed.
    fn delete(&self, id: Uuid) -> Result<bool, StoreError>;

    /// Walk documents in key order after `filter.cursor`, keeping those that
    /// match `filter.status`, and stop once `filter.limit` are collected.
    fn scan(&self, filter: &TaskFilter) -> Result<TaskPage, StoreError>;
}

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("redb: {0}")]
    Redb(String),
    #[error("decode: {0}")]
    Decode(String),
    #[error("encode: {0}")]
    Encode(String),
    #[error("store unavailable: {0}")]
    Unavailable(String),
}
