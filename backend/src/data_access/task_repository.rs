//! Persistence gateway: the five task operations over an injected store.

use std::sync::Arc;

use uuid::Uuid;

use crate::{
    create_task_request::NewTask,
    data_access::task_store::{StoreError, TaskStore},
    task::{timestamp_now, Task},
    task_list_query::{TaskFilter, TaskPage},
    update_task_request::TaskPatch,
};

#[derive(Clone)]
pub struct TaskRepository {
    store: Arc<dyn TaskStore>,
}

impl TaskRepository {
    pub fn new(store: Arc<dyn TaskStore>) -> Self {
        Self { store }
    }

    /// Store calls may block on disk, so they run off the async workers.
    async fn with_store<T, F>(&self, op: F) -> Result<T, StoreError>
    where
        T: Send + 'static,
        F: FnOnce(&dyn TaskStore) -> Result<T, StoreError> + Send + 'static,
    {
        let store = Arc::clone(&self.store);
        tokio::task::spawn_blocking(move || op(store.as_ref()))
            .await
            .map_err(|e| StoreError::Unavailable(e.to_string()))?
    }

    #[tracing::instrument(skip(self))]
    pub async fn list_all(&self, filter: TaskFilter) -> Result<TaskPage, StoreError> {
        let page = self.with_store(move |store| store.scan(&filter)).await?;
        tracing::debug!(
            returned = page.tasks.len(),
            more = page.next_cursor.is_some(),
            "listed tasks"
        );
        Ok(page)
    }

    #[tracing::instrument(skip(self))]
    pub async fn get_by_id(&self, id: Uuid) -> Result<Option<Task>, StoreError> {
        self.with_store(move |store| store.get(id)).await
    }

    #[tracing::instrument(skip(self, input))]
    pub async fn create(&self, input: NewTask) -> Result<Task, StoreError> {
        let task = Task::new(input, timestamp_now());
        let task = self
            .with_store(move |store| {
                store.put(&task)?;
                Ok(task)
            })
            .await?;
        tracing::info!(task_id = %task.id, "task created");
        Ok(task)
    }

    /// Read, merge the present fields, write back. No version check: the later write wins.
    #[tracing::instrument(skip(self, patch))]
    pub async fn update(&self, id: Uuid, patch: TaskPatch) -> Result<Option<Task>, StoreError> {
        let updated = self
            .with_store(move |store| {
                let Some(current) = store.get(id)? else {
                    return Ok(None);
                };
                let task = current.merge(patch, timestamp_now());
                store.put(&task)?;
                Ok(Some(task))
            })
            .await?;
        if updated.is_some() {
            tracing::info!(task_id = %id, "task updated");
        }
        Ok(updated)
    }

    #[tracing::instrument(skip(self))]
    pub async fn delete(&self, id: Uuid) -> Result<bool, StoreError> {
        let deleted = self.with_store(move |store| store.delete(id)).await?;
        if deleted {
            tracing::info!(task_id = %id, "task deleted");
        }
        Ok(deleted)
    }
}
