use std::{collections::BTreeMap, ops::Bound, sync::RwLock};

use uuid::Uuid;

use crate::{
    data_access::task_store::{StoreError, TaskStore},
    task::Task,
    task_list_query::{TaskFilter, TaskPage},
};

/// In-process store with the same key order as the redb table.
#[derive(Default)]
pub struct MemoryStore {
    tasks: RwLock<BTreeMap<Uuid, Task>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn poisoned<T>(_: T) -> StoreError {
    StoreError::Unavailable("memory store lock poisoned".to_string())
}

impl TaskStore for MemoryStore {
    fn get(&self, id: Uuid) -> Result<Option<Task>, StoreError> {
        let tasks = self.tasks.read().map_err(poisoned)?;
        Ok(tasks.get(&id).cloned())
    }

    fn put(&self, task: &Task) -> Result<(), StoreError> {
        let mut tasks = self.tasks.write().map_err(poisoned)?;
        tasks.insert(task.id, task.clone());
        Ok(())
    }

    fn delete(&self, id: Uuid) -> Result<bool, StoreError> {
        let mut tasks = self.tasks.write().map_err(poisoned)?;
        Ok(tasks.remove(&id).is_some())
    }

    fn scan(&self, filter: &TaskFilter) -> Result<TaskPage, StoreError> {
        let tasks = self.tasks.read().map_err(poisoned)?;
        let lower = filter.cursor.map_or(Bound::Unbounded, Bound::Excluded);

        let mut matching = tasks
            .range((lower, Bound::Unbounded))
            .map(|(_, task)| task)
            .filter(|task| filter.matches(task));

        let page: Vec<Task> = matching.by_ref().take(filter.limit).cloned().collect();
        let next_cursor = match matching.next() {
            Some(_) => page.last().map(|t| t.id),
            None => None,
        };
        Ok(TaskPage { tasks: page, next_cursor })
    }
}
