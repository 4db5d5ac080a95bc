//! redb-backed task store: one table, UUID string keys, JSON document values.

use std::{ops::Bound, path::Path, sync::Arc};
#[cfg(feature = "profile")]
use std::time::Instant;

use redb::{Database, ReadableTable, TableDefinition};
use uuid::Uuid;

use crate::{
    data_access::task_store::{StoreError, TaskStore},
    task::Task,
    task_list_query::{TaskFilter, TaskPage},
};

/// Thin handle to the redb file. Cloneable (Arc inside).
#[derive(Clone)]
pub struct DataContext {
    db: Arc<Database>,
    table_name: Arc<str>,
}

impl DataContext {
    /// Open (or create) the database at `path` and make sure the table exists.
    pub fn open(path: impl AsRef<Path>, table_name: &str) -> Result<Self, StoreError> {
        let db = Database::create(path)?;
        let context = DataContext { db: Arc::new(db), table_name: Arc::from(table_name) };

        let txn = context.db.begin_write()?;
        {
            let _ = txn.open_table(context.table())?;
        }
        txn.commit()?;

        Ok(context)
    }

    fn table(&self) -> TableDefinition<'_, &'static str, &'static [u8]> {
        TableDefinition::new(&self.table_name)
    }
}

fn encode(task: &Task) -> Result<Vec<u8>, StoreError> {
    serde_json::to_vec(task).map_err(|e| StoreError::Encode(e.to_string()))
}

fn decode(bytes: &[u8]) -> Result<Task, StoreError> {
    serde_json::from_slice(bytes).map_err(|e| StoreError::Decode(e.to_string()))
}

impl TaskStore for DataContext {
    fn get(&self, id: Uuid) -> Result<Option<Task>, StoreError> {
        let txn = self.db.begin_read()?;
        let table = txn.open_table(self.table())?;

        let key = id.to_string();
        match table.get(key.as_str())? {
            Some(data) => Ok(Some(decode(data.value())?)),
            None => Ok(None),
        }
    }

    fn put(&self, task: &Task) -> Result<(), StoreError> {
        #[cfg(feature = "profile")]
        let started = Instant::now();
        let bytes = encode(task)?;
        let txn = self.db.begin_write()?;
        {
            let mut table = txn.open_table(self.table())?;
            let key = task.id.to_string();
            table.insert(key.as_str(), bytes.as_slice())?;
        }
        txn.commit()?;
        #[cfg(feature = "profile")]
        tracing::debug!(elapsed_us = started.elapsed().as_micros() as u64, "put committed");
        Ok(())
    }

    fn delete(&self, id: Uuid) -> Result<bool, StoreError> {
        let txn = self.db.begin_write()?;
        let deleted;
        {
            let mut table = txn.open_table(self.table())?;
            let key = id.to_string();
            deleted = table.remove(key.as_str())?.is_some();
        }
        txn.commit()?;
        Ok(deleted)
    }

    fn scan(&self, filter: &TaskFilter) -> Result<TaskPage, StoreError> {
        #[cfg(feature = "profile")]
        let started = Instant::now();
        let txn = self.db.begin_read()?;
        let table = txn.open_table(self.table())?;

        let after = filter.cursor.map(|id| id.to_string());
        let lower = match after.as_deref() {
            Some(key) => Bound::Excluded(key),
            None => Bound::Unbounded,
        };

        let mut page = TaskPage::default();
        for entry in table.range::<&str>((lower, Bound::Unbounded))? {
            let (_, value) = entry?;
            let task = decode(value.value())?;
            if !filter.matches(&task) {
                continue;
            }
            if page.tasks.len() == filter.limit {
                page.next_cursor = page.tasks.last().map(|t| t.id);
                break;
            }
            page.tasks.push(task);
        }
        #[cfg(feature = "profile")]
        tracing::debug!(
            elapsed_us = started.elapsed().as_micros() as u64,
            returned = page.tasks.len(),
            "scan finished"
        );
        Ok(page)
    }
}

// redb 2.x has many error types. Blanket them all into StoreError::Redb.
macro_rules! from_redb {
    ($($t:ty),*) => {
        $(impl From<$t> for StoreError {
            fn from(e: $t) -> Self { StoreError::Redb(e.to_string()) }
        })*
    };
}

from_redb!(
    redb::Error,
    redb::DatabaseError,
    redb::TableError,
    redb::TransactionError,
    redb::StorageError,
    redb::CommitError
);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{create_task_request::NewTask, task::timestamp_now, task_status::TaskStatus};
    use std::fs;

    /// Create a temp database file that the test cleans up.
    fn temp_context(name: &str) -> (DataContext, String) {
        let path = format!("/tmp/taskboard_test_{name}_{}.redb", std::process::id());
        let _ = fs::remove_file(&path);
        let context = DataContext::open(&path, "tasks").unwrap();
        (context, path)
    }

    fn cleanup(path: &str) {
        let _ = fs::remove_file(path);
    }

    fn task(title: &str, status: TaskStatus) -> Task {
        Task::new(
            NewTask { title: title.into(), description: None, status: Some(status) },
            timestamp_now(),
        )
    }

    #[test]
    fn put_get_round_trip() {
        let (store, path) = temp_context("round_trip");

        let mut stored = task("Plan sprint", TaskStatus::ToDo);
        stored.description = Some("two weeks".into());
        store.put(&stored).unwrap();

        assert_eq!(store.get(stored.id).unwrap(), Some(stored.clone()));
        assert_eq!(store.get(Uuid::new_v4()).unwrap(), None);

        cleanup(&path);
    }

    #[test]
    fn delete_reports_whether_something_was_removed() {
        let (store, path) = temp_context("delete");

        let stored = task("Doomed", TaskStatus::ToDo);
        store.put(&stored).unwrap();

        assert!(store.delete(stored.id).unwrap());
        assert!(!store.delete(stored.id).unwrap());
        assert_eq!(store.get(stored.id).unwrap(), None);

        cleanup(&path);
    }

    #[test]
    fn survives_reopen() {
        let (store, path) = temp_context("reopen");
        let stored = task("Persist me", TaskStatus::Completed);
        store.put(&stored).unwrap();
        drop(store);

        let reopened = DataContext::open(&path, "tasks").unwrap();
        assert_eq!(reopened.get(stored.id).unwrap(), Some(stored));

        cleanup(&path);
    }

    #[test]
    fn scan_filters_and_pages_in_key_order() {
        let (store, path) = temp_context("scan");

        for i in 0..5 {
            store.put(&task(&format!("todo {i}"), TaskStatus::ToDo)).unwrap();
            store.put(&task(&format!("busy {i}"), TaskStatus::InProgress)).unwrap();
        }

        let everything = store.scan(&TaskFilter::all(100)).unwrap();
        assert_eq!(everything.tasks.len(), 10);
        assert_eq!(everything.next_cursor, None);
        let ids: Vec<String> = everything.tasks.iter().map(|t| t.id.to_string()).collect();
        let mut sorted = ids.clone();
        sorted.sort();
        assert_eq!(ids, sorted);

        let first = store.scan(&TaskFilter::with_status(3, TaskStatus::InProgress)).unwrap();
        assert_eq!(first.tasks.len(), 3);
        assert!(first.tasks.iter().all(|t| t.status == TaskStatus::InProgress));
        let cursor = first.next_cursor.expect("more pages");
        assert_eq!(cursor, first.tasks[2].id);

        let next = TaskFilter {
            cursor: Some(cursor),
            ..TaskFilter::with_status(3, TaskStatus::InProgress)
        };
        let second = store.scan(&next).unwrap();
        assert_eq!(second.tasks.len(), 2);
        assert_eq!(second.next_cursor, None);
        assert!(second.tasks.iter().all(|t| !first.tasks.contains(t)));

        cleanup(&path);
    }
}
