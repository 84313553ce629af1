//! StateStore — redb-backed record persistence for FieldGrid.
//!
//! Provides typed create/read operations over resources, tasks, and the
//! assignment log. All values are JSON-serialized into redb's `&[u8]` value
//! columns. The store supports both on-disk and in-memory backends (the
//! latter for testing).

use std::path::Path;
use std::sync::Arc;

use redb::{Database, ReadTransaction, ReadableDatabase, ReadableTable, TableDefinition};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::error::{StateError, StateResult};
use crate::repository::{RecordStore, Snapshot};
use crate::tables::*;
use crate::types::*;

/// Convert any `Display` error into a `StateError` variant via a closure factory.
macro_rules! map_err {
    ($variant:ident) => {
        |e| StateError::$variant(e.to_string())
    };
}

type RecordTable = TableDefinition<'static, u64, &'static [u8]>;

/// Thread-safe record store backed by redb.
#[derive(Clone)]
pub struct StateStore {
    db: Arc<Database>,
}

impl StateStore {
    /// Open (or create) a persistent store at the given path.
    pub fn open(path: &Path) -> StateResult<Self> {
        let db = Database::create(path).map_err(map_err!(Open))?;
        let store = Self { db: Arc::new(db) };
        store.ensure_tables()?;
        debug!(?path, "state store opened");
        Ok(store)
    }

    /// Create an ephemeral in-memory store (for testing).
    pub fn open_in_memory() -> StateResult<Self> {
        let backend = redb::backends::InMemoryBackend::new();
        let db = Database::builder()
            .create_with_backend(backend)
            .map_err(map_err!(Open))?;
        let store = Self { db: Arc::new(db) };
        store.ensure_tables()?;
        debug!("in-memory state store opened");
        Ok(store)
    }

    /// Create all tables if they don't exist yet.
    fn ensure_tables(&self) -> StateResult<()> {
        let txn = self.db.begin_write().map_err(map_err!(Transaction))?;
        // Opening a table in a write transaction creates it if absent.
        txn.open_table(RESOURCES).map_err(map_err!(Table))?;
        txn.open_table(TASKS).map_err(map_err!(Table))?;
        txn.open_table(ASSIGNMENTS).map_err(map_err!(Table))?;
        txn.open_table(ASSIGNMENTS_BY_RESOURCE)
            .map_err(map_err!(Table))?;
        txn.commit().map_err(map_err!(Transaction))?;
        Ok(())
    }

    // ── Generic record access ──────────────────────────────────────

    /// Store a new record under the next free identity.
    fn append<T: Serialize>(&self, def: RecordTable, build: impl FnOnce(u64) -> T) -> StateResult<T> {
        let txn = self.db.begin_write().map_err(map_err!(Transaction))?;
        let record;
        {
            let mut table = txn.open_table(def).map_err(map_err!(Table))?;
            let id = next_id(&table)?;
            record = build(id);
            let value = serde_json::to_vec(&record).map_err(map_err!(Serialize))?;
            table
                .insert(id, value.as_slice())
                .map_err(map_err!(Write))?;
        }
        txn.commit().map_err(map_err!(Transaction))?;
        Ok(record)
    }

    fn get_record<T: DeserializeOwned>(&self, def: RecordTable, id: u64) -> StateResult<Option<T>> {
        let txn = self.db.begin_read().map_err(map_err!(Transaction))?;
        let table = txn.open_table(def).map_err(map_err!(Table))?;
        match table.get(id).map_err(map_err!(Read))? {
            Some(guard) => {
                let record: T =
                    serde_json::from_slice(guard.value()).map_err(map_err!(Deserialize))?;
                Ok(Some(record))
            }
            None => Ok(None),
        }
    }

    fn list_records<T: DeserializeOwned>(&self, def: RecordTable) -> StateResult<Vec<T>> {
        let txn = self.db.begin_read().map_err(map_err!(Transaction))?;
        read_all(&txn, def)
    }

    // ── Resources ──────────────────────────────────────────────────

    /// Insert a resource and return it with its identity.
    pub fn insert_resource(&self, new: NewResource) -> StateResult<Resource> {
        let resource = self.append(RESOURCES, |id| Resource {
            id,
            name: new.name,
            kind: new.kind,
            location: new.location,
            capacity: new.capacity,
        })?;
        debug!(id = resource.id, name = %resource.name, "resource stored");
        Ok(resource)
    }

    /// True if at least one resource exists.
    pub fn has_resources(&self) -> StateResult<bool> {
        let txn = self.db.begin_read().map_err(map_err!(Transaction))?;
        let table = txn.open_table(RESOURCES).map_err(map_err!(Table))?;
        let any = table.first().map_err(map_err!(Read))?.is_some();
        Ok(any)
    }

    // ── Tasks ──────────────────────────────────────────────────────

    /// Get a task by ID.
    pub fn get_task(&self, id: TaskId) -> StateResult<Option<Task>> {
        self.get_record(TASKS, id)
    }
}

impl RecordStore for StateStore {
    fn insert_task(&self, new: NewTask, created_at: u64) -> StateResult<Task> {
        let task = self.append(TASKS, |id| Task {
            id,
            title: new.title,
            description: new.description,
            location: new.location,
            urgency: new.urgency,
            status: TaskStatus::Pending,
            created_at,
        })?;
        debug!(id = task.id, urgency = task.urgency, "task stored");
        Ok(task)
    }

    fn snapshot(&self) -> StateResult<Snapshot> {
        let txn = self.db.begin_read().map_err(map_err!(Transaction))?;
        Ok(Snapshot {
            resources: read_all(&txn, RESOURCES)?,
            tasks: read_all(&txn, TASKS)?,
            assignments: read_all(&txn, ASSIGNMENTS)?,
        })
    }

    fn list_pending_tasks(&self) -> StateResult<Vec<Task>> {
        let tasks: Vec<Task> = self.list_records(TASKS)?;
        Ok(tasks
            .into_iter()
            .filter(|t| t.status == TaskStatus::Pending)
            .collect())
    }

    fn list_resources(&self) -> StateResult<Vec<Resource>> {
        self.list_records(RESOURCES)
    }

    fn count_assignments_for_resource(&self, resource_id: ResourceId) -> StateResult<u32> {
        let txn = self.db.begin_read().map_err(map_err!(Transaction))?;
        let index = txn
            .open_table(ASSIGNMENTS_BY_RESOURCE)
            .map_err(map_err!(Table))?;
        let mut count = 0u32;
        for entry in index
            .range((resource_id, 0)..=(resource_id, u64::MAX))
            .map_err(map_err!(Read))?
        {
            entry.map_err(map_err!(Read))?;
            count += 1;
        }
        Ok(count)
    }

    fn commit_assignment(
        &self,
        task_id: TaskId,
        resource_id: ResourceId,
        eta_minutes: u32,
        assigned_at: u64,
    ) -> StateResult<Assignment> {
        let txn = self.db.begin_write().map_err(map_err!(Transaction))?;
        let assignment;
        {
            // Returning early drops `txn`, which aborts it.
            let mut tasks = txn.open_table(TASKS).map_err(map_err!(Table))?;
            let mut task: Task = match tasks.get(task_id).map_err(map_err!(Read))? {
                Some(guard) => {
                    serde_json::from_slice(guard.value()).map_err(map_err!(Deserialize))?
                }
                None => return Err(StateError::NotFound(format!("task {task_id}"))),
            };
            if task.status != TaskStatus::Pending {
                return Err(StateError::Conflict(format!(
                    "task {task_id} is already {}",
                    task.status.as_str()
                )));
            }

            let resources = txn.open_table(RESOURCES).map_err(map_err!(Table))?;
            if resources.get(resource_id).map_err(map_err!(Read))?.is_none() {
                return Err(StateError::NotFound(format!("resource {resource_id}")));
            }

            let mut log = txn.open_table(ASSIGNMENTS).map_err(map_err!(Table))?;
            let id = next_id(&log)?;
            assignment = Assignment {
                id,
                task_id,
                resource_id,
                eta_minutes,
                assigned_at,
            };
            let value = serde_json::to_vec(&assignment).map_err(map_err!(Serialize))?;
            log.insert(id, value.as_slice()).map_err(map_err!(Write))?;

            let mut index = txn
                .open_table(ASSIGNMENTS_BY_RESOURCE)
                .map_err(map_err!(Table))?;
            index
                .insert((resource_id, id), ())
                .map_err(map_err!(Write))?;

            task.status = TaskStatus::Assigned;
            let value = serde_json::to_vec(&task).map_err(map_err!(Serialize))?;
            tasks
                .insert(task_id, value.as_slice())
                .map_err(map_err!(Write))?;
        }
        txn.commit().map_err(map_err!(Transaction))?;
        debug!(
            assignment = assignment.id,
            task = task_id,
            resource = resource_id,
            eta_minutes,
            "assignment committed"
        );
        Ok(assignment)
    }
}

/// Decode every record of a table in identity order.
fn read_all<T: DeserializeOwned>(txn: &ReadTransaction, def: RecordTable) -> StateResult<Vec<T>> {
    let table = txn.open_table(def).map_err(map_err!(Table))?;
    let mut results = Vec::new();
    for entry in table.iter().map_err(map_err!(Read))? {
        let (_, value) = entry.map_err(map_err!(Read))?;
        let record: T = serde_json::from_slice(value.value()).map_err(map_err!(Deserialize))?;
        results.push(record);
    }
    Ok(results)
}

/// Next identity for a record table: one past the highest key.
fn next_id(table: &impl ReadableTable<u64, &'static [u8]>) -> StateResult<u64> {
    let last = table
        .last()
        .map_err(map_err!(Read))?
        .map(|(key, _)| key.value());
    Ok(last.unwrap_or(0) + 1)
}
