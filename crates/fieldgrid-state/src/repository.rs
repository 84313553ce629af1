//! The store interface the dispatcher is written against.

use std::collections::HashMap;

use crate::error::StateResult;
use crate::types::*;

/// Every record as seen by one read transaction.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Snapshot {
    pub resources: Vec<Resource>,
    pub tasks: Vec<Task>,
    pub assignments: Vec<Assignment>,
}

impl Snapshot {
    /// The most recent assignment of each task that has one.
    pub fn latest_assignments(&self) -> HashMap<TaskId, &Assignment> {
        // The log is in identity order, so later entries overwrite earlier ones.
        self.assignments.iter().map(|a| (a.task_id, a)).collect()
    }

    /// Assignment count per resource. Resources with none are absent.
    pub fn loads(&self) -> HashMap<ResourceId, u32> {
        let mut loads = HashMap::new();
        for assignment in &self.assignments {
            *loads.entry(assignment.resource_id).or_insert(0) += 1;
        }
        loads
    }
}

/// Record access needed by the dispatcher.
///
/// Listings are returned in ascending identity order. Reads must reflect
/// every write committed before the call.
pub trait RecordStore: Send + Sync {
    /// Store a new task as `Pending` and return it with its identity.
    fn insert_task(&self, new: NewTask, created_at: u64) -> StateResult<Task>;

    /// Read resources, tasks and the assignment log in one transaction.
    fn snapshot(&self) -> StateResult<Snapshot>;

    /// All tasks whose status is `Pending`.
    fn list_pending_tasks(&self) -> StateResult<Vec<Task>>;

    /// All resources.
    fn list_resources(&self) -> StateResult<Vec<Resource>>;

    /// Number of assignments ever recorded against `resource_id`.
    fn count_assignments_for_resource(&self, resource_id: ResourceId) -> StateResult<u32>;

    /// Append an assignment and mark the task `Assigned` in one transaction.
    ///
    /// Fails with `NotFound` if either record is missing and with `Conflict`
    /// if the task is no longer pending. Nothing is written on failure.
    fn commit_assignment(
        &self,
        task_id: TaskId,
        resource_id: ResourceId,
        eta_minutes: u32,
        assigned_at: u64,
    ) -> StateResult<Assignment>;
}
