//! Read-side projections served by the HTTP listings.
//!
//! Both listings are built from one store snapshot, so a task shown as
//! assigned always carries the team it went to.

use std::collections::HashMap;

use serde::Serialize;

use fieldgrid_state::{RecordStore, ResourceId, StateResult, TaskId, TaskStatus};

/// A task with the team and ETA of its most recent assignment.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct TaskView {
    pub id: TaskId,
    pub title: String,
    pub urgency: i64,
    pub status: TaskStatus,
    pub resource: Option<String>,
    pub eta: Option<u32>,
}

/// A team with its current load.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ResourceView {
    pub id: ResourceId,
    pub name: String,
    pub capacity: u32,
    pub current_load: u32,
}

/// All tasks in identity order.
pub fn task_views<S: RecordStore + ?Sized>(store: &S) -> StateResult<Vec<TaskView>> {
    let snapshot = store.snapshot()?;
    let names: HashMap<ResourceId, &str> = snapshot
        .resources
        .iter()
        .map(|r| (r.id, r.name.as_str()))
        .collect();
    let latest = snapshot.latest_assignments();

    Ok(snapshot
        .tasks
        .iter()
        .map(|task| {
            let assignment = latest.get(&task.id);
            TaskView {
                id: task.id,
                title: task.title.clone(),
                urgency: task.urgency,
                status: task.status,
                resource: assignment
                    .and_then(|a| names.get(&a.resource_id))
                    .map(|name| name.to_string()),
                eta: assignment.map(|a| a.eta_minutes),
            }
        })
        .collect())
}

/// All teams in identity order.
pub fn resource_views<S: RecordStore + ?Sized>(store: &S) -> StateResult<Vec<ResourceView>> {
    let snapshot = store.snapshot()?;
    let loads = snapshot.loads();
    Ok(snapshot
        .resources
        .into_iter()
        .map(|r| ResourceView {
            current_load: loads.get(&r.id).copied().unwrap_or(0),
            id: r.id,
            name: r.name,
            capacity: r.capacity,
        })
        .collect())
}
