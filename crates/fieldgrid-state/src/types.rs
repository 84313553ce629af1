//! Domain types for the FieldGrid record store.
//!
//! These types represent the persisted resources, tasks, and assignments.
//! All types are serializable to/from JSON for storage in redb tables.

use serde::{Deserialize, Serialize};

/// Identity of a resource (field team).
pub type ResourceId = u64;

/// Identity of a task.
pub type TaskId = u64;

/// Identity of an assignment.
pub type AssignmentId = u64;

/// A point on the globe in signed decimal degrees.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct Coordinate {
    pub lat: f64,
    pub lon: f64,
}

impl Coordinate {
    pub fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }
}

// ── Resource ──────────────────────────────────────────────────────

/// A capacity-limited mobile team.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Resource {
    pub id: ResourceId,
    pub name: String,
    /// Free-form type tag ("maintenance", "waste", ...).
    #[serde(rename = "type")]
    pub kind: String,
    pub location: Coordinate,
    /// Maximum number of assignments this resource may hold.
    pub capacity: u32,
}

/// Fields of a resource before the store assigns it an identity.
#[derive(Debug, Clone, PartialEq)]
pub struct NewResource {
    pub name: String,
    pub kind: String,
    pub location: Coordinate,
    pub capacity: u32,
}

// ── Task ──────────────────────────────────────────────────────────

/// Lifecycle status of a task. `Pending -> Assigned` is the only transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    Pending,
    Assigned,
}

impl TaskStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskStatus::Pending => "pending",
            TaskStatus::Assigned => "assigned",
        }
    }
}

/// A unit of field work waiting for (or holding) a resource.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Task {
    pub id: TaskId,
    pub title: String,
    pub description: String,
    pub location: Coordinate,
    /// Higher is more urgent.
    pub urgency: i64,
    pub status: TaskStatus,
    /// Unix timestamp (seconds) when the task was created.
    pub created_at: u64,
}

/// Fields of a task supplied by the caller of add-task.
#[derive(Debug, Clone, PartialEq)]
pub struct NewTask {
    pub title: String,
    pub description: String,
    pub location: Coordinate,
    pub urgency: i64,
}

// ── Assignment ────────────────────────────────────────────────────

/// An append-only record binding a task to a resource.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Assignment {
    pub id: AssignmentId,
    pub task_id: TaskId,
    pub resource_id: ResourceId,
    pub eta_minutes: u32,
    /// Unix timestamp (seconds) when the assignment was made.
    pub assigned_at: u64,
}
