//! Assignment engine: one greedy pass over the pending tasks.
//!
//! Tasks are taken in descending urgency (stable, so equal urgencies keep
//! store order). Each task goes to the team with the strictly highest score
//! among those with room; on a tie the team seen first keeps it. Every
//! assignment is committed before the next task is considered, so load
//! counts seen by later tasks include it.

use std::sync::Arc;

use tracing::{debug, info};

use fieldgrid_state::{Clock, RecordStore, Resource, ResourceId, Task, TaskId};

use crate::distance::distance_km;
use crate::error::DispatchResult;
use crate::load::LoadTracker;
use crate::scorer::{ScoringWeights, TravelModel};

/// A task that received a team during a pass.
#[derive(Debug, Clone, PartialEq)]
pub struct AssignmentOutcome {
    pub task_id: TaskId,
    pub resource_id: ResourceId,
    pub task_title: String,
    pub resource_name: String,
    pub eta_minutes: u32,
    pub distance_km: f64,
    pub score: f64,
}

/// The best team found for a task.
struct Candidate<'r> {
    resource: &'r Resource,
    distance_km: f64,
    score: f64,
}

/// Greedy matcher over an injected record store.
pub struct AssignmentEngine<S> {
    store: S,
    weights: ScoringWeights,
    travel: TravelModel,
    clock: Arc<dyn Clock>,
}

impl<S: RecordStore> AssignmentEngine<S> {
    pub fn new(store: S, weights: ScoringWeights, travel: TravelModel, clock: Arc<dyn Clock>) -> Self {
        Self {
            store,
            weights,
            travel,
            clock,
        }
    }

    /// Run one scheduling pass.
    ///
    /// Returns the assignments made, in the order they were made. Tasks no
    /// team has room for stay pending and are left out. A store failure
    /// ends the pass; assignments committed before it remain.
    pub fn run_pass(&self) -> DispatchResult<Vec<AssignmentOutcome>> {
        let mut tasks = self.store.list_pending_tasks()?;
        let resources = self.store.list_resources()?;

        // `sort_by` is stable.
        tasks.sort_by(|a, b| b.urgency.cmp(&a.urgency));

        let loads = LoadTracker::new(&self.store);
        let mut outcomes = Vec::new();

        for task in &tasks {
            let Some(best) = self.select_resource(task, &resources, &loads)? else {
                debug!(task = task.id, urgency = task.urgency, "no resource with room, task deferred");
                continue;
            };

            let eta_minutes = self.travel.eta_minutes(best.distance_km);
            let assignment = self.store.commit_assignment(
                task.id,
                best.resource.id,
                eta_minutes,
                self.clock.now_secs(),
            )?;

            info!(
                task = task.id,
                resource = %best.resource.name,
                assignment = assignment.id,
                eta_minutes,
                score = best.score,
                "task assigned"
            );

            outcomes.push(AssignmentOutcome {
                task_id: task.id,
                resource_id: best.resource.id,
                task_title: task.title.clone(),
                resource_name: best.resource.name.clone(),
                eta_minutes,
                distance_km: best.distance_km,
                score: best.score,
            });
        }

        info!(
            pending = tasks.len(),
            assigned = outcomes.len(),
            deferred = tasks.len() - outcomes.len(),
            "scheduling pass complete"
        );
        Ok(outcomes)
    }

    /// Highest-scoring team with room for `task`, if any.
    fn select_resource<'r>(
        &self,
        task: &Task,
        resources: &'r [Resource],
        loads: &LoadTracker<'_, S>,
    ) -> DispatchResult<Option<Candidate<'r>>> {
        let mut best: Option<Candidate<'r>> = None;

        for resource in resources {
            let Some(load) = loads.load_if_available(resource)? else {
                continue;
            };

            let d = distance_km(task.location, resource.location);
            let score = self.weights.score(task.urgency, d, load, resource.capacity);

            // Strictly greater: the first of equal scores wins.
            if best.as_ref().is_none_or(|b| score > b.score) {
                best = Some(Candidate {
                    resource,
                    distance_km: d,
                    score,
                });
            }
        }

        Ok(best)
    }
}
