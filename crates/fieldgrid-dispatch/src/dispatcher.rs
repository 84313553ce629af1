//! The dispatcher is the entry point every trigger goes through.
//!
//! Holds the engine behind an async mutex so that scheduling passes never
//! overlap: two passes reading load at the same time could both hand out
//! a resource's last slot. Adding a task and the explicit schedule request
//! share this path.

use std::sync::Arc;

use tokio::sync::Mutex;
use tracing::{error, info};

use fieldgrid_core::FieldConfig;
use fieldgrid_state::{Clock, NewTask, RecordStore, StateStore, Task};

use crate::engine::{AssignmentEngine, AssignmentOutcome};
use crate::error::{DispatchError, DispatchResult};
use crate::scorer::{ScoringWeights, TravelModel};
use crate::views::{self, ResourceView, TaskView};

/// Tunables handed to the engine.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DispatchSettings {
    pub weights: ScoringWeights,
    pub travel: TravelModel,
}

impl From<&FieldConfig> for DispatchSettings {
    fn from(config: &FieldConfig) -> Self {
        Self {
            weights: ScoringWeights::from(&config.scoring()),
            travel: TravelModel::from(&config.travel()),
        }
    }
}

pub struct Dispatcher<S = StateStore> {
    store: S,
    clock: Arc<dyn Clock>,
    engine: Mutex<AssignmentEngine<S>>,
}

impl<S: RecordStore + Clone> Dispatcher<S> {
    pub fn new(store: S, settings: DispatchSettings, clock: Arc<dyn Clock>) -> Self {
        let engine = AssignmentEngine::new(
            store.clone(),
            settings.weights,
            settings.travel,
            clock.clone(),
        );
        Self {
            store,
            clock,
            engine: Mutex::new(engine),
        }
    }

    /// Run one scheduling pass, waiting for any pass already in progress.
    pub async fn schedule(&self) -> DispatchResult<Vec<AssignmentOutcome>> {
        let engine = self.engine.lock().await;
        engine.run_pass().inspect_err(|e| {
            error!(error = %e, "scheduling pass aborted");
        })
    }

    /// Store a new pending task, then run a pass.
    ///
    /// The task is persisted even if the pass that follows fails.
    pub async fn add_task(&self, new: NewTask) -> DispatchResult<(Task, Vec<AssignmentOutcome>)> {
        validate(&new)?;
        let task = self.store.insert_task(new, self.clock.now_secs())?;
        info!(task = task.id, title = %task.title, urgency = task.urgency, "task added");
        let outcomes = self.schedule().await?;
        Ok((task, outcomes))
    }

    pub fn task_views(&self) -> DispatchResult<Vec<TaskView>> {
        Ok(views::task_views(&self.store)?)
    }

    pub fn resource_views(&self) -> DispatchResult<Vec<ResourceView>> {
        Ok(views::resource_views(&self.store)?)
    }
}

fn validate(task: &NewTask) -> DispatchResult<()> {
    if !task.location.lat.is_finite() {
        return Err(DispatchError::Validation("lat must be a finite number".to_string()));
    }
    if !task.location.lon.is_finite() {
        return Err(DispatchError::Validation("lon must be a finite number".to_string()));
    }
    Ok(())
}
