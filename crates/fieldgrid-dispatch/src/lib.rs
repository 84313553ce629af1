//! fieldgrid-dispatch — assigns pending tasks to field teams.
//!
//! One scheduling pass walks the pending tasks in urgency order and gives
//! each one to the best-scoring team that still has room, committing as it
//! goes so later tasks see earlier assignments.
//!
//! # Architecture
//!
//! ```text
//! Dispatcher (serializes passes, add-task command, read views)
//!   └── AssignmentEngine<S: RecordStore>
//!         ├── LoadTracker   (fresh per-resource assignment counts)
//!         ├── distance_km   (haversine)
//!         └── ScoringWeights / TravelModel
//! ```

pub mod dispatcher;
pub mod distance;
pub mod engine;
pub mod error;
pub mod load;
pub mod scorer;
pub mod views;

pub use dispatcher::{DispatchSettings, Dispatcher};
pub use distance::{EARTH_RADIUS_KM, distance_km};
pub use engine::{AssignmentEngine, AssignmentOutcome};
pub use error::{DispatchError, DispatchResult};
pub use load::LoadTracker;
pub use scorer::{ScoreBreakdown, ScoringWeights, TravelModel};
pub use views::{ResourceView, TaskView};
