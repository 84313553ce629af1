//! Resource scoring and arrival estimates.
//!
//! A candidate team is scored as a weighted combination of:
//! - **Urgency**: the task's urgency over `urgency_scale` (rewarded)
//! - **Distance**: kilometres to the task over `distance_scale_km` (penalised)
//! - **Load**: the team's load over its capacity (penalised)

use fieldgrid_core::{ScoringConfig, TravelConfig};

/// Weights and normalisers for the assignment score.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoringWeights {
    pub urgency: f64,
    pub distance: f64,
    pub load: f64,
    pub urgency_scale: f64,
    pub distance_scale_km: f64,
}

impl Default for ScoringWeights {
    fn default() -> Self {
        Self {
            urgency: 0.6,
            distance: 0.3,
            load: 0.1,
            urgency_scale: 10.0,
            distance_scale_km: 20.0,
        }
    }
}

impl From<&ScoringConfig> for ScoringWeights {
    fn from(config: &ScoringConfig) -> Self {
        let defaults = Self::default();
        Self {
            urgency: config.urgency_weight.unwrap_or(defaults.urgency),
            distance: config.distance_weight.unwrap_or(defaults.distance),
            load: config.load_weight.unwrap_or(defaults.load),
            urgency_scale: config.urgency_scale.unwrap_or(defaults.urgency_scale),
            distance_scale_km: config
                .distance_scale_km
                .unwrap_or(defaults.distance_scale_km),
        }
    }
}

/// Individual score components, already weighted.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoreBreakdown {
    pub urgency: f64,
    pub distance: f64,
    pub load: f64,
}

impl ScoreBreakdown {
    pub fn total(&self) -> f64 {
        self.urgency - self.distance - self.load
    }
}

impl ScoringWeights {
    /// Score one candidate. `capacity` must be non-zero.
    pub fn breakdown(&self, urgency: i64, distance_km: f64, load: u32, capacity: u32) -> ScoreBreakdown {
        debug_assert!(capacity > 0, "capacity-0 resources are never scored");
        ScoreBreakdown {
            urgency: self.urgency * (urgency as f64 / self.urgency_scale),
            distance: self.distance * (distance_km / self.distance_scale_km),
            load: self.load * (f64::from(load) / f64::from(capacity)),
        }
    }

    pub fn score(&self, urgency: i64, distance_km: f64, load: u32, capacity: u32) -> f64 {
        self.breakdown(urgency, distance_km, load, capacity).total()
    }
}

/// Travel assumptions behind the ETA estimate.
#[derive(Debug, Clone, PartialEq)]
pub struct TravelModel {
    /// Average travel speed.
    pub speed_kmh: f64,
    /// Fixed minutes added to every trip.
    pub dispatch_overhead_minutes: u32,
}

impl Default for TravelModel {
    fn default() -> Self {
        Self {
            speed_kmh: 30.0,
            dispatch_overhead_minutes: 5,
        }
    }
}

impl From<&TravelConfig> for TravelModel {
    fn from(config: &TravelConfig) -> Self {
        let defaults = Self::default();
        Self {
            speed_kmh: config.speed_kmh.unwrap_or(defaults.speed_kmh),
            dispatch_overhead_minutes: config
                .dispatch_overhead_minutes
                .unwrap_or(defaults.dispatch_overhead_minutes),
        }
    }
}

impl TravelModel {
    /// Whole minutes of travel (rounded down) plus the dispatch overhead.
    pub fn eta_minutes(&self, distance_km: f64) -> u32 {
        let travel = (distance_km / self.speed_kmh * 60.0).floor() as u32;
        travel.saturating_add(self.dispatch_overhead_minutes)
    }
}
