//! fieldgrid.toml configuration parser.
//!
//! Every section is optional. Accessors on each section fill in the
//! defaults, so an empty file is a valid configuration.

use anyhow::{bail, ensure};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const DEFAULT_PORT: u16 = 5000;
pub const DEFAULT_DATA_DIR: &str = "./data";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FieldConfig {
    pub server: Option<ServerConfig>,
    pub scoring: Option<ScoringConfig>,
    pub travel: Option<TravelConfig>,
    pub seed: Option<SeedConfig>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ServerConfig {
    pub port: Option<u16>,
    pub data_dir: Option<PathBuf>,
}

/// Weights and normalisers of the assignment score.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ScoringConfig {
    pub urgency_weight: Option<f64>,
    pub distance_weight: Option<f64>,
    pub load_weight: Option<f64>,
    /// Urgency value that maps to a full urgency term.
    pub urgency_scale: Option<f64>,
    /// Distance (km) that maps to a full distance penalty.
    pub distance_scale_km: Option<f64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TravelConfig {
    pub speed_kmh: Option<f64>,
    pub dispatch_overhead_minutes: Option<u32>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SeedConfig {
    #[serde(default)]
    pub resources: Vec<SeedResource>,
}

/// A resource created at bootstrap when the store holds none.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeedResource {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub lat: f64,
    pub lon: f64,
    pub capacity: u32,
}

impl FieldConfig {
    pub fn from_file(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: FieldConfig = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values that would make scores or ETAs meaningless.
    ///
    /// Weights must be finite and non-negative. Scales and travel speed must
    /// be finite and positive. Seed coordinates must be finite.
    pub fn validate(&self) -> anyhow::Result<()> {
        if let Some(scoring) = &self.scoring {
            for (name, value) in [
                ("scoring.urgency_weight", scoring.urgency_weight),
                ("scoring.distance_weight", scoring.distance_weight),
                ("scoring.load_weight", scoring.load_weight),
            ] {
                if let Some(v) = value {
                    ensure!(v.is_finite() && v >= 0.0, "{name} must be a non-negative number, got {v}");
                }
            }
            for (name, value) in [
                ("scoring.urgency_scale", scoring.urgency_scale),
                ("scoring.distance_scale_km", scoring.distance_scale_km),
            ] {
                if let Some(v) = value {
                    ensure!(v.is_finite() && v > 0.0, "{name} must be a positive number, got {v}");
                }
            }
        }
        if let Some(v) = self.travel.as_ref().and_then(|t| t.speed_kmh) {
            ensure!(v.is_finite() && v > 0.0, "travel.speed_kmh must be a positive number, got {v}");
        }
        for seed in self.seed.iter().flat_map(|s| &s.resources) {
            if !seed.lat.is_finite() || !seed.lon.is_finite() {
                bail!("seed resource {} has a non-finite location", seed.name);
            }
        }
        Ok(())
    }

    pub fn to_toml_string(&self) -> anyhow::Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    pub fn port(&self) -> u16 {
        self.server
            .as_ref()
            .and_then(|s| s.port)
            .unwrap_or(DEFAULT_PORT)
    }

    pub fn data_dir(&self) -> PathBuf {
        self.server
            .as_ref()
            .and_then(|s| s.data_dir.clone())
            .unwrap_or_else(|| PathBuf::from(DEFAULT_DATA_DIR))
    }

    pub fn scoring(&self) -> ScoringConfig {
        self.scoring.clone().unwrap_or_default()
    }

    pub fn travel(&self) -> TravelConfig {
        self.travel.clone().unwrap_or_default()
    }

    /// Seed resources: the configured list, or the three default teams.
    pub fn seed_resources(&self) -> Vec<SeedResource> {
        match &self.seed {
            Some(seed) if !seed.resources.is_empty() => seed.resources.clone(),
            _ => default_seed_resources(),
        }
    }
}

/// The teams a fresh installation starts with.
pub fn default_seed_resources() -> Vec<SeedResource> {
    vec![
        SeedResource {
            name: "Team A".to_string(),
            kind: "maintenance".to_string(),
            lat: 17.435,
            lon: 78.444,
            capacity: 2,
        },
        SeedResource {
            name: "Team B".to_string(),
            kind: "waste".to_string(),
            lat: 17.430,
            lon: 78.450,
            capacity: 1,
        },
        SeedResource {
            name: "Team C".to_string(),
            kind: "emergency".to_string(),
            lat: 17.440,
            lon: 78.430,
            capacity: 1,
        },
    ]
}
