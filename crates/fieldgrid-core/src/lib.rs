//! fieldgrid-core — configuration shared by the FieldGrid crates.

pub mod config;

pub use config::{
    FieldConfig, ScoringConfig, SeedConfig, SeedResource, ServerConfig, TravelConfig,
};
