//! First-start seeding of field teams.

use fieldgrid_core::SeedResource;
use fieldgrid_state::{Coordinate, NewResource, StateResult, StateStore};
use tracing::{debug, info};

/// Insert `seeds` if the store has no resources yet. Returns how many were added.
pub fn seed_if_empty(store: &StateStore, seeds: &[SeedResource]) -> StateResult<usize> {
    if store.has_resources()? {
        debug!("resources present, skipping seed");
        return Ok(0);
    }
    for seed in seeds {
        store.insert_resource(NewResource {
            name: seed.name.clone(),
            kind: seed.kind.clone(),
            location: Coordinate::new(seed.lat, seed.lon),
            capacity: seed.capacity,
        })?;
    }
    info!(count = seeds.len(), "seeded resources");
    Ok(seeds.len())
}
