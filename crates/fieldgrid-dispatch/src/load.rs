//! Per-resource load accounting.
//!
//! Load is the number of assignments ever recorded against a resource.
//! Nothing releases load, so a resource fills up permanently once it has
//! received `capacity` assignments.

use fieldgrid_state::{RecordStore, Resource, ResourceId, StateResult};

/// Reads resource load straight from the store on every call.
pub struct LoadTracker<'a, S: ?Sized> {
    store: &'a S,
}

impl<'a, S: RecordStore + ?Sized> LoadTracker<'a, S> {
    pub fn new(store: &'a S) -> Self {
        Self { store }
    }

    /// Number of assignments held by `resource_id`.
    pub fn active_load(&self, resource_id: ResourceId) -> StateResult<u32> {
        self.store.count_assignments_for_resource(resource_id)
    }

    /// Current load if the resource can take another assignment.
    ///
    /// A capacity-0 resource never has room.
    pub fn load_if_available(&self, resource: &Resource) -> StateResult<Option<u32>> {
        if resource.capacity == 0 {
            return Ok(None);
        }
        let load = self.active_load(resource.id)?;
        Ok((load < resource.capacity).then_some(load))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fieldgrid_state::{Coordinate, NewResource, NewTask, StateStore};

    fn setup(capacity: u32) -> (StateStore, Resource) {
        let store = StateStore::open_in_memory().unwrap();
        let resource = store
            .insert_resource(NewResource {
                name: "Team A".to_string(),
                kind: "maintenance".to_string(),
                location: Coordinate::new(17.435, 78.444),
                capacity,
            })
            .unwrap();
        (store, resource)
    }

    fn assign(store: &StateStore, resource: &Resource) {
        let task = store
            .insert_task(
                NewTask {
                    title: "job".to_string(),
                    description: String::new(),
                    location: resource.location,
                    urgency: 1,
                },
                1000,
            )
            .unwrap();
        store.commit_assignment(task.id, resource.id, 5, 1000).unwrap();
    }

    #[test]
    fn load_reflects_new_commits() {
        let (store, resource) = setup(2);
        let tracker = LoadTracker::new(&store);
        assert_eq!(tracker.active_load(resource.id).unwrap(), 0);

        assign(&store, &resource);
        assert_eq!(tracker.active_load(resource.id).unwrap(), 1);
        assert_eq!(tracker.load_if_available(&resource).unwrap(), Some(1));

        assign(&store, &resource);
        assert_eq!(tracker.active_load(resource.id).unwrap(), 2);
        assert_eq!(tracker.load_if_available(&resource).unwrap(), None);
    }

    #[test]
    fn zero_capacity_is_never_available() {
        let (store, resource) = setup(0);
        let tracker = LoadTracker::new(&store);
        assert_eq!(tracker.load_if_available(&resource).unwrap(), None);
    }
}
