//! fieldgrid-state — record store for FieldGrid.
//!
//! Backed by [redb](https://docs.rs/redb), holds the three record kinds the
//! dispatcher works with: resources (field teams), tasks, and the
//! append-only assignment log.
//!
//! # Architecture
//!
//! Records are JSON-serialized into redb's `&[u8]` value columns under
//! `u64` identity keys, so every listing comes back in creation order.
//! A `(resource_id, assignment_id)` index table makes per-resource load
//! counts a range scan.
//!
//! The dispatcher only sees the [`RecordStore`] trait. Listings are served
//! from a [`Snapshot`] taken in a single read transaction. [`StateStore`] is the
//! production implementation; it is `Clone` + `Send` + `Sync` (backed by
//! `Arc<Database>`) and can be shared across async tasks.

pub mod clock;
pub mod error;
pub mod repository;
pub mod store;
pub mod tables;
pub mod types;

pub use clock::{Clock, ManualClock, SystemClock};
pub use error::{StateError, StateResult};
pub use repository::{RecordStore, Snapshot};
pub use store::StateStore;
pub use types::*;
