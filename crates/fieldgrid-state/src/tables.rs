//! redb table definitions for the FieldGrid record store.
//!
//! Record tables use `u64` identity keys and `&[u8]` values (JSON-serialized
//! domain types). Identities are allocated as `last key + 1`.

use redb::TableDefinition;

/// Resources keyed by `{resource_id}`.
pub const RESOURCES: TableDefinition<u64, &[u8]> = TableDefinition::new("resources");

/// Tasks keyed by `{task_id}`.
pub const TASKS: TableDefinition<u64, &[u8]> = TableDefinition::new("tasks");

/// Append-only assignment log keyed by `{assignment_id}`.
pub const ASSIGNMENTS: TableDefinition<u64, &[u8]> = TableDefinition::new("assignments");

/// Assignment index keyed by `({resource_id}, {assignment_id})`.
pub const ASSIGNMENTS_BY_RESOURCE: TableDefinition<(u64, u64), ()> =
    TableDefinition::new("assignments_by_resource");
