//! Dispatch error types.

use thiserror::Error;

/// Errors that can occur while adding or dispatching tasks.
///
/// A task that finds no team with room is not an error; it stays pending.
#[derive(Debug, Error)]
pub enum DispatchError {
    #[error("invalid task: {0}")]
    Validation(String),

    #[error("state store error: {0}")]
    State(#[from] fieldgrid_state::StateError),
}

pub type DispatchResult<T> = Result<T, DispatchError>;
