//! Error types for GatherState.

use thiserror::Error;

use crate::state::ValueKind;

/// Primary error type for the fallible codec primitives.
///
/// The total helpers (`reduce`, `restore`, `restore_or_create`, `snapshot`)
/// recover from these internally and log a warning instead of returning them.
#[derive(Error, Debug)]
pub enum StateError {
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("State must serialize to a JSON object, got {0}")]
    NotAnObject(ValueKind),
}

/// Convenience alias.
pub type Result<T> = std::result::Result<T, StateError>;
