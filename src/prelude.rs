//! Convenience re-exports for common use.

pub use crate::context::{AgentContext, ChatContext, MessageContext, UserContext};
pub use crate::error::{Result, StateError};
pub use crate::state::{
    persistence_payload, reduce, restore, restore_or_create, snapshot, stateful_instructions,
    AgentState, ReduceOptions,
};
