//! GatherState — bounded agent-state persistence for chat agents.
//!
//! Chat agents receive one [`context::AgentContext`] per conversation turn
//! and often want to carry working state across turns. The hosting platform
//! stores that state as an opaque JSON blob on the message, so this crate
//! provides two persistence paths:
//!
//! - a full-fidelity path ([`state::snapshot`] / [`state::restore_or_create`])
//!   for state small enough to round-trip exactly, and
//! - a lossy path ([`state::reduce`] / [`state::restore`]) that shrinks
//!   arbitrary state under hard bounds (string length, list length, mapping
//!   depth) into a summary that always fits.
//!
//! Every top-level operation is total: persistence degradation is logged and
//! recovered locally. At worst the agent loses prior memory and behaves as if
//! starting fresh; it never surfaces an error mid-conversation.
//!
//! # Quick Start
//!
//! ```
//! use gatherstate::prelude::*;
//! use serde::{Deserialize, Serialize};
//!
//! #[derive(Debug, Clone, Default, Serialize, Deserialize)]
//! #[serde(default)]
//! struct ScratchpadState {
//!     #[serde(skip)]
//!     agent_context: AgentContext,
//!     notes: Vec<String>,
//!     turn_count: u32,
//! }
//!
//! impl AgentState for ScratchpadState {
//!     fn genesis(context: AgentContext) -> Self {
//!         Self { agent_context: context, ..Self::default() }
//!     }
//!     fn attach_context(&mut self, context: AgentContext) {
//!         self.agent_context = context;
//!     }
//!     fn context(&self) -> Option<&AgentContext> {
//!         Some(&self.agent_context)
//!     }
//! }
//!
//! let context = AgentContext::default();
//! let mut state = ScratchpadState::genesis(context.clone());
//! state.turn_count = 1;
//!
//! let minimal = reduce(&state, &ReduceOptions::default());
//! let next: ScratchpadState = restore(&minimal, &context, &Default::default());
//! assert_eq!(next.turn_count, 1);
//! ```

pub mod context;
pub mod error;
pub mod prelude;
pub mod state;
