//! Agent state persistence.
//!
//! Two sibling paths move state across conversation turns:
//!
//! - **Full fidelity**: [`snapshot`] encodes the whole state to JSON and
//!   [`restore_or_create`] decodes it exactly, falling back to a freshly
//!   created state (the genesis case) when nothing usable was persisted.
//! - **Lossy reduction**: [`reduce`] shrinks the state under hard size bounds
//!   and [`restore`] rebuilds a usable state from the bounded summary plus
//!   the current turn's live context.
//!
//! All four are total. Failures are logged and recovered locally so a
//! persistence problem can never block a response; the `try_*` primitives
//! expose the underlying errors for callers that want them.

mod reduce;
mod restore;

pub use reduce::{
    reduce, try_reduce, ReduceOptions, DEFAULT_MAX_FIELD_SIZE, MAX_LIST_ITEMS, MAX_MAP_DEPTH,
    MAX_MAP_ENTRIES, TRUNCATED_KEY,
};
pub use restore::restore;

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use strum::Display;

use crate::context::AgentContext;
use crate::error::Result;

/// JSON value kinds, for diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
#[strum(serialize_all = "lowercase")]
pub enum ValueKind {
    Null,
    Bool,
    Number,
    String,
    Array,
    Object,
}

impl ValueKind {
    pub fn of(value: &Value) -> Self {
        match value {
            Value::Null => Self::Null,
            Value::Bool(_) => Self::Bool,
            Value::Number(_) => Self::Number,
            Value::String(_) => Self::String,
            Value::Array(_) => Self::Array,
            Value::Object(_) => Self::Object,
        }
    }
}

/// A state type that can be persisted across conversation turns.
///
/// Implementors keep a back-reference to the live [`AgentContext`] under the
/// field named by [`CONTEXT_FIELD`](Self::CONTEXT_FIELD). That field must be
/// `#[serde(skip)]` so the context never reaches persisted output; it is
/// re-injected from the live session on every restore.
///
/// Marking the struct `#[serde(default)]` is strongly recommended: persisted
/// state may come from an older schema or from a lossy reduction, and
/// defaults let the remaining fields deserialize instead of failing.
pub trait AgentState: Serialize + DeserializeOwned {
    /// Field name the back-reference lives under.
    const CONTEXT_FIELD: &'static str = "agent_context";

    /// Construct a fresh state for a new conversation. Must not fail.
    fn genesis(context: AgentContext) -> Self;

    /// Replace the back-reference with the current turn's live context.
    fn attach_context(&mut self, context: AgentContext);

    /// The attached live context, if any.
    fn context(&self) -> Option<&AgentContext> {
        None
    }
}

/// Exact JSON encode of a state for persistence.
pub fn try_snapshot<S: AgentState>(state: &S) -> Result<String> {
    Ok(serde_json::to_string(state)?)
}

/// Total wrapper around [`try_snapshot`]: `None` on failure, with a warning.
pub fn snapshot<S: AgentState>(state: &S) -> Option<String> {
    match try_snapshot(state) {
        Ok(json) => Some(json),
        Err(error) => {
            tracing::warn!(error = %error, "Failed to serialize agent state");
            None
        }
    }
}

/// Exact decode of a prior [`snapshot`].
pub fn try_decode<S: AgentState>(state_json: &str) -> Result<S> {
    Ok(serde_json::from_str(state_json)?)
}

/// Restore state from a full-fidelity snapshot, or create new state.
///
/// If `prior_state_json` is present and decodes, the state is returned with
/// the live `context` re-attached. A missing, empty, or undecodable snapshot
/// is the genesis case: `create` builds a brand-new state. Never fails.
pub fn restore_or_create<S, F>(prior_state_json: Option<&str>, context: &AgentContext, create: F) -> S
where
    S: AgentState,
    F: FnOnce(AgentContext) -> S,
{
    if let Some(json) = prior_state_json.filter(|json| !json.is_empty()) {
        match try_decode::<S>(json) {
            Ok(mut state) => {
                tracing::info!("Restored agent state from prior snapshot");
                state.attach_context(context.clone());
                return state;
            }
            Err(error) => {
                tracing::warn!(error = %error, "Failed to restore agent state, creating new");
            }
        }
    } else {
        tracing::info!("No prior agent state found, creating new");
    }
    create(context.clone())
}

/// Response-metadata payload the platform persists alongside the message.
///
/// The snapshot is stored under the `agent_state` key; an unserializable
/// state degrades to an empty string rather than an error.
pub fn persistence_payload<S: AgentState>(state: &S) -> Value {
    serde_json::json!({ "agent_state": snapshot(state).unwrap_or_default() })
}

/// Enrich base instructions with the current state and recent history.
///
/// Returns `base` unchanged if the state cannot be serialized.
pub fn stateful_instructions<S: AgentState>(base: &str, state: &S) -> String {
    let dump = match serde_json::to_string_pretty(state) {
        Ok(dump) => dump,
        Err(error) => {
            tracing::warn!(error = %error, "Failed to render stateful instructions");
            return base.to_string();
        }
    };

    let mut out = format!("{base}\n\n--- CURRENT AGENT STATE ---\n{dump}\n--- END STATE ---\n");
    if let Some(context) = state.context() {
        let history = context.format_conversation_history(5);
        if !history.is_empty() {
            out.push('\n');
            out.push_str(&history);
        }
    }
    out
}
