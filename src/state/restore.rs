//! Rebuilding a usable state from a persisted minimal summary.

use serde_json::{Map, Value};

use super::AgentState;
use crate::context::AgentContext;

/// Restore a state from a minimal summary plus the current turn's live
/// context.
///
/// `overrides` win over persisted fields, and the live `context` always wins
/// over anything the summary carried under the back-reference key. Null
/// fields are dropped before deserialization so they cannot fail
/// required-field constructors.
///
/// Total: when the persisted fields no longer deserialize (older schema,
/// truncated data, garbage keys with clashing types), the result falls back
/// to [`AgentState::genesis`] merged with `overrides`. The caller only loses
/// prior memory, never gets an error.
pub fn restore<S: AgentState>(
    minimal_state: &Map<String, Value>,
    context: &AgentContext,
    overrides: &Map<String, Value>,
) -> S {
    let mut fields = minimal_state.clone();
    // never trust a persisted back-reference
    fields.remove(S::CONTEXT_FIELD);
    for (key, value) in overrides {
        fields.insert(key.clone(), value.clone());
    }
    fields.retain(|_, value| !value.is_null());

    match serde_json::from_value::<S>(Value::Object(fields)) {
        Ok(mut state) => {
            state.attach_context(context.clone());
            state
        }
        Err(error) => {
            tracing::warn!(error = %error, "Failed to restore from minimal state, using defaults");
            genesis_with_overrides(context, overrides)
        }
    }
}

/// Fresh default state with `overrides` merged in on top.
fn genesis_with_overrides<S: AgentState>(
    context: &AgentContext,
    overrides: &Map<String, Value>,
) -> S {
    let state = S::genesis(context.clone());
    if overrides.is_empty() {
        return state;
    }

    let merged = serde_json::to_value(&state).ok().and_then(|value| match value {
        Value::Object(mut fields) => {
            for (key, value) in overrides {
                if !value.is_null() {
                    fields.insert(key.clone(), value.clone());
                }
            }
            serde_json::from_value::<S>(Value::Object(fields)).ok()
        }
        _ => None,
    });

    match merged {
        Some(mut merged) => {
            merged.attach_context(context.clone());
            merged
        }
        // genesis is the contract-level floor and must always be usable
        None => state,
    }
}
