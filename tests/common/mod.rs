//! Shared test fixtures: a realistic agent state type and a sample context.
#![allow(dead_code)]

use gatherstate::context::{AgentContext, ChatContext, MessageContext, UserContext};
use gatherstate::state::AgentState;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A small working-memory state such as a note-taking agent would carry.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ScratchpadState {
    #[serde(skip)]
    pub agent_context: AgentContext,
    pub session_id: String,
    pub notes: Vec<String>,
    pub turn_count: u32,
    pub last_tool: Option<String>,
}

impl AgentState for ScratchpadState {
    fn genesis(context: AgentContext) -> Self {
        Self {
            agent_context: context,
            ..Self::default()
        }
    }

    fn attach_context(&mut self, context: AgentContext) {
        self.agent_context = context;
    }

    fn context(&self) -> Option<&AgentContext> {
        Some(&self.agent_context)
    }
}

/// A context resembling what the platform hands an agent mid-conversation.
pub fn sample_context() -> AgentContext {
    AgentContext {
        chat: ChatContext {
            chat_id: "chat-42".to_string(),
            name: "general".to_string(),
            participants: vec!["alice".to_string(), "scratchpad-bot".to_string()],
        },
        user: UserContext {
            user_id: "u-1".to_string(),
            username: "alice".to_string(),
            display_name: Some("Alice".to_string()),
        },
        prompt: "what did I ask you to remember?".to_string(),
        conversation_history: vec![
            message_from_user("m-1", "alice", "remember that the demo is on Friday"),
            message_from_agent("m-2", "scratchpad-bot", "noted!"),
            message_from_user("m-3", "alice", "what did I ask you to remember?"),
        ],
        invocation_id: "inv-1".to_string(),
        agent_state: None,
    }
}

pub fn message_from_user(id: &str, username: &str, content: &str) -> MessageContext {
    MessageContext {
        message_id: id.to_string(),
        username: Some(username.to_string()),
        agent_name: None,
        content: content.to_string(),
        created_at: None,
    }
}

pub fn message_from_agent(id: &str, agent_name: &str, content: &str) -> MessageContext {
    MessageContext {
        message_id: id.to_string(),
        username: None,
        agent_name: Some(agent_name.to_string()),
        content: content.to_string(),
        created_at: None,
    }
}

/// Unwrap a JSON value known to be an object.
pub fn object(value: Value) -> Map<String, Value> {
    match value {
        Value::Object(map) => map,
        other => panic!("expected object, got {other:?}"),
    }
}
