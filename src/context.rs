//! Chat-session context carriers.
//!
//! Plain data types describing the conversation a message arrived in. The
//! state helpers treat [`AgentContext`] as an opaque back-reference: it is
//! re-attached to restored state every turn but never inspected or persisted.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// The user who sent the current message.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct UserContext {
    pub user_id: String,
    pub username: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
}

impl UserContext {
    /// Preferred human-readable name: display name if set, username otherwise.
    pub fn label(&self) -> &str {
        self.display_name.as_deref().unwrap_or(&self.username)
    }
}

/// The chat the current message belongs to.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ChatContext {
    pub chat_id: String,
    pub name: String,
    #[serde(default)]
    pub participants: Vec<String>,
}

/// A single entry from the recent conversation history.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct MessageContext {
    pub message_id: String,
    /// Set when a human sent the message.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    /// Set when another agent sent the message.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub agent_name: Option<String>,
    pub content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

impl MessageContext {
    /// Sender label for rendering: username, then agent name.
    pub fn sender(&self) -> &str {
        self.username
            .as_deref()
            .or(self.agent_name.as_deref())
            .unwrap_or("unknown")
    }
}

/// Everything an agent is handed for one conversation turn.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct AgentContext {
    pub chat: ChatContext,
    pub user: UserContext,
    /// The incoming message text.
    pub prompt: String,
    #[serde(default)]
    pub conversation_history: Vec<MessageContext>,
    /// Unique ID for this invocation.
    pub invocation_id: String,
    /// Persisted state blob from a previous turn, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub agent_state: Option<String>,
}

impl AgentContext {
    /// Create a context for a fresh invocation with a generated invocation ID.
    pub fn new(chat: ChatContext, user: UserContext, prompt: impl Into<String>) -> Self {
        Self {
            chat,
            user,
            prompt: prompt.into(),
            conversation_history: Vec::new(),
            invocation_id: Uuid::new_v4().to_string(),
            agent_state: None,
        }
    }

    /// Render the most recent `max_messages` history entries as a block
    /// suitable for inclusion in agent instructions.
    ///
    /// Returns an empty string when there is no history to show.
    pub fn format_conversation_history(&self, max_messages: usize) -> String {
        if self.conversation_history.is_empty() || max_messages == 0 {
            return String::new();
        }
        let start = self.conversation_history.len().saturating_sub(max_messages);
        let mut out = String::from("Recent conversation history:\n");
        for msg in &self.conversation_history[start..] {
            out.push_str("- ");
            out.push_str(msg.sender());
            out.push_str(": ");
            out.push_str(&msg.content);
            out.push('\n');
        }
        out
    }
}
