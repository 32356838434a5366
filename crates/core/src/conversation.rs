//! Conversation-related types.

use chrono::{DateTime, Utc};
use serde::Serialize;

/// Who authored a message.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// The person typing into the input box.
    User,
    /// The remote flow, or the fallback standing in for it.
    Bot,
}

/// A message in the conversation.
///
/// Messages are created by the controller only, and never change once
/// they are appended.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize)]
pub struct Message {
    role: Role,
    content: String,
    timestamp: DateTime<Utc>,
}

impl Message {
    #[inline]
    pub(crate) fn new(role: Role, content: String) -> Self {
        Self {
            role,
            content,
            timestamp: Utc::now(),
        }
    }

    /// Returns the author of this message.
    #[inline]
    pub fn role(&self) -> Role {
        self.role
    }

    /// Returns the text of this message.
    #[inline]
    pub fn content(&self) -> &str {
        &self.content
    }

    /// Returns when this message was created.
    #[inline]
    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }
}

/// A read-only view of the conversation at some point in time.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct ConversationSnapshot {
    /// All messages, in the order they were appended.
    pub messages: Vec<Message>,
    /// The uncommitted text in the input box.
    pub pending_input: String,
    /// Whether a request is in flight.
    pub is_awaiting_response: bool,
}

impl ConversationSnapshot {
    /// Returns the most recent message, if any.
    #[inline]
    pub fn last_message(&self) -> Option<&Message> {
        self.messages.last()
    }
}

/// The mutable conversation, owned by the controller task.
#[derive(Clone, Debug, Default)]
pub(crate) struct Conversation {
    messages: Vec<Message>,
    pub(crate) pending_input: String,
}

impl Conversation {
    /// Creates a conversation, optionally starting with a bot greeting.
    pub(crate) fn seeded(welcome_message: Option<&str>) -> Self {
        let messages = welcome_message
            .map(|welcome| Message::new(Role::Bot, welcome.to_owned()))
            .into_iter()
            .collect();
        Self {
            messages,
            pending_input: String::new(),
        }
    }

    #[inline]
    pub(crate) fn push(&mut self, role: Role, content: String) {
        self.messages.push(Message::new(role, content));
    }

    pub(crate) fn snapshot(&self, is_awaiting_response: bool) -> ConversationSnapshot {
        ConversationSnapshot {
            messages: self.messages.clone(),
            pending_input: self.pending_input.clone(),
            is_awaiting_response,
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_seeded() {
        let conversation = Conversation::seeded(None);
        assert!(conversation.snapshot(false).messages.is_empty());

        let conversation = Conversation::seeded(Some("Welcome!"));
        let snapshot = conversation.snapshot(false);
        assert_eq!(snapshot.messages.len(), 1);
        assert_eq!(snapshot.messages[0].role(), Role::Bot);
        assert_eq!(snapshot.messages[0].content(), "Welcome!");
    }

    #[test]
    fn test_append_keeps_order() {
        let mut conversation = Conversation::seeded(None);
        conversation.push(Role::User, "Hello".to_owned());
        conversation.push(Role::Bot, "Hi there".to_owned());

        let snapshot = conversation.snapshot(false);
        let contents: Vec<_> =
            snapshot.messages.iter().map(Message::content).collect();
        assert_eq!(contents, ["Hello", "Hi there"]);
        assert!(snapshot.messages[0].timestamp() <= snapshot.messages[1].timestamp());
        assert_eq!(snapshot.last_message().map(Message::role), Some(Role::Bot));
    }

    #[test]
    fn test_serialize_snapshot() {
        let mut conversation = Conversation::seeded(None);
        conversation.push(Role::User, "Hello".to_owned());
        conversation.pending_input = "draft".to_owned();

        let value = serde_json::to_value(conversation.snapshot(true)).unwrap();
        assert_eq!(value["messages"][0]["role"], json!("user"));
        assert_eq!(value["messages"][0]["content"], json!("Hello"));
        assert!(value["messages"][0]["timestamp"].is_string());
        assert_eq!(value["pending_input"], json!("draft"));
        assert_eq!(value["is_awaiting_response"], json!(true));
    }
}
