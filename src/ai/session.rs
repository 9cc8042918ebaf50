use serde::{Deserialize, Serialize};

/// Speaker of one conversation turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    User,
    Assistant,
}

/// One message in the conversation history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatTurn {
    pub role: ChatRole,
    pub content: String,
}

/// Conversation history for one backend session.
///
/// Owned by the chat engine, appended only after a successful exchange,
/// and reset by the `clear` command. Nothing else mutates it.
#[derive(Debug, Default, Clone)]
pub struct ChatSession {
    turns: Vec<ChatTurn>,
}

impl ChatSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn turns(&self) -> &[ChatTurn] {
        &self.turns
    }

    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }

    pub fn push_user(&mut self, content: impl Into<String>) {
        self.turns.push(ChatTurn {
            role: ChatRole::User,
            content: content.into(),
        });
    }

    pub fn push_assistant(&mut self, content: impl Into<String>) {
        self.turns.push(ChatTurn {
            role: ChatRole::Assistant,
            content: content.into(),
        });
    }

    pub fn reset(&mut self) {
        self.turns.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn session_records_turns_in_order() {
        let mut session = ChatSession::new();
        session.push_user("hello");
        session.push_assistant("hi there");

        let turns = session.turns();
        assert_eq!(turns.len(), 2);
        assert_eq!(turns[0].role, ChatRole::User);
        assert_eq!(turns[0].content, "hello");
        assert_eq!(turns[1].role, ChatRole::Assistant);
    }

    #[test]
    fn reset_empties_the_history() {
        let mut session = ChatSession::new();
        session.push_user("hello");
        assert!(!session.is_empty());
        session.reset();
        assert!(session.is_empty());
    }
}
