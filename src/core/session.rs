use std::fmt;

use crate::api::{Content, GenerateContentRequest, Part};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChatRole {
    User,
    Model,
}

impl ChatRole {
    pub fn label(self) -> &'static str {
        match self {
            ChatRole::User => "User",
            ChatRole::Model => "Model",
        }
    }
}

impl fmt::Display for ChatRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatTurn {
    pub role: ChatRole,
    pub text: String,
}

/// Ordered chat history. Turns are only appended in completed user/model pairs.
#[derive(Debug, Clone, Default)]
pub struct ChatSession {
    history: Vec<ChatTurn>,
}

impl ChatSession {
    /// Start a chat with an empty history.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn history(&self) -> &[ChatTurn] {
        &self.history
    }

    pub fn is_empty(&self) -> bool {
        self.history.is_empty()
    }

    /// Request body for sending `text` on top of the current history.
    pub fn request_for(&self, text: &str) -> GenerateContentRequest {
        let mut contents: Vec<Content> = self
            .history
            .iter()
            .map(|turn| match turn.role {
                ChatRole::User => Content::user(vec![Part::text(turn.text.clone())]),
                ChatRole::Model => Content::model(turn.text.clone()),
            })
            .collect();
        contents.push(Content::user(vec![Part::text(text)]));
        GenerateContentRequest { contents }
    }

    /// Append a finished exchange.
    pub fn record_exchange(&mut self, user_text: impl Into<String>, model_text: impl Into<String>) {
        self.history.push(ChatTurn {
            role: ChatRole::User,
            text: user_text.into(),
        });
        self.history.push(ChatTurn {
            role: ChatRole::Model,
            text: model_text.into(),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::ContentRole;

    #[test]
    fn new_session_is_empty_and_request_has_only_user_turn() {
        let session = ChatSession::new();
        assert!(session.is_empty());

        let request = session.request_for("Hi");
        assert_eq!(request.contents.len(), 1);
        assert_eq!(request.contents[0].role, Some(ContentRole::User));
        assert_eq!(request.contents[0].parts[0].as_text(), Some("Hi"));
    }

    #[test]
    fn request_replays_history_before_new_message() {
        let mut session = ChatSession::new();
        session.record_exchange("Hello", "Hi there!");

        let request = session.request_for("How are you?");
        let roles: Vec<_> = request.contents.iter().map(|c| c.role).collect();
        assert_eq!(
            roles,
            vec![
                Some(ContentRole::User),
                Some(ContentRole::Model),
                Some(ContentRole::User)
            ]
        );
        assert_eq!(request.contents[1].parts[0].as_text(), Some("Hi there!"));
        assert_eq!(request.contents[2].parts[0].as_text(), Some("How are you?"));
        assert_eq!(session.history()[1].role.label(), "Model");
    }
}
