use super::message::{Message, MessageRole};
use crate::models::ExchangeTurn;

/// Display log plus the backend's canonical exchange history.
///
/// The two are kept apart because the display log also holds synthetic
/// entries (suggestion blocks, error notices) that are never sent back as
/// conversation turns.
#[derive(Debug, Clone, Default)]
pub struct ConversationStore {
    messages: Vec<Message>,
    exchange_history: Vec<ExchangeTurn>,
}

impl ConversationStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `None` without touching the log when `text` is blank.
    pub fn append_user(&mut self, text: &str) -> Option<&Message> {
        if text.trim().is_empty() {
            return None;
        }
        Some(self.append(MessageRole::User, text.to_string()))
    }

    pub fn append_assistant(&mut self, text: impl Into<String>) -> &Message {
        self.append(MessageRole::Assistant, text.into())
    }

    pub fn append_error(&mut self, text: impl Into<String>) -> &Message {
        self.append(MessageRole::Error, text.into())
    }

    pub fn replace_exchange_history(&mut self, history: Vec<ExchangeTurn>) {
        self.exchange_history = history;
    }

    pub fn clear(&mut self) {
        self.messages.clear();
        self.exchange_history.clear();
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn exchange_history(&self) -> &[ExchangeTurn] {
        &self.exchange_history
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    fn append(&mut self, role: MessageRole, content: String) -> &Message {
        self.messages.push(Message::new(role, content));
        &self.messages[self.messages.len() - 1]
    }
}
