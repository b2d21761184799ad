use super::message::Message;
use crate::models::ExchangeTurn;

/// Change notifications published after each session transition.
#[derive(Debug, Clone, PartialEq)]
pub enum SessionEvent {
    MessageAppended(Message),
    HistoryReplaced(Vec<ExchangeTurn>),
    SessionChanged { session_id: String },
    TypingChanged(bool),
    Cleared,
}
