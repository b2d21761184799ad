use assistant_client::{Message, MessageRole, SessionEvent};
use tokio::sync::broadcast;
use tokio::sync::broadcast::error::RecvError;
use tracing::warn;

/// Prints session events until the session is dropped.
pub async fn render_events(mut events: broadcast::Receiver<SessionEvent>) {
    loop {
        match events.recv().await {
            Ok(event) => {
                if let Some(line) = render_event(&event) {
                    println!("{line}");
                }
            }
            Err(RecvError::Lagged(skipped)) => {
                warn!(skipped, "renderer fell behind; some session events were dropped");
            }
            Err(RecvError::Closed) => break,
        }
    }
}

pub fn render_event(event: &SessionEvent) -> Option<String> {
    match event {
        SessionEvent::MessageAppended(message) => Some(render_message(message)),
        SessionEvent::SessionChanged { session_id } => Some(format!("-- session {session_id} --")),
        SessionEvent::TypingChanged(true) => Some("assistant is typing...".to_string()),
        SessionEvent::Cleared => Some("-- new chat --".to_string()),
        SessionEvent::TypingChanged(false) | SessionEvent::HistoryReplaced(_) => None,
    }
}

pub fn render_message(message: &Message) -> String {
    let label = match message.role {
        MessageRole::User => "you",
        MessageRole::Assistant => "assistant",
        MessageRole::Error => "error",
    };
    format!("[{}] {label}: {}", message.timestamp, message.content)
}

#[cfg(test)]
mod tests {
    use assistant_client::{ExchangeTurn, Message, MessageId, MessageRole, SessionEvent};

    use super::{render_event, render_message};

    fn message(role: MessageRole, content: &str) -> Message {
        Message {
            id: MessageId::new(),
            role,
            content: content.to_string(),
            timestamp: "09:15:00".to_string(),
        }
    }

    #[test]
    fn labels_messages_by_role() {
        assert_eq!(
            render_message(&message(MessageRole::User, "Plan my day")),
            "[09:15:00] you: Plan my day"
        );
        assert_eq!(
            render_message(&message(MessageRole::Error, "rate limited")),
            "[09:15:00] error: rate limited"
        );
    }

    #[test]
    fn only_rising_typing_edge_is_shown() {
        assert_eq!(
            render_event(&SessionEvent::TypingChanged(true)).as_deref(),
            Some("assistant is typing...")
        );
        assert_eq!(render_event(&SessionEvent::TypingChanged(false)), None);
    }

    #[test]
    fn history_replacement_is_silent() {
        let event = SessionEvent::HistoryReplaced(vec![ExchangeTurn::new("user", "hi")]);

        assert_eq!(render_event(&event), None);
    }
}
