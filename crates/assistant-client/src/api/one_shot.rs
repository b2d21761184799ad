use thiserror::Error;

use super::transport::{AssistantTransport, TransportError};
use crate::models::{AssistantRequest, AssistantResponse};

pub const ONE_SHOT_FAILURE_TEXT: &str = "An error occurred while processing your request";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum OneShotError {
    #[error("one-shot request text is empty")]
    EmptyRequest,
    #[error("one-shot assistant request failed: {0}")]
    Transport(#[from] TransportError),
}

impl OneShotError {
    pub fn user_message(&self) -> String {
        match self {
            Self::EmptyRequest => "Please describe what you need help with".to_string(),
            Self::Transport(err) => err
                .detail()
                .map(ToString::to_string)
                .unwrap_or_else(|| ONE_SHOT_FAILURE_TEXT.to_string()),
        }
    }
}

/// Single request without a session or history. Conversation state is untouched.
pub async fn ask_once(
    transport: &dyn AssistantTransport,
    user_message: &str,
) -> Result<AssistantResponse, OneShotError> {
    if user_message.trim().is_empty() {
        return Err(OneShotError::EmptyRequest);
    }

    let response = transport
        .send_message(AssistantRequest::one_shot(user_message))
        .await?;
    Ok(response)
}

#[cfg(test)]
mod tests {
    use super::{ONE_SHOT_FAILURE_TEXT, OneShotError};
    use crate::api::TransportError;

    #[test]
    fn user_message_prefers_server_detail() {
        let err = OneShotError::Transport(TransportError::Rejected {
            status: 500,
            detail: Some("OpenAI API key not configured".to_string()),
        });

        assert_eq!(err.user_message(), "OpenAI API key not configured");
    }

    #[test]
    fn user_message_uses_generic_text_without_detail() {
        let err = OneShotError::Transport(TransportError::Timeout);

        assert_eq!(err.user_message(), ONE_SHOT_FAILURE_TEXT);
    }
}
