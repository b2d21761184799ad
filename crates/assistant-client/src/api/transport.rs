use std::future::Future;
use std::pin::Pin;

use thiserror::Error;

use crate::models::{AssistantRequest, AssistantResponse, NewSessionResponse};

pub type TransportFuture<'a, T> =
    Pin<Box<dyn Future<Output = Result<T, TransportError>> + Send + 'a>>;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransportError {
    #[error("assistant service unavailable: {message}")]
    Unavailable { message: String },
    #[error("assistant service request timed out")]
    Timeout,
    #[error("assistant service rejected request: status={status}")]
    Rejected { status: u16, detail: Option<String> },
    #[error("assistant service returned an invalid payload: {message}")]
    InvalidResponse { message: String },
}

impl TransportError {
    /// Server-provided `detail` text, when the backend sent one.
    pub fn detail(&self) -> Option<&str> {
        match self {
            Self::Rejected {
                detail: Some(detail),
                ..
            } => Some(detail.as_str()),
            _ => None,
        }
    }

    /// Text shown to the user in the conversation when a request fails.
    pub fn user_message(&self) -> String {
        if let Some(detail) = self.detail() {
            return detail.to_string();
        }

        match self {
            Self::Unavailable { .. } => {
                "Request failed: unable to reach the assistant service".to_string()
            }
            Self::Timeout => "Request failed: the assistant service timed out".to_string(),
            Self::Rejected { status, .. } => format!("Request failed with status code {status}"),
            Self::InvalidResponse { .. } => {
                "Request failed: the assistant service returned an unreadable response".to_string()
            }
        }
    }
}

/// Remote calls the session manager depends on.
pub trait AssistantTransport: Send + Sync {
    fn create_session<'a>(&'a self) -> TransportFuture<'a, NewSessionResponse>;

    fn send_message<'a>(
        &'a self,
        request: AssistantRequest,
    ) -> TransportFuture<'a, AssistantResponse>;
}

#[cfg(test)]
mod tests {
    use super::TransportError;

    #[test]
    fn user_message_surfaces_server_detail_verbatim() {
        let err = TransportError::Rejected {
            status: 429,
            detail: Some("rate limited".to_string()),
        };

        assert_eq!(err.user_message(), "rate limited");
    }

    #[test]
    fn user_message_falls_back_to_generic_text() {
        let rejected = TransportError::Rejected {
            status: 500,
            detail: None,
        };
        let unavailable = TransportError::Unavailable {
            message: "connection refused".to_string(),
        };

        assert_eq!(
            rejected.user_message(),
            "Request failed with status code 500"
        );
        assert!(unavailable.user_message().starts_with("Request failed"));
        assert!(!unavailable.user_message().contains("connection refused"));
    }
}
