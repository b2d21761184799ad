use serde::{Deserialize, Serialize};

/// One canonical conversation turn as the backend understands it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExchangeTurn {
    #[serde(default)]
    pub role: String,
    #[serde(default)]
    pub content: String,
}

impl ExchangeTurn {
    pub fn new(role: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            role: role.into(),
            content: content.into(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewSessionResponse {
    pub session_id: String,
    #[serde(default)]
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssistantRequest {
    pub user_message: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub context: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub session_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub conversation_history: Option<Vec<ExchangeTurn>>,
}

impl AssistantRequest {
    pub fn conversational(
        user_message: impl Into<String>,
        session_id: impl Into<String>,
        conversation_history: Vec<ExchangeTurn>,
    ) -> Self {
        Self {
            user_message: user_message.into(),
            context: String::new(),
            session_id: Some(session_id.into()),
            conversation_history: Some(conversation_history),
        }
    }

    pub fn one_shot(user_message: impl Into<String>) -> Self {
        Self {
            user_message: user_message.into(),
            context: String::new(),
            session_id: None,
            conversation_history: None,
        }
    }

    pub fn with_context(mut self, context: impl AsRef<str>) -> Self {
        self.context = context.as_ref().trim().to_string();
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssistantResponse {
    #[serde(default)]
    pub user_message: Option<String>,
    pub ai_response: String,
    #[serde(default)]
    pub task_suggestions: Option<Vec<String>>,
    #[serde(default)]
    pub conversation_history: Option<Vec<ExchangeTurn>>,
    #[serde(default)]
    pub session_id: Option<String>,
    #[serde(default)]
    pub timestamp: Option<String>,
}

impl AssistantResponse {
    pub fn suggestions(&self) -> &[String] {
        self.task_suggestions.as_deref().unwrap_or_default()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionMessagesResponse {
    pub session_id: String,
    #[serde(default)]
    pub messages: Vec<ExchangeTurn>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeleteSessionResponse {
    #[serde(default)]
    pub message: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    #[serde(default)]
    pub timestamp: String,
}

/// Error body returned by the backend on non-2xx responses.
#[derive(Debug, Clone, Default, Deserialize)]
pub(crate) struct ErrorBody {
    #[serde(default)]
    pub detail: Option<serde_json::Value>,
}

impl ErrorBody {
    pub(crate) fn detail_text(&self) -> Option<String> {
        self.detail
            .as_ref()
            .and_then(serde_json::Value::as_str)
            .map(str::trim)
            .filter(|detail| !detail.is_empty())
            .map(ToString::to_string)
    }
}
