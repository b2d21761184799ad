use std::fmt;

use reqwest::Url;
use serde::de::DeserializeOwned;
use thiserror::Error;
use tracing::{debug, warn};

use super::transport::{AssistantTransport, TransportError, TransportFuture};
use crate::config::{ClientConfig, ConfigError};
use crate::models::{
    AssistantRequest, AssistantResponse, DeleteSessionResponse, ErrorBody, HealthResponse,
    NewSessionResponse, SessionMessagesResponse,
};

pub const NEW_SESSION_PATH: &str = "/chat/new-session";
pub const TASK_ASSISTANT_PATH: &str = "/task/assistant";
pub const CHAT_SESSION_PATH: &str = "/chat/session";
pub const HEALTH_PATH: &str = "/health";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApiOperation {
    NewSession,
    TaskAssistant,
    FetchSession,
    DeleteSession,
    Health,
}

impl fmt::Display for ApiOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NewSession => write!(f, "new_session"),
            Self::TaskAssistant => write!(f, "task_assistant"),
            Self::FetchSession => write!(f, "fetch_session"),
            Self::DeleteSession => write!(f, "delete_session"),
            Self::Health => write!(f, "health"),
        }
    }
}

#[derive(Debug, Error)]
pub enum HttpClientBuildError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("failed to build assistant http client: {0}")]
    HttpClient(String),
}

#[derive(Clone)]
pub struct HttpAssistantClient {
    base_url: String,
    http_client: reqwest::Client,
}

impl HttpAssistantClient {
    pub fn new(config: &ClientConfig) -> Result<Self, HttpClientBuildError> {
        config.validate()?;
        let http_client = reqwest::Client::builder()
            .timeout(config.timeout())
            .build()
            .map_err(|err| HttpClientBuildError::HttpClient(err.to_string()))?;

        Ok(Self::with_http_client(
            config.api_base_url.clone(),
            http_client,
        ))
    }

    pub fn with_http_client(base_url: String, http_client: reqwest::Client) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            http_client,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub async fn create_chat_session(&self) -> Result<NewSessionResponse, TransportError> {
        let request = self.http_client.post(self.endpoint(NEW_SESSION_PATH));
        self.execute(ApiOperation::NewSession, request).await
    }

    pub async fn process_task(
        &self,
        payload: &AssistantRequest,
    ) -> Result<AssistantResponse, TransportError> {
        debug!(
            history_turns = payload
                .conversation_history
                .as_ref()
                .map_or(0, Vec::len),
            has_session = payload
                .session_id
                .as_deref()
                .is_some_and(|id| !id.is_empty()),
            "posting task assistant request"
        );
        let request = self
            .http_client
            .post(self.endpoint(TASK_ASSISTANT_PATH))
            .json(payload);
        self.execute(ApiOperation::TaskAssistant, request).await
    }

    pub async fn fetch_session_messages(
        &self,
        session_id: &str,
    ) -> Result<SessionMessagesResponse, TransportError> {
        let request = self.http_client.get(self.session_url(session_id)?);
        self.execute(ApiOperation::FetchSession, request).await
    }

    pub async fn delete_session(
        &self,
        session_id: &str,
    ) -> Result<DeleteSessionResponse, TransportError> {
        let request = self.http_client.delete(self.session_url(session_id)?);
        self.execute(ApiOperation::DeleteSession, request).await
    }

    pub async fn health(&self) -> Result<HealthResponse, TransportError> {
        let request = self.http_client.get(self.endpoint(HEALTH_PATH));
        self.execute(ApiOperation::Health, request).await
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn session_url(&self, session_id: &str) -> Result<Url, TransportError> {
        let mut url = Url::parse(&self.endpoint(CHAT_SESSION_PATH)).map_err(|err| {
            TransportError::Unavailable {
                message: format!("invalid session url: {err}"),
            }
        })?;
        url.path_segments_mut()
            .map_err(|_| TransportError::Unavailable {
                message: "assistant base url cannot carry path segments".to_string(),
            })?
            .push(session_id);
        Ok(url)
    }

    async fn execute<Res>(
        &self,
        operation: ApiOperation,
        request: reqwest::RequestBuilder,
    ) -> Result<Res, TransportError>
    where
        Res: DeserializeOwned,
    {
        let response = request.send().await.map_err(|err| {
            warn!(operation = %operation, "assistant service request failed: {err}");
            if err.is_timeout() {
                TransportError::Timeout
            } else {
                TransportError::Unavailable {
                    message: err.to_string(),
                }
            }
        })?;

        let status = response.status();
        let bytes = response.bytes().await.map_err(|err| {
            if err.is_timeout() {
                TransportError::Timeout
            } else {
                TransportError::InvalidResponse {
                    message: format!("failed to read {operation} response body: {err}"),
                }
            }
        })?;

        if status.is_success() {
            return serde_json::from_slice::<Res>(&bytes).map_err(|err| {
                TransportError::InvalidResponse {
                    message: format!("failed to parse {operation} response: {err}"),
                }
            });
        }

        let detail = serde_json::from_slice::<ErrorBody>(&bytes)
            .ok()
            .and_then(|body| body.detail_text());
        warn!(
            operation = %operation,
            status = status.as_u16(),
            has_detail = detail.is_some(),
            "assistant service returned an error status"
        );

        Err(TransportError::Rejected {
            status: status.as_u16(),
            detail,
        })
    }
}

impl AssistantTransport for HttpAssistantClient {
    fn create_session<'a>(&'a self) -> TransportFuture<'a, NewSessionResponse> {
        Box::pin(self.create_chat_session())
    }

    fn send_message<'a>(
        &'a self,
        request: AssistantRequest,
    ) -> TransportFuture<'a, AssistantResponse> {
        Box::pin(async move { self.process_task(&request).await })
    }
}

#[cfg(test)]
mod tests {
    use super::{ApiOperation, HttpAssistantClient};

    fn client(base_url: &str) -> HttpAssistantClient {
        HttpAssistantClient::with_http_client(base_url.to_string(), reqwest::Client::new())
    }

    #[test]
    fn base_url_drops_trailing_slash() {
        assert_eq!(
            client("http://localhost:8000/").base_url(),
            "http://localhost:8000"
        );
    }

    #[test]
    fn session_url_percent_encodes_the_session_id() {
        let url = client("http://localhost:8000/api")
            .session_url("a b/c")
            .expect("session url should build");

        assert_eq!(
            url.as_str(),
            "http://localhost:8000/api/chat/session/a%20b%2Fc"
        );
    }

    #[test]
    fn operations_render_as_snake_case() {
        assert_eq!(ApiOperation::TaskAssistant.to_string(), "task_assistant");
        assert_eq!(ApiOperation::NewSession.to_string(), "new_session");
    }
}
