use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::api::{AssistantTransport, TransportError};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub id: String,
    pub created_at: DateTime<Utc>,
}

impl Session {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            created_at: Utc::now(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionCreationError {
    #[error("new-session request failed: {0}")]
    Transport(#[from] TransportError),
    #[error("new-session response carried an empty session id")]
    EmptySessionId,
}

/// Holds the one active session. Empty until a create or a server response
/// provides an id.
#[derive(Debug, Clone, Default)]
pub struct SessionIdentity {
    session: Option<Session>,
}

impl SessionIdentity {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn create(
        transport: &dyn AssistantTransport,
    ) -> Result<Session, SessionCreationError> {
        let response = transport.create_session().await?;
        let session_id = response.session_id.trim();
        if session_id.is_empty() {
            return Err(SessionCreationError::EmptySessionId);
        }
        Ok(Session::new(session_id))
    }

    /// Empty string when no session is active; the backend accepts that and
    /// allocates one on the next exchange.
    pub fn current(&self) -> &str {
        self.session.as_ref().map_or("", |session| session.id.as_str())
    }

    pub fn session(&self) -> Option<&Session> {
        self.session.as_ref()
    }

    /// Installs a freshly created session unless the server already issued
    /// one through `adopt` while the create call was in flight.
    pub fn install(&mut self, session: Session) -> bool {
        if self.session.is_some() {
            return false;
        }
        self.session = Some(session);
        true
    }

    /// Returns true when the active id changed.
    pub fn adopt(&mut self, server_session_id: &str) -> bool {
        let server_session_id = server_session_id.trim();
        if server_session_id.is_empty() || server_session_id == self.current() {
            return false;
        }
        self.session = Some(Session::new(server_session_id));
        true
    }

    pub fn clear(&mut self) {
        self.session = None;
    }
}
