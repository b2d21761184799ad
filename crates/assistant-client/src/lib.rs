pub mod api;
pub mod config;
mod config_env;
pub mod models;
pub mod session;

pub use api::{
    AssistantTransport, HttpAssistantClient, HttpClientBuildError, OneShotError, TransportError,
    TransportFuture, ask_once,
};
pub use config::{ClientConfig, ConfigError};
pub use models::{
    AssistantRequest, AssistantResponse, DeleteSessionResponse, ExchangeTurn, HealthResponse,
    NewSessionResponse, SessionMessagesResponse,
};
pub use session::{
    ChatSession, DispatchError, DispatchOutcome, Message, MessageId, MessageRole, Session,
    SessionCreationError, SessionEvent, SessionSnapshot,
};
