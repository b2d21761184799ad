pub mod http;
pub mod one_shot;
pub mod transport;

pub use http::{HttpAssistantClient, HttpClientBuildError};
pub use one_shot::{OneShotError, ask_once};
pub use transport::{AssistantTransport, TransportError, TransportFuture};
