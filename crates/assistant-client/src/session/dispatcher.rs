use std::sync::{Arc, Mutex, MutexGuard};

use thiserror::Error;
use tokio::sync::broadcast;
use tracing::{debug, info, warn};

use super::events::SessionEvent;
use super::identity::{Session, SessionCreationError, SessionIdentity};
use super::message::{Message, MessageId};
use super::store::ConversationStore;
use super::suggestions::format_suggestions;
use super::typing::TypingIndicator;
use crate::api::{AssistantTransport, TransportError};
use crate::config::ClientConfig;
use crate::models::{AssistantRequest, AssistantResponse, ExchangeTurn};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DispatchError {
    #[error("assistant request failed: {0}")]
    Transport(#[from] TransportError),
}

impl DispatchError {
    pub fn user_message(&self) -> String {
        match self {
            Self::Transport(err) => err.user_message(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum DispatchOutcome {
    /// Blank text; nothing was appended and no request was issued.
    Rejected,
    /// Another send is in flight and overlapping sends are disabled.
    Busy,
    Delivered {
        reply: MessageId,
        suggestions: Option<MessageId>,
    },
    Failed {
        error: DispatchError,
        notice: MessageId,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct SessionSnapshot {
    pub session: Option<Session>,
    pub messages: Vec<Message>,
    pub exchange_history: Vec<ExchangeTurn>,
    pub typing: bool,
}

#[derive(Debug, Default)]
struct SessionState {
    store: ConversationStore,
    identity: SessionIdentity,
    typing: TypingIndicator,
    in_flight: usize,
}

enum Admission {
    Rejected,
    Busy,
    Admitted(AssistantRequest),
}

struct Inner {
    transport: Arc<dyn AssistantTransport>,
    state: Mutex<SessionState>,
    events: broadcast::Sender<SessionEvent>,
    allow_overlapping_sends: bool,
}

/// Conversational session manager.
///
/// Each `send` runs `Idle -> Sending -> Idle`: the user message is appended
/// and the typing indicator raised before the remote call, and the indicator
/// is lowered on every exit path, including a dropped future. State is only
/// locked between suspension points, so several sends may be in flight at
/// once; their responses are applied in the order they resolve.
#[derive(Clone)]
pub struct ChatSession {
    inner: Arc<Inner>,
}

impl ChatSession {
    pub fn new(transport: Arc<dyn AssistantTransport>, config: &ClientConfig) -> Self {
        let (events, _) = broadcast::channel(config.event_capacity.max(1));
        Self {
            inner: Arc::new(Inner {
                transport,
                state: Mutex::new(SessionState::default()),
                events,
                allow_overlapping_sends: config.allow_overlapping_sends,
            }),
        }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<SessionEvent> {
        self.inner.events.subscribe()
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        let state = self.lock_state();
        SessionSnapshot {
            session: state.identity.session().cloned(),
            messages: state.store.messages().to_vec(),
            exchange_history: state.store.exchange_history().to_vec(),
            typing: state.typing.is_active(),
        }
    }

    pub fn messages(&self) -> Vec<Message> {
        self.lock_state().store.messages().to_vec()
    }

    pub fn exchange_history(&self) -> Vec<ExchangeTurn> {
        self.lock_state().store.exchange_history().to_vec()
    }

    pub fn session_id(&self) -> String {
        self.lock_state().identity.current().to_string()
    }

    pub fn is_typing(&self) -> bool {
        self.lock_state().typing.is_active()
    }

    /// Startup session creation. A failure is logged and leaves the id empty;
    /// sends still proceed.
    pub async fn initialize(&self) -> Result<(), SessionCreationError> {
        self.create_session().await
    }

    pub async fn start_new_chat(&self) -> Result<(), SessionCreationError> {
        self.transition(|state, events| {
            state.store.clear();
            state.identity.clear();
            events.push(SessionEvent::Cleared);
        });
        info!("started new chat");
        self.create_session().await
    }

    pub async fn send(&self, text: &str) -> DispatchOutcome {
        let request = match self.admit(text) {
            Admission::Rejected => {
                debug!("ignoring blank outgoing message");
                return DispatchOutcome::Rejected;
            }
            Admission::Busy => {
                debug!("refusing send while another request is in flight");
                return DispatchOutcome::Busy;
            }
            Admission::Admitted(request) => request,
        };

        let mut guard = InFlightGuard::new(self);
        let result = self.inner.transport.send_message(request).await;
        guard.disarm();

        match result {
            Ok(response) => self.apply_response(response),
            Err(err) => self.apply_failure(DispatchError::from(err)),
        }
    }

    fn admit(&self, text: &str) -> Admission {
        if text.trim().is_empty() {
            return Admission::Rejected;
        }

        self.transition(|state, events| {
            if !self.inner.allow_overlapping_sends && state.in_flight > 0 {
                return Admission::Busy;
            }

            let Some(message) = state.store.append_user(text) else {
                return Admission::Rejected;
            };
            events.push(SessionEvent::MessageAppended(message.clone()));
            if state.typing.on() {
                events.push(SessionEvent::TypingChanged(true));
            }
            state.in_flight += 1;

            debug!(
                session_id = state.identity.current(),
                history_turns = state.store.exchange_history().len(),
                "dispatching message"
            );
            Admission::Admitted(AssistantRequest::conversational(
                text,
                state.identity.current(),
                state.store.exchange_history().to_vec(),
            ))
        })
    }

    fn apply_response(&self, response: AssistantResponse) -> DispatchOutcome {
        let suggestions_block = format_suggestions(response.suggestions());
        let AssistantResponse {
            ai_response,
            conversation_history,
            session_id,
            ..
        } = response;

        self.transition(|state, events| {
            settle(state, events);

            let reply = state.store.append_assistant(ai_response).clone();
            let reply_id = reply.id;
            events.push(SessionEvent::MessageAppended(reply));

            let history = conversation_history.unwrap_or_default();
            state.store.replace_exchange_history(history.clone());
            events.push(SessionEvent::HistoryReplaced(history));

            if let Some(server_session_id) = session_id.as_deref()
                && state.identity.adopt(server_session_id)
            {
                info!(
                    session_id = state.identity.current(),
                    "adopted server-issued session id"
                );
                events.push(SessionEvent::SessionChanged {
                    session_id: state.identity.current().to_string(),
                });
            }

            let suggestions = suggestions_block.map(|block| {
                let message = state.store.append_assistant(block).clone();
                let message_id = message.id;
                events.push(SessionEvent::MessageAppended(message));
                message_id
            });

            DispatchOutcome::Delivered {
                reply: reply_id,
                suggestions,
            }
        })
    }

    fn apply_failure(&self, error: DispatchError) -> DispatchOutcome {
        warn!("{error}");
        let text = error.user_message();

        self.transition(|state, events| {
            settle(state, events);

            let notice = state.store.append_error(text).clone();
            let notice_id = notice.id;
            events.push(SessionEvent::MessageAppended(notice));

            DispatchOutcome::Failed {
                error,
                notice: notice_id,
            }
        })
    }

    async fn create_session(&self) -> Result<(), SessionCreationError> {
        let session = match SessionIdentity::create(self.inner.transport.as_ref()).await {
            Ok(session) => session,
            Err(err) => {
                warn!("failed to create chat session: {err}");
                return Err(err);
            }
        };

        let session_id = session.id.clone();
        let installed = self.transition(|state, events| {
            let installed = state.identity.install(session);
            if installed {
                events.push(SessionEvent::SessionChanged {
                    session_id: session_id.clone(),
                });
            }
            installed
        });

        if installed {
            info!(session_id = %session_id, "chat session created");
        } else {
            debug!(
                session_id = %session_id,
                "discarding created session; server already issued one"
            );
        }
        Ok(())
    }

    /// Mutates state under the lock and publishes the resulting events before
    /// releasing it, so observers see events in state order.
    fn transition<R>(
        &self,
        apply: impl FnOnce(&mut SessionState, &mut Vec<SessionEvent>) -> R,
    ) -> R {
        let mut state = self.lock_state();
        let mut events = Vec::new();
        let result = apply(&mut *state, &mut events);
        for event in events {
            // A send only fails when nobody is subscribed.
            let _ = self.inner.events.send(event);
        }
        result
    }

    fn lock_state(&self) -> MutexGuard<'_, SessionState> {
        match self.inner.state.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }
}

fn settle(state: &mut SessionState, events: &mut Vec<SessionEvent>) {
    state.in_flight = state.in_flight.saturating_sub(1);
    if state.typing.off() {
        events.push(SessionEvent::TypingChanged(false));
    }
}

/// Lowers the typing indicator if a send future is dropped mid-flight.
struct InFlightGuard<'a> {
    session: &'a ChatSession,
    armed: bool,
}

impl<'a> InFlightGuard<'a> {
    fn new(session: &'a ChatSession) -> Self {
        Self {
            session,
            armed: true,
        }
    }

    fn disarm(&mut self) {
        self.armed = false;
    }
}

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        if self.armed {
            warn!("assistant request abandoned before it settled");
            self.session.transition(settle);
        }
    }
}
