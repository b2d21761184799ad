#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use assistant_client::{
    AssistantRequest, AssistantResponse, AssistantTransport, ChatSession, ClientConfig,
    ExchangeTurn, NewSessionResponse, SessionEvent, TransportError, TransportFuture,
};
use tokio::sync::{Mutex, broadcast, mpsc, oneshot};

type ReplyResult = Result<AssistantResponse, TransportError>;

enum StubReply {
    Ready(ReplyResult),
    Deferred(oneshot::Receiver<ReplyResult>),
}

/// Scripted transport. Replies are consumed in call order; deferred replies
/// hold the request in `Sending` until the test releases them.
pub struct StubTransport {
    sessions: Mutex<VecDeque<Result<NewSessionResponse, TransportError>>>,
    replies: Mutex<VecDeque<StubReply>>,
    seen_requests: Mutex<Vec<AssistantRequest>>,
    session_calls: AtomicUsize,
    request_tx: mpsc::UnboundedSender<AssistantRequest>,
}

impl StubTransport {
    pub fn new() -> (Arc<Self>, mpsc::UnboundedReceiver<AssistantRequest>) {
        let (request_tx, request_rx) = mpsc::unbounded_channel();
        let transport = Self {
            sessions: Mutex::new(VecDeque::new()),
            replies: Mutex::new(VecDeque::new()),
            seen_requests: Mutex::new(Vec::new()),
            session_calls: AtomicUsize::new(0),
            request_tx,
        };
        (Arc::new(transport), request_rx)
    }

    pub async fn push_session(&self, session_id: &str) {
        self.sessions.lock().await.push_back(Ok(NewSessionResponse {
            session_id: session_id.to_string(),
            message: "New chat session created".to_string(),
        }));
    }

    pub async fn push_session_failure(&self, error: TransportError) {
        self.sessions.lock().await.push_back(Err(error));
    }

    pub async fn push_reply(&self, reply: ReplyResult) {
        self.replies.lock().await.push_back(StubReply::Ready(reply));
    }

    pub async fn defer_reply(&self) -> oneshot::Sender<ReplyResult> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.replies
            .lock()
            .await
            .push_back(StubReply::Deferred(reply_rx));
        reply_tx
    }

    pub fn session_calls(&self) -> usize {
        self.session_calls.load(Ordering::SeqCst)
    }

    pub async fn seen_requests(&self) -> Vec<AssistantRequest> {
        self.seen_requests.lock().await.clone()
    }
}

impl AssistantTransport for StubTransport {
    fn create_session<'a>(&'a self) -> TransportFuture<'a, NewSessionResponse> {
        Box::pin(async move {
            self.session_calls.fetch_add(1, Ordering::SeqCst);
            self.sessions
                .lock()
                .await
                .pop_front()
                .unwrap_or_else(|| {
                    Err(TransportError::Unavailable {
                        message: "missing_stub_session".to_string(),
                    })
                })
        })
    }

    fn send_message<'a>(
        &'a self,
        request: AssistantRequest,
    ) -> TransportFuture<'a, AssistantResponse> {
        Box::pin(async move {
            self.seen_requests.lock().await.push(request.clone());
            let reply = self.replies.lock().await.pop_front();
            let _ = self.request_tx.send(request);

            match reply {
                Some(StubReply::Ready(result)) => result,
                Some(StubReply::Deferred(reply_rx)) => {
                    reply_rx.await.unwrap_or_else(|_| {
                        Err(TransportError::Unavailable {
                            message: "deferred_reply_dropped".to_string(),
                        })
                    })
                }
                None => Err(TransportError::Unavailable {
                    message: "missing_stub_reply".to_string(),
                }),
            }
        })
    }
}

pub fn chat_session(transport: Arc<StubTransport>) -> ChatSession {
    ChatSession::new(transport, &ClientConfig::default())
}

pub fn reply(ai_response: &str, suggestions: &[&str], session_id: &str) -> AssistantResponse {
    AssistantResponse {
        user_message: None,
        ai_response: ai_response.to_string(),
        task_suggestions: Some(suggestions.iter().map(|item| item.to_string()).collect()),
        conversation_history: Some(vec![
            ExchangeTurn::new("user", "Plan my day"),
            ExchangeTurn::new("assistant", ai_response),
        ]),
        session_id: Some(session_id.to_string()),
        timestamp: Some("2024-01-01T00:00:00Z".to_string()),
    }
}

pub fn drain_events(events: &mut broadcast::Receiver<SessionEvent>) -> Vec<SessionEvent> {
    let mut drained = Vec::new();
    while let Ok(event) = events.try_recv() {
        drained.push(event);
    }
    drained
}

pub fn typing_transitions(events: &[SessionEvent]) -> Vec<bool> {
    events
        .iter()
        .filter_map(|event| match event {
            SessionEvent::TypingChanged(active) => Some(*active),
            _ => None,
        })
        .collect()
}
