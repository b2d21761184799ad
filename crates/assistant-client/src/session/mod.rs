mod dispatcher;
mod events;
mod identity;
mod message;
mod store;
mod suggestions;
mod typing;

pub use dispatcher::{ChatSession, DispatchError, DispatchOutcome, SessionSnapshot};
pub use events::SessionEvent;
pub use identity::{Session, SessionCreationError, SessionIdentity};
pub use message::{Message, MessageId, MessageRole};
pub use store::ConversationStore;
pub use suggestions::{SUGGESTION_BULLET, SUGGESTIONS_HEADER, format_suggestions};
pub use typing::TypingIndicator;
