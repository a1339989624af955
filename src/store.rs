//! The chat store: single source of truth for the transcript and the
//! loading flag.
//!
//! `ChatStore` is a cheap, cloneable handle. The UI thread performs the
//! synchronous actions (append, clear, initialize, the first half of a
//! send) and hands the resulting `PendingReply` to the backend runtime,
//! which waits out the mock delay and appends the reply.
//!
//! Overlapping sends are not serialized: each pending reply runs its own
//! delay and replies are appended in completion order.

use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crossbeam_channel::Sender;

use crate::delay::{DelayProvider, RandomDelay};
use crate::error::ChatResult;
use crate::message::Message;
use crate::mock::{MockResponseTable, ResponseResolver, WELCOME_MESSAGE};
use crate::protocol::ChatEvent;
use crate::state::ChatState;

#[derive(Clone)]
pub struct ChatStore {
    state: Arc<Mutex<ChatState>>,
    resolver: Arc<dyn ResponseResolver>,
    delay: Arc<dyn DelayProvider>,
    events: Option<Sender<ChatEvent>>,
}

impl ChatStore {
    pub fn new(resolver: Arc<dyn ResponseResolver>, delay: Arc<dyn DelayProvider>) -> Self {
        Self {
            state: Arc::new(Mutex::new(ChatState::new())),
            resolver,
            delay,
            events: None,
        }
    }

    /// Store backed by the built-in mock table and the default random delay.
    pub fn with_mock_defaults() -> Self {
        Self::new(
            Arc::new(MockResponseTable::builtin()),
            Arc::new(RandomDelay::default()),
        )
    }

    /// Publish change events on `tx`.
    pub fn with_events(mut self, tx: Sender<ChatEvent>) -> Self {
        self.events = Some(tx);
        self
    }

    fn lock(&self) -> MutexGuard<'_, ChatState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn emit(&self, event: ChatEvent) {
        if let Some(tx) = &self.events {
            // UI gone - nothing left to notify
            let _ = tx.send(event);
        }
    }

    fn set_loading(&self, loading: bool) {
        self.lock().is_loading = loading;
        self.emit(ChatEvent::LoadingChanged(loading));
    }

    pub fn add_message(&self, message: Message) {
        self.lock().push(message.clone());
        self.emit(ChatEvent::MessageAdded(message));
    }

    /// Synchronous half of a send: append the trimmed user message and raise
    /// the loading flag. Returns `None` for blank input.
    pub fn begin_send(&self, text: &str) -> Option<PendingReply> {
        let text = text.trim();
        if text.is_empty() {
            return None;
        }

        self.add_message(Message::user(text));
        self.set_loading(true);
        log::debug!("Awaiting mock reply for {:?}", text);

        Some(PendingReply {
            store: self.clone(),
            text: text.to_string(),
            _loading: LoadingGuard {
                store: self.clone(),
            },
        })
    }

    /// Send `text` and wait for the assistant reply.
    pub async fn send_message(&self, text: &str) -> ChatResult<()> {
        match self.begin_send(text) {
            Some(pending) => pending.complete().await.map(|_| ()),
            None => Ok(()),
        }
    }

    pub fn clear_messages(&self) {
        self.lock().clear();
        self.emit(ChatEvent::Cleared);
    }

    /// Append the welcome message. Not idempotent.
    pub fn initialize_chat(&self) {
        self.add_message(Message::assistant(WELCOME_MESSAGE));
    }

    pub fn messages(&self) -> Vec<Message> {
        self.lock().messages.clone()
    }

    pub fn is_loading(&self) -> bool {
        self.lock().is_loading
    }

    pub fn has_messages(&self) -> bool {
        self.lock().has_messages()
    }

    pub fn last_message(&self) -> Option<Message> {
        self.lock().last_message().cloned()
    }

    pub fn snapshot(&self) -> ChatState {
        self.lock().clone()
    }
}

impl fmt::Debug for ChatStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChatStore")
            .field("state", &*self.lock())
            .finish_non_exhaustive()
    }
}

/// Clears the loading flag when dropped, whichever way the reply ends.
struct LoadingGuard {
    store: ChatStore,
}

impl Drop for LoadingGuard {
    fn drop(&mut self) {
        self.store.set_loading(false);
    }
}

/// Second half of a send, created by `ChatStore::begin_send`.
///
/// Dropping it without completing still clears the loading flag.
pub struct PendingReply {
    store: ChatStore,
    text: String,
    _loading: LoadingGuard,
}

impl PendingReply {
    /// Trimmed user text this reply answers.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Wait out the mock delay, resolve the reply and append it.
    pub async fn complete(self) -> ChatResult<Message> {
        let delay = self.store.delay.next_delay();
        tokio::time::sleep(delay).await;

        let reply = match self.store.resolver.resolve(&self.text) {
            Ok(reply) => reply,
            Err(e) => {
                log::warn!("Failed to resolve reply for {:?}: {}", self.text, e);
                self.store.emit(ChatEvent::Error(e.to_string()));
                return Err(e);
            }
        };
        self.store.add_message(reply.clone());
        log::debug!("Mock reply {} appended after {:?}", reply.id, delay);
        Ok(reply)
    }
}

impl fmt::Debug for PendingReply {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PendingReply")
            .field("text", &self.text)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::delay::FixedDelay;
    use crate::error::ChatError;
    use crate::message::Role;
    use crate::mock::FALLBACK_REPLY;
    use crossbeam_channel::unbounded;
    use std::time::Duration;

    struct FailingResolver;

    impl ResponseResolver for FailingResolver {
        fn resolve(&self, _user_text: &str) -> ChatResult<Message> {
            Err(ChatError::Resolution("backend unavailable".into()))
        }
    }

    struct PanickingResolver;

    impl ResponseResolver for PanickingResolver {
        fn resolve(&self, _user_text: &str) -> ChatResult<Message> {
            panic!("resolver blew up");
        }
    }

    fn store_with_delay(delay: Duration) -> ChatStore {
        let mut table = MockResponseTable::new();
        table.insert("X", "Here is info.\nSuggested Question: What about Y?");
        ChatStore::new(Arc::new(table), Arc::new(FixedDelay(delay)))
    }

    #[tokio::test(start_paused = true)]
    async fn test_send_appends_user_and_assistant() {
        let store = store_with_delay(Duration::from_secs(2));
        store.send_message("  X  ").await.unwrap();

        let messages = store.messages();
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0].role, Role::User);
        assert_eq!(messages[0].content, "X");
        assert_eq!(messages[1].role, Role::Assistant);
        assert_eq!(messages[1].content, "Here is info.");
        assert_eq!(messages[1].suggestion.as_deref(), Some("What about Y?"));
        assert!(!store.is_loading());
    }

    #[tokio::test(start_paused = true)]
    async fn test_send_unmatched_uses_fallback() {
        let store = store_with_delay(Duration::ZERO);
        store.send_message("Hello").await.unwrap();

        let last = store.last_message().unwrap();
        assert_eq!(last.content, FALLBACK_REPLY);
        assert!(last.suggestion.is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn test_blank_send_is_noop() {
        let store = store_with_delay(Duration::ZERO);
        for text in ["", "   ", "\n\t"] {
            store.send_message(text).await.unwrap();
        }
        assert!(!store.has_messages());
        assert!(!store.is_loading());
        assert!(store.begin_send(" ").is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn test_loading_spans_the_delay() {
        let store = store_with_delay(Duration::from_secs(3));
        let task = {
            let store = store.clone();
            tokio::spawn(async move { store.send_message("X").await })
        };

        tokio::time::sleep(Duration::from_secs(1)).await;
        assert!(store.is_loading());
        assert_eq!(store.messages().len(), 1);
        assert_eq!(store.last_message().unwrap().role, Role::User);

        task.await.unwrap().unwrap();
        assert!(!store.is_loading());
        assert_eq!(store.messages().len(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_begin_send_is_synchronous() {
        let store = store_with_delay(Duration::from_secs(1));
        let pending = store.begin_send("X").unwrap();
        assert_eq!(pending.text(), "X");
        assert!(store.is_loading());
        assert_eq!(store.messages().len(), 1);

        let reply = pending.complete().await.unwrap();
        assert_eq!(store.last_message(), Some(reply));
        assert!(!store.is_loading());
    }

    #[tokio::test(start_paused = true)]
    async fn test_resolver_error_clears_loading() {
        let store = ChatStore::new(Arc::new(FailingResolver), Arc::new(FixedDelay::default()));
        let result = store.send_message("anything").await;

        assert!(matches!(result, Err(ChatError::Resolution(_))));
        assert!(!store.is_loading());
        // Only the user message made it in
        assert_eq!(store.messages().len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_resolver_panic_clears_loading() {
        let store = ChatStore::new(Arc::new(PanickingResolver), Arc::new(FixedDelay::default()));
        let pending = store.begin_send("anything").unwrap();

        let result = tokio::spawn(pending.complete()).await;
        assert!(result.is_err());
        assert!(!store.is_loading());
    }

    #[test]
    fn test_dropped_pending_reply_clears_loading() {
        let store = store_with_delay(Duration::from_secs(1));
        let pending = store.begin_send("X").unwrap();
        assert!(store.is_loading());

        drop(pending);
        assert!(!store.is_loading());
        assert_eq!(store.messages().len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_overlapping_sends_append_in_completion_order() {
        let mut table = MockResponseTable::new();
        table.insert("slow", "slow reply");
        table.insert("fast", "fast reply");
        let slow_store = ChatStore::new(
            Arc::new(table),
            Arc::new(FixedDelay(Duration::from_secs(5))),
        );
        // Same transcript, shorter delay for the second send
        let fast_store = ChatStore {
            delay: Arc::new(FixedDelay(Duration::from_secs(1))),
            ..slow_store.clone()
        };

        let slow = slow_store.begin_send("slow").unwrap();
        let fast = fast_store.begin_send("fast").unwrap();
        let (a, b) = tokio::join!(slow.complete(), fast.complete());
        a.unwrap();
        b.unwrap();

        let contents: Vec<String> =
            slow_store.messages().into_iter().map(|m| m.content).collect();
        assert_eq!(contents, vec!["slow", "fast", "fast reply", "slow reply"]);
        assert!(!slow_store.is_loading());
    }

    #[test]
    fn test_clear_messages() {
        let store = store_with_delay(Duration::ZERO);
        store.initialize_chat();
        let _pending = store.begin_send("X");
        assert!(store.is_loading());

        store.clear_messages();
        assert!(!store.has_messages());
        assert!(!store.is_loading());
        assert!(store.last_message().is_none());
    }

    #[test]
    fn test_initialize_chat_not_idempotent() {
        let store = store_with_delay(Duration::ZERO);
        store.initialize_chat();
        store.initialize_chat();

        let messages = store.messages();
        assert_eq!(messages.len(), 2);
        assert!(messages
            .iter()
            .all(|m| m.content == WELCOME_MESSAGE && m.role == Role::Assistant));
        assert_ne!(messages[0].id, messages[1].id);
    }

    #[test]
    fn test_add_message_preserves_order_and_identity() {
        let store = store_with_delay(Duration::ZERO);
        let first = Message::user("first");
        let second = Message::assistant("second");
        store.add_message(first.clone());
        store.add_message(second.clone());

        assert_eq!(store.messages(), vec![first, second.clone()]);
        assert_eq!(store.last_message(), Some(second));
    }

    #[tokio::test(start_paused = true)]
    async fn test_events_follow_send_lifecycle() {
        let (tx, rx) = unbounded();
        let store = store_with_delay(Duration::from_millis(500)).with_events(tx);

        store.send_message("X").await.unwrap();
        let events: Vec<ChatEvent> = rx.try_iter().collect();

        assert_eq!(events.len(), 4);
        assert!(matches!(&events[0], ChatEvent::MessageAdded(m) if m.role == Role::User));
        assert_eq!(events[1], ChatEvent::LoadingChanged(true));
        assert!(matches!(&events[2], ChatEvent::MessageAdded(m) if m.role == Role::Assistant));
        assert_eq!(events[3], ChatEvent::LoadingChanged(false));

        store.clear_messages();
        assert_eq!(rx.try_recv().unwrap(), ChatEvent::Cleared);
    }
}
