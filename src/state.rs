//! Core chat session state, separated from UI and async logic.
//!
//! `ChatState` holds the ordered transcript and the "awaiting response"
//! flag. It is owned by `ChatStore` and handed out to UI code as snapshots.

use crate::message::Message;

/// Transcript plus loading flag for a single chat session.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ChatState {
    /// Messages in insertion order. Never reordered.
    pub messages: Vec<Message>,

    /// True while a mock reply is pending.
    pub is_loading: bool,
}

impl ChatState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, message: Message) {
        self.messages.push(message);
    }

    /// Empty the transcript and reset the loading flag.
    pub fn clear(&mut self) {
        self.messages.clear();
        self.is_loading = false;
    }

    pub fn has_messages(&self) -> bool {
        !self.messages.is_empty()
    }

    pub fn last_message(&self) -> Option<&Message> {
        self.messages.last()
    }
}
