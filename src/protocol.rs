use crate::message::Message;
use crate::store::PendingReply;

/// Actions sent from the UI to the Backend
#[derive(Debug)]
pub enum BackendAction {
    /// Wait out the mock delay and append the assistant reply
    AwaitReply(PendingReply),
    /// Stop the backend loop; pending replies are dropped
    Shutdown,
}

/// Events sent from the store to the UI
#[derive(Debug, Clone, PartialEq)]
pub enum ChatEvent {
    /// A message was appended to the transcript
    MessageAdded(Message),
    /// The "awaiting response" flag changed
    LoadingChanged(bool),
    /// The transcript was cleared
    Cleared,
    /// A reply could not be produced
    Error(String),
}
