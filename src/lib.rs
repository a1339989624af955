//! Nitra chat panel library.
//!
//! A mock conversational assistant: a chat store backed by canned replies,
//! a markdown-to-safe-HTML renderer and a typing reveal animation, plus the
//! egui front end that ties them together.

pub mod app;
pub mod backend;
pub mod config;
pub mod delay;
pub mod error;
pub mod logging;
pub mod markdown;
pub mod message;
pub mod mock;
pub mod protocol;
pub mod state;
pub mod store;
pub mod typing;
pub mod ui;


pub use error::{ChatError, ChatResult};
pub use message::{Message, Role};
pub use store::{ChatStore, PendingReply};
