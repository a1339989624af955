//! UI rendering modules for the chat panel.
//!
//! - `format`: Markdown to styled lines for bubbles
//! - `messages`: Message bubbles, suggestion chips and copy actions
//! - `theme`: Color schemes

pub mod format;
pub mod messages;
pub mod theme;

pub use format::*;
pub use messages::*;
pub use theme::*;
