//! Application module structure for NitraApp
//!
//! This module organizes the chat panel into focused submodules:
//! - `core`: NitraApp struct, initialization and shutdown
//! - `events`: Store event processing and reveal animation driving
//! - `update`: Main update loop and global shortcuts
//! - `ui::panels`: Header and central transcript panel rendering
//! - `ui::input`: Message input panel and starter questions

pub mod core;
pub mod events;
pub mod update;
pub mod ui;

// Re-export NitraApp for public API
pub use self::core::{ActiveReveal, NitraApp};
