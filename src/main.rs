//! Nitra AI - a mock assistant chat panel built with egui
//!
//! Architecture:
//! - Main thread: runs the egui UI and owns the chat store handle
//! - Backend thread: runs a Tokio runtime that waits out mock reply delays
//! - Communication via crossbeam channels (lock-free, sync-safe)

use eframe::egui;

use nitra_chat::app::NitraApp;
use nitra_chat::logging::init_logging;

fn main() -> eframe::Result<()> {
    init_logging();

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([480.0, 720.0])
            .with_min_inner_size([320.0, 400.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Nitra AI",
        options,
        Box::new(|cc| Ok(Box::new(NitraApp::new(cc)))),
    )
}
