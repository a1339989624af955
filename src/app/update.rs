//! Main update loop and global shortcuts

use eframe::egui;
use std::time::{Duration, Instant};

use super::NitraApp;

impl eframe::App for NitraApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // Process store events (new messages, loading changes)
        self.process_events();

        // Global keyboard shortcuts
        let clear_requested =
            ctx.input(|i| i.modifiers.ctrl && i.key_pressed(egui::Key::L));
        if clear_requested {
            self.clear_chat();
        }

        // Reveal animations step once per frame; otherwise poll for replies
        if self.advance_reveals(Instant::now()) {
            ctx.request_repaint();
        } else {
            ctx.request_repaint_after(Duration::from_millis(100));
        }

        // Render UI sections
        self.render_header(ctx);
        self.render_input_panel(ctx);
        self.render_central_panel(ctx);
    }
}
