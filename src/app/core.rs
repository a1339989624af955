//! Core NitraApp struct definition and initialization

use crossbeam_channel::{unbounded, Receiver, Sender};
use eframe::egui;
use std::collections::HashMap;
use std::sync::Arc;
use std::thread::{self, JoinHandle};

use crate::backend::run_backend;
use crate::config::{load_settings, save_settings, Settings};
use crate::protocol::{BackendAction, ChatEvent};
use crate::store::ChatStore;
use crate::typing::{FrameTicket, TypingReveal};
use crate::ui;

/// Reveal animation for one assistant message, keyed by message id.
#[derive(Debug)]
pub struct ActiveReveal {
    pub reveal: TypingReveal,
    pub ticket: Option<FrameTicket>,
}

pub struct NitraApp {
    // Transcript and loading flag
    pub store: ChatStore,

    // Channels for backend communication
    pub action_tx: Sender<BackendAction>,
    pub event_rx: Receiver<ChatEvent>,

    // Message composition
    pub message_input: String,

    // In-flight reveal animations
    pub reveals: HashMap<String, ActiveReveal>,

    // Questions offered before the first exchange
    pub starter_questions: Vec<String>,

    // Most recent reply failure, shown in the header
    pub last_error: Option<String>,

    pub settings: Settings,

    // Used by reveal callbacks to request redraws
    pub(crate) egui_ctx: egui::Context,

    backend: Option<JoinHandle<()>>,
    persist_settings: bool,
}

impl NitraApp {
    /// Get the current theme based on the theme string ("dark" or "light")
    pub(super) fn get_theme(&self) -> ui::theme::ChatTheme {
        match self.settings.theme.as_str() {
            "light" => ui::theme::ChatTheme::light(),
            _ => ui::theme::ChatTheme::dark(),
        }
    }

    pub fn new(cc: &eframe::CreationContext<'_>) -> Self {
        let settings = load_settings().unwrap_or_default();
        match settings.theme.as_str() {
            "light" => cc.egui_ctx.set_visuals(egui::Visuals::light()),
            _ => cc.egui_ctx.set_visuals(egui::Visuals::dark()),
        }

        // Create channels for UI <-> Backend
        let (action_tx, action_rx) = unbounded::<BackendAction>();
        let (event_tx, event_rx) = unbounded::<ChatEvent>();

        // Spawn the backend thread
        let backend = thread::spawn(move || {
            run_backend(action_rx);
        });

        let table = settings.load_mock_table();
        let starter_questions = table.questions().into_iter().map(String::from).collect();
        let store = ChatStore::new(Arc::new(table), Arc::new(settings.mock_delay.to_delay()))
            .with_events(event_tx);

        let mut app = Self::from_parts(
            store,
            action_tx,
            event_rx,
            settings,
            cc.egui_ctx.clone(),
        );
        app.starter_questions = starter_questions;
        app.backend = Some(backend);
        app.persist_settings = true;
        app.store.initialize_chat();
        app
    }

    /// Assemble an app around an existing store, without spawning a backend
    /// or persisting settings on drop.
    pub fn from_parts(
        store: ChatStore,
        action_tx: Sender<BackendAction>,
        event_rx: Receiver<ChatEvent>,
        settings: Settings,
        egui_ctx: egui::Context,
    ) -> Self {
        Self {
            store,
            action_tx,
            event_rx,
            message_input: String::new(),
            reveals: HashMap::new(),
            starter_questions: Vec::new(),
            last_error: None,
            settings,
            egui_ctx,
            backend: None,
            persist_settings: false,
        }
    }

    /// Send `text` as a user message and hand the reply to the backend.
    pub fn submit(&mut self, text: &str) {
        let Some(pending) = self.store.begin_send(text) else {
            return;
        };
        self.last_error = None;
        // On failure the returned action (and its loading guard) is dropped here
        if self.action_tx.send(BackendAction::AwaitReply(pending)).is_err() {
            log::error!("Backend is not running, reply dropped");
            self.last_error = Some("Assistant is unavailable".into());
        }
    }

    /// Send whatever is in the input box and clear it.
    pub(super) fn submit_input(&mut self) {
        let text = std::mem::take(&mut self.message_input);
        self.submit(&text);
    }

    pub fn clear_chat(&mut self) {
        self.store.clear_messages();
        self.last_error = None;
    }

    pub(super) fn toggle_theme(&mut self, ctx: &egui::Context) {
        if self.settings.theme == "light" {
            self.settings.theme = "dark".into();
            ctx.set_visuals(egui::Visuals::dark());
        } else {
            self.settings.theme = "light".into();
            ctx.set_visuals(egui::Visuals::light());
        }
    }
}

impl Drop for NitraApp {
    fn drop(&mut self) {
        let _ = self.action_tx.send(BackendAction::Shutdown);
        if let Some(handle) = self.backend.take() {
            let _ = handle.join();
        }

        // Persist settings on exit
        if self.persist_settings {
            if let Err(e) = save_settings(&self.settings) {
                log::error!("Failed to save settings: {}", e);
            }
        }
    }
}
