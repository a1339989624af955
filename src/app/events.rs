//! Store event processing and reveal animation driving

use std::time::Instant;

use super::{ActiveReveal, NitraApp};
use crate::message::{Message, Role};
use crate::protocol::ChatEvent;
use crate::typing::TypingReveal;

impl NitraApp {
    pub fn process_events(&mut self) {
        // Drain all pending events from the store
        while let Ok(event) = self.event_rx.try_recv() {
            self.process_single_event(event, Instant::now());
        }
    }

    fn process_single_event(&mut self, event: ChatEvent, now: Instant) {
        match event {
            ChatEvent::MessageAdded(message) => {
                if message.role == Role::Assistant {
                    self.start_reveal(&message, now);
                }
            }
            ChatEvent::LoadingChanged(loading) => {
                log::trace!("Loading: {}", loading);
            }
            ChatEvent::Cleared => {
                self.reveals.clear();
            }
            ChatEvent::Error(msg) => {
                self.last_error = Some(msg);
            }
        }
    }

    fn start_reveal(&mut self, message: &Message, now: Instant) {
        let ctx = self.egui_ctx.clone();
        let options = self
            .settings
            .typing
            .to_options()
            .with_on_update(move || ctx.request_repaint());

        let mut reveal = TypingReveal::new(message.content.clone(), options);
        let ticket = reveal.start_typing(now);
        if ticket.is_some() {
            self.reveals
                .insert(message.id.clone(), ActiveReveal { reveal, ticket });
        }
    }

    /// Step every running reveal. Finished ones are dropped so the message
    /// renders from the store again. Returns true while any are running.
    pub fn advance_reveals(&mut self, now: Instant) -> bool {
        for active in self.reveals.values_mut() {
            if let Some(ticket) = active.ticket {
                active.ticket = active.reveal.on_frame(ticket, now);
            }
        }
        self.reveals.retain(|_, active| active.ticket.is_some());
        !self.reveals.is_empty()
    }

    /// Text to show for `message`: the revealed prefix while animating,
    /// otherwise the full content.
    pub fn visible_content<'a>(&'a self, message: &'a Message) -> (&'a str, bool) {
        match self.reveals.get(&message.id) {
            Some(active) => (active.reveal.displayed(), true),
            None => (message.content.as_str(), false),
        }
    }
}
