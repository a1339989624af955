//! Character-by-character reveal of a message for display.
//!
//! `TypingReveal` is driven by its host: the host calls `start_typing` once
//! and then `on_frame` on each redraw with the ticket it was handed, passing
//! the current `Instant` every time. The number of visible characters is
//! `floor(elapsed_seconds * speed)`, capped at the content length.
//!
//! Each `reset` (and each restart) bumps a generation counter. Tickets carry
//! the generation they were issued for, so a frame or delay scheduled before
//! a reset does nothing when it arrives afterwards.

use std::fmt;
use std::time::{Duration, Instant};

pub const DEFAULT_SPEED: f64 = 100.0;

/// Callback invoked whenever the displayed content changes.
pub type UpdateCallback = Box<dyn FnMut() + Send>;

pub struct TypingOptions {
    /// When false the full content is shown immediately.
    pub enabled: bool,
    /// Characters per second.
    pub speed: f64,
    /// Wait before the first character.
    pub delay: Duration,
    pub on_update: Option<UpdateCallback>,
}

impl Default for TypingOptions {
    fn default() -> Self {
        Self {
            enabled: true,
            speed: DEFAULT_SPEED,
            delay: Duration::ZERO,
            on_update: None,
        }
    }
}

impl TypingOptions {
    pub fn with_on_update(mut self, callback: impl FnMut() + Send + 'static) -> Self {
        self.on_update = Some(Box::new(callback));
        self
    }
}

impl fmt::Debug for TypingOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TypingOptions")
            .field("enabled", &self.enabled)
            .field("speed", &self.speed)
            .field("delay", &self.delay)
            .field("on_update", &self.on_update.is_some())
            .finish()
    }
}

/// Handle for the next scheduled step. Stale after any reset.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FrameTicket {
    generation: u64,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Phase {
    Idle,
    Delayed { until: Instant },
    Running { started: Instant },
}

#[derive(Debug)]
pub struct TypingReveal {
    content: String,
    char_count: usize,
    options: TypingOptions,
    displayed: String,
    is_typing: bool,
    is_complete: bool,
    phase: Phase,
    generation: u64,
}

impl TypingReveal {
    pub fn new(content: impl Into<String>, options: TypingOptions) -> Self {
        let content = content.into();
        Self {
            char_count: content.chars().count(),
            content,
            options,
            displayed: String::new(),
            is_typing: false,
            is_complete: false,
            phase: Phase::Idle,
            generation: 0,
        }
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn displayed(&self) -> &str {
        &self.displayed
    }

    pub fn is_typing(&self) -> bool {
        self.is_typing
    }

    pub fn is_complete(&self) -> bool {
        self.is_complete
    }

    /// Ticket for the pending step, if an animation is in flight.
    pub fn active_ticket(&self) -> Option<FrameTicket> {
        match self.phase {
            Phase::Idle => None,
            _ => Some(FrameTicket {
                generation: self.generation,
            }),
        }
    }

    fn animates(&self) -> bool {
        self.options.enabled
            && !self.content.is_empty()
            && self.options.speed.is_finite()
            && self.options.speed > 0.0
    }

    fn notify(&mut self) {
        if let Some(callback) = self.options.on_update.as_mut() {
            callback();
        }
    }

    /// Begin revealing the content. Returns the ticket for the first frame,
    /// or `None` if the content was shown in full right away.
    pub fn start_typing(&mut self, now: Instant) -> Option<FrameTicket> {
        self.generation += 1;

        if !self.animates() {
            self.displayed = self.content.clone();
            self.is_typing = false;
            self.is_complete = true;
            self.phase = Phase::Idle;
            self.notify();
            return None;
        }

        self.is_typing = true;
        self.is_complete = false;
        self.displayed.clear();

        if self.options.delay > Duration::ZERO {
            self.phase = Phase::Delayed {
                until: now + self.options.delay,
            };
            self.active_ticket()
        } else {
            self.phase = Phase::Running { started: now };
            self.step(now)
        }
    }

    /// Advance the animation. Stale tickets are ignored.
    pub fn on_frame(&mut self, ticket: FrameTicket, now: Instant) -> Option<FrameTicket> {
        if ticket.generation != self.generation {
            return None;
        }

        match self.phase {
            Phase::Idle => None,
            Phase::Delayed { until } if now < until => Some(ticket),
            Phase::Delayed { .. } => {
                self.phase = Phase::Running { started: now };
                self.step(now)
            }
            Phase::Running { .. } => self.step(now),
        }
    }

    fn step(&mut self, now: Instant) -> Option<FrameTicket> {
        let Phase::Running { started } = self.phase else {
            return None;
        };

        let elapsed = now.saturating_duration_since(started).as_secs_f64();
        let shown = ((elapsed * self.options.speed).floor() as usize).min(self.char_count);
        self.displayed = prefix_chars(&self.content, shown).to_string();
        self.notify();

        if shown < self.char_count {
            self.active_ticket()
        } else {
            self.is_typing = false;
            self.is_complete = true;
            self.phase = Phase::Idle;
            self.notify();
            None
        }
    }

    /// Cancel any pending delay or frame and clear the displayed content.
    pub fn reset(&mut self) {
        self.generation += 1;
        self.phase = Phase::Idle;
        self.displayed.clear();
        self.is_typing = false;
        self.is_complete = false;
    }

    /// Swap in new content. A change resets and restarts the animation;
    /// identical content leaves the current animation alone.
    pub fn set_content(&mut self, content: impl Into<String>, now: Instant) -> Option<FrameTicket> {
        let content = content.into();
        if content == self.content {
            return self.active_ticket();
        }

        self.reset();
        self.char_count = content.chars().count();
        self.content = content;
        self.start_typing(now)
    }
}

/// First `n` chars of `s` without splitting a code point.
fn prefix_chars(s: &str, n: usize) -> &str {
    match s.char_indices().nth(n) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}
