//! Message bubble rendering for the central chat panel.

use chrono::{DateTime, Local};
use eframe::egui;

use crate::markdown::render_markdown;
use crate::message::{Message, Role};
use crate::ui::format::render_markdown_text;
use crate::ui::theme::ChatTheme;

/// Share of the panel width a bubble may use.
const BUBBLE_WIDTH_RATIO: f32 = 0.75;

/// Shown after the revealed prefix while a reply is still typing.
const TYPING_CURSOR: &str = "▍";

/// Render one message. Returns the suggestion text if its chip was clicked.
pub fn render_message(
    ui: &mut egui::Ui,
    message: &Message,
    visible: &str,
    animating: bool,
    theme: &ChatTheme,
) -> Option<String> {
    let is_user = message.role == Role::User;
    let max_width = ui.available_width() * BUBBLE_WIDTH_RATIO;
    let mut clicked = None;

    ui.horizontal(|ui| {
        if is_user {
            // Push user bubbles to the right edge
            ui.add_space(ui.available_width() - max_width);
        }

        let bubble = egui::Frame::new()
            .fill(if is_user { theme.user_bubble } else { theme.assistant_bubble })
            .corner_radius(10.0)
            .inner_margin(egui::Margin::symmetric(12, 8))
            .show(ui, |ui| {
                ui.set_max_width(max_width);
                ui.vertical(|ui| {
                    ui.horizontal(|ui| {
                        ui.label(
                            egui::RichText::new(message.role.label())
                                .size(12.0)
                                .strong()
                                .color(theme.text_secondary),
                        );
                        ui.label(
                            egui::RichText::new(format_time(&message.timestamp))
                                .size(11.0)
                                .color(theme.text_muted),
                        );
                    });

                    let body = if animating {
                        format!("{}{}", visible, TYPING_CURSOR)
                    } else {
                        visible.to_string()
                    };
                    if is_user {
                        ui.add(
                            egui::Label::new(
                                egui::RichText::new(body).size(14.0).color(theme.text_primary),
                            )
                            .wrap(),
                        );
                    } else {
                        render_markdown_text(ui, &body, theme);
                    }

                    if let (Some(suggestion), false) = (&message.suggestion, animating) {
                        ui.add_space(4.0);
                        let chip = egui::Button::new(
                            egui::RichText::new(format!("→ {}", suggestion))
                                .size(13.0)
                                .color(theme.accent),
                        )
                        .small();
                        if ui.add(chip).on_hover_text("Ask this").clicked() {
                            clicked = Some(suggestion.clone());
                        }
                    }
                });
            });

        bubble
            .response
            .interact(egui::Sense::click())
            .context_menu(|ui| {
                if ui.button("Copy text").clicked() {
                    ui.ctx().copy_text(message.content.clone());
                    ui.close_menu();
                }
                if ui.button("Copy as HTML").clicked() {
                    ui.ctx().copy_text(render_markdown(&message.content));
                    ui.close_menu();
                }
            });
    });

    clicked
}

/// Render the "assistant is typing" row shown while a reply is pending.
pub fn render_pending_indicator(ui: &mut egui::Ui, theme: &ChatTheme) {
    ui.horizontal(|ui| {
        ui.add(egui::Spinner::new().size(14.0).color(theme.text_muted));
        ui.label(
            egui::RichText::new("Assistant is thinking...")
                .size(13.0)
                .italics()
                .color(theme.text_muted),
        );
    });
}

/// Format an ISO-8601 timestamp as local `HH:MM`. Unparseable input is
/// returned unchanged.
pub fn format_time(timestamp: &str) -> String {
    DateTime::parse_from_rfc3339(timestamp)
        .map(|dt| dt.with_timezone(&Local).format("%H:%M").to_string())
        .unwrap_or_else(|_| timestamp.to_string())
}
