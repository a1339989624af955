//! Header and central panel rendering

use eframe::egui;

use crate::app::NitraApp;
use crate::ui;

impl NitraApp {
    /// Render the header bar at the top of the window
    pub(in crate::app) fn render_header(&mut self, ctx: &egui::Context) {
        let theme = self.get_theme();

        egui::TopBottomPanel::top("header")
            .frame(
                egui::Frame::new()
                    .fill(theme.surface[1])
                    .inner_margin(egui::Margin::symmetric(12, 8))
                    .stroke(egui::Stroke::new(1.0, theme.border)),
            )
            .show(ctx, |ui| {
                ui.horizontal(|ui| {
                    ui.label(
                        egui::RichText::new("Nitra AI")
                            .size(16.0)
                            .strong()
                            .color(theme.text_primary),
                    );
                    if self.store.is_loading() {
                        ui.add(egui::Spinner::new().size(12.0).color(theme.accent));
                    }
                    if let Some(err) = &self.last_error {
                        ui.label(egui::RichText::new(err).size(12.0).color(theme.error));
                    }

                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        let theme_label = if self.settings.theme == "light" {
                            "Dark"
                        } else {
                            "Light"
                        };
                        if ui.button(theme_label).on_hover_text("Switch theme").clicked() {
                            self.toggle_theme(ctx);
                        }
                        if ui
                            .add_enabled(self.store.has_messages(), egui::Button::new("Clear"))
                            .on_hover_text("Clear conversation (Ctrl+L)")
                            .clicked()
                        {
                            self.clear_chat();
                        }
                    });
                });
            });
    }

    /// Render the central panel with the transcript
    pub(in crate::app) fn render_central_panel(&mut self, ctx: &egui::Context) {
        let theme = self.get_theme();
        let snapshot = self.store.snapshot();
        let mut suggestion_clicked: Option<String> = None;

        egui::CentralPanel::default()
            .frame(egui::Frame::new().fill(theme.surface[0]).inner_margin(12.0))
            .show(ctx, |ui| {
                egui::ScrollArea::vertical()
                    .auto_shrink([false; 2])
                    .stick_to_bottom(true)
                    .show(ui, |ui| {
                        for message in &snapshot.messages {
                            let (visible, animating) = self.visible_content(message);
                            let clicked = ui::messages::render_message(
                                ui, message, visible, animating, &theme,
                            );
                            if let Some(s) = clicked {
                                suggestion_clicked = Some(s);
                            }
                            ui.add_space(8.0);
                        }

                        if snapshot.is_loading {
                            ui::messages::render_pending_indicator(ui, &theme);
                        }
                    });
            });

        if let Some(question) = suggestion_clicked {
            self.submit(&question);
        }
    }
}
