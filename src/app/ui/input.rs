//! Message input panel and starter questions

use eframe::egui;

use crate::app::NitraApp;

impl NitraApp {
    /// Render the input panel at the bottom of the window
    pub(in crate::app) fn render_input_panel(&mut self, ctx: &egui::Context) {
        let theme = self.get_theme();
        let mut starter_clicked: Option<String> = None;

        egui::TopBottomPanel::bottom("input_panel")
            .frame(
                egui::Frame::new()
                    .fill(theme.surface[1])
                    .inner_margin(egui::Margin::symmetric(12, 10))
                    .stroke(egui::Stroke::new(1.0, theme.border)),
            )
            .show(ctx, |ui| {
                // Offer canned questions until the user has asked something
                let asked = self
                    .store
                    .messages()
                    .iter()
                    .any(|m| m.role == crate::message::Role::User);
                if !asked && !self.starter_questions.is_empty() {
                    ui.horizontal_wrapped(|ui| {
                        for question in &self.starter_questions {
                            let chip = egui::Button::new(
                                egui::RichText::new(question).size(13.0).color(theme.accent),
                            )
                            .small();
                            if ui.add(chip).clicked() {
                                starter_clicked = Some(question.clone());
                            }
                        }
                    });
                    ui.add_space(6.0);
                }

                ui.horizontal(|ui| {
                    let input_frame = egui::Frame::new()
                        .fill(theme.surface[2])
                        .corner_radius(6.0)
                        .inner_margin(egui::Margin::symmetric(10, 8));

                    let mut send_clicked = false;
                    input_frame.show(ui, |ui| {
                        let response = ui.add(
                            egui::TextEdit::multiline(&mut self.message_input)
                                .desired_rows(1)
                                .desired_width(ui.available_width() - 72.0)
                                .frame(false)
                                .hint_text("Ask a question... (Enter to send)"),
                        );

                        // Enter sends; Shift+Enter inserts a newline
                        let enter_detected = response.has_focus()
                            && ui.input(|i| i.key_pressed(egui::Key::Enter) && !i.modifiers.shift);

                        if response.has_focus() && ui.input(|i| i.key_pressed(egui::Key::Escape)) {
                            self.message_input.clear();
                        }

                        if enter_detected {
                            send_clicked = true;
                            response.request_focus();
                        }
                    });

                    if ui.button("Send").clicked() {
                        send_clicked = true;
                    }
                    if send_clicked {
                        self.submit_input();
                    }
                });
            });

        if let Some(question) = starter_clicked {
            self.submit(&question);
        }
    }
}
