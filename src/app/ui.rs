use super::state::ViewState;
use super::theme::{ACCENT, DANGER, SUCCESS};
use super::EasyShareApp;
use crate::upload::{SelectedFile, ShareResult, UploadSession};
use crate::utils::file_size::human_size;
use eframe::egui::{self, Align, Align2, Color32, RichText, Stroke};
use rfd::FileDialog;

const FAQ: [(&str, &str); 4] = [
    (
        "How long does the link stay valid?",
        "Links are issued by the sharing server and stay valid for as long as it keeps the file.",
    ),
    (
        "Can I upload more than one file?",
        "One file per upload. Zip a folder first if you need to share several files.",
    ),
    (
        "Who can open my link?",
        "Anyone who has the link. Only send it to people you trust.",
    ),
    (
        "Why didn't the email arrive?",
        "Check the spam folder and the spelling of both addresses, then send it again.",
    ),
];

impl EasyShareApp {
    pub fn render(&mut self, ctx: &egui::Context) {
        egui::TopBottomPanel::bottom("footer").show(ctx, |ui| {
            self.render_footer(ui);
        });

        egui::CentralPanel::default().show(ctx, |ui| {
            egui::ScrollArea::vertical().show(ui, |ui| {
                self.render_header(ui);
                ui.add_space(20.0);

                // Cloned so the branches can call back into the controller
                match self.controller.state().view.clone() {
                    ViewState::Idle => self.render_drop_zone(ui),
                    ViewState::Uploading(session) => Self::render_progress(ui, &session),
                    ViewState::Shared(share) => self.render_share(ui, &share),
                }

                ui.add_space(30.0);
                Self::render_faq(ui);
            });
        });

        self.render_toasts(ctx);
        self.render_acknowledgment(ctx);
    }

    fn render_header(&mut self, ui: &mut egui::Ui) {
        ui.horizontal(|ui| {
            ui.with_layout(egui::Layout::right_to_left(Align::Center), |ui| {
                if ui.button(self.theme.toggle_label()).clicked() {
                    let ctx = ui.ctx().clone();
                    self.toggle_theme(&ctx);
                }
            });
        });
        ui.vertical_centered(|ui| {
            ui.heading("EasyShare");
            ui.add_space(5.0);
            ui.label(
                RichText::new("Share a file with a link, or send it straight to someone's inbox")
                    .color(ui.visuals().text_color().gamma_multiply(0.7)),
            );
        });
    }

    fn render_drop_zone(&mut self, ui: &mut egui::Ui) {
        let drag_active = self.controller.state().drag_active;
        let stroke = if drag_active {
            Stroke::new(2.0, ACCENT)
        } else {
            Stroke::new(1.0, ui.visuals().widgets.noninteractive.bg_stroke.color)
        };

        egui::Frame::none()
            .stroke(stroke)
            .rounding(12.0)
            .inner_margin(30.0)
            .fill(if drag_active {
                ACCENT.gamma_multiply(0.1)
            } else {
                Color32::TRANSPARENT
            })
            .show(ui, |ui| {
                ui.set_width(ui.available_width());
                ui.vertical_centered(|ui| {
                    ui.label(RichText::new("📂").size(36.0));
                    ui.label("Drag & drop a file here");
                    ui.label(RichText::new("or").weak());
                    let browse = egui::Button::new("Browse").min_size(egui::vec2(140.0, 32.0));
                    if ui.add(browse).clicked() {
                        if let Some(path) = FileDialog::new().pick_file() {
                            let _ = self.controller.select_files(vec![SelectedFile::Path(path)]);
                        }
                    }
                });
            });
    }

    fn render_progress(ui: &mut egui::Ui, session: &UploadSession) {
        ui.group(|ui| {
            let size = session
                .bytes_total
                .map(|total| format!(" ({})", human_size(total)))
                .unwrap_or_default();
            ui.label(format!("📤 Uploading {}{}", session.file_name, size));

            let bar = egui::ProgressBar::new(session.fraction())
                .text(format!("{}%", session.percent))
                .animate(false)
                .fill(ACCENT);
            ui.add(bar);
        });
    }

    fn render_share(&mut self, ui: &mut egui::Ui, share: &ShareResult) {
        ui.group(|ui| {
            ui.label(RichText::new("✅ Your file is ready").color(SUCCESS));
            ui.add_space(6.0);

            ui.horizontal(|ui| {
                let mut link = share.link.as_str();
                ui.add(egui::TextEdit::singleline(&mut link).desired_width(280.0));
                if ui.button("📋 Copy").clicked() {
                    let _ = self.controller.copy_link(&mut self.clipboard);
                }
                if ui.button("🔗 Open").clicked() {
                    let _ = self.controller.open_link();
                }
            });

            ui.add_space(12.0);
            ui.label("Or send the link by email");

            let in_flight = self.controller.state().email_in_flight;
            let label = self.controller.state().send_label();
            let state = self.controller.state_mut();
            egui::Grid::new("email_form")
                .num_columns(2)
                .spacing([8.0, 6.0])
                .show(ui, |ui| {
                    ui.label("From");
                    ui.add(
                        egui::TextEdit::singleline(&mut state.sender_email)
                            .hint_text("you@example.com"),
                    );
                    ui.end_row();
                    ui.label("To");
                    ui.add(
                        egui::TextEdit::singleline(&mut state.receiver_email)
                            .hint_text("friend@example.com"),
                    );
                    ui.end_row();
                });

            ui.add_space(6.0);
            if ui.add_enabled(!in_flight, egui::Button::new(label)).clicked() {
                let _ = self.controller.send_email();
            }
        });

        ui.add_space(12.0);
        ui.vertical_centered(|ui| {
            if ui.button("🔄 Upload another").clicked() {
                self.controller.reset();
            }
        });
    }

    fn render_faq(ui: &mut egui::Ui) {
        ui.heading("FAQ");
        for (question, answer) in FAQ {
            egui::CollapsingHeader::new(question)
                .default_open(false)
                .show(ui, |ui| {
                    ui.label(answer);
                });
        }
    }

    fn render_toasts(&self, ctx: &egui::Context) {
        let toasts = &self.controller.state().toasts;
        if toasts.is_empty() {
            return;
        }
        if let Some(toast) = &toasts.error {
            Self::toast(ctx, "error_toast", &toast.message, DANGER, -20.0);
        }
        if let Some(toast) = &toasts.confirmation {
            Self::toast(ctx, "copy_toast", &toast.message, SUCCESS, -70.0);
        }
    }

    fn toast(ctx: &egui::Context, id: &str, message: &str, color: Color32, offset: f32) {
        egui::Area::new(id.to_owned())
            .order(egui::Order::Foreground)
            .anchor(Align2::CENTER_BOTTOM, egui::vec2(0.0, offset))
            .show(ctx, |ui| {
                egui::Frame::popup(ui.style())
                    .fill(color)
                    .show(ui, |ui| {
                        ui.label(RichText::new(message).color(Color32::WHITE));
                    });
            });
    }

    fn render_acknowledgment(&mut self, ctx: &egui::Context) {
        let Some(message) = self.controller.state().acknowledgment.clone() else {
            return;
        };
        egui::Window::new("Done")
            .collapsible(false)
            .resizable(false)
            .anchor(Align2::CENTER_CENTER, egui::vec2(0.0, 0.0))
            .show(ctx, |ui| {
                ui.label(message);
                ui.vertical_centered(|ui| {
                    if ui.button("OK").clicked() {
                        self.controller.dismiss_acknowledgment();
                    }
                });
            });
    }

    fn render_footer(&self, ui: &mut egui::Ui) {
        ui.with_layout(egui::Layout::bottom_up(Align::Center), |ui| {
            ui.add_space(6.0);
            ui.horizontal(|ui| {
                ui.label(format!("EasyShare v{}", env!("CARGO_PKG_VERSION")));
                ui.label(RichText::new(format!("· {}", self.api_base)).weak());
            });
        });
    }
}
