//! Simple chat layout: header, thread, composer.

use crate::health::ServerStatus;
use crate::session::ChatSession;
use crate::views::mode_switcher;
use eframe::egui;
use services::UiContext;
use shared::Message;

pub fn show(
    ctx: &egui::Context,
    ui_ctx: &mut UiContext,
    session: &mut ChatSession,
    status: &ServerStatus,
    dark: bool,
) {
    render_header(ctx, ui_ctx, status);
    render_composer(ctx, session);
    render_thread(ctx, session, dark);
}

fn render_header(ctx: &egui::Context, ui_ctx: &mut UiContext, status: &ServerStatus) {
    let (status_label, status_color) = status.label();
    egui::TopBottomPanel::top("chat_header").show(ctx, |ui| {
        ui.add_space(6.0);
        ui.horizontal(|ui| {
            ui.heading("Mind Chat");
            ui.separator();
            ui.label(egui::RichText::new(status_label).color(status_color));
            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                mode_switcher::show(ui, ui_ctx);
            });
        });
        ui.add_space(6.0);
    });
}

fn render_thread(ctx: &egui::Context, session: &mut ChatSession, dark: bool) {
    egui::CentralPanel::default().show(ctx, |ui| {
        let scroll = session.take_scroll_request();
        egui::ScrollArea::vertical()
            .auto_shrink([false, false])
            .stick_to_bottom(true)
            .show(ui, |ui| {
                for message in session.messages() {
                    ui.add_space(6.0);
                    render_message(ui, message, dark);
                    ui.add_space(6.0);
                }

                if session.is_sending() {
                    ui.add_space(6.0);
                    render_typing_indicator(ui, dark);
                }

                if scroll {
                    ui.scroll_to_cursor(Some(egui::Align::BOTTOM));
                }
            });
    });
}

fn render_composer(ctx: &egui::Context, session: &mut ChatSession) {
    egui::TopBottomPanel::bottom("composer").show(ctx, |ui| {
        ui.add_space(8.0);
        ui.horizontal(|ui| {
            let busy = session.is_sending();
            let hint = if busy {
                "Waiting for response..."
            } else {
                "Type a message..."
            };

            let response = ui.add_enabled(
                !busy,
                egui::TextEdit::singleline(session.input_mut())
                    .hint_text(hint)
                    .desired_width(ui.available_width() - 80.0)
                    .font(egui::FontId::new(15.0, egui::FontFamily::Proportional)),
            );

            // Enter with no modifier held behaves like the Send button
            let enter = response.lost_focus()
                && ui.input(|i| i.key_pressed(egui::Key::Enter) && i.modifiers.is_none());

            let clicked = ui
                .add_enabled(
                    session.can_send(),
                    egui::Button::new("Send").fill(egui::Color32::from_rgb(70, 130, 180)),
                )
                .clicked();

            if (enter || clicked) && session.send() {
                response.request_focus();
            }
        });
        ui.add_space(8.0);
    });
}

fn render_message(ui: &mut egui::Ui, msg: &Message, dark: bool) {
    if msg.is_user() {
        ui.with_layout(egui::Layout::right_to_left(egui::Align::Min), |ui| {
            ui.add_space(8.0);
            egui::Frame::none()
                .fill(egui::Color32::from_rgb(70, 130, 180))
                .rounding(egui::Rounding::same(12.0))
                .inner_margin(egui::Margin::same(12.0))
                .show(ui, |ui| {
                    ui.set_max_width(500.0);
                    ui.label(
                        egui::RichText::new(&msg.content)
                            .color(egui::Color32::WHITE)
                            .size(15.0),
                    );
                });
        });
        return;
    }

    let (fill, text_color) = if dark {
        (
            egui::Color32::from_rgb(50, 50, 58),
            egui::Color32::from_rgb(220, 220, 230),
        )
    } else {
        (
            egui::Color32::from_rgb(245, 245, 248),
            egui::Color32::from_rgb(40, 40, 50),
        )
    };

    egui::Frame::none()
        .fill(fill)
        .rounding(egui::Rounding::same(12.0))
        .inner_margin(egui::Margin::same(12.0))
        .show(ui, |ui| {
            ui.set_max_width(600.0);
            ui.label(egui::RichText::new(&msg.content).color(text_color).size(15.0));
            ui.add_space(4.0);
            ui.horizontal(|ui| {
                ui.label(egui::RichText::new(msg.formatted_time()).size(11.0).weak());
                if ui
                    .small_button("Copy")
                    .on_hover_text("Copy to clipboard")
                    .clicked()
                {
                    ui.output_mut(|o| o.copied_text = msg.content.clone());
                }
            });
        });
}

fn render_typing_indicator(ui: &mut egui::Ui, dark: bool) {
    egui::Frame::none()
        .fill(if dark {
            egui::Color32::from_rgb(50, 50, 58)
        } else {
            egui::Color32::from_rgb(230, 230, 235)
        })
        .rounding(egui::Rounding::same(12.0))
        .inner_margin(egui::Margin::same(12.0))
        .show(ui, |ui| {
            let time = ui.input(|i| i.time);
            let dots = match ((time * 2.0) as i32) % 4 {
                0 => "   ",
                1 => ".  ",
                2 => ".. ",
                _ => "...",
            };
            ui.label(
                egui::RichText::new(format!("Thinking{dots}"))
                    .color(if dark {
                        egui::Color32::from_rgb(160, 160, 180)
                    } else {
                        egui::Color32::from_rgb(60, 60, 70)
                    })
                    .italics(),
            );
        });
}
