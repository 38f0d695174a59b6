use eframe::egui;
use services::UiContext;
use shared::UiMode;

fn title(mode: UiMode) -> &'static str {
    match mode {
        UiMode::Basic => "Basic Mode",
        UiMode::Intermediate => "Intermediate Mode",
        UiMode::Advanced => "Advanced Mode",
    }
}

/// Stand-in for tiers that are not built yet
pub fn show(ctx: &egui::Context, ui_ctx: &mut UiContext, mode: UiMode) {
    egui::CentralPanel::default().show(ctx, |ui| {
        ui.vertical_centered(|ui| {
            ui.add_space(ui.available_height() * 0.3);
            ui.heading(title(mode));
            ui.add_space(8.0);
            ui.label(egui::RichText::new("Coming soon in the next phase!").weak());

            let planned = ui_ctx.feature_flags().enabled_panels();
            if !planned.is_empty() {
                ui.add_space(12.0);
                ui.label(egui::RichText::new(format!("Planned: {}", planned.join(", "))).small());
            }

            ui.add_space(16.0);
            if ui.button("Back to Basic Mode").clicked() {
                ui_ctx.set_mode(UiMode::Basic);
            }
        });
    });
}
