use eframe::egui;
use services::UiContext;
use shared::UiMode;

/// Header dropdown listing every tier with its blurb
pub fn show(ui: &mut egui::Ui, ui_ctx: &mut UiContext) {
    let current = ui_ctx.current_mode();
    let info = ui_ctx.current_info();

    ui.menu_button(format!("{} {} ⏷", info.icon, info.name), |ui| {
        ui.set_min_width(260.0);
        for mode in UiMode::all() {
            let info = mode.info();
            let selected = *mode == current;
            let clicked = ui
                .selectable_label(selected, format!("{}  {}", info.icon, info.name))
                .clicked();
            ui.label(egui::RichText::new(info.description).small().weak());
            ui.add_space(4.0);
            if clicked {
                ui_ctx.switch_mode(mode.as_str());
                ui.close_menu();
            }
        }
    });
}
