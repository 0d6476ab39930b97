// Slot Grid
// Main entry point

use slot_grid::services::config;
use slot_grid::ui_egui::SchedulerApp;

fn main() -> anyhow::Result<()> {
    env_logger::init();

    log::info!("Starting Slot Grid");

    let config = config::load_config();
    let app = SchedulerApp::bootstrap(config)?;

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1600.0, 800.0])
            .with_min_inner_size([800.0, 400.0])
            .with_title("Slot Grid"),
        ..Default::default()
    };

    eframe::run_native(
        "Slot Grid",
        options,
        Box::new(|_cc| Ok(Box::new(app))),
    )
    .map_err(|e| anyhow::anyhow!("Failed to run application: {e}"))
}
