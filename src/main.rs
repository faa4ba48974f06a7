mod app;
mod color;
mod state;
mod ui;

use app::SalaryDashboardApp;
use eframe::egui;
use salary_dashboard::DashboardConfig;

fn main() -> eframe::Result {
    env_logger::init();

    let config = match DashboardConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            log::warn!("Ignoring dashboard config: {e:#}");
            DashboardConfig::default()
        }
    };
    log::info!("Dashboard source: {}", config.source);

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1400.0, 900.0])
            .with_min_inner_size([800.0, 500.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Data Salary Dashboard",
        options,
        Box::new(|cc| {
            cc.egui_ctx.set_visuals(egui::Visuals::dark());
            Ok(Box::new(SalaryDashboardApp::new(config)))
        }),
    )
}
