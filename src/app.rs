use std::time::Duration;

use eframe::egui::{self, Ui};

use salary_dashboard::DashboardConfig;

use crate::state::AppState;
use crate::ui::{panels, plot, table};

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

pub struct SalaryDashboardApp {
    pub state: AppState,
}

impl SalaryDashboardApp {
    /// Create the app and start fetching the configured source.
    pub fn new(config: DashboardConfig) -> Self {
        let mut state = AppState::new(config);
        state.reload();
        Self { state }
    }
}

impl eframe::App for SalaryDashboardApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.state.poll_loader();
        if self.state.loading() {
            ctx.request_repaint_after(Duration::from_millis(100));
        }

        // ---- Top panel: menu bar ----
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            panels::top_bar(ui, &mut self.state);
        });

        // ---- Left side panel: filters ----
        egui::SidePanel::left("filter_panel")
            .default_width(220.0)
            .resizable(true)
            .show(ctx, |ui| {
                panels::side_panel(ui, &mut self.state);
            });

        // ---- Central panel: KPIs, charts, table ----
        egui::CentralPanel::default().show(ctx, |ui| {
            dashboard(ui, &self.state);
        });
    }
}

fn dashboard(ui: &mut Ui, state: &AppState) {
    let Some(view) = state.view() else {
        ui.centered_and_justified(|ui: &mut Ui| {
            if state.loading() {
                ui.heading("Loading salary data…");
            } else {
                ui.heading("Open a file to view salaries  (File → Open…)");
            }
        });
        return;
    };

    egui::ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            ui.heading("Data Salary Dashboard");
            ui.label("Salaries in the data field, based on survey responses from working professionals.");
            ui.separator();

            panels::kpi_row(ui, &state.summary.kpis);
            ui.separator();

            ui.strong("Charts");
            ui.add_space(4.0);
            plot::chart_grid(ui, &state.summary, &state.config.focus_role);
            ui.separator();

            ui.strong("Filtered records");
            table::records_table(ui, &view);
        });
}
