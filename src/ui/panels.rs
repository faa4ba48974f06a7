use std::collections::BTreeSet;
use std::fmt::Display;

use eframe::egui::{self, Color32, RichText, ScrollArea, Ui};

use salary_dashboard::data::filter::FilterSelection;
use salary_dashboard::data::model::{FilterAxis, ObservedValues};
use salary_dashboard::data::summary::KpiBundle;

use crate::state::AppState;
use crate::ui::{format_usd, group_thousands};

// ---------------------------------------------------------------------------
// Left side panel – filter widgets
// ---------------------------------------------------------------------------

/// What the user asked for on one axis during this frame.
enum AxisAction<T> {
    Toggle(T),
    All,
    None,
}

/// Render the left filter panel.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Filters");
    ui.separator();

    let Some(dataset) = &state.dataset else {
        ui.label("No dataset loaded.");
        return;
    };

    // Clone what we need so we can mutate state after the widgets are drawn.
    let observed = dataset.observed().clone();
    let selection = state.selection.clone();

    let mut year_action = None;
    let mut category_action: Option<(FilterAxis, AxisAction<String>)> = None;

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            let header = |axis| axis_header(axis, &observed, &selection);
            year_action = axis_filter(
                ui,
                FilterAxis::Year,
                &observed.years,
                &selection.years,
                header(FilterAxis::Year),
            );

            let categories = [
                (FilterAxis::Seniority, &observed.seniorities, &selection.seniorities),
                (FilterAxis::ContractType, &observed.contract_types, &selection.contract_types),
                (FilterAxis::CompanySize, &observed.company_sizes, &selection.company_sizes),
            ];
            for (axis, all, selected) in categories {
                if let Some(action) = axis_filter(ui, axis, all, selected, header(axis)) {
                    category_action = Some((axis, action));
                }
            }
        });

    match year_action {
        Some(AxisAction::Toggle(year)) => state.toggle_year(year),
        Some(AxisAction::All) => state.select_all(FilterAxis::Year),
        Some(AxisAction::None) => state.select_none(FilterAxis::Year),
        None => {}
    }
    match category_action {
        Some((axis, AxisAction::Toggle(value))) => state.toggle_category(axis, &value),
        Some((axis, AxisAction::All)) => state.select_all(axis),
        Some((axis, AxisAction::None)) => state.select_none(axis),
        None => {}
    }
}

/// Axis label with the selected / observed value counts.
fn axis_header(axis: FilterAxis, observed: &ObservedValues, selection: &FilterSelection) -> String {
    format!(
        "{axis}  ({}/{})",
        selection.selected_count(axis),
        observed.count(axis)
    )
}

/// One collapsible multi-select. Returns the change requested this frame.
fn axis_filter<T: Ord + Clone + Display>(
    ui: &mut Ui,
    axis: FilterAxis,
    all_values: &BTreeSet<T>,
    selected: &BTreeSet<T>,
    header_text: String,
) -> Option<AxisAction<T>> {
    let mut action = None;

    egui::CollapsingHeader::new(RichText::new(header_text).strong())
        .id_salt(axis.column())
        .default_open(true)
        .show(ui, |ui: &mut Ui| {
            // Select all / none buttons
            ui.horizontal(|ui: &mut Ui| {
                if ui.small_button("All").clicked() {
                    action = Some(AxisAction::All);
                }
                if ui.small_button("None").clicked() {
                    action = Some(AxisAction::None);
                }
            });

            for val in all_values {
                let mut checked = selected.contains(val);
                if ui.checkbox(&mut checked, val.to_string()).changed() {
                    action = Some(AxisAction::Toggle(val.clone()));
                }
            }
        });

    action
}

// ---------------------------------------------------------------------------
// KPI row
// ---------------------------------------------------------------------------

/// Four metric cards: mean, max, count, most frequent role.
pub fn kpi_row(ui: &mut Ui, kpis: &KpiBundle) {
    ui.strong("Overall metrics (annual salary in USD)");
    ui.add_space(4.0);
    ui.columns(4, |cols| {
        let cards = [
            ("Mean salary", format_usd(kpis.mean_salary)),
            ("Max salary", format_usd(kpis.max_salary)),
            ("Records", group_thousands(kpis.record_count as i64)),
            ("Most frequent role", kpis.modal_role.clone()),
        ];
        for (col, (title, value)) in cols.iter_mut().zip(cards) {
            egui::Frame::group(col.style()).show(col, |ui: &mut Ui| {
                ui.set_min_width(ui.available_width());
                ui.label(RichText::new(title).small().weak());
                ui.label(RichText::new(value).heading().strong());
            });
        }
    });
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / toolbar.
pub fn top_bar(ui: &mut Ui, state: &mut AppState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            if ui.button("Open…").clicked() {
                open_file_dialog(state);
                ui.close_menu();
            }
            if ui
                .add_enabled(!state.loading(), egui::Button::new("Reload source"))
                .clicked()
            {
                state.reload();
                ui.close_menu();
            }
        });

        ui.separator();

        if state.loading() {
            ui.spinner();
            ui.label("Loading…");
        } else if let Some(ds) = &state.dataset {
            ui.label(format!(
                "{} records loaded, {} visible",
                group_thousands(ds.len() as i64),
                group_thousands(state.visible_indices.len() as i64)
            ));
        }

        if let Some(msg) = &state.status_message {
            ui.separator();
            ui.label(RichText::new(msg).color(Color32::RED));
        }
    });
}

// ---------------------------------------------------------------------------
// File dialog
// ---------------------------------------------------------------------------

pub fn open_file_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Open salary data")
        .add_filter("Supported files", &["csv", "json", "parquet", "pq"])
        .add_filter("CSV", &["csv"])
        .add_filter("JSON", &["json"])
        .add_filter("Parquet", &["parquet", "pq"])
        .pick_file();

    if let Some(path) = file {
        state.start_loading(path.display().to_string());
    }
}
