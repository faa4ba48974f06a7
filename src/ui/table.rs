use eframe::egui::{self, Ui};
use egui_extras::{Column, TableBuilder};

use salary_dashboard::data::filter::FilteredView;
use salary_dashboard::data::model::columns;

use crate::ui::format_usd;

const ROW_HEIGHT: f32 = 18.0;

/// Filtered records, one row each, in source order.
pub fn records_table(ui: &mut Ui, view: &FilteredView<'_>) {
    if view.is_empty() {
        ui.label("No data matches the selected filters.");
        return;
    }

    TableBuilder::new(ui)
        .striped(true)
        .resizable(true)
        .cell_layout(egui::Layout::left_to_right(egui::Align::Center))
        .column(Column::auto().at_least(50.0)) // year
        .column(Column::auto().at_least(80.0)) // seniority
        .column(Column::auto().at_least(80.0)) // contract
        .column(Column::auto().at_least(80.0)) // company size
        .column(Column::initial(200.0).at_least(120.0).clip(true)) // role
        .column(Column::auto().at_least(80.0)) // remote
        .column(Column::auto().at_least(60.0)) // country
        .column(Column::remainder().at_least(90.0)) // usd
        .min_scrolled_height(0.0)
        .max_scroll_height(400.0)
        .header(22.0, |mut header| {
            for name in columns::REQUIRED {
                header.col(|ui: &mut Ui| {
                    ui.strong(columns::label(name));
                });
            }
        })
        .body(|body| {
            body.rows(ROW_HEIGHT, view.len(), |mut row| {
                let Some(rec) = view.get(row.index()) else {
                    return;
                };
                let cells = [
                    rec.year.to_string(),
                    rec.seniority.clone(),
                    rec.contract_type.clone(),
                    rec.company_size.clone(),
                    rec.role_title.clone(),
                    rec.remote_type.clone(),
                    rec.residence_country_code.clone(),
                    format_usd(rec.salary_usd),
                ];
                for cell in cells {
                    row.col(|ui: &mut Ui| {
                        ui.label(cell);
                    });
                }
            });
        });
}
