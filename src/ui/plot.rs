use std::f32::consts::{FRAC_PI_2, PI, TAU};

use eframe::egui::{self, Color32, RichText, Ui};
use egui_plot::{Bar, BarChart, Plot};

use salary_dashboard::data::summary::{DashboardSummary, GroupCount, GroupMean, HistogramBin};

use crate::color::{generate_palette, ramp, HISTOGRAM_BAR, ROLE_BAR};
use crate::ui::{format_usd, NO_DATA};

const CHART_HEIGHT: f32 = 280.0;

// ---------------------------------------------------------------------------
// Chart grid (central panel)
// ---------------------------------------------------------------------------

/// Render the 2×2 chart grid for the current summary.
pub fn chart_grid(ui: &mut Ui, summary: &DashboardSummary, focus_role: &str) {
    ui.columns(2, |cols| {
        if let [left, right] = cols {
            chart_card(left, "Top roles by mean annual salary (USD)", |ui| {
                top_roles_chart(ui, &summary.top_roles);
            });
            chart_card(right, "Annual salary distribution (USD)", |ui| {
                histogram_chart(ui, &summary.histogram);
            });
        }
    });
    ui.add_space(8.0);
    ui.columns(2, |cols| {
        if let [left, right] = cols {
            chart_card(left, "Remote vs on-site work", |ui| {
                remote_pie(ui, &summary.remote);
            });
            chart_card(right, &format!("Mean annual salary of {focus_role}s by country (USD)"), |ui| {
                if summary.kpis.record_count == 0 {
                    placeholder(ui, NO_DATA);
                } else if summary.focus_role_by_country.is_empty() {
                    placeholder(ui, &format!("No '{focus_role}' records found."));
                } else {
                    country_chart(ui, &summary.focus_role_by_country);
                }
            });
        }
    });
}

fn chart_card(ui: &mut Ui, title: &str, add_contents: impl FnOnce(&mut Ui)) {
    egui::Frame::group(ui.style()).show(ui, |ui: &mut Ui| {
        ui.set_min_width(ui.available_width());
        ui.label(RichText::new(title).strong());
        ui.add_space(4.0);
        add_contents(ui);
    });
}

fn placeholder(ui: &mut Ui, message: &str) {
    ui.allocate_ui(egui::vec2(ui.available_width(), CHART_HEIGHT), |ui: &mut Ui| {
        ui.centered_and_justified(|ui: &mut Ui| {
            ui.label(RichText::new(message).color(Color32::from_rgb(0xFF, 0xB3, 0x00)));
        });
    });
}

/// Label for a category axis tick: only whole positions carry a name.
fn category_label(labels: &[String], value: f64) -> String {
    let idx = value.round();
    if (value - idx).abs() > 1e-6 || idx < 0.0 {
        return String::new();
    }
    labels.get(idx as usize).cloned().unwrap_or_default()
}

// ---------------------------------------------------------------------------
// Chart 1: top roles (horizontal bars, ascending bottom-up)
// ---------------------------------------------------------------------------

fn top_roles_chart(ui: &mut Ui, roles: &[GroupMean]) {
    if roles.is_empty() {
        placeholder(ui, NO_DATA);
        return;
    }
    horizontal_bars(ui, "top_roles", roles, |_| ROLE_BAR);
}

fn horizontal_bars(
    ui: &mut Ui,
    id: &str,
    groups: &[GroupMean],
    color_for: impl Fn(&GroupMean) -> Color32,
) {
    let labels: Vec<String> = groups.iter().map(|g| g.key.clone()).collect();
    let bars: Vec<Bar> = groups
        .iter()
        .enumerate()
        .map(|(i, g)| {
            Bar::new(i as f64, g.mean_salary)
                .name(format!("{}: {} (n={})", g.key, format_usd(g.mean_salary), g.count))
                .fill(color_for(g))
                .width(0.7)
        })
        .collect();

    Plot::new(id)
        .height(CHART_HEIGHT)
        .allow_drag(false)
        .allow_scroll(false)
        .allow_zoom(false)
        .show_grid([true, false])
        .x_axis_label("Mean salary (USD)")
        .x_axis_formatter(|mark, _range| format_usd(mark.value))
        .y_axis_formatter(move |mark, _range| category_label(&labels, mark.value))
        .show(ui, |plot_ui| {
            plot_ui.bar_chart(BarChart::new(bars).horizontal());
        });
}

// ---------------------------------------------------------------------------
// Chart 2: salary histogram
// ---------------------------------------------------------------------------

fn histogram_chart(ui: &mut Ui, bins: &[HistogramBin]) {
    if bins.is_empty() {
        placeholder(ui, NO_DATA);
        return;
    }

    let bars: Vec<Bar> = bins
        .iter()
        .map(|b| {
            let width = (b.upper - b.lower).max(1.0);
            Bar::new((b.lower + b.upper) / 2.0, b.count as f64)
                .width(width)
                .name(format!(
                    "{} – {}: {}",
                    format_usd(b.lower),
                    format_usd(b.upper),
                    b.count
                ))
        })
        .collect();

    Plot::new("salary_histogram")
        .height(CHART_HEIGHT)
        .allow_drag(false)
        .allow_scroll(false)
        .allow_zoom(false)
        .x_axis_label("Annual salary (USD)")
        .y_axis_label("Records")
        .x_axis_formatter(|mark, _range| format_usd(mark.value))
        .show(ui, |plot_ui| {
            plot_ui.bar_chart(BarChart::new(bars).color(HISTOGRAM_BAR).name("Salaries"));
        });
}

// ---------------------------------------------------------------------------
// Chart 3: remote-work donut
// ---------------------------------------------------------------------------

fn remote_pie(ui: &mut Ui, counts: &[GroupCount]) {
    let total: usize = counts.iter().map(|c| c.count).sum();
    if total == 0 {
        placeholder(ui, NO_DATA);
        return;
    }

    let colors = generate_palette(counts.len());
    ui.horizontal(|ui: &mut Ui| {
        let radius = CHART_HEIGHT / 2.0 - 10.0;
        let (rect, _response) =
            ui.allocate_exact_size(egui::vec2(radius * 2.0, radius * 2.0), egui::Sense::hover());
        let center = rect.center();
        let painter = ui.painter();

        let mut start_angle = -FRAC_PI_2;
        for (group, &color) in counts.iter().zip(&colors) {
            let sweep = (group.count as f32 / total as f32) * TAU;
            if sweep < 0.001 {
                continue;
            }
            // Convex polygons only: split large slices into half-turn pieces.
            let mut remaining = sweep;
            let mut from = start_angle;
            while remaining > 0.0 {
                let step = remaining.min(PI);
                let n_points = ((step / (PI / 32.0)).ceil() as usize).max(3);
                let mut points = vec![center];
                for j in 0..=n_points {
                    let angle = from + (j as f32 / n_points as f32) * step;
                    points.push(center + egui::vec2(angle.cos(), angle.sin()) * radius);
                }
                painter.add(egui::Shape::convex_polygon(
                    points,
                    color,
                    egui::Stroke::new(1.0, color.gamma_multiply(0.5)),
                ));
                from += step;
                remaining -= step;
            }
            start_angle += sweep;
        }

        // Center hole for the donut
        painter.add(egui::Shape::circle_filled(
            center,
            radius * 0.4,
            ui.visuals().extreme_bg_color,
        ));

        ui.vertical(|ui: &mut Ui| {
            ui.strong("Work type");
            for (group, &color) in counts.iter().zip(&colors) {
                let pct = group.count as f64 / total as f64 * 100.0;
                ui.label(
                    RichText::new(format!("■ {}: {} ({pct:.1}%)", group.key, group.count))
                        .color(color),
                );
            }
        });
    });
}

// ---------------------------------------------------------------------------
// Chart 4: focus role per country
// ---------------------------------------------------------------------------

fn country_chart(ui: &mut Ui, by_country: &[GroupMean]) {
    let mut sorted = by_country.to_vec();
    sorted.sort_by(|a, b| a.mean_salary.total_cmp(&b.mean_salary));

    let min = sorted.first().map_or(0.0, |g| g.mean_salary);
    let max = sorted.last().map_or(0.0, |g| g.mean_salary);
    horizontal_bars(ui, "country_means", &sorted, |g| ramp(g.mean_salary, min, max));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn category_labels_only_on_whole_ticks() {
        let labels = vec!["A".to_string(), "B".to_string()];
        assert_eq!(category_label(&labels, 0.0), "A");
        assert_eq!(category_label(&labels, 1.0), "B");
        assert_eq!(category_label(&labels, 0.5), "");
        assert_eq!(category_label(&labels, 2.0), "");
        assert_eq!(category_label(&labels, -1.0), "");
    }
}
