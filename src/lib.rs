//! Salary survey dashboard: a typed filter-and-aggregate pipeline over salary
//! records, plus the configuration it runs with.
//!
//! The egui front-end lives in the binary; everything here is UI-free.

pub mod config;
pub mod data;

pub use config::DashboardConfig;
pub use data::error::LoadError;
pub use data::filter::{apply_filters, FilterSelection, FilteredView};
pub use data::model::{FilterAxis, SalaryDataset, SalaryRecord};
pub use data::summary::{
    compute_kpis, mean_salary_by_country, remote_distribution, salary_histogram,
    top_roles_by_mean_salary, DashboardSummary, KpiBundle, SummaryOptions,
};
