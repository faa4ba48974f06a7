use std::sync::mpsc::{self, Receiver, TryRecvError};

use salary_dashboard::data::filter::{apply_filters, toggle, FilterSelection, FilteredView};
use salary_dashboard::data::loader;
use salary_dashboard::data::model::{FilterAxis, SalaryDataset};
use salary_dashboard::data::summary::DashboardSummary;
use salary_dashboard::{DashboardConfig, LoadError};

type LoadResult = Result<SalaryDataset, LoadError>;

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full UI state, independent of rendering.
pub struct AppState {
    pub config: DashboardConfig,

    /// Loaded dataset (None until a source has been read).
    pub dataset: Option<SalaryDataset>,

    /// Allowed values per filter axis.
    pub selection: FilterSelection,

    /// Indices of records passing the current filters (cached).
    pub visible_indices: Vec<usize>,

    /// Pipeline outputs for the current selection.
    pub summary: DashboardSummary,

    /// Status / error message shown in the UI.
    pub status_message: Option<String>,

    /// Background load in flight, if any.
    pending: Option<Receiver<LoadResult>>,
}

impl AppState {
    pub fn new(config: DashboardConfig) -> Self {
        Self {
            config,
            dataset: None,
            selection: FilterSelection::default(),
            visible_indices: Vec::new(),
            summary: DashboardSummary::default(),
            status_message: None,
            pending: None,
        }
    }

    /// Whether a loading operation is in progress.
    pub fn loading(&self) -> bool {
        self.pending.is_some()
    }

    /// Read `source` on a worker thread; the result is picked up by
    /// [`AppState::poll_loader`].
    pub fn start_loading(&mut self, source: String) {
        let (tx, rx) = mpsc::channel();
        log::info!("Loading dataset from {source}");
        std::thread::spawn(move || {
            // The receiver is gone if the app closed mid-load.
            let _ = tx.send(loader::load_source(&source));
        });
        self.pending = Some(rx);
        self.status_message = None;
    }

    /// Reload the configured source.
    pub fn reload(&mut self) {
        let source = self.config.source.clone();
        self.start_loading(source);
    }

    /// Install a finished background load. Returns true once something arrived.
    pub fn poll_loader(&mut self) -> bool {
        let Some(rx) = &self.pending else {
            return false;
        };
        let result = match rx.try_recv() {
            Ok(result) => result,
            Err(TryRecvError::Empty) => return false,
            Err(TryRecvError::Disconnected) => {
                self.pending = None;
                self.status_message = Some("Error: loader thread exited".to_string());
                return true;
            }
        };
        self.pending = None;
        self.finish_load(result);
        true
    }

    /// Apply the outcome of a load, keeping the previous dataset on failure.
    pub fn finish_load(&mut self, result: LoadResult) {
        match result {
            Ok(dataset) => self.set_dataset(dataset),
            Err(e) => {
                log::error!("Failed to load dataset: {e}");
                self.status_message = Some(format!("Error: {e}"));
            }
        }
    }

    /// Ingest a newly loaded dataset and select every observed value.
    pub fn set_dataset(&mut self, dataset: SalaryDataset) {
        self.selection = FilterSelection::all(&dataset);
        self.dataset = Some(dataset);
        self.status_message = None;
        self.refilter();
    }

    /// The current filtered view, if a dataset is loaded.
    pub fn view(&self) -> Option<FilteredView<'_>> {
        self.dataset
            .as_ref()
            .map(|ds| FilteredView::from_indices(ds, &self.visible_indices))
    }

    /// Re-run the whole pipeline after a selection change.
    pub fn refilter(&mut self) {
        let Some(ds) = &self.dataset else {
            return;
        };
        let view = apply_filters(ds, &self.selection);
        self.summary = DashboardSummary::compute(&view, &self.config.summary_options());
        log::debug!("{} of {} records visible", view.len(), ds.len());
        self.visible_indices = view.into_indices();
    }

    /// Toggle a single year in the filter.
    pub fn toggle_year(&mut self, year: i64) {
        toggle(&mut self.selection.years, &year);
        self.refilter();
    }

    /// Toggle a single category value on one of the string axes.
    pub fn toggle_category(&mut self, axis: FilterAxis, value: &String) {
        let set = match axis {
            FilterAxis::Year => return,
            FilterAxis::Seniority => &mut self.selection.seniorities,
            FilterAxis::ContractType => &mut self.selection.contract_types,
            FilterAxis::CompanySize => &mut self.selection.company_sizes,
        };
        toggle(set, value);
        self.refilter();
    }

    /// Select all values on one axis.
    pub fn select_all(&mut self, axis: FilterAxis) {
        if let Some(ds) = &self.dataset {
            self.selection.select_all(axis, ds);
            self.refilter();
        }
    }

    /// Deselect all values on one axis.
    pub fn select_none(&mut self, axis: FilterAxis) {
        self.selection.select_none(axis);
        self.refilter();
    }
}

#[cfg(test)]
mod tests {
    use salary_dashboard::data::loader::read_csv;

    use super::*;

    const CSV: &str = "\
ano,senioridade,contrato,tamanho_empresa,cargo,remoto,residencia_iso3,usd
2024,senior,integral,grande,Data Scientist,remoto,USA,200000
2024,junior,integral,media,Data Analyst,presencial,BRA,40000
2023,senior,freelancer,media,Data Scientist,remoto,DEU,100000
";

    fn loaded() -> AppState {
        let mut state = AppState::new(DashboardConfig::default());
        state.finish_load(read_csv(CSV.as_bytes()));
        state
    }

    #[test]
    fn loading_selects_everything() {
        let state = loaded();
        assert_eq!(state.visible_indices, vec![0, 1, 2]);
        assert_eq!(state.summary.kpis.record_count, 3);
        assert_eq!(state.summary.kpis.modal_role, "Data Scientist");
        assert_eq!(state.summary.focus_role_by_country.len(), 2);
    }

    #[test]
    fn selection_changes_recompute_summary() {
        let mut state = loaded();
        state.toggle_category(FilterAxis::Seniority, &"senior".to_string());
        assert_eq!(state.visible_indices, vec![1]);
        assert_eq!(state.summary.kpis.modal_role, "Data Analyst");
        assert!(state.summary.focus_role_by_country.is_empty());

        state.select_none(FilterAxis::Year);
        assert!(state.visible_indices.is_empty());
        assert_eq!(state.summary.kpis.modal_role, "N/A");

        state.select_all(FilterAxis::Year);
        state.select_all(FilterAxis::Seniority);
        assert_eq!(state.view().map(|v| v.len()), Some(3));
    }

    #[test]
    fn failed_load_keeps_previous_dataset() {
        let mut state = loaded();
        state.finish_load(Err(LoadError::UnsupportedFormat("xlsx".to_string())));
        assert!(state.dataset.is_some());
        assert!(state
            .status_message
            .as_deref()
            .is_some_and(|m| m.contains("xlsx")));
    }
}
