use std::borrow::Cow;
use std::collections::BTreeSet;

use super::model::{FilterAxis, SalaryDataset, SalaryRecord};

// ---------------------------------------------------------------------------
// FilterSelection: which values are allowed on each axis
// ---------------------------------------------------------------------------

/// Allowed values for the four filter axes.
///
/// Unlike an "absent means no filter" scheme, every axis is always active:
/// an empty set matches nothing.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterSelection {
    pub years: BTreeSet<i64>,
    pub seniorities: BTreeSet<String>,
    pub contract_types: BTreeSet<String>,
    pub company_sizes: BTreeSet<String>,
}

impl FilterSelection {
    /// Everything the dataset contains is selected (i.e., show everything).
    pub fn all(dataset: &SalaryDataset) -> Self {
        let observed = dataset.observed();
        FilterSelection {
            years: observed.years.clone(),
            seniorities: observed.seniorities.clone(),
            contract_types: observed.contract_types.clone(),
            company_sizes: observed.company_sizes.clone(),
        }
    }

    /// Whether `record` passes all four membership tests.
    pub fn matches(&self, record: &SalaryRecord) -> bool {
        self.years.contains(&record.year)
            && self.seniorities.contains(&record.seniority)
            && self.contract_types.contains(&record.contract_type)
            && self.company_sizes.contains(&record.company_size)
    }

    /// Number of selected values on one axis.
    pub fn selected_count(&self, axis: FilterAxis) -> usize {
        match axis {
            FilterAxis::Year => self.years.len(),
            FilterAxis::Seniority => self.seniorities.len(),
            FilterAxis::ContractType => self.contract_types.len(),
            FilterAxis::CompanySize => self.company_sizes.len(),
        }
    }

    /// Restore one axis to every observed value.
    pub fn select_all(&mut self, axis: FilterAxis, dataset: &SalaryDataset) {
        let observed = dataset.observed();
        match axis {
            FilterAxis::Year => self.years = observed.years.clone(),
            FilterAxis::Seniority => self.seniorities = observed.seniorities.clone(),
            FilterAxis::ContractType => self.contract_types = observed.contract_types.clone(),
            FilterAxis::CompanySize => self.company_sizes = observed.company_sizes.clone(),
        }
    }

    /// Clear one axis, which hides every record.
    pub fn select_none(&mut self, axis: FilterAxis) {
        match axis {
            FilterAxis::Year => self.years.clear(),
            FilterAxis::Seniority => self.seniorities.clear(),
            FilterAxis::ContractType => self.contract_types.clear(),
            FilterAxis::CompanySize => self.company_sizes.clear(),
        }
    }
}

/// Flip membership of `value` in `set`.
pub fn toggle<T: Ord + Clone>(set: &mut BTreeSet<T>, value: &T) {
    if !set.remove(value) {
        set.insert(value.clone());
    }
}

// ---------------------------------------------------------------------------
// FilteredView: records passing the selection, in source order
// ---------------------------------------------------------------------------

/// A borrowed, order-preserving subset of a [`SalaryDataset`].
#[derive(Debug, Clone)]
pub struct FilteredView<'a> {
    dataset: &'a SalaryDataset,
    indices: Cow<'a, [usize]>,
}

impl<'a> FilteredView<'a> {
    /// Wrap indices cached by the caller without copying them.
    ///
    /// Indices outside the dataset are skipped by [`FilteredView::iter`] and
    /// [`FilteredView::get`].
    pub fn from_indices(dataset: &'a SalaryDataset, indices: &'a [usize]) -> Self {
        FilteredView {
            dataset,
            indices: Cow::Borrowed(indices),
        }
    }

    /// Source-row indices of the records in this view.
    pub fn indices(&self) -> &[usize] {
        &self.indices
    }

    pub fn len(&self) -> usize {
        self.indices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    /// Give up the view, keeping its row indices.
    pub fn into_indices(self) -> Vec<usize> {
        self.indices.into_owned()
    }

    /// Records in source order.
    pub fn iter(&self) -> impl Iterator<Item = &'a SalaryRecord> + '_ {
        let records = self.dataset.records();
        self.indices.iter().filter_map(move |&i| records.get(i))
    }

    /// Record at position `pos` within the view.
    pub fn get(&self, pos: usize) -> Option<&'a SalaryRecord> {
        let idx = *self.indices.get(pos)?;
        self.dataset.records().get(idx)
    }
}

/// Return the records that pass all four axis filters.
///
/// A record passes when its year, seniority, contract type and company size
/// are each in the corresponding selected set. An empty set on any axis
/// therefore yields an empty view.
pub fn apply_filters<'a>(dataset: &'a SalaryDataset, selection: &FilterSelection) -> FilteredView<'a> {
    let indices: Vec<usize> = dataset
        .records()
        .iter()
        .enumerate()
        .filter(|(_, record)| selection.matches(record))
        .map(|(i, _)| i)
        .collect();
    FilteredView {
        dataset,
        indices: Cow::Owned(indices),
    }
}
