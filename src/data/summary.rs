use std::collections::{BTreeMap, HashMap};

use super::filter::FilteredView;

/// Placeholder shown for the modal role when nothing is selected.
pub const NO_ROLE: &str = "N/A";

/// Role used for the per-country breakdown unless configured otherwise.
pub const DEFAULT_FOCUS_ROLE: &str = "Data Scientist";

pub const DEFAULT_TOP_ROLES: usize = 10;
pub const DEFAULT_HISTOGRAM_BINS: usize = 30;

// ---------------------------------------------------------------------------
// Output types
// ---------------------------------------------------------------------------

/// Headline metrics for the current selection.
#[derive(Debug, Clone, PartialEq)]
pub struct KpiBundle {
    pub mean_salary: f64,
    pub max_salary: f64,
    pub record_count: usize,
    pub modal_role: String,
}

impl KpiBundle {
    /// Values reported for an empty view. Never NaN.
    pub fn empty() -> Self {
        KpiBundle {
            mean_salary: 0.0,
            max_salary: 0.0,
            record_count: 0,
            modal_role: NO_ROLE.to_string(),
        }
    }
}

/// Mean salary of one group (a role or a country).
#[derive(Debug, Clone, PartialEq)]
pub struct GroupMean {
    pub key: String,
    pub mean_salary: f64,
    pub count: usize,
}

/// Number of records sharing one category value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupCount {
    pub key: String,
    pub count: usize,
}

/// One equal-width salary bucket. `upper` is exclusive except for the last bin.
#[derive(Debug, Clone, PartialEq)]
pub struct HistogramBin {
    pub lower: f64,
    pub upper: f64,
    pub count: usize,
}

// ---------------------------------------------------------------------------
// Pipeline operations
// ---------------------------------------------------------------------------

/// Mean, max, count and most frequent role over the view.
///
/// Ties for the modal role go to the role seen first.
pub fn compute_kpis(view: &FilteredView<'_>) -> KpiBundle {
    if view.is_empty() {
        return KpiBundle::empty();
    }

    let mut total = 0.0;
    let mut max = f64::NEG_INFINITY;
    for rec in view.iter() {
        total += rec.salary_usd;
        max = max.max(rec.salary_usd);
    }

    let role_counts = count_in_order(view.iter().map(|r| r.role_title.as_str()));
    // Strict `>` keeps the earliest role on ties.
    let mut modal: Option<&GroupCount> = None;
    for group in &role_counts {
        if modal.map_or(true, |best| group.count > best.count) {
            modal = Some(group);
        }
    }

    KpiBundle {
        mean_salary: total / view.len() as f64,
        max_salary: max,
        record_count: view.len(),
        modal_role: modal.map_or_else(|| NO_ROLE.to_string(), |g| g.key.clone()),
    }
}

/// The `k` roles with the highest mean salary, sorted ascending by mean.
///
/// Ascending order puts the best-paid role at the top of a horizontal bar
/// chart. Ties at the cut-off go to the role seen first.
pub fn top_roles_by_mean_salary(view: &FilteredView<'_>, k: usize) -> Vec<GroupMean> {
    let mut groups = mean_in_order(view.iter().map(|r| (r.role_title.as_str(), r.salary_usd)));
    // Stable sorts: equal means keep first-encountered order.
    groups.sort_by(|a, b| b.mean_salary.total_cmp(&a.mean_salary));
    groups.truncate(k);
    groups.sort_by(|a, b| a.mean_salary.total_cmp(&b.mean_salary));
    groups
}

/// Record count per remote-work type, in first-encountered order.
pub fn remote_distribution(view: &FilteredView<'_>) -> Vec<GroupCount> {
    count_in_order(view.iter().map(|r| r.remote_type.as_str()))
}

/// Mean salary per residence country for records whose role is exactly
/// `role_filter`, ordered by country code.
///
/// An empty result means the role does not occur in the view.
pub fn mean_salary_by_country(view: &FilteredView<'_>, role_filter: &str) -> Vec<GroupMean> {
    let mut acc: BTreeMap<&str, (f64, usize)> = BTreeMap::new();
    for rec in view.iter().filter(|r| r.role_title == role_filter) {
        let entry = acc.entry(rec.residence_country_code.as_str()).or_default();
        entry.0 += rec.salary_usd;
        entry.1 += 1;
    }
    acc.into_iter()
        .map(|(key, (sum, count))| GroupMean {
            key: key.to_string(),
            mean_salary: sum / count as f64,
            count,
        })
        .collect()
}

/// Split `[min, max]` salary into `bins` equal-width buckets.
///
/// When every salary is identical a single zero-width bin holds them all.
pub fn salary_histogram(view: &FilteredView<'_>, bins: usize) -> Vec<HistogramBin> {
    if view.is_empty() || bins == 0 {
        return Vec::new();
    }

    let (min, max) = view
        .iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), r| {
            (lo.min(r.salary_usd), hi.max(r.salary_usd))
        });

    let range = max - min;
    if range <= 0.0 {
        return vec![HistogramBin {
            lower: min,
            upper: max,
            count: view.len(),
        }];
    }

    let width = range / bins as f64;
    let mut out: Vec<HistogramBin> = (0..bins)
        .map(|i| HistogramBin {
            lower: min + width * i as f64,
            upper: if i + 1 == bins { max } else { min + width * (i + 1) as f64 },
            count: 0,
        })
        .collect();

    for rec in view.iter() {
        let slot = (((rec.salary_usd - min) / width) as usize).min(bins - 1);
        if let Some(bin) = out.get_mut(slot) {
            bin.count += 1;
        }
    }
    out
}

// ---------------------------------------------------------------------------
// DashboardSummary – everything the charts need for one selection
// ---------------------------------------------------------------------------

/// Tunables for [`DashboardSummary::compute`].
#[derive(Debug, Clone, PartialEq)]
pub struct SummaryOptions {
    pub top_roles: usize,
    pub focus_role: String,
    pub histogram_bins: usize,
}

impl Default for SummaryOptions {
    fn default() -> Self {
        Self {
            top_roles: DEFAULT_TOP_ROLES,
            focus_role: DEFAULT_FOCUS_ROLE.to_string(),
            histogram_bins: DEFAULT_HISTOGRAM_BINS,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct DashboardSummary {
    pub kpis: KpiBundle,
    pub top_roles: Vec<GroupMean>,
    pub remote: Vec<GroupCount>,
    pub focus_role_by_country: Vec<GroupMean>,
    pub histogram: Vec<HistogramBin>,
}

impl Default for DashboardSummary {
    fn default() -> Self {
        Self {
            kpis: KpiBundle::empty(),
            top_roles: Vec::new(),
            remote: Vec::new(),
            focus_role_by_country: Vec::new(),
            histogram: Vec::new(),
        }
    }
}

impl DashboardSummary {
    /// Run every aggregation over `view`.
    pub fn compute(view: &FilteredView<'_>, options: &SummaryOptions) -> Self {
        Self {
            kpis: compute_kpis(view),
            top_roles: top_roles_by_mean_salary(view, options.top_roles),
            remote: remote_distribution(view),
            focus_role_by_country: mean_salary_by_country(view, &options.focus_role),
            histogram: salary_histogram(view, options.histogram_bins),
        }
    }
}

// -- grouping helpers --

fn count_in_order<'r>(keys: impl Iterator<Item = &'r str>) -> Vec<GroupCount> {
    let mut slots: HashMap<&str, usize> = HashMap::new();
    let mut out: Vec<GroupCount> = Vec::new();
    for key in keys {
        let slot = *slots.entry(key).or_insert_with(|| {
            out.push(GroupCount {
                key: key.to_string(),
                count: 0,
            });
            out.len() - 1
        });
        if let Some(group) = out.get_mut(slot) {
            group.count += 1;
        }
    }
    out
}

fn mean_in_order<'r>(rows: impl Iterator<Item = (&'r str, f64)>) -> Vec<GroupMean> {
    let mut slots: HashMap<&str, usize> = HashMap::new();
    let mut sums: Vec<(String, f64, usize)> = Vec::new();
    for (key, value) in rows {
        let slot = *slots.entry(key).or_insert_with(|| {
            sums.push((key.to_string(), 0.0, 0));
            sums.len() - 1
        });
        if let Some(acc) = sums.get_mut(slot) {
            acc.1 += value;
            acc.2 += 1;
        }
    }
    sums.into_iter()
        .map(|(key, sum, count)| GroupMean {
            key,
            mean_salary: sum / count as f64,
            count,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::filter::{apply_filters, FilterSelection};
    use crate::data::model::tests::record;
    use crate::data::model::SalaryDataset;

    fn full_view(ds: &SalaryDataset) -> FilteredView<'_> {
        apply_filters(ds, &FilterSelection::all(ds))
    }

    fn pairs(groups: &[GroupMean]) -> Vec<(&str, f64)> {
        groups.iter().map(|g| (g.key.as_str(), g.mean_salary)).collect()
    }

    #[test]
    fn kpis_on_empty_view_are_zero() {
        let ds = SalaryDataset::from_records(Vec::new());
        let kpis = compute_kpis(&full_view(&ds));
        assert_eq!(kpis, KpiBundle::empty());
        assert_eq!(kpis.mean_salary, 0.0);
        assert_eq!(kpis.max_salary, 0.0);
        assert_eq!(kpis.record_count, 0);
        assert_eq!(kpis.modal_role, "N/A");
    }

    #[test]
    fn kpis_on_single_record() {
        let ds = SalaryDataset::from_records(vec![record(2024, "senior", "Data Scientist", 120_000.0)]);
        let kpis = compute_kpis(&full_view(&ds));
        assert_eq!(
            kpis,
            KpiBundle {
                mean_salary: 120_000.0,
                max_salary: 120_000.0,
                record_count: 1,
                modal_role: "Data Scientist".to_string(),
            }
        );
    }

    #[test]
    fn modal_role_ties_go_to_first_seen() {
        let ds = SalaryDataset::from_records(vec![
            record(2024, "senior", "Zeta", 10.0),
            record(2024, "senior", "Alpha", 20.0),
            record(2024, "senior", "Alpha", 30.0),
            record(2024, "senior", "Zeta", 60.0),
        ]);
        let kpis = compute_kpis(&full_view(&ds));
        assert_eq!(kpis.modal_role, "Zeta");
        assert_eq!(kpis.mean_salary, 30.0);
        assert_eq!(kpis.max_salary, 60.0);
    }

    #[test]
    fn top_roles_mean_and_ascending() {
        let ds = SalaryDataset::from_records(vec![
            record(2024, "senior", "A", 100.0),
            record(2024, "senior", "B", 300.0),
            record(2024, "senior", "B", 500.0),
        ]);
        let top = top_roles_by_mean_salary(&full_view(&ds), 10);
        assert_eq!(pairs(&top), vec![("A", 100.0), ("B", 400.0)]);
    }

    #[test]
    fn top_roles_keeps_only_the_k_largest() {
        let records = (0..15)
            .map(|i| record(2024, "senior", &format!("role-{i:02}"), 1_000.0 * (i as f64 + 1.0)))
            .collect();
        let ds = SalaryDataset::from_records(records);
        let top = top_roles_by_mean_salary(&full_view(&ds), 10);

        assert_eq!(top.len(), 10);
        assert!(top.windows(2).all(|w| w[0].mean_salary <= w[1].mean_salary));
        assert_eq!(top.first().map(|g| g.key.as_str()), Some("role-05"));
        assert_eq!(top.last().map(|g| g.key.as_str()), Some("role-14"));
        assert!(top_roles_by_mean_salary(&full_view(&ds), 0).is_empty());
    }

    #[test]
    fn top_roles_ties_at_cutoff_prefer_first_seen() {
        let ds = SalaryDataset::from_records(vec![
            record(2024, "senior", "first", 50.0),
            record(2024, "senior", "second", 50.0),
            record(2024, "senior", "top", 90.0),
        ]);
        let top = top_roles_by_mean_salary(&full_view(&ds), 2);
        assert_eq!(pairs(&top), vec![("first", 50.0), ("top", 90.0)]);
    }

    #[test]
    fn remote_counts_sum_to_view_len() {
        let mut records = vec![
            record(2024, "senior", "A", 1.0),
            record(2024, "senior", "A", 2.0),
            record(2024, "senior", "A", 3.0),
        ];
        records[1].remote_type = "presencial".to_string();
        let ds = SalaryDataset::from_records(records);
        let view = full_view(&ds);

        let dist = remote_distribution(&view);
        assert_eq!(
            dist,
            vec![
                GroupCount { key: "remoto".to_string(), count: 2 },
                GroupCount { key: "presencial".to_string(), count: 1 },
            ]
        );
        assert_eq!(dist.iter().map(|g| g.count).sum::<usize>(), view.len());
    }

    #[test]
    fn country_means_only_for_focus_role() {
        let mut records = vec![
            record(2024, "senior", "Data Scientist", 100_000.0),
            record(2024, "senior", "Data Scientist", 140_000.0),
            record(2024, "senior", "Data Scientist", 40_000.0),
            record(2024, "senior", "Data Engineer", 999_999.0),
            record(2024, "senior", "data scientist", 1.0),
        ];
        records[2].residence_country_code = "BRA".to_string();
        let ds = SalaryDataset::from_records(records);
        let by_country = mean_salary_by_country(&full_view(&ds), DEFAULT_FOCUS_ROLE);
        assert_eq!(pairs(&by_country), vec![("BRA", 40_000.0), ("USA", 120_000.0)]);
    }

    #[test]
    fn country_means_for_absent_role_is_empty() {
        let ds = SalaryDataset::from_records(vec![record(2024, "senior", "Data Analyst", 1.0)]);
        assert!(mean_salary_by_country(&full_view(&ds), "Data Scientist").is_empty());
    }

    #[test]
    fn histogram_bins_cover_every_record() {
        let records = [10.0, 20.0, 30.0, 40.0, 100.0]
            .into_iter()
            .map(|usd| record(2024, "senior", "A", usd))
            .collect();
        let ds = SalaryDataset::from_records(records);
        let view = full_view(&ds);

        let hist = salary_histogram(&view, 3);
        assert_eq!(hist.len(), 3);
        assert_eq!(hist.iter().map(|b| b.count).collect::<Vec<_>>(), vec![3, 1, 1]);
        assert_eq!(hist.first().map(|b| b.lower), Some(10.0));
        assert_eq!(hist.last().map(|b| b.upper), Some(100.0));
    }

    #[test]
    fn histogram_degenerate_inputs() {
        let ds = SalaryDataset::from_records(vec![
            record(2024, "senior", "A", 5.0),
            record(2024, "senior", "B", 5.0),
        ]);
        let view = full_view(&ds);
        assert_eq!(
            salary_histogram(&view, 30),
            vec![HistogramBin { lower: 5.0, upper: 5.0, count: 2 }]
        );
        assert!(salary_histogram(&view, 0).is_empty());

        let empty = SalaryDataset::from_records(Vec::new());
        assert!(salary_histogram(&full_view(&empty), 30).is_empty());
    }

    #[test]
    fn summary_is_idempotent() {
        let ds = SalaryDataset::from_records(vec![
            record(2022, "junior", "Data Scientist", 70_000.1),
            record(2023, "senior", "Data Engineer", 130_000.7),
            record(2024, "senior", "Data Scientist", 151_000.3),
        ]);
        let options = SummaryOptions::default();
        let first = DashboardSummary::compute(&full_view(&ds), &options);
        let second = DashboardSummary::compute(&full_view(&ds), &options);
        assert_eq!(first, second);
        assert_eq!(first.kpis.mean_salary.to_bits(), second.kpis.mean_salary.to_bits());
    }
}
