use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Source column names
// ---------------------------------------------------------------------------

/// Column names as they appear in the published survey CSV.
pub mod columns {
    pub const YEAR: &str = "ano";
    pub const SENIORITY: &str = "senioridade";
    pub const CONTRACT_TYPE: &str = "contrato";
    pub const COMPANY_SIZE: &str = "tamanho_empresa";
    pub const ROLE_TITLE: &str = "cargo";
    pub const REMOTE_TYPE: &str = "remoto";
    pub const RESIDENCE_ISO3: &str = "residencia_iso3";
    pub const SALARY_USD: &str = "usd";

    /// Every column the loader requires, in display order.
    pub const REQUIRED: [&str; 8] = [
        YEAR,
        SENIORITY,
        CONTRACT_TYPE,
        COMPANY_SIZE,
        ROLE_TITLE,
        REMOTE_TYPE,
        RESIDENCE_ISO3,
        SALARY_USD,
    ];

    /// English header for a source column; unknown names pass through.
    pub fn label(column: &str) -> &str {
        match column {
            YEAR => "Year",
            SENIORITY => "Seniority",
            CONTRACT_TYPE => "Contract type",
            COMPANY_SIZE => "Company size",
            ROLE_TITLE => "Role",
            REMOTE_TYPE => "Work mode",
            RESIDENCE_ISO3 => "Country",
            SALARY_USD => "Salary (USD)",
            other => other,
        }
    }
}

// ---------------------------------------------------------------------------
// SalaryRecord – one row of the survey
// ---------------------------------------------------------------------------

/// A single salary observation. Extra source columns are dropped on load.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SalaryRecord {
    #[serde(rename = "ano")]
    pub year: i64,
    #[serde(rename = "senioridade")]
    pub seniority: String,
    #[serde(rename = "contrato")]
    pub contract_type: String,
    #[serde(rename = "tamanho_empresa")]
    pub company_size: String,
    #[serde(rename = "cargo")]
    pub role_title: String,
    #[serde(rename = "remoto")]
    pub remote_type: String,
    #[serde(rename = "residencia_iso3")]
    pub residence_country_code: String,
    /// Annualized salary in USD, never negative.
    #[serde(rename = "usd")]
    pub salary_usd: f64,
}

// ---------------------------------------------------------------------------
// FilterAxis – the four categorical columns exposed as sidebar filters
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum FilterAxis {
    Year,
    Seniority,
    ContractType,
    CompanySize,
}

impl FilterAxis {
    pub const ALL: [FilterAxis; 4] = [
        FilterAxis::Year,
        FilterAxis::Seniority,
        FilterAxis::ContractType,
        FilterAxis::CompanySize,
    ];

    /// Human-readable label for the sidebar.
    pub fn label(self) -> &'static str {
        match self {
            FilterAxis::Year => "Year",
            FilterAxis::Seniority => "Seniority",
            FilterAxis::ContractType => "Contract type",
            FilterAxis::CompanySize => "Company size",
        }
    }

    /// Name of the backing column in the source file.
    pub fn column(self) -> &'static str {
        match self {
            FilterAxis::Year => columns::YEAR,
            FilterAxis::Seniority => columns::SENIORITY,
            FilterAxis::ContractType => columns::CONTRACT_TYPE,
            FilterAxis::CompanySize => columns::COMPANY_SIZE,
        }
    }
}

impl fmt::Display for FilterAxis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

// ---------------------------------------------------------------------------
// ObservedValues – sorted distinct values per filter axis
// ---------------------------------------------------------------------------

/// For each filter axis the sorted set of distinct values in the dataset.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ObservedValues {
    pub years: BTreeSet<i64>,
    pub seniorities: BTreeSet<String>,
    pub contract_types: BTreeSet<String>,
    pub company_sizes: BTreeSet<String>,
}

impl ObservedValues {
    fn observe(&mut self, record: &SalaryRecord) {
        self.years.insert(record.year);
        // Avoid a clone per row once a value has been seen.
        if !self.seniorities.contains(&record.seniority) {
            self.seniorities.insert(record.seniority.clone());
        }
        if !self.contract_types.contains(&record.contract_type) {
            self.contract_types.insert(record.contract_type.clone());
        }
        if !self.company_sizes.contains(&record.company_size) {
            self.company_sizes.insert(record.company_size.clone());
        }
    }

    /// Number of distinct values on one axis.
    pub fn count(&self, axis: FilterAxis) -> usize {
        match axis {
            FilterAxis::Year => self.years.len(),
            FilterAxis::Seniority => self.seniorities.len(),
            FilterAxis::ContractType => self.contract_types.len(),
            FilterAxis::CompanySize => self.company_sizes.len(),
        }
    }
}

// ---------------------------------------------------------------------------
// SalaryDataset – the complete loaded dataset
// ---------------------------------------------------------------------------

/// The full parsed dataset. Read-only once built.
#[derive(Debug, Clone, Default)]
pub struct SalaryDataset {
    records: Vec<SalaryRecord>,
    observed: ObservedValues,
}

impl SalaryDataset {
    /// Build the per-axis value index from the loaded records.
    pub fn from_records(records: Vec<SalaryRecord>) -> Self {
        let mut observed = ObservedValues::default();
        for record in &records {
            observed.observe(record);
        }
        SalaryDataset { records, observed }
    }

    /// All records in source order.
    pub fn records(&self) -> &[SalaryRecord] {
        &self.records
    }

    pub fn observed(&self) -> &ObservedValues {
        &self.observed
    }

    /// Number of records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the dataset is empty.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
