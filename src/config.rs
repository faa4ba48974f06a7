use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::data::summary::{
    SummaryOptions, DEFAULT_FOCUS_ROLE, DEFAULT_HISTOGRAM_BINS, DEFAULT_TOP_ROLES,
};

/// Published survey used when nothing else is configured.
pub const DEFAULT_SOURCE: &str =
    "https://raw.githubusercontent.com/vqrca/dashboard_salarios_dados/refs/heads/main/dados-imersao-final.csv";

/// Path of an optional JSON config file.
pub const CONFIG_ENV: &str = "SALARY_DASHBOARD_CONFIG";
/// Overrides `source` from the config file.
pub const SOURCE_ENV: &str = "SALARY_DASHBOARD_SOURCE";

// ---------------------------------------------------------------------------
// DashboardConfig
// ---------------------------------------------------------------------------

/// Startup settings. Every field is optional in the JSON file.
///
/// ```json
/// { "source": "data/salaries.csv", "top_roles": 5 }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    /// URL or local path of the dataset.
    pub source: String,
    /// Bars in the "top roles" chart.
    pub top_roles: usize,
    /// Role whose per-country mean salary is charted.
    pub focus_role: String,
    pub histogram_bins: usize,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            source: DEFAULT_SOURCE.to_string(),
            top_roles: DEFAULT_TOP_ROLES,
            focus_role: DEFAULT_FOCUS_ROLE.to_string(),
            histogram_bins: DEFAULT_HISTOGRAM_BINS,
        }
    }
}

impl DashboardConfig {
    /// Read the config file named by `SALARY_DASHBOARD_CONFIG` (if any), then
    /// apply `SALARY_DASHBOARD_SOURCE`.
    pub fn from_env() -> Result<Self> {
        let mut config = match std::env::var_os(CONFIG_ENV) {
            Some(path) => Self::from_file(Path::new(&path))?,
            None => Self::default(),
        };
        if let Ok(source) = std::env::var(SOURCE_ENV) {
            if !source.trim().is_empty() {
                config.source = source.trim().to_string();
            }
        }
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading config file {}", path.display()))?;
        Self::from_json(&text).with_context(|| format!("parsing config file {}", path.display()))
    }

    pub fn from_json(text: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(text).context("invalid dashboard config")?;
        Ok(config)
    }

    /// Aggregation settings derived from this config.
    pub fn summary_options(&self) -> SummaryOptions {
        SummaryOptions {
            top_roles: self.top_roles,
            focus_role: self.focus_role.clone(),
            histogram_bins: self.histogram_bins,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn partial_json_keeps_defaults() {
        let config = DashboardConfig::from_json(r#"{ "top_roles": 5 }"#).unwrap();
        assert_eq!(config.top_roles, 5);
        assert_eq!(config.source, DEFAULT_SOURCE);
        assert_eq!(config.focus_role, "Data Scientist");
        assert_eq!(config.histogram_bins, 30);
    }

    #[test]
    fn summary_options_follow_config() {
        let config = DashboardConfig {
            focus_role: "Data Engineer".to_string(),
            histogram_bins: 12,
            ..DashboardConfig::default()
        };
        let options = config.summary_options();
        assert_eq!(options.focus_role, "Data Engineer");
        assert_eq!(options.histogram_bins, 12);
        assert_eq!(options.top_roles, 10);
    }

    #[test]
    fn from_file_reports_bad_json() {
        let mut tmp = tempfile::NamedTempFile::new().unwrap();
        write!(tmp, "{{ not json").unwrap();
        let err = DashboardConfig::from_file(tmp.path()).unwrap_err();
        assert!(format!("{err:#}").contains("parsing config file"));
    }
}
