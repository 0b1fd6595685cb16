//! Engine configuration
//!
//! Everything the calculators consult besides their own inputs: the payoff
//! iteration cap and the tax tables. Hosts build it once and pass it by
//! reference into every evaluation.
//!
//! Every engine also clamps its own horizon to [`MAX_HORIZON_MONTHS`], so a
//! single request can never demand unbounded work or memory.

use std::env;
use std::path::PathBuf;

use log::warn;

use crate::tax::TaxTables;

/// Longest horizon any engine simulates (100 years). Loan terms, growth
/// years and comparison stays beyond it are clamped to it.
pub const MAX_HORIZON_MONTHS: u32 = 1200;

/// [`MAX_HORIZON_MONTHS`] in whole years
pub const MAX_HORIZON_YEARS: u32 = MAX_HORIZON_MONTHS / 12;

/// Payoff simulations give up after this many months
pub const DEFAULT_MAX_PAYOFF_MONTHS: u32 = MAX_HORIZON_MONTHS;

/// Environment variable overriding the payoff month cap
pub const MAX_PAYOFF_MONTHS_VAR: &str = "FINPROJ_MAX_PAYOFF_MONTHS";

/// Environment variable naming a directory of tax table CSV files
pub const TAX_TABLES_VAR: &str = "FINPROJ_TAX_TABLES";

#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Hard cap on simulated months for payoff and debt plans, at most
    /// [`MAX_HORIZON_MONTHS`]
    pub max_payoff_months: u32,

    pub tax_tables: TaxTables,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            max_payoff_months: DEFAULT_MAX_PAYOFF_MONTHS,
            tax_tables: TaxTables::federal_2024(),
        }
    }
}

impl EngineConfig {
    /// Read overrides from the environment, keeping defaults for anything
    /// missing or unparsable
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Some(months) = env::var(MAX_PAYOFF_MONTHS_VAR)
            .ok()
            .and_then(|s| s.parse::<u32>().ok())
            .filter(|&m| m > 0)
        {
            config = config.with_max_payoff_months(months);
        }

        if let Ok(dir) = env::var(TAX_TABLES_VAR) {
            let path = PathBuf::from(dir);
            match TaxTables::from_csv_path(&path) {
                Ok(tables) => config.tax_tables = tables,
                Err(e) => warn!(
                    "could not load tax tables from {}: {}; using built-in {} tables",
                    path.display(),
                    e,
                    config.tax_tables.year
                ),
            }
        }

        config
    }

    /// Set the payoff cap, clamped to `[1, MAX_HORIZON_MONTHS]`
    pub fn with_max_payoff_months(mut self, months: u32) -> Self {
        self.max_payoff_months = months.clamp(1, MAX_HORIZON_MONTHS);
        self
    }

    pub fn with_tax_tables(mut self, tax_tables: TaxTables) -> Self {
        self.tax_tables = tax_tables;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = EngineConfig::default();
        assert_eq!(config.max_payoff_months, 1200);
        assert_eq!(config.tax_tables.year, 2024);
    }

    #[test]
    fn test_builder_clamps_cap() {
        let config = EngineConfig::default().with_max_payoff_months(0);
        assert_eq!(config.max_payoff_months, 1);

        let config = EngineConfig::default().with_max_payoff_months(u32::MAX);
        assert_eq!(config.max_payoff_months, MAX_HORIZON_MONTHS);
    }
}
