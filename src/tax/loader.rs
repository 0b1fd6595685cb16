//! CSV-based tax table loader
//!
//! A table directory holds:
//! - `ordinary.csv` and `long_term_gains.csv` with columns
//!   `filing_status,lower_bound,upper_bound,rate_percent` (empty upper bound = unbounded)
//! - optionally `standard_deduction.csv` with columns `filing_status,amount`
//!
//! Anything not supplied keeps its built-in 2024 value.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use log::info;
use serde::Deserialize;

use super::brackets::{BracketTable, ByStatus, FilingStatus, TaxBracket, TaxTables};
use crate::error::{EngineError, EngineResult};

pub const ORDINARY_FILE: &str = "ordinary.csv";
pub const LONG_TERM_GAINS_FILE: &str = "long_term_gains.csv";
pub const STANDARD_DEDUCTION_FILE: &str = "standard_deduction.csv";

/// Raw bracket row
#[derive(Debug, Deserialize)]
struct BracketRow {
    filing_status: String,
    lower_bound: f64,
    upper_bound: Option<f64>,
    rate_percent: f64,
}

/// Raw standard deduction row
#[derive(Debug, Deserialize)]
struct DeductionRow {
    filing_status: String,
    amount: f64,
}

fn parse_status(table: &str, key: &str) -> EngineResult<FilingStatus> {
    FilingStatus::from_key(key).ok_or_else(|| EngineError::InvalidTable {
        table: table.to_string(),
        reason: format!("unknown filing status '{}'", key),
    })
}

/// Read a bracket table for every filing status from CSV content
pub fn read_bracket_tables<R: Read>(name: &str, reader: R) -> EngineResult<ByStatus<BracketTable>> {
    let mut reader = csv::Reader::from_reader(reader);
    let mut rows: ByStatus<Vec<TaxBracket>> = ByStatus {
        single: Vec::new(),
        married_filing_jointly: Vec::new(),
        married_filing_separately: Vec::new(),
        head_of_household: Vec::new(),
    };

    for result in reader.deserialize() {
        let row: BracketRow = result?;
        let status = parse_status(name, &row.filing_status)?;
        rows.get_mut(status)
            .push(TaxBracket::new(row.lower_bound, row.upper_bound, row.rate_percent));
    }

    let table = |status: FilingStatus| {
        BracketTable::new(
            &format!("{}:{}", name, status.key()),
            rows.get(status).clone(),
        )
    };
    Ok(ByStatus {
        single: table(FilingStatus::Single)?,
        married_filing_jointly: table(FilingStatus::MarriedFilingJointly)?,
        married_filing_separately: table(FilingStatus::MarriedFilingSeparately)?,
        head_of_household: table(FilingStatus::HeadOfHousehold)?,
    })
}

/// Overwrite standard deductions with the statuses present in CSV content
pub fn read_standard_deductions<R: Read>(reader: R, deductions: &mut ByStatus<f64>) -> EngineResult<()> {
    let mut reader = csv::Reader::from_reader(reader);
    for result in reader.deserialize() {
        let row: DeductionRow = result?;
        let status = parse_status(STANDARD_DEDUCTION_FILE, &row.filing_status)?;
        *deductions.get_mut(status) = row.amount;
    }
    Ok(())
}

impl TaxTables {
    /// Load tables from CSV files in `path`, starting from the built-in defaults
    pub fn from_csv_path(path: &Path) -> EngineResult<Self> {
        let mut tables = Self::federal_2024();

        tables.ordinary = read_bracket_tables(ORDINARY_FILE, File::open(path.join(ORDINARY_FILE))?)?;
        tables.long_term_gains = read_bracket_tables(
            LONG_TERM_GAINS_FILE,
            File::open(path.join(LONG_TERM_GAINS_FILE))?,
        )?;

        let deduction_path = path.join(STANDARD_DEDUCTION_FILE);
        if deduction_path.exists() {
            read_standard_deductions(File::open(deduction_path)?, &mut tables.standard_deduction)?;
        }

        info!("loaded tax tables from {}", path.display());
        Ok(tables)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FLAT: &str = "\
filing_status,lower_bound,upper_bound,rate_percent
single,0,10000,10
single,10000,,20
married_filing_jointly,0,20000,10
married_filing_jointly,20000,,20
married_filing_separately,0,10000,10
married_filing_separately,10000,,20
head_of_household,0,15000,10
head_of_household,15000,,20
";

    #[test]
    fn test_read_bracket_tables() {
        let tables = read_bracket_tables("flat", FLAT.as_bytes()).unwrap();
        let single = tables.get(FilingStatus::Single).brackets();
        assert_eq!(single.len(), 2);
        assert_eq!(single[0].upper_bound, Some(10_000.0));
        assert_eq!(single[1].upper_bound, None);
        assert_eq!(tables.head_of_household.brackets()[1].lower_bound, 15_000.0);
    }

    #[test]
    fn test_missing_status_is_rejected() {
        let partial = "\
filing_status,lower_bound,upper_bound,rate_percent
single,0,,10
";
        let result = read_bracket_tables("partial", partial.as_bytes());
        assert!(matches!(result, Err(EngineError::InvalidTable { .. })));
    }

    #[test]
    fn test_unknown_status_is_rejected() {
        let bad = "\
filing_status,lower_bound,upper_bound,rate_percent
widowed,0,,10
";
        let err = read_bracket_tables("bad", bad.as_bytes()).unwrap_err();
        assert!(err.to_string().contains("widowed"));
    }

    #[test]
    fn test_malformed_number_is_csv_error() {
        let bad = "\
filing_status,lower_bound,upper_bound,rate_percent
single,zero,,10
";
        let result = read_bracket_tables("bad", bad.as_bytes());
        assert!(matches!(result, Err(EngineError::Csv(_))));
    }

    #[test]
    fn test_read_standard_deductions_overrides_present_rows() {
        let mut deductions = TaxTables::federal_2024().standard_deduction;
        read_standard_deductions("filing_status,amount\nsingle,15000\n".as_bytes(), &mut deductions)
            .unwrap();
        assert_eq!(deductions.single, 15_000.0);
        assert_eq!(deductions.married_filing_jointly, 29_200.0);
    }

    #[test]
    fn test_missing_directory_is_io_error() {
        let result = TaxTables::from_csv_path(Path::new("/nonexistent/tax/tables"));
        assert!(matches!(result, Err(EngineError::Io(_))));
    }
}
