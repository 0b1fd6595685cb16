//! Federal tax estimates: income tax, capital gains and paycheck withholding

mod brackets;
mod calculator;
mod capital_gains;
pub mod loader;
mod paycheck;

pub use brackets::{BracketTable, ByStatus, FilingStatus, PayrollTaxRates, TaxBracket, TaxTables};
pub use calculator::{BracketAmount, IncomeTaxInput, IncomeTaxResult, ProgressiveTaxCalculator, TaxResult};
pub use capital_gains::{CapitalGainsInput, CapitalGainsResult, HoldingPeriod};
pub use paycheck::{PayBreakdown, PayFrequency, PaycheckInput, PaycheckResult};
