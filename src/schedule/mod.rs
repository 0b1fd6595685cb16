//! Shared schedule rows, money helpers and the monthly-to-yearly aggregator

mod money;
mod rows;
mod yearly;

pub use money::{monthly_rate, round_cents, sanitize_amount, sanitize_percent, MONTHS_PER_YEAR};
pub use rows::{AmortizationRow, LoanYearTotals, YearlyLoanRow};
pub use yearly::{aggregate_yearly, PeriodRecord, YearlyRow};
