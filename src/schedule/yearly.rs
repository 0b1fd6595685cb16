//! Roll a monthly series into one row per projection year
//!
//! Flow quantities (payments, interest, contributions, ...) are summed over
//! the months present in each year. The balance is a snapshot of the last
//! month present. A partial final year is summed as-is with no padding.

use serde::{Deserialize, Serialize};

use super::money::MONTHS_PER_YEAR;

/// A monthly record that can be folded into yearly totals
pub trait PeriodRecord {
    /// Per-year accumulator of flow quantities
    type Totals: Default;

    /// Add this month's flows to the running totals for its year
    fn accumulate(&self, totals: &mut Self::Totals);

    /// Balance at the end of this month
    fn closing_balance(&self) -> f64;
}

/// One aggregated year
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct YearlyRow<T> {
    /// Projection year (1-indexed)
    pub year: u32,
    /// Number of months that contributed to this row (12 except possibly the last)
    pub months: u32,
    /// Summed flows
    pub totals: T,
    /// Balance at the end of the last month in the year
    pub ending_balance: f64,
}

/// Aggregate a month-ordered series into yearly rows.
///
/// Month `i` (0-indexed position in `records`) belongs to year `i / 12 + 1`.
pub fn aggregate_yearly<R: PeriodRecord>(records: &[R]) -> Vec<YearlyRow<R::Totals>> {
    records
        .chunks(MONTHS_PER_YEAR as usize)
        .enumerate()
        .map(|(idx, months)| {
            let mut totals = R::Totals::default();
            for month in months {
                month.accumulate(&mut totals);
            }
            YearlyRow {
                year: idx as u32 + 1,
                months: months.len() as u32,
                totals,
                ending_balance: months.last().map(|m| m.closing_balance()).unwrap_or(0.0),
            }
        })
        .collect()
}
