//! Row types for month-by-month loan schedules

use serde::{Deserialize, Serialize};

use super::yearly::{PeriodRecord, YearlyRow};

/// A single month of a loan or payoff schedule
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AmortizationRow {
    /// Payment number (1-indexed)
    pub period: u32,
    /// Total paid this month (principal + interest)
    pub payment: f64,
    pub principal_portion: f64,
    pub interest_portion: f64,
    /// Balance after this payment, never negative
    pub ending_balance: f64,
}

/// Summed loan flows for one year
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoanYearTotals {
    pub payment: f64,
    pub principal: f64,
    pub interest: f64,
}

impl PeriodRecord for AmortizationRow {
    type Totals = LoanYearTotals;

    fn accumulate(&self, totals: &mut LoanYearTotals) {
        totals.payment += self.payment;
        totals.principal += self.principal_portion;
        totals.interest += self.interest_portion;
    }

    fn closing_balance(&self) -> f64 {
        self.ending_balance
    }
}

/// Flattened yearly loan summary row, as rendered by charts and exports
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct YearlyLoanRow {
    pub year: u32,
    pub payment: f64,
    pub principal: f64,
    pub interest: f64,
    pub ending_balance: f64,
}

impl From<YearlyRow<LoanYearTotals>> for YearlyLoanRow {
    fn from(row: YearlyRow<LoanYearTotals>) -> Self {
        Self {
            year: row.year,
            payment: row.totals.payment,
            principal: row.totals.principal,
            interest: row.totals.interest,
            ending_balance: row.ending_balance,
        }
    }
}
