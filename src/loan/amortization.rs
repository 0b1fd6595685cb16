//! Fixed-payment amortization schedules
//!
//! Solves for the level payment of a loan and walks the month-by-month split
//! of each payment into interest and principal.

use log::debug;
use serde::{Deserialize, Serialize};

use crate::config::MAX_HORIZON_MONTHS;
use crate::schedule::{
    aggregate_yearly, monthly_rate, sanitize_amount, AmortizationRow, YearlyLoanRow,
};

/// Balances below this are treated as fully repaid (float residue, far below a cent)
pub(crate) const BALANCE_EPSILON: f64 = 1e-6;

/// Terms of an amortizing loan
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoanTerms {
    /// Amount borrowed
    pub principal: f64,
    /// Annual percentage rate, e.g. 6.5 for 6.5%
    pub annual_rate_percent: f64,
    /// Number of monthly payments
    pub term_periods: u32,
}

impl LoanTerms {
    pub fn new(principal: f64, annual_rate_percent: f64, term_periods: u32) -> Self {
        Self {
            principal,
            annual_rate_percent,
            term_periods,
        }
    }

    /// Terms expressed in whole years of monthly payments
    pub fn from_years(principal: f64, annual_rate_percent: f64, years: u32) -> Self {
        Self::new(principal, annual_rate_percent, years.saturating_mul(12))
    }
}

/// Complete amortization output
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AmortizationResult {
    /// Level monthly payment
    pub payment: f64,
    pub total_interest: f64,
    pub total_payment: f64,
    pub schedule: Vec<AmortizationRow>,
}

impl AmortizationResult {
    /// Result for a loan with nothing to repay
    pub fn empty() -> Self {
        Self {
            payment: 0.0,
            total_interest: 0.0,
            total_payment: 0.0,
            schedule: Vec::new(),
        }
    }

    /// Build the result from a schedule, summing interest and payments
    pub(crate) fn from_schedule(payment: f64, schedule: Vec<AmortizationRow>) -> Self {
        let total_interest = schedule.iter().map(|r| r.interest_portion).sum();
        let total_payment = schedule.iter().map(|r| r.payment).sum();
        Self {
            payment,
            total_interest,
            total_payment,
            schedule,
        }
    }

    /// Number of payments actually made
    pub fn payoff_months(&self) -> u32 {
        self.schedule.len() as u32
    }

    /// Schedule rolled up into calendar years of the loan
    pub fn yearly_breakdown(&self) -> Vec<YearlyLoanRow> {
        aggregate_yearly(&self.schedule)
            .into_iter()
            .map(YearlyLoanRow::from)
            .collect()
    }

    /// Outstanding balance after `months` payments (principal if none made yet)
    pub fn balance_after(&self, months: u32, principal: f64) -> f64 {
        if months == 0 || self.schedule.is_empty() {
            return sanitize_amount(principal);
        }
        match self.schedule.get(months as usize - 1) {
            Some(row) => row.ending_balance,
            None => 0.0,
        }
    }
}

/// Base schedule and the same loan with an extra monthly principal payment
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtraPaymentResult {
    pub base: AmortizationResult,
    pub accelerated: AmortizationResult,
    pub extra_monthly_payment: f64,
    pub interest_saved: f64,
    pub months_saved: u32,
}

/// One month of amortization: interest first, then principal capped at the balance.
///
/// When `settle` is set the whole remaining balance is retired regardless of
/// `payment`, used on the final scheduled period to absorb float residue.
pub(crate) fn amortization_step(
    period: u32,
    balance: f64,
    rate: f64,
    payment: f64,
    settle: bool,
) -> AmortizationRow {
    let interest_portion = balance * rate;
    let principal_portion = if settle {
        balance
    } else {
        (payment - interest_portion).min(balance).max(0.0)
    };

    let mut ending_balance = (balance - principal_portion).max(0.0);
    if ending_balance < BALANCE_EPSILON {
        ending_balance = 0.0;
    }

    AmortizationRow {
        period,
        payment: principal_portion + interest_portion,
        principal_portion,
        interest_portion,
        ending_balance,
    }
}

/// Level-payment amortization calculator
pub struct AmortizationEngine;

impl AmortizationEngine {
    /// Level monthly payment for `principal` over `periods` at periodic rate `rate`.
    ///
    /// Branches on a zero rate before the annuity formula so nothing divides by zero.
    /// Total over every `u32` period count.
    pub fn level_payment(principal: f64, rate: f64, periods: u32) -> f64 {
        let principal = sanitize_amount(principal);
        if principal <= 0.0 || periods == 0 {
            return 0.0;
        }
        if rate <= 0.0 {
            return principal / periods as f64;
        }

        let growth = (1.0 + rate).powf(periods as f64);
        if !growth.is_finite() {
            // Interest-only limit as the term grows without bound
            return principal * rate;
        }
        principal * rate * growth / (growth - 1.0)
    }

    /// Compute the level payment and the full month-by-month schedule.
    ///
    /// Terms longer than [`MAX_HORIZON_MONTHS`] are amortized over the cap.
    pub fn amortize(terms: &LoanTerms) -> AmortizationResult {
        Self::amortize_paying(terms, 0.0)
    }

    /// Schedule when `extra` is added to every level payment as additional principal
    fn amortize_paying(terms: &LoanTerms, extra: f64) -> AmortizationResult {
        let principal = sanitize_amount(terms.principal);
        let n = terms.term_periods.min(MAX_HORIZON_MONTHS);
        if principal <= 0.0 || n == 0 {
            return AmortizationResult::empty();
        }

        let rate = monthly_rate(terms.annual_rate_percent);
        let payment = Self::level_payment(principal, rate, n);
        let paid_each_month = payment + sanitize_amount(extra);

        let mut schedule = Vec::with_capacity(n as usize);
        let mut balance = principal;
        let mut period = 1;
        while balance > 0.0 && period <= n {
            let row = amortization_step(period, balance, rate, paid_each_month, period == n);
            balance = row.ending_balance;
            schedule.push(row);
            period += 1;
        }

        let result = AmortizationResult::from_schedule(payment, schedule);
        debug!(
            "amortized {:.2} over {} months at {}%: payment {:.2}, interest {:.2}",
            principal,
            result.payoff_months(),
            terms.annual_rate_percent,
            payment,
            result.total_interest
        );
        result
    }

    /// Compare the base schedule with one that pays `extra_monthly` toward principal each month
    pub fn amortize_with_extra(terms: &LoanTerms, extra_monthly: f64) -> ExtraPaymentResult {
        let extra_monthly = sanitize_amount(extra_monthly);
        let base = Self::amortize(terms);
        let accelerated = Self::amortize_paying(terms, extra_monthly);

        ExtraPaymentResult {
            interest_saved: (base.total_interest - accelerated.total_interest).max(0.0),
            months_saved: base.payoff_months().saturating_sub(accelerated.payoff_months()),
            base,
            accelerated,
            extra_monthly_payment: extra_monthly,
        }
    }
}
