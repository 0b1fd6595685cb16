//! Paying down an existing balance with a fixed payment
//!
//! Unlike amortization the payment is given, not solved for, so it has to be
//! checked for sufficiency: a payment that never exceeds the interest accruing
//! on the balance can never retire the debt.

use chrono::{Months, NaiveDate};
use log::{debug, warn};
use serde::{Deserialize, Serialize};

use super::amortization::amortization_step;
use crate::config::{DEFAULT_MAX_PAYOFF_MONTHS, MAX_HORIZON_MONTHS};
use crate::schedule::{monthly_rate, sanitize_amount, AmortizationRow};

/// Existing balance and the payment plan applied to it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PayoffTerms {
    pub balance: f64,
    pub annual_rate_percent: f64,
    pub monthly_payment: f64,
    #[serde(default)]
    pub additional_payment: f64,
    /// Recurring fees charged each month, paid out of the monthly payment
    #[serde(default)]
    pub monthly_fees: f64,
}

/// Outcome of a payoff simulation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PayoffResult {
    pub months_to_payoff: u32,
    pub total_interest: f64,
    pub total_fees: f64,
    /// Interest, principal and fees paid over the schedule
    pub total_paid: f64,
    /// `as_of` advanced by `months_to_payoff`; absent when the balance never clears
    pub payoff_date: Option<NaiveDate>,
    pub will_never_payoff: bool,
    /// Interest avoided by the additional payment, when both plans converge
    pub interest_saved_by_additional: Option<f64>,
    /// Empty when the payment never retires the balance
    pub schedule: Vec<AmortizationRow>,
}

impl PayoffResult {
    fn never_payoff() -> Self {
        Self {
            months_to_payoff: 0,
            total_interest: 0.0,
            total_fees: 0.0,
            total_paid: 0.0,
            payoff_date: None,
            will_never_payoff: true,
            interest_saved_by_additional: None,
            schedule: Vec::new(),
        }
    }
}

/// Fixed-payment payoff simulator with a hard month cap
#[derive(Debug, Clone)]
pub struct PayoffSimulator {
    max_months: u32,
}

impl Default for PayoffSimulator {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_PAYOFF_MONTHS)
    }
}

impl PayoffSimulator {
    /// Create a simulator that gives up after `max_months` payments,
    /// clamped to `[1, MAX_HORIZON_MONTHS]`
    pub fn new(max_months: u32) -> Self {
        Self {
            max_months: max_months.clamp(1, MAX_HORIZON_MONTHS),
        }
    }

    pub fn max_months(&self) -> u32 {
        self.max_months
    }

    /// Simulate paying off `terms`, dating the payoff relative to `as_of`
    pub fn simulate(&self, terms: &PayoffTerms, as_of: NaiveDate) -> PayoffResult {
        let additional = sanitize_amount(terms.additional_payment);
        let mut result = self.simulate_with(terms, additional, as_of);

        if additional > 0.0 && !result.will_never_payoff {
            let without = self.simulate_with(terms, 0.0, as_of);
            if !without.will_never_payoff {
                result.interest_saved_by_additional =
                    Some((without.total_interest - result.total_interest).max(0.0));
            }
        }

        result
    }

    fn simulate_with(&self, terms: &PayoffTerms, additional: f64, as_of: NaiveDate) -> PayoffResult {
        let mut balance = sanitize_amount(terms.balance);
        let rate = monthly_rate(terms.annual_rate_percent);
        let fees = sanitize_amount(terms.monthly_fees);
        let paid_each_month = sanitize_amount(terms.monthly_payment) + additional;

        if balance <= 0.0 {
            return PayoffResult {
                payoff_date: Some(as_of),
                will_never_payoff: false,
                ..PayoffResult::never_payoff()
            };
        }

        // Checked before any loop: the balance can only shrink if the first
        // month's payment clears that month's interest and fees.
        let net_principal = paid_each_month - balance * rate - fees;
        if net_principal <= 0.0 {
            warn!(
                "payment {:.2} does not cover interest {:.2} plus fees {:.2}; balance never clears",
                paid_each_month,
                balance * rate,
                fees
            );
            return PayoffResult::never_payoff();
        }

        let toward_loan = paid_each_month - fees;
        let mut schedule = Vec::new();
        let mut period = 1;
        while balance > 0.0 && period <= self.max_months {
            let row = amortization_step(period, balance, rate, toward_loan, false);
            balance = row.ending_balance;
            schedule.push(row);
            period += 1;
        }

        if balance > 0.0 {
            warn!(
                "payoff not reached within {} months, {:.2} still owed",
                self.max_months, balance
            );
            return PayoffResult::never_payoff();
        }

        let months_to_payoff = schedule.len() as u32;
        let total_interest: f64 = schedule.iter().map(|r| r.interest_portion).sum();
        let total_fees = fees * months_to_payoff as f64;
        let total_paid = schedule.iter().map(|r| r.payment).sum::<f64>() + total_fees;

        debug!(
            "balance paid off in {} months, interest {:.2}, fees {:.2}",
            months_to_payoff, total_interest, total_fees
        );

        PayoffResult {
            months_to_payoff,
            total_interest,
            total_fees,
            total_paid,
            payoff_date: add_months(as_of, months_to_payoff),
            will_never_payoff: false,
            interest_saved_by_additional: None,
            schedule,
        }
    }
}

/// Advance a date by whole months, clamping the day to the end of shorter months
pub(crate) fn add_months(date: NaiveDate, months: u32) -> Option<NaiveDate> {
    date.checked_add_months(Months::new(months))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn as_of() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, 15).unwrap()
    }

    fn card(monthly_payment: f64) -> PayoffTerms {
        PayoffTerms {
            balance: 5_000.0,
            annual_rate_percent: 18.0,
            monthly_payment,
            additional_payment: 0.0,
            monthly_fees: 0.0,
        }
    }

    #[test]
    fn test_divergent_payment_detected() {
        let result = PayoffSimulator::default().simulate(&card(50.0), as_of());
        assert!(result.will_never_payoff);
        assert!(result.schedule.is_empty());
        assert!(result.payoff_date.is_none());
    }

    #[test]
    fn test_payment_equal_to_interest_never_pays_off() {
        let result = PayoffSimulator::default().simulate(&card(75.0), as_of());
        assert!(result.will_never_payoff);
    }

    #[test]
    fn test_convergent_payoff() {
        let result = PayoffSimulator::default().simulate(&card(200.0), as_of());
        assert!(!result.will_never_payoff);
        assert!(result.months_to_payoff > 0 && result.months_to_payoff < 1200);
        assert_eq!(result.schedule.last().unwrap().ending_balance, 0.0);
        assert_eq!(result.months_to_payoff as usize, result.schedule.len());

        let repaid: f64 = result.schedule.iter().map(|r| r.principal_portion).sum();
        assert!((repaid - 5_000.0).abs() < 0.01);
        assert!((result.total_paid - (5_000.0 + result.total_interest)).abs() < 1e-6);
    }

    #[test]
    fn test_payoff_date_uses_injected_date() {
        let result = PayoffSimulator::default().simulate(&card(200.0), as_of());
        let expected = as_of()
            .checked_add_months(Months::new(result.months_to_payoff))
            .unwrap();
        assert_eq!(result.payoff_date, Some(expected));
    }

    #[test]
    fn test_fees_can_cause_divergence() {
        let mut terms = card(100.0);
        terms.monthly_fees = 30.0;
        let result = PayoffSimulator::default().simulate(&terms, as_of());
        assert!(result.will_never_payoff);
    }

    #[test]
    fn test_fees_counted_in_total_paid() {
        let mut terms = card(300.0);
        terms.monthly_fees = 5.0;
        let result = PayoffSimulator::default().simulate(&terms, as_of());
        assert!(!result.will_never_payoff);
        let expected_fees = 5.0 * result.months_to_payoff as f64;
        assert!((result.total_fees - expected_fees).abs() < 1e-9);
        assert!(
            (result.total_paid - (5_000.0 + result.total_interest + expected_fees)).abs() < 1e-6
        );
    }

    #[test]
    fn test_additional_payment_saves_interest() {
        let mut terms = card(150.0);
        terms.additional_payment = 100.0;
        let with_extra = PayoffSimulator::default().simulate(&terms, as_of());
        let base = PayoffSimulator::default().simulate(&card(150.0), as_of());
        assert!(with_extra.months_to_payoff < base.months_to_payoff);
        let saved = with_extra.interest_saved_by_additional.unwrap();
        assert!((saved - (base.total_interest - with_extra.total_interest)).abs() < 1e-9);
    }

    #[test]
    fn test_month_cap_marks_never_payoff() {
        // Barely above interest: converges, but only after several hundred months
        let result = PayoffSimulator::new(24).simulate(&card(76.0), as_of());
        assert!(result.will_never_payoff);
        assert!(result.schedule.is_empty());
    }

    #[test]
    fn test_cap_never_exceeds_horizon() {
        assert_eq!(PayoffSimulator::new(u32::MAX).max_months(), MAX_HORIZON_MONTHS);
        assert_eq!(PayoffSimulator::new(0).max_months(), 1);
    }

    #[test]
    fn test_zero_balance() {
        let mut terms = card(100.0);
        terms.balance = 0.0;
        let result = PayoffSimulator::default().simulate(&terms, as_of());
        assert!(!result.will_never_payoff);
        assert_eq!(result.months_to_payoff, 0);
        assert_eq!(result.payoff_date, Some(as_of()));
    }

    #[test]
    fn test_zero_rate_payoff() {
        let terms = PayoffTerms {
            balance: 1_000.0,
            annual_rate_percent: 0.0,
            monthly_payment: 300.0,
            additional_payment: 0.0,
            monthly_fees: 0.0,
        };
        let result = PayoffSimulator::default().simulate(&terms, as_of());
        assert_eq!(result.months_to_payoff, 4);
        assert_eq!(result.total_interest, 0.0);
        assert!((result.schedule[3].payment - 100.0).abs() < 1e-9);
    }
}
