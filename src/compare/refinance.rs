//! Refinance: keep the current loan or replace it with a new one
//!
//! Both loans run for at least one month; a zero term would otherwise make
//! that side look free.

use serde::{Deserialize, Serialize};

use super::series::{compare_series, ComparativeResult, Recommendation};
use crate::loan::{AmortizationEngine, AmortizationResult, LoanTerms};
use crate::schedule::{aggregate_yearly, sanitize_amount};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RefinanceInput {
    pub current_balance: f64,
    pub current_rate_percent: f64,
    pub remaining_months: u32,
    pub new_rate_percent: f64,
    pub new_term_months: u32,
    #[serde(default)]
    pub closing_costs: f64,
    /// Finance the closing costs instead of paying them up front
    #[serde(default)]
    pub roll_closing_costs_into_loan: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RefinanceResult {
    pub current_loan: AmortizationResult,
    pub new_loan: AmortizationResult,
    /// Current payment minus new payment; negative when the new payment is higher
    pub monthly_savings: f64,
    /// Months of savings needed to recover the closing costs
    pub break_even_months: Option<u32>,
    pub interest_difference: f64,
    /// Scenario A is refinancing, scenario B is keeping the current loan
    pub comparison: ComparativeResult,
    pub should_refinance: bool,
}

impl RefinanceInput {
    pub fn calculate(&self) -> RefinanceResult {
        let balance = sanitize_amount(self.current_balance);
        let closing = sanitize_amount(self.closing_costs);

        let current_loan = AmortizationEngine::amortize(&LoanTerms::new(
            balance,
            self.current_rate_percent,
            self.remaining_months.max(1),
        ));
        let financed = if self.roll_closing_costs_into_loan {
            balance + closing
        } else {
            balance
        };
        let new_loan = AmortizationEngine::amortize(&LoanTerms::new(
            financed,
            self.new_rate_percent,
            self.new_term_months.max(1),
        ));

        let monthly_savings = current_loan.payment - new_loan.payment;
        let break_even_months = if closing <= 0.0 {
            Some(0)
        } else if monthly_savings > 0.0 {
            Some((closing / monthly_savings).ceil() as u32)
        } else {
            None
        };

        let yearly_payments = |loan: &AmortizationResult| -> Vec<f64> {
            aggregate_yearly(&loan.schedule)
                .into_iter()
                .map(|y| y.totals.payment)
                .collect()
        };
        let mut refinance_costs = yearly_payments(&new_loan);
        if !self.roll_closing_costs_into_loan && closing > 0.0 {
            match refinance_costs.first_mut() {
                Some(first) => *first += closing,
                None => refinance_costs.push(closing),
            }
        }
        let comparison = compare_series(&refinance_costs, &yearly_payments(&current_loan));

        RefinanceResult {
            monthly_savings,
            break_even_months,
            interest_difference: current_loan.total_interest - new_loan.total_interest,
            should_refinance: comparison.recommendation == Recommendation::A,
            comparison,
            current_loan,
            new_loan,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn refinance(new_rate: f64, new_term: u32) -> RefinanceInput {
        RefinanceInput {
            current_balance: 250_000.0,
            current_rate_percent: 7.5,
            remaining_months: 300,
            new_rate_percent: new_rate,
            new_term_months: new_term,
            closing_costs: 4_000.0,
            roll_closing_costs_into_loan: false,
        }
    }

    #[test]
    fn test_lower_rate_same_term_pays_off() {
        let result = refinance(6.0, 300).calculate();
        assert!(result.monthly_savings > 0.0);
        let months = result.break_even_months.unwrap();
        assert!(months as f64 * result.monthly_savings >= 4_000.0);
        assert!((months - 1) as f64 * result.monthly_savings < 4_000.0);
        assert!(result.should_refinance);
        assert_eq!(result.comparison.yearly_breakdown.len(), 25);
    }

    #[test]
    fn test_higher_rate_never_breaks_even() {
        let result = refinance(8.0, 300).calculate();
        assert!(result.monthly_savings < 0.0);
        assert_eq!(result.break_even_months, None);
        assert!(!result.should_refinance);
    }

    #[test]
    fn test_longer_term_extends_horizon() {
        let result = refinance(6.0, 360).calculate();
        assert_eq!(result.comparison.yearly_breakdown.len(), 30);
        assert_eq!(result.comparison.yearly_breakdown[29].cost_b, 0.0);
    }

    #[test]
    fn test_zero_remaining_months_is_not_free() {
        let mut input = refinance(6.0, 300);
        input.remaining_months = 0;
        let result = input.calculate();
        assert_eq!(result.current_loan.schedule.len(), 1);
        assert!(result.current_loan.payment >= 250_000.0);
        assert!(result.comparison.total_cost_b >= 250_000.0);
    }

    #[test]
    fn test_zero_new_term_is_not_free() {
        let result = refinance(6.0, 0).calculate();
        assert_eq!(result.new_loan.schedule.len(), 1);
        assert!(result.comparison.total_cost_a >= 254_000.0);
    }

    #[test]
    fn test_rolled_closing_costs_are_financed() {
        let mut input = refinance(6.0, 300);
        input.roll_closing_costs_into_loan = true;
        let result = input.calculate();
        let financed: f64 = result.new_loan.schedule.iter().map(|r| r.principal_portion).sum();
        assert!((financed - 254_000.0).abs() < 0.01);
    }
}
