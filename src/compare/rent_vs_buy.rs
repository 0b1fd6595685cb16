//! Rent-versus-buy cost comparison
//!
//! Scenario A (buy) pays the mortgage, property tax, insurance, maintenance and
//! HOA, plus the down payment and closing costs up front and the earnings that
//! cash would otherwise have made. At sale the net proceeds (appreciated value
//! less selling costs and the remaining loan balance) are credited back in the
//! final year. Scenario B (rent) pays rent growing once a year.
//!
//! Both series cover exactly `years_to_stay`, regardless of the loan term.
//! The stay and the loan term are each clamped to `[1, MAX_HORIZON_YEARS]`.

use log::debug;
use serde::{Deserialize, Serialize};

use super::series::{compare_series, ComparativeResult, Recommendation};
use crate::config::MAX_HORIZON_YEARS;
use crate::growth::{AccountKind, GrowthProjector, GrowthTerms};
use crate::loan::{AmortizationEngine, LoanTerms};
use crate::schedule::{sanitize_amount, sanitize_percent, MONTHS_PER_YEAR};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RentVsBuyInput {
    pub home_price: f64,
    pub down_payment_percent: f64,
    pub mortgage_rate_percent: f64,
    pub loan_term_years: u32,
    /// Annual property tax as a percent of home value
    #[serde(default)]
    pub property_tax_rate_percent: f64,
    #[serde(default)]
    pub home_insurance_annual: f64,
    /// Annual upkeep as a percent of home value
    #[serde(default)]
    pub maintenance_rate_percent: f64,
    #[serde(default)]
    pub hoa_monthly: f64,
    #[serde(default)]
    pub home_appreciation_percent: f64,
    /// Closing costs at purchase, percent of price
    #[serde(default)]
    pub closing_cost_percent: f64,
    /// Agent and transfer costs at sale, percent of sale price
    #[serde(default)]
    pub selling_cost_percent: f64,
    pub monthly_rent: f64,
    #[serde(default)]
    pub rent_growth_percent: f64,
    #[serde(default)]
    pub renters_insurance_annual: f64,
    /// Return the upfront cash would earn if invested instead
    #[serde(default)]
    pub investment_return_percent: f64,
    pub years_to_stay: u32,
}

/// Buy/rent outcome of the comparison
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum RentOrBuy {
    Buy,
    Rent,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RentVsBuyResult {
    /// Scenario A is buying, scenario B is renting
    pub comparison: ComparativeResult,
    pub recommendation: RentOrBuy,
    pub monthly_mortgage_payment: f64,
    pub upfront_cost: f64,
    pub home_value_at_sale: f64,
    pub remaining_loan_balance: f64,
    /// Sale price less selling costs and the loan payoff
    pub net_sale_proceeds: f64,
    /// Earnings forgone on the upfront cash
    pub opportunity_cost: f64,
}

impl RentVsBuyInput {
    pub fn calculate(&self) -> RentVsBuyResult {
        let years = self.years_to_stay.clamp(1, MAX_HORIZON_YEARS);
        let price = sanitize_amount(self.home_price);
        let down_payment = price * sanitize_percent(self.down_payment_percent, 100.0) / 100.0;
        let closing_costs = price * sanitize_percent(self.closing_cost_percent, 100.0) / 100.0;
        let upfront_cost = down_payment + closing_costs;

        let loan_terms = LoanTerms::from_years(
            price - down_payment,
            self.mortgage_rate_percent,
            self.loan_term_years.clamp(1, MAX_HORIZON_YEARS),
        );
        let mortgage = AmortizationEngine::amortize(&loan_terms);

        let forgone = GrowthProjector::project(&GrowthTerms {
            account: AccountKind::HighYieldSavings,
            initial_balance: upfront_cost,
            monthly_contribution: 0.0,
            annual_rate_percent: self.investment_return_percent,
            years,
            employer_match_percent: None,
            target_amount: None,
        });

        let appreciation = 1.0 + sanitize_amount(self.home_appreciation_percent) / 100.0;
        let rent_growth = 1.0 + sanitize_amount(self.rent_growth_percent) / 100.0;
        let months = MONTHS_PER_YEAR as usize;

        let mut buy_costs = Vec::with_capacity(years as usize);
        let mut rent_costs = Vec::with_capacity(years as usize);
        for year in 1..=years {
            let elapsed = (year - 1) as f64;
            let value = price * appreciation.powf(elapsed);
            let start = (year as usize - 1) * months;
            let mortgage_paid: f64 = mortgage
                .schedule
                .iter()
                .skip(start)
                .take(months)
                .map(|r| r.payment)
                .sum();
            let opportunity = forgone
                .yearly_breakdown
                .get(year as usize - 1)
                .map(|r| r.earnings)
                .unwrap_or(0.0);

            let mut buy = mortgage_paid
                + value * sanitize_amount(self.property_tax_rate_percent) / 100.0
                + sanitize_amount(self.home_insurance_annual)
                + value * sanitize_amount(self.maintenance_rate_percent) / 100.0
                + sanitize_amount(self.hoa_monthly) * MONTHS_PER_YEAR as f64
                + opportunity;
            if year == 1 {
                buy += upfront_cost;
            }
            buy_costs.push(buy);

            rent_costs.push(
                sanitize_amount(self.monthly_rent)
                    * MONTHS_PER_YEAR as f64
                    * rent_growth.powf(elapsed)
                    + sanitize_amount(self.renters_insurance_annual),
            );
        }

        let home_value_at_sale = price * appreciation.powf(years as f64);
        let remaining_loan_balance =
            mortgage.balance_after(years * MONTHS_PER_YEAR, loan_terms.principal);
        let net_sale_proceeds = home_value_at_sale
            * (1.0 - sanitize_percent(self.selling_cost_percent, 100.0) / 100.0)
            - remaining_loan_balance;
        if let Some(last) = buy_costs.last_mut() {
            *last -= net_sale_proceeds;
        }

        let comparison = compare_series(&buy_costs, &rent_costs);
        let recommendation = match comparison.recommendation {
            Recommendation::A => RentOrBuy::Buy,
            Recommendation::B => RentOrBuy::Rent,
        };
        debug!(
            "rent vs buy over {} years: buy {:.2}, rent {:.2} -> {:?}",
            years, comparison.total_cost_a, comparison.total_cost_b, recommendation
        );

        RentVsBuyResult {
            comparison,
            recommendation,
            monthly_mortgage_payment: mortgage.payment,
            upfront_cost,
            home_value_at_sale,
            remaining_loan_balance,
            net_sale_proceeds,
            opportunity_cost: forgone.total_earnings,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn input(years_to_stay: u32) -> RentVsBuyInput {
        RentVsBuyInput {
            home_price: 400_000.0,
            down_payment_percent: 20.0,
            mortgage_rate_percent: 6.5,
            loan_term_years: 30,
            property_tax_rate_percent: 1.1,
            home_insurance_annual: 1_500.0,
            maintenance_rate_percent: 1.0,
            hoa_monthly: 0.0,
            home_appreciation_percent: 3.5,
            closing_cost_percent: 3.0,
            selling_cost_percent: 6.0,
            monthly_rent: 2_200.0,
            rent_growth_percent: 3.0,
            renters_insurance_annual: 200.0,
            investment_return_percent: 5.0,
            years_to_stay,
        }
    }

    #[test]
    fn test_series_aligned_to_stay() {
        let result = input(7).calculate();
        assert_eq!(result.comparison.yearly_breakdown.len(), 7);
        assert!(result.remaining_loan_balance > 0.0);
    }

    #[test]
    fn test_stay_longer_than_loan() {
        let mut long_stay = input(20);
        long_stay.loan_term_years = 15;
        let result = long_stay.calculate();
        assert_eq!(result.comparison.yearly_breakdown.len(), 20);
        assert_eq!(result.remaining_loan_balance, 0.0);
    }

    #[test]
    fn test_rent_growth() {
        let result = input(3).calculate();
        let rows = &result.comparison.yearly_breakdown;
        assert_abs_diff_eq!(rows[0].cost_b, 26_400.0 + 200.0, epsilon = 1e-6);
        assert_abs_diff_eq!(rows[1].cost_b, 26_400.0 * 1.03 + 200.0, epsilon = 1e-6);
    }

    #[test]
    fn test_short_stay_favors_renting() {
        let result = input(1).calculate();
        assert_eq!(result.recommendation, RentOrBuy::Rent);
        assert!(result.comparison.net_difference > 0.0);
    }

    #[test]
    fn test_long_stay_with_appreciation_favors_buying() {
        let mut stay = input(25);
        stay.investment_return_percent = 0.0;
        let result = stay.calculate();
        assert_eq!(result.recommendation, RentOrBuy::Buy);
    }

    #[test]
    fn test_sale_proceeds_credited_in_final_year() {
        let result = input(5).calculate();
        let expected = result.home_value_at_sale * 0.94 - result.remaining_loan_balance;
        assert_abs_diff_eq!(result.net_sale_proceeds, expected, epsilon = 1e-6);
        assert!(result.comparison.yearly_breakdown[4].cost_a < 0.0);
    }

    #[test]
    fn test_zero_loan_term_still_repays_the_loan() {
        let mut zero_term = input(5);
        zero_term.loan_term_years = 0;
        let result = zero_term.calculate();

        // Treated as a one-year loan: the whole 320k is repaid in year 1
        assert!(result.monthly_mortgage_payment > 320_000.0 / 12.0);
        assert_eq!(result.remaining_loan_balance, 0.0);
        assert!(result.comparison.yearly_breakdown[0].cost_a > 320_000.0);
        assert!(result.comparison.total_cost_a > 0.0);
    }

    #[test]
    fn test_huge_stay_and_term_clamped() {
        let mut forever = input(u32::MAX);
        forever.loan_term_years = u32::MAX;
        let result = forever.calculate();
        assert_eq!(
            result.comparison.yearly_breakdown.len(),
            MAX_HORIZON_YEARS as usize
        );
        assert!(result.comparison.total_cost_a.is_finite());
        assert_eq!(result.remaining_loan_balance, 0.0);
    }

    #[test]
    fn test_zero_years_treated_as_one() {
        let result = input(0).calculate();
        assert_eq!(result.comparison.yearly_breakdown.len(), 1);
    }
}
