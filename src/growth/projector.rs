//! Monthly-compounded growth of a balance under regular contributions
//!
//! A forward simulation rather than a closed-form future-value formula, so it
//! is well defined at every input including a zero rate.

use log::debug;
use serde::{Deserialize, Serialize};

use crate::config::MAX_HORIZON_YEARS;
use crate::schedule::{
    aggregate_yearly, monthly_rate, sanitize_amount, sanitize_percent, PeriodRecord, YearlyRow,
    MONTHS_PER_YEAR,
};

/// Kind of account being projected
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum AccountKind {
    /// Employer-sponsored plan; the only kind that receives an employer match
    Retirement401k,
    Ira,
    Hsa,
    #[default]
    HighYieldSavings,
    CertificateOfDeposit,
    CollegeSavings,
    StartupSavings,
    DownPaymentSavings,
}

impl AccountKind {
    pub fn receives_employer_match(&self) -> bool {
        matches!(self, AccountKind::Retirement401k)
    }
}

/// Inputs for a growth projection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GrowthTerms {
    #[serde(default)]
    pub account: AccountKind,
    pub initial_balance: f64,
    pub monthly_contribution: f64,
    pub annual_rate_percent: f64,
    /// Projection length, clamped to [`MAX_HORIZON_YEARS`]
    pub years: u32,
    /// Employer match as a percent of the monthly contribution (0-100)
    #[serde(default)]
    pub employer_match_percent: Option<f64>,
    /// Savings goal to test the projection against
    #[serde(default)]
    pub target_amount: Option<f64>,
}

impl GrowthTerms {
    /// Match added per month; zero unless the account kind receives one
    pub fn monthly_employer_match(&self) -> f64 {
        if !self.account.receives_employer_match() {
            return 0.0;
        }
        let percent = sanitize_percent(self.employer_match_percent.unwrap_or(0.0), 100.0);
        sanitize_amount(self.monthly_contribution) * percent / 100.0
    }
}

/// One simulated month
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GrowthMonth {
    pub month: u32,
    pub contribution: f64,
    pub employer_match: f64,
    pub earnings: f64,
    pub balance: f64,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct GrowthYearTotals {
    pub contributions: f64,
    pub employer_match: f64,
    pub earnings: f64,
}

impl PeriodRecord for GrowthMonth {
    type Totals = GrowthYearTotals;

    fn accumulate(&self, totals: &mut GrowthYearTotals) {
        totals.contributions += self.contribution;
        totals.employer_match += self.employer_match;
        totals.earnings += self.earnings;
    }

    fn closing_balance(&self) -> f64 {
        self.balance
    }
}

/// Yearly summary of a growth projection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct YearlyGrowthRow {
    pub year: u32,
    /// Balance at the end of the year
    pub balance: f64,
    /// Contributions made during the year
    pub contributions: f64,
    pub employer_match: f64,
    /// Interest earned during the year
    pub earnings: f64,
}

impl From<YearlyRow<GrowthYearTotals>> for YearlyGrowthRow {
    fn from(row: YearlyRow<GrowthYearTotals>) -> Self {
        Self {
            year: row.year,
            balance: row.ending_balance,
            contributions: row.totals.contributions,
            employer_match: row.totals.employer_match,
            earnings: row.totals.earnings,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GrowthResult {
    pub final_balance: f64,
    /// Own contributions, excluding the initial balance
    pub total_contributions: f64,
    pub total_employer_match: f64,
    pub total_earnings: f64,
    /// Present only when a target was supplied
    pub goal_met: Option<bool>,
    /// First month the balance reached the target (0 if it started there)
    pub months_to_goal: Option<u32>,
    pub yearly_breakdown: Vec<YearlyGrowthRow>,
}

/// Compound-growth simulator
pub struct GrowthProjector;

impl GrowthProjector {
    /// Simulate month by month and return totals plus the yearly breakdown
    pub fn project(terms: &GrowthTerms) -> GrowthResult {
        let months = Self::simulate(terms);
        let initial = sanitize_amount(terms.initial_balance);

        let final_balance = months.last().map(|m| m.balance).unwrap_or(initial);
        let total_contributions = months.iter().map(|m| m.contribution).sum();
        let total_employer_match = months.iter().map(|m| m.employer_match).sum();
        let total_earnings = months.iter().map(|m| m.earnings).sum();

        let target = terms.target_amount.map(sanitize_amount);
        let months_to_goal = target.and_then(|target| {
            if initial >= target {
                Some(0)
            } else {
                months.iter().find(|m| m.balance >= target).map(|m| m.month)
            }
        });

        let result = GrowthResult {
            final_balance,
            total_contributions,
            total_employer_match,
            total_earnings,
            goal_met: target.map(|target| final_balance >= target),
            months_to_goal,
            yearly_breakdown: aggregate_yearly(&months)
                .into_iter()
                .map(YearlyGrowthRow::from)
                .collect(),
        };
        debug!(
            "{:?} projection over {} years: final balance {:.2}, earnings {:.2}",
            terms.account, terms.years, result.final_balance, result.total_earnings
        );
        result
    }

    /// Monthly series: interest on the opening balance, then contribution and match
    pub fn simulate(terms: &GrowthTerms) -> Vec<GrowthMonth> {
        let rate = monthly_rate(terms.annual_rate_percent);
        let contribution = sanitize_amount(terms.monthly_contribution);
        let employer_match = terms.monthly_employer_match();
        let total_months = terms.years.min(MAX_HORIZON_YEARS) * MONTHS_PER_YEAR;

        let mut balance = sanitize_amount(terms.initial_balance);
        let mut series = Vec::with_capacity(total_months as usize);
        for month in 1..=total_months {
            let earnings = balance * rate;
            balance += earnings + contribution + employer_match;
            series.push(GrowthMonth {
                month,
                contribution,
                employer_match,
                earnings,
                balance,
            });
        }
        series
    }

    /// Monthly contribution needed to reach `terms.target_amount` within `terms.years`.
    ///
    /// Any employer match counts toward the goal. Returns `None` without a
    /// target, or when there is no time left to contribute and the goal is unmet.
    pub fn required_monthly_contribution(terms: &GrowthTerms) -> Option<f64> {
        let target = sanitize_amount(terms.target_amount?);
        let rate = monthly_rate(terms.annual_rate_percent);
        let n = terms.years.min(MAX_HORIZON_YEARS) * MONTHS_PER_YEAR;
        let initial = sanitize_amount(terms.initial_balance);

        let initial_grown = initial * (1.0 + rate).powf(n as f64);
        let shortfall = target - initial_grown;
        if shortfall <= 0.0 {
            return Some(0.0);
        }
        if n == 0 {
            return None;
        }

        let annuity_factor = if rate <= 0.0 {
            n as f64
        } else {
            ((1.0 + rate).powf(n as f64) - 1.0) / rate
        };
        let match_multiplier = if terms.account.receives_employer_match() {
            1.0 + sanitize_percent(terms.employer_match_percent.unwrap_or(0.0), 100.0) / 100.0
        } else {
            1.0
        };

        Some(shortfall / annuity_factor / match_multiplier)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn terms(account: AccountKind) -> GrowthTerms {
        GrowthTerms {
            account,
            initial_balance: 10_000.0,
            monthly_contribution: 500.0,
            annual_rate_percent: 7.0,
            years: 20,
            employer_match_percent: Some(50.0),
            target_amount: None,
        }
    }

    #[test]
    fn test_zero_contribution_matches_compound_interest() {
        let mut t = terms(AccountKind::HighYieldSavings);
        t.monthly_contribution = 0.0;
        t.years = 10;
        let result = GrowthProjector::project(&t);
        let expected = 10_000.0 * (1.0_f64 + 0.07 / 12.0).powi(120);
        assert_relative_eq!(result.final_balance, expected, max_relative = 1e-10);
        assert_eq!(result.total_contributions, 0.0);
    }

    #[test]
    fn test_balance_decomposes_into_sources() {
        let result = GrowthProjector::project(&terms(AccountKind::Retirement401k));
        let rebuilt = 10_000.0
            + result.total_contributions
            + result.total_employer_match
            + result.total_earnings;
        assert_relative_eq!(result.final_balance, rebuilt, max_relative = 1e-12);
        assert_relative_eq!(result.total_contributions, 500.0 * 240.0);
        assert_relative_eq!(result.total_employer_match, 250.0 * 240.0);
    }

    #[test]
    fn test_match_only_for_401k() {
        let ira = GrowthProjector::project(&terms(AccountKind::Ira));
        assert_eq!(ira.total_employer_match, 0.0);
        let k401 = GrowthProjector::project(&terms(AccountKind::Retirement401k));
        assert!(k401.final_balance > ira.final_balance);
    }

    #[test]
    fn test_yearly_breakdown() {
        let result = GrowthProjector::project(&terms(AccountKind::Hsa));
        assert_eq!(result.yearly_breakdown.len(), 20);
        let last = result.yearly_breakdown.last().unwrap();
        assert_eq!(last.year, 20);
        assert_eq!(last.balance, result.final_balance);
        assert_relative_eq!(result.yearly_breakdown[0].contributions, 6_000.0);
    }

    #[test]
    fn test_all_zero_inputs() {
        let t = GrowthTerms {
            account: AccountKind::CollegeSavings,
            initial_balance: 0.0,
            monthly_contribution: 0.0,
            annual_rate_percent: 5.0,
            years: 5,
            employer_match_percent: None,
            target_amount: Some(1_000.0),
        };
        let result = GrowthProjector::project(&t);
        assert_eq!(result.final_balance, 0.0);
        assert_eq!(result.total_earnings, 0.0);
        assert_eq!(result.goal_met, Some(false));
        assert_eq!(result.months_to_goal, None);
    }

    #[test]
    fn test_zero_rate_is_linear() {
        let mut t = terms(AccountKind::DownPaymentSavings);
        t.annual_rate_percent = 0.0;
        t.years = 2;
        let result = GrowthProjector::project(&t);
        assert_eq!(result.final_balance, 10_000.0 + 500.0 * 24.0);
        assert_eq!(result.total_earnings, 0.0);
    }

    #[test]
    fn test_goal_tracking() {
        let mut t = terms(AccountKind::DownPaymentSavings);
        t.annual_rate_percent = 0.0;
        t.target_amount = Some(13_000.0);
        let result = GrowthProjector::project(&t);
        assert_eq!(result.goal_met, Some(true));
        assert_eq!(result.months_to_goal, Some(6));

        t.target_amount = Some(5_000.0);
        assert_eq!(GrowthProjector::project(&t).months_to_goal, Some(0));
    }

    #[test]
    fn test_required_contribution_reaches_target() {
        let mut t = terms(AccountKind::CollegeSavings);
        t.years = 18;
        t.target_amount = Some(150_000.0);
        let needed = GrowthProjector::required_monthly_contribution(&t).unwrap();

        t.monthly_contribution = needed;
        let result = GrowthProjector::project(&t);
        assert_relative_eq!(result.final_balance, 150_000.0, max_relative = 1e-9);
    }

    #[test]
    fn test_years_clamped_to_horizon() {
        let mut t = terms(AccountKind::HighYieldSavings);
        t.years = u32::MAX;
        let result = GrowthProjector::project(&t);
        assert_eq!(result.yearly_breakdown.len(), MAX_HORIZON_YEARS as usize);
        assert!(result.final_balance.is_finite());

        t.target_amount = Some(1_000_000.0);
        let needed = GrowthProjector::required_monthly_contribution(&t).unwrap();
        assert!(needed >= 0.0 && needed.is_finite());
    }

    #[test]
    fn test_required_contribution_edge_cases() {
        let mut t = terms(AccountKind::Ira);
        assert_eq!(GrowthProjector::required_monthly_contribution(&t), None);

        t.target_amount = Some(1_000.0);
        assert_eq!(GrowthProjector::required_monthly_contribution(&t), Some(0.0));

        t.target_amount = Some(50_000.0);
        t.years = 0;
        assert_eq!(GrowthProjector::required_monthly_contribution(&t), None);
    }
}
