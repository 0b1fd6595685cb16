//! Multi-debt payoff plans (snowball and avalanche)
//!
//! Every debt receives its minimum payment each month. Whatever is left of the
//! monthly budget goes to the highest-priority debt still owing; once a debt is
//! cleared its minimum rolls into the budget for the rest.

use chrono::NaiveDate;
use log::{debug, warn};
use serde::{Deserialize, Serialize};

use super::amortization::BALANCE_EPSILON;
use super::payoff::add_months;
use crate::config::{DEFAULT_MAX_PAYOFF_MONTHS, MAX_HORIZON_MONTHS};
use crate::schedule::{monthly_rate, sanitize_amount, AmortizationRow};

/// Ordering rule for directing extra payments
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum PayoffStrategy {
    /// Smallest balance first
    Snowball,
    /// Highest interest rate first
    Avalanche,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Debt {
    pub name: String,
    pub balance: f64,
    pub annual_rate_percent: f64,
    pub minimum_payment: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DebtPlanInput {
    pub debts: Vec<Debt>,
    #[serde(default)]
    pub extra_monthly_payment: f64,
    pub strategy: PayoffStrategy,
}

/// Per-debt outcome
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DebtPayoffSummary {
    pub name: String,
    pub starting_balance: f64,
    pub interest_paid: f64,
    /// Month in which the debt was cleared
    pub payoff_month: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DebtPlanResult {
    pub strategy: PayoffStrategy,
    pub monthly_budget: f64,
    pub months_to_debt_free: u32,
    pub total_interest: f64,
    pub total_paid: f64,
    pub debt_free_date: Option<NaiveDate>,
    pub will_never_payoff: bool,
    /// Debt names in the order they were cleared
    pub payoff_order: Vec<String>,
    pub debts: Vec<DebtPayoffSummary>,
    /// Combined month-by-month totals across all debts; empty when divergent
    pub schedule: Vec<AmortizationRow>,
}

struct DebtState {
    balance: f64,
    rate: f64,
    minimum: f64,
    interest_paid: f64,
    payoff_month: Option<u32>,
}

/// Plans the payoff of several debts under one monthly budget
#[derive(Debug, Clone)]
pub struct DebtStrategyPlanner {
    max_months: u32,
}

impl Default for DebtStrategyPlanner {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_PAYOFF_MONTHS)
    }
}

impl DebtStrategyPlanner {
    /// Planner that gives up after `max_months`, clamped to `[1, MAX_HORIZON_MONTHS]`
    pub fn new(max_months: u32) -> Self {
        Self {
            max_months: max_months.clamp(1, MAX_HORIZON_MONTHS),
        }
    }

    /// Indices of `debts` in the order extra payments should target them
    pub fn priority_order(debts: &[Debt], strategy: PayoffStrategy) -> Vec<usize> {
        let mut order: Vec<usize> = (0..debts.len()).collect();
        let balance = |i: usize| sanitize_amount(debts[i].balance);
        let rate = |i: usize| sanitize_amount(debts[i].annual_rate_percent);
        match strategy {
            PayoffStrategy::Snowball => order.sort_by(|&a, &b| {
                balance(a)
                    .total_cmp(&balance(b))
                    .then(rate(b).total_cmp(&rate(a)))
            }),
            PayoffStrategy::Avalanche => order.sort_by(|&a, &b| {
                rate(b)
                    .total_cmp(&rate(a))
                    .then(balance(a).total_cmp(&balance(b)))
            }),
        }
        order
    }

    pub fn plan(&self, input: &DebtPlanInput, as_of: NaiveDate) -> DebtPlanResult {
        let mut states: Vec<DebtState> = input
            .debts
            .iter()
            .map(|d| DebtState {
                balance: sanitize_amount(d.balance),
                rate: monthly_rate(d.annual_rate_percent),
                minimum: sanitize_amount(d.minimum_payment),
                interest_paid: 0.0,
                payoff_month: None,
            })
            .collect();
        let order = Self::priority_order(&input.debts, input.strategy);
        let budget: f64 =
            states.iter().map(|s| s.minimum).sum::<f64>() + sanitize_amount(input.extra_monthly_payment);

        let summaries = |states: &[DebtState]| -> Vec<DebtPayoffSummary> {
            input
                .debts
                .iter()
                .zip(states)
                .map(|(d, s)| DebtPayoffSummary {
                    name: d.name.clone(),
                    starting_balance: sanitize_amount(d.balance),
                    interest_paid: s.interest_paid,
                    payoff_month: s.payoff_month,
                })
                .collect()
        };
        let diverged = |states: &[DebtState]| DebtPlanResult {
            strategy: input.strategy,
            monthly_budget: budget,
            months_to_debt_free: 0,
            total_interest: 0.0,
            total_paid: 0.0,
            debt_free_date: None,
            will_never_payoff: true,
            payoff_order: Vec::new(),
            debts: summaries(states),
            schedule: Vec::new(),
        };

        let first_interest: f64 = states.iter().map(|s| s.balance * s.rate).sum();
        let total_owed: f64 = states.iter().map(|s| s.balance).sum();
        if total_owed > 0.0 && budget - first_interest <= 0.0 {
            warn!(
                "budget {:.2} does not cover first-month interest {:.2}; debts never clear",
                budget, first_interest
            );
            return diverged(&states);
        }

        let mut schedule = Vec::new();
        let mut payoff_order = Vec::new();
        let mut month = 0;
        while states.iter().any(|s| s.balance > 0.0) {
            if month >= self.max_months {
                warn!("debts not cleared within {} months", self.max_months);
                return diverged(&states);
            }
            month += 1;

            let mut interest_total = 0.0;
            let mut paid_total = 0.0;
            let mut remaining = budget;

            for state in states.iter_mut().filter(|s| s.balance > 0.0) {
                let interest = state.balance * state.rate;
                state.balance += interest;
                state.interest_paid += interest;
                interest_total += interest;

                let pay = state.minimum.min(state.balance).min(remaining);
                state.balance -= pay;
                remaining -= pay;
                paid_total += pay;
            }

            for &idx in &order {
                if remaining <= 0.0 {
                    break;
                }
                let state = &mut states[idx];
                if state.balance <= 0.0 {
                    continue;
                }
                let pay = remaining.min(state.balance);
                state.balance -= pay;
                remaining -= pay;
                paid_total += pay;
            }

            // Debts that started at zero are never marked paid off
            for &idx in &order {
                if sanitize_amount(input.debts[idx].balance) <= 0.0 {
                    continue;
                }
                let state = &mut states[idx];
                if state.payoff_month.is_none() && state.balance < BALANCE_EPSILON {
                    state.balance = 0.0;
                    state.payoff_month = Some(month);
                    payoff_order.push(input.debts[idx].name.clone());
                }
            }

            schedule.push(AmortizationRow {
                period: month,
                payment: paid_total,
                principal_portion: paid_total - interest_total,
                interest_portion: interest_total,
                ending_balance: states.iter().map(|s| s.balance).sum(),
            });
        }

        let total_interest: f64 = schedule.iter().map(|r| r.interest_portion).sum();
        let total_paid: f64 = schedule.iter().map(|r| r.payment).sum();
        debug!(
            "{:?} plan clears {} debts in {} months, interest {:.2}",
            input.strategy,
            states.len(),
            month,
            total_interest
        );

        DebtPlanResult {
            strategy: input.strategy,
            monthly_budget: budget,
            months_to_debt_free: month,
            total_interest,
            total_paid,
            debt_free_date: add_months(as_of, month),
            will_never_payoff: false,
            payoff_order,
            debts: summaries(&states),
            schedule,
        }
    }
}
