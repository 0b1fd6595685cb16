//! Calculator catalog and dispatch
//!
//! Every calculator is a variant of a closed enum, so mapping a request to
//! its compute function is an exhaustive match with no unknown-key fallback.
//! Requests arrive as JSON tagged with `"type"`.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::compare::{RefinanceInput, RefinanceResult, RentVsBuyInput, RentVsBuyResult};
use crate::config::EngineConfig;
use crate::error::{EngineError, EngineResult};
use crate::growth::{AccountKind, GrowthProjector, GrowthResult, GrowthTerms};
use crate::loan::{
    AmortizationEngine, AmortizationResult, AutoLoanInput, AutoLoanResult, DebtPlanInput,
    DebtPlanResult, DebtStrategyPlanner, ExtraPaymentResult, LoanTerms, MortgageInput,
    MortgageResult, PayoffResult, PayoffSimulator, PayoffTerms,
};
use crate::schedule::{round_cents, AmortizationRow};
use crate::tax::{
    CapitalGainsInput, CapitalGainsResult, IncomeTaxInput, IncomeTaxResult, PaycheckInput,
    PaycheckResult, ProgressiveTaxCalculator,
};

/// Payload-free identifier for each calculator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CalculatorKind {
    Mortgage,
    AutoLoan,
    PersonalLoan,
    StudentLoan,
    BusinessLoan,
    ExtraPayment,
    Refinance,
    CreditCardPayoff,
    DebtPayoff,
    Retirement401k,
    Ira,
    Hsa,
    HighYieldSavings,
    CertificateOfDeposit,
    CollegeSavings,
    StartupSavings,
    DownPaymentSavings,
    IncomeTax,
    CapitalGains,
    Paycheck,
    RentVsBuy,
}

impl CalculatorKind {
    pub const ALL: [CalculatorKind; 21] = [
        CalculatorKind::Mortgage,
        CalculatorKind::AutoLoan,
        CalculatorKind::PersonalLoan,
        CalculatorKind::StudentLoan,
        CalculatorKind::BusinessLoan,
        CalculatorKind::ExtraPayment,
        CalculatorKind::Refinance,
        CalculatorKind::CreditCardPayoff,
        CalculatorKind::DebtPayoff,
        CalculatorKind::Retirement401k,
        CalculatorKind::Ira,
        CalculatorKind::Hsa,
        CalculatorKind::HighYieldSavings,
        CalculatorKind::CertificateOfDeposit,
        CalculatorKind::CollegeSavings,
        CalculatorKind::StartupSavings,
        CalculatorKind::DownPaymentSavings,
        CalculatorKind::IncomeTax,
        CalculatorKind::CapitalGains,
        CalculatorKind::Paycheck,
        CalculatorKind::RentVsBuy,
    ];

    /// Key used in the request `"type"` field
    pub fn key(&self) -> &'static str {
        match self {
            CalculatorKind::Mortgage => "mortgage",
            CalculatorKind::AutoLoan => "auto-loan",
            CalculatorKind::PersonalLoan => "personal-loan",
            CalculatorKind::StudentLoan => "student-loan",
            CalculatorKind::BusinessLoan => "business-loan",
            CalculatorKind::ExtraPayment => "extra-payment",
            CalculatorKind::Refinance => "refinance",
            CalculatorKind::CreditCardPayoff => "credit-card-payoff",
            CalculatorKind::DebtPayoff => "debt-payoff",
            CalculatorKind::Retirement401k => "401k",
            CalculatorKind::Ira => "ira",
            CalculatorKind::Hsa => "hsa",
            CalculatorKind::HighYieldSavings => "high-yield-savings",
            CalculatorKind::CertificateOfDeposit => "cd",
            CalculatorKind::CollegeSavings => "college-savings",
            CalculatorKind::StartupSavings => "startup-savings",
            CalculatorKind::DownPaymentSavings => "down-payment-savings",
            CalculatorKind::IncomeTax => "income-tax",
            CalculatorKind::CapitalGains => "capital-gains",
            CalculatorKind::Paycheck => "paycheck",
            CalculatorKind::RentVsBuy => "rent-vs-buy",
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            CalculatorKind::Mortgage => "Mortgage Calculator",
            CalculatorKind::AutoLoan => "Auto Loan Calculator",
            CalculatorKind::PersonalLoan => "Personal Loan Calculator",
            CalculatorKind::StudentLoan => "Student Loan Calculator",
            CalculatorKind::BusinessLoan => "Business Loan Calculator",
            CalculatorKind::ExtraPayment => "Extra Payment Calculator",
            CalculatorKind::Refinance => "Refinance Calculator",
            CalculatorKind::CreditCardPayoff => "Credit Card Payoff Calculator",
            CalculatorKind::DebtPayoff => "Debt Snowball / Avalanche Calculator",
            CalculatorKind::Retirement401k => "401(k) Calculator",
            CalculatorKind::Ira => "IRA Calculator",
            CalculatorKind::Hsa => "HSA Calculator",
            CalculatorKind::HighYieldSavings => "High-Yield Savings Calculator",
            CalculatorKind::CertificateOfDeposit => "CD Calculator",
            CalculatorKind::CollegeSavings => "College Savings Calculator",
            CalculatorKind::StartupSavings => "Startup Savings Calculator",
            CalculatorKind::DownPaymentSavings => "Down Payment Savings Calculator",
            CalculatorKind::IncomeTax => "Federal Income Tax Calculator",
            CalculatorKind::CapitalGains => "Capital Gains Tax Calculator",
            CalculatorKind::Paycheck => "Paycheck Calculator",
            CalculatorKind::RentVsBuy => "Rent vs. Buy Calculator",
        }
    }

    /// Account kind for the savings calculators
    fn account(&self) -> Option<AccountKind> {
        match self {
            CalculatorKind::Retirement401k => Some(AccountKind::Retirement401k),
            CalculatorKind::Ira => Some(AccountKind::Ira),
            CalculatorKind::Hsa => Some(AccountKind::Hsa),
            CalculatorKind::HighYieldSavings => Some(AccountKind::HighYieldSavings),
            CalculatorKind::CertificateOfDeposit => Some(AccountKind::CertificateOfDeposit),
            CalculatorKind::CollegeSavings => Some(AccountKind::CollegeSavings),
            CalculatorKind::StartupSavings => Some(AccountKind::StartupSavings),
            CalculatorKind::DownPaymentSavings => Some(AccountKind::DownPaymentSavings),
            _ => None,
        }
    }
}

impl fmt::Display for CalculatorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for CalculatorKind {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|k| k.key() == s.trim())
            .ok_or_else(|| EngineError::UnknownCalculator(s.to_string()))
    }
}

/// Loan terms plus a recurring extra principal payment
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtraPaymentInput {
    pub principal: f64,
    pub annual_rate_percent: f64,
    pub term_periods: u32,
    pub extra_monthly_payment: f64,
}

impl ExtraPaymentInput {
    pub fn terms(&self) -> LoanTerms {
        LoanTerms::new(self.principal, self.annual_rate_percent, self.term_periods)
    }
}

/// A request for one calculator, tagged by its key
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum CalculatorRequest {
    #[serde(rename = "mortgage")]
    Mortgage(MortgageInput),
    #[serde(rename = "auto-loan")]
    AutoLoan(AutoLoanInput),
    #[serde(rename = "personal-loan")]
    PersonalLoan(LoanTerms),
    #[serde(rename = "student-loan")]
    StudentLoan(LoanTerms),
    #[serde(rename = "business-loan")]
    BusinessLoan(LoanTerms),
    #[serde(rename = "extra-payment")]
    ExtraPayment(ExtraPaymentInput),
    #[serde(rename = "refinance")]
    Refinance(RefinanceInput),
    #[serde(rename = "credit-card-payoff")]
    CreditCardPayoff(PayoffTerms),
    #[serde(rename = "debt-payoff")]
    DebtPayoff(DebtPlanInput),
    #[serde(rename = "401k")]
    Retirement401k(GrowthTerms),
    #[serde(rename = "ira")]
    Ira(GrowthTerms),
    #[serde(rename = "hsa")]
    Hsa(GrowthTerms),
    #[serde(rename = "high-yield-savings")]
    HighYieldSavings(GrowthTerms),
    #[serde(rename = "cd")]
    CertificateOfDeposit(GrowthTerms),
    #[serde(rename = "college-savings")]
    CollegeSavings(GrowthTerms),
    #[serde(rename = "startup-savings")]
    StartupSavings(GrowthTerms),
    #[serde(rename = "down-payment-savings")]
    DownPaymentSavings(GrowthTerms),
    #[serde(rename = "income-tax")]
    IncomeTax(IncomeTaxInput),
    #[serde(rename = "capital-gains")]
    CapitalGains(CapitalGainsInput),
    #[serde(rename = "paycheck")]
    Paycheck(PaycheckInput),
    #[serde(rename = "rent-vs-buy")]
    RentVsBuy(RentVsBuyInput),
}

/// Result of any calculator
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "result", rename_all = "camelCase")]
pub enum CalculatorOutput {
    Loan(AmortizationResult),
    Mortgage(MortgageResult),
    AutoLoan(AutoLoanResult),
    ExtraPayment(ExtraPaymentResult),
    Refinance(RefinanceResult),
    Payoff(PayoffResult),
    DebtPlan(DebtPlanResult),
    Growth(GrowthResult),
    IncomeTax(IncomeTaxResult),
    CapitalGains(CapitalGainsResult),
    Paycheck(PaycheckResult),
    RentVsBuy(RentVsBuyResult),
}

impl CalculatorRequest {
    /// Decode a JSON request
    pub fn from_json(json: &str) -> EngineResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn kind(&self) -> CalculatorKind {
        match self {
            CalculatorRequest::Mortgage(_) => CalculatorKind::Mortgage,
            CalculatorRequest::AutoLoan(_) => CalculatorKind::AutoLoan,
            CalculatorRequest::PersonalLoan(_) => CalculatorKind::PersonalLoan,
            CalculatorRequest::StudentLoan(_) => CalculatorKind::StudentLoan,
            CalculatorRequest::BusinessLoan(_) => CalculatorKind::BusinessLoan,
            CalculatorRequest::ExtraPayment(_) => CalculatorKind::ExtraPayment,
            CalculatorRequest::Refinance(_) => CalculatorKind::Refinance,
            CalculatorRequest::CreditCardPayoff(_) => CalculatorKind::CreditCardPayoff,
            CalculatorRequest::DebtPayoff(_) => CalculatorKind::DebtPayoff,
            CalculatorRequest::Retirement401k(_) => CalculatorKind::Retirement401k,
            CalculatorRequest::Ira(_) => CalculatorKind::Ira,
            CalculatorRequest::Hsa(_) => CalculatorKind::Hsa,
            CalculatorRequest::HighYieldSavings(_) => CalculatorKind::HighYieldSavings,
            CalculatorRequest::CertificateOfDeposit(_) => CalculatorKind::CertificateOfDeposit,
            CalculatorRequest::CollegeSavings(_) => CalculatorKind::CollegeSavings,
            CalculatorRequest::StartupSavings(_) => CalculatorKind::StartupSavings,
            CalculatorRequest::DownPaymentSavings(_) => CalculatorKind::DownPaymentSavings,
            CalculatorRequest::IncomeTax(_) => CalculatorKind::IncomeTax,
            CalculatorRequest::CapitalGains(_) => CalculatorKind::CapitalGains,
            CalculatorRequest::Paycheck(_) => CalculatorKind::Paycheck,
            CalculatorRequest::RentVsBuy(_) => CalculatorKind::RentVsBuy,
        }
    }

    /// Run the calculator. `as_of` anchors any projected calendar dates.
    pub fn evaluate(&self, config: &EngineConfig, as_of: NaiveDate) -> CalculatorOutput {
        let tables = &config.tax_tables;
        match self {
            CalculatorRequest::Mortgage(input) => CalculatorOutput::Mortgage(input.calculate()),
            CalculatorRequest::AutoLoan(input) => CalculatorOutput::AutoLoan(input.calculate()),
            CalculatorRequest::PersonalLoan(terms)
            | CalculatorRequest::StudentLoan(terms)
            | CalculatorRequest::BusinessLoan(terms) => {
                CalculatorOutput::Loan(AmortizationEngine::amortize(terms))
            }
            CalculatorRequest::ExtraPayment(input) => CalculatorOutput::ExtraPayment(
                AmortizationEngine::amortize_with_extra(&input.terms(), input.extra_monthly_payment),
            ),
            CalculatorRequest::Refinance(input) => CalculatorOutput::Refinance(input.calculate()),
            CalculatorRequest::CreditCardPayoff(terms) => CalculatorOutput::Payoff(
                PayoffSimulator::new(config.max_payoff_months).simulate(terms, as_of),
            ),
            CalculatorRequest::DebtPayoff(input) => CalculatorOutput::DebtPlan(
                DebtStrategyPlanner::new(config.max_payoff_months).plan(input, as_of),
            ),
            CalculatorRequest::Retirement401k(terms)
            | CalculatorRequest::Ira(terms)
            | CalculatorRequest::Hsa(terms)
            | CalculatorRequest::HighYieldSavings(terms)
            | CalculatorRequest::CertificateOfDeposit(terms)
            | CalculatorRequest::CollegeSavings(terms)
            | CalculatorRequest::StartupSavings(terms)
            | CalculatorRequest::DownPaymentSavings(terms) => {
                let mut terms = terms.clone();
                if let Some(account) = self.kind().account() {
                    terms.account = account;
                }
                CalculatorOutput::Growth(GrowthProjector::project(&terms))
            }
            CalculatorRequest::IncomeTax(input) => {
                CalculatorOutput::IncomeTax(ProgressiveTaxCalculator::income_tax(tables, input))
            }
            CalculatorRequest::CapitalGains(input) => {
                CalculatorOutput::CapitalGains(input.calculate(tables))
            }
            CalculatorRequest::Paycheck(input) => CalculatorOutput::Paycheck(input.calculate(tables)),
            CalculatorRequest::RentVsBuy(input) => CalculatorOutput::RentVsBuy(input.calculate()),
        }
    }
}

fn cents(value: f64) -> String {
    format!("{:.2}", round_cents(value))
}

impl CalculatorOutput {
    /// Month-by-month schedule, for outputs that have one
    pub fn schedule(&self) -> Option<&[AmortizationRow]> {
        match self {
            CalculatorOutput::Loan(r) => Some(&r.schedule),
            CalculatorOutput::Mortgage(r) => Some(&r.loan.schedule),
            CalculatorOutput::AutoLoan(r) => Some(&r.loan.schedule),
            CalculatorOutput::ExtraPayment(r) => Some(&r.accelerated.schedule),
            CalculatorOutput::Refinance(r) => Some(&r.new_loan.schedule),
            CalculatorOutput::Payoff(r) => Some(&r.schedule),
            CalculatorOutput::DebtPlan(r) => Some(&r.schedule),
            CalculatorOutput::Growth(_)
            | CalculatorOutput::IncomeTax(_)
            | CalculatorOutput::CapitalGains(_)
            | CalculatorOutput::Paycheck(_)
            | CalculatorOutput::RentVsBuy(_) => None,
        }
    }

    /// Headline figures keyed by label, rounded to cents, for export payloads
    pub fn summary(&self) -> BTreeMap<String, String> {
        let mut summary = BTreeMap::new();
        let mut put = |label: &str, value: String| {
            summary.insert(label.to_string(), value);
        };

        match self {
            CalculatorOutput::Loan(r) => {
                put("Monthly Payment", cents(r.payment));
                put("Total Interest", cents(r.total_interest));
                put("Total Payment", cents(r.total_payment));
                put("Number of Payments", r.payoff_months().to_string());
            }
            CalculatorOutput::Mortgage(r) => {
                put("Loan Amount", cents(r.loan_amount));
                put("Principal & Interest", cents(r.loan.payment));
                put("Total Monthly Payment", cents(r.total_monthly_payment));
                put("Total Interest", cents(r.loan.total_interest));
            }
            CalculatorOutput::AutoLoan(r) => {
                put("Amount Financed", cents(r.amount_financed));
                put("Monthly Payment", cents(r.loan.payment));
                put("Sales Tax", cents(r.sales_tax));
                put("Total Interest", cents(r.loan.total_interest));
                put("Total Cost", cents(r.total_cost));
            }
            CalculatorOutput::ExtraPayment(r) => {
                put("Monthly Payment", cents(r.base.payment));
                put("Interest Saved", cents(r.interest_saved));
                put("Months Saved", r.months_saved.to_string());
                put("Payoff Months", r.accelerated.payoff_months().to_string());
            }
            CalculatorOutput::Refinance(r) => {
                put("Current Payment", cents(r.current_loan.payment));
                put("New Payment", cents(r.new_loan.payment));
                put("Monthly Savings", cents(r.monthly_savings));
                put(
                    "Break-Even Months",
                    r.break_even_months
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| "never".to_string()),
                );
                put("Net Savings", cents(-r.comparison.net_difference));
            }
            CalculatorOutput::Payoff(r) => {
                put("Will Never Pay Off", r.will_never_payoff.to_string());
                put("Months to Payoff", r.months_to_payoff.to_string());
                put("Total Interest", cents(r.total_interest));
                put("Total Paid", cents(r.total_paid));
                if let Some(date) = r.payoff_date {
                    put("Payoff Date", date.format("%Y-%m").to_string());
                }
            }
            CalculatorOutput::DebtPlan(r) => {
                put("Will Never Pay Off", r.will_never_payoff.to_string());
                put("Months to Debt Free", r.months_to_debt_free.to_string());
                put("Total Interest", cents(r.total_interest));
                put("Total Paid", cents(r.total_paid));
                put("Payoff Order", r.payoff_order.join(", "));
            }
            CalculatorOutput::Growth(r) => {
                put("Final Balance", cents(r.final_balance));
                put("Total Contributions", cents(r.total_contributions));
                put("Employer Match", cents(r.total_employer_match));
                put("Total Earnings", cents(r.total_earnings));
                if let Some(met) = r.goal_met {
                    put("Goal Met", met.to_string());
                }
            }
            CalculatorOutput::IncomeTax(r) => {
                put("Taxable Income", cents(r.tax.taxable_income));
                put("Federal Tax", cents(r.tax.tax));
                put("Effective Rate %", cents(r.tax.effective_rate_percent));
                put("Marginal Rate %", cents(r.tax.marginal_rate_percent));
            }
            CalculatorOutput::CapitalGains(r) => {
                put("Gain", cents(r.gain));
                put("Tax", cents(r.tax.tax));
                put("Net Proceeds", cents(r.net_proceeds));
            }
            CalculatorOutput::Paycheck(r) => {
                put("Gross Pay", cents(r.per_period.gross));
                put("Federal Income Tax", cents(r.per_period.federal_income_tax));
                put("Social Security", cents(r.per_period.social_security));
                put("Medicare", cents(r.per_period.medicare));
                put("Net Pay", cents(r.per_period.net));
            }
            CalculatorOutput::RentVsBuy(r) => {
                put("Total Cost to Buy", cents(r.comparison.total_cost_a));
                put("Total Cost to Rent", cents(r.comparison.total_cost_b));
                put("Net Difference", cents(r.comparison.net_difference));
                put("Recommendation", format!("{:?}", r.recommendation));
            }
        }

        summary
    }
}
