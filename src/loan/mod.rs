//! Loan calculators: level-payment amortization, purchase products,
//! fixed-payment payoff and multi-debt strategies

mod amortization;
mod payoff;
mod products;
mod strategy;

pub use amortization::{AmortizationEngine, AmortizationResult, ExtraPaymentResult, LoanTerms};
pub use payoff::{PayoffResult, PayoffSimulator, PayoffTerms};
pub use products::{AutoLoanInput, AutoLoanResult, MortgageInput, MortgageResult, PMI_DOWN_PAYMENT_THRESHOLD};
pub use strategy::{Debt, DebtPayoffSummary, DebtPlanInput, DebtPlanResult, DebtStrategyPlanner, PayoffStrategy};
