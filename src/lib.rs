//! Financial Projection Engine - deterministic numeric core for consumer finance calculators
//!
//! This library provides:
//! - Level-payment amortization schedules (mortgage, auto, personal, student, business, refinance)
//! - Compound growth projections with contributions and employer match
//! - Fixed-payment payoff simulation with divergence detection, plus snowball/avalanche plans
//! - Progressive tax liability (income tax, capital gains, paycheck withholding)
//! - Multi-year cost comparison of competing scenarios (rent vs. buy)
//!
//! Every calculation is a pure function of its input struct. Dates are always
//! supplied by the caller, never read from the clock.

pub mod calculator;
pub mod compare;
pub mod config;
pub mod error;
pub mod growth;
pub mod loan;
pub mod schedule;
pub mod tax;

// Re-export commonly used types
pub use calculator::{CalculatorKind, CalculatorOutput, CalculatorRequest};
pub use config::EngineConfig;
pub use error::{EngineError, EngineResult};
pub use growth::{GrowthProjector, GrowthResult, GrowthTerms};
pub use loan::{AmortizationEngine, AmortizationResult, LoanTerms, PayoffResult, PayoffSimulator, PayoffTerms};
pub use schedule::AmortizationRow;
pub use tax::{ProgressiveTaxCalculator, TaxBracket, TaxResult, TaxTables};
