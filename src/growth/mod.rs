//! Savings and investment growth projections

mod projector;

pub use projector::{
    AccountKind, GrowthMonth, GrowthProjector, GrowthResult, GrowthTerms, GrowthYearTotals,
    YearlyGrowthRow,
};
