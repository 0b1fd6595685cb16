//! Side-by-side cost comparisons built from the loan and growth engines

mod refinance;
mod rent_vs_buy;
mod series;

pub use refinance::{RefinanceInput, RefinanceResult};
pub use rent_vs_buy::{RentOrBuy, RentVsBuyInput, RentVsBuyResult};
pub use series::{compare_series, ComparativeResult, ComparativeYearRow, Recommendation};
