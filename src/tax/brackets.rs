//! Tax bracket tables, keyed by filing status
//!
//! Built-in figures are the simplified 2024 US federal tables. They can be
//! replaced wholesale by loading CSV files (see `loader`).

use serde::{Deserialize, Serialize};

use crate::error::{EngineError, EngineResult};

/// Federal filing status
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FilingStatus {
    #[default]
    Single,
    MarriedFilingJointly,
    MarriedFilingSeparately,
    HeadOfHousehold,
}

impl FilingStatus {
    pub const ALL: [FilingStatus; 4] = [
        FilingStatus::Single,
        FilingStatus::MarriedFilingJointly,
        FilingStatus::MarriedFilingSeparately,
        FilingStatus::HeadOfHousehold,
    ];

    /// Key used in CSV tables
    pub fn key(&self) -> &'static str {
        match self {
            FilingStatus::Single => "single",
            FilingStatus::MarriedFilingJointly => "married_filing_jointly",
            FilingStatus::MarriedFilingSeparately => "married_filing_separately",
            FilingStatus::HeadOfHousehold => "head_of_household",
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|s| s.key() == key.trim())
    }
}

/// A single marginal bracket: income in `[lower_bound, upper_bound)` is taxed at `rate_percent`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaxBracket {
    pub lower_bound: f64,
    /// `None` for the top, unbounded bracket
    pub upper_bound: Option<f64>,
    pub rate_percent: f64,
}

impl TaxBracket {
    pub fn new(lower_bound: f64, upper_bound: Option<f64>, rate_percent: f64) -> Self {
        Self {
            lower_bound,
            upper_bound,
            rate_percent,
        }
    }

    /// Display label, e.g. "22%"
    pub fn label(&self) -> String {
        format!("{}%", self.rate_percent)
    }

    pub fn upper(&self) -> f64 {
        self.upper_bound.unwrap_or(f64::INFINITY)
    }
}

/// Ascending, contiguous list of brackets starting at zero.
///
/// Serialized as a plain array of brackets; deserialization goes through
/// [`BracketTable::new`] so a decoded table is always valid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<TaxBracket>", into = "Vec<TaxBracket>")]
pub struct BracketTable {
    brackets: Vec<TaxBracket>,
}

impl TryFrom<Vec<TaxBracket>> for BracketTable {
    type Error = EngineError;

    fn try_from(brackets: Vec<TaxBracket>) -> EngineResult<Self> {
        Self::new("deserialized", brackets)
    }
}

impl From<BracketTable> for Vec<TaxBracket> {
    fn from(table: BracketTable) -> Self {
        table.brackets
    }
}

impl BracketTable {
    /// Build a table from brackets, checking they tile `[0, inf)` in order
    pub fn new(name: &str, mut brackets: Vec<TaxBracket>) -> EngineResult<Self> {
        let invalid = |reason: String| EngineError::InvalidTable {
            table: name.to_string(),
            reason,
        };

        brackets.sort_by(|a, b| a.lower_bound.total_cmp(&b.lower_bound));
        let first = brackets
            .first()
            .ok_or_else(|| invalid("no brackets".to_string()))?;
        if first.lower_bound != 0.0 {
            return Err(invalid(format!(
                "first bracket starts at {} instead of 0",
                first.lower_bound
            )));
        }

        for (i, bracket) in brackets.iter().enumerate() {
            if !(0.0..=100.0).contains(&bracket.rate_percent) {
                return Err(invalid(format!("rate {} out of range", bracket.rate_percent)));
            }
            match (bracket.upper_bound, brackets.get(i + 1)) {
                (Some(upper), Some(next)) if upper != next.lower_bound => {
                    return Err(invalid(format!(
                        "gap or overlap between {} and {}",
                        upper, next.lower_bound
                    )));
                }
                (Some(upper), _) if upper <= bracket.lower_bound => {
                    return Err(invalid(format!("empty bracket at {}", bracket.lower_bound)));
                }
                (None, Some(_)) => {
                    return Err(invalid("unbounded bracket is not the last".to_string()));
                }
                (Some(_), None) => {
                    return Err(invalid("last bracket must be unbounded".to_string()));
                }
                _ => {}
            }
        }

        Ok(Self { brackets })
    }

    /// Build from `(upper bound, rate)` pairs, the last pair being unbounded
    fn from_thresholds(thresholds: &[(Option<f64>, f64)]) -> Self {
        let mut lower = 0.0;
        let brackets = thresholds
            .iter()
            .map(|&(upper, rate)| {
                let bracket = TaxBracket::new(lower, upper, rate);
                lower = upper.unwrap_or(lower);
                bracket
            })
            .collect();
        Self { brackets }
    }

    pub fn brackets(&self) -> &[TaxBracket] {
        &self.brackets
    }
}

/// One value per filing status
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ByStatus<T> {
    pub single: T,
    pub married_filing_jointly: T,
    pub married_filing_separately: T,
    pub head_of_household: T,
}

impl<T> ByStatus<T> {
    pub fn get(&self, status: FilingStatus) -> &T {
        match status {
            FilingStatus::Single => &self.single,
            FilingStatus::MarriedFilingJointly => &self.married_filing_jointly,
            FilingStatus::MarriedFilingSeparately => &self.married_filing_separately,
            FilingStatus::HeadOfHousehold => &self.head_of_household,
        }
    }

    pub fn get_mut(&mut self, status: FilingStatus) -> &mut T {
        match status {
            FilingStatus::Single => &mut self.single,
            FilingStatus::MarriedFilingJointly => &mut self.married_filing_jointly,
            FilingStatus::MarriedFilingSeparately => &mut self.married_filing_separately,
            FilingStatus::HeadOfHousehold => &mut self.head_of_household,
        }
    }
}

/// Social Security and Medicare parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PayrollTaxRates {
    pub social_security_rate_percent: f64,
    pub social_security_wage_base: f64,
    pub medicare_rate_percent: f64,
    pub additional_medicare_rate_percent: f64,
    pub additional_medicare_threshold: ByStatus<f64>,
}

impl PayrollTaxRates {
    pub fn federal_2024() -> Self {
        Self {
            social_security_rate_percent: 6.2,
            social_security_wage_base: 168_600.0,
            medicare_rate_percent: 1.45,
            additional_medicare_rate_percent: 0.9,
            additional_medicare_threshold: ByStatus {
                single: 200_000.0,
                married_filing_jointly: 250_000.0,
                married_filing_separately: 125_000.0,
                head_of_household: 200_000.0,
            },
        }
    }
}

/// Container for every table the tax calculators consult
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaxTables {
    /// Tax year the figures belong to
    pub year: i32,
    pub ordinary: ByStatus<BracketTable>,
    pub long_term_gains: ByStatus<BracketTable>,
    pub standard_deduction: ByStatus<f64>,
    pub payroll: PayrollTaxRates,
}

impl TaxTables {
    /// 2024 federal brackets, long-term capital gains brackets and standard deductions
    pub fn federal_2024() -> Self {
        let ordinary = |t: [f64; 6]| {
            BracketTable::from_thresholds(&[
                (Some(t[0]), 10.0),
                (Some(t[1]), 12.0),
                (Some(t[2]), 22.0),
                (Some(t[3]), 24.0),
                (Some(t[4]), 32.0),
                (Some(t[5]), 35.0),
                (None, 37.0),
            ])
        };
        let gains = |zero_top: f64, fifteen_top: f64| {
            BracketTable::from_thresholds(&[
                (Some(zero_top), 0.0),
                (Some(fifteen_top), 15.0),
                (None, 20.0),
            ])
        };

        Self {
            year: 2024,
            ordinary: ByStatus {
                single: ordinary([11_600.0, 47_150.0, 100_525.0, 191_950.0, 243_725.0, 609_350.0]),
                married_filing_jointly: ordinary([
                    23_200.0, 94_300.0, 201_050.0, 383_900.0, 487_450.0, 731_200.0,
                ]),
                married_filing_separately: ordinary([
                    11_600.0, 47_150.0, 100_525.0, 191_950.0, 243_725.0, 365_600.0,
                ]),
                head_of_household: ordinary([
                    16_550.0, 63_100.0, 100_500.0, 191_950.0, 243_700.0, 609_350.0,
                ]),
            },
            long_term_gains: ByStatus {
                single: gains(47_025.0, 518_900.0),
                married_filing_jointly: gains(94_050.0, 583_750.0),
                married_filing_separately: gains(47_025.0, 291_850.0),
                head_of_household: gains(63_000.0, 551_350.0),
            },
            standard_deduction: ByStatus {
                single: 14_600.0,
                married_filing_jointly: 29_200.0,
                married_filing_separately: 14_600.0,
                head_of_household: 21_900.0,
            },
            payroll: PayrollTaxRates::federal_2024(),
        }
    }
}

impl Default for TaxTables {
    fn default() -> Self {
        Self::federal_2024()
    }
}
