//! Progressive (marginal bracket) tax calculation

use serde::{Deserialize, Serialize};

use super::brackets::{BracketTable, FilingStatus, TaxTables};
use crate::schedule::sanitize_amount;

/// Tax attributed to one bracket
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BracketAmount {
    pub label: String,
    pub rate_percent: f64,
    /// Income that fell inside this bracket
    pub taxable_amount: f64,
    /// Tax owed on that income
    pub amount: f64,
}

/// Outcome of applying a bracket table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaxResult {
    pub taxable_income: f64,
    pub tax: f64,
    /// `100 * tax / taxable_income`, 0 when there is no income
    pub effective_rate_percent: f64,
    /// Rate of the highest bracket reached, 0 when none is
    pub marginal_rate_percent: f64,
    /// Only the brackets actually touched
    pub bracket_breakdown: Vec<BracketAmount>,
}

impl TaxResult {
    pub fn zero() -> Self {
        Self {
            taxable_income: 0.0,
            tax: 0.0,
            effective_rate_percent: 0.0,
            marginal_rate_percent: 0.0,
            bracket_breakdown: Vec::new(),
        }
    }
}

/// Gross income and deductions for a federal income tax estimate
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IncomeTaxInput {
    pub gross_income: f64,
    #[serde(default)]
    pub filing_status: FilingStatus,
    /// Used instead of the standard deduction when larger
    #[serde(default)]
    pub itemized_deductions: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IncomeTaxResult {
    pub gross_income: f64,
    pub filing_status: FilingStatus,
    pub deduction: f64,
    pub itemized: bool,
    pub tax: TaxResult,
    /// Tax as a percent of gross (not taxable) income
    pub effective_rate_on_gross_percent: f64,
    pub after_tax_income: f64,
}

/// Applies marginal bracket tables to income
pub struct ProgressiveTaxCalculator;

impl ProgressiveTaxCalculator {
    /// Tax on `taxable_income` under `table`
    pub fn calculate(table: &BracketTable, taxable_income: f64) -> TaxResult {
        let taxable_income = sanitize_amount(taxable_income);
        let (tax, marginal_rate_percent, bracket_breakdown) =
            Self::apply_range(table, 0.0, taxable_income);

        TaxResult {
            taxable_income,
            tax,
            effective_rate_percent: effective_rate(tax, taxable_income),
            marginal_rate_percent,
            bracket_breakdown,
        }
    }

    /// Tax on `amount` of income stacked on top of `base_income` already in the table.
    ///
    /// The base fills the lower brackets first, so `amount` is taxed at the rates
    /// of the brackets it lands in. `taxable_income` of the result is `amount`.
    pub fn stacked(table: &BracketTable, base_income: f64, amount: f64) -> TaxResult {
        let base = sanitize_amount(base_income);
        let amount = sanitize_amount(amount);
        let (tax, marginal_rate_percent, bracket_breakdown) =
            Self::apply_range(table, base, base + amount);

        TaxResult {
            taxable_income: amount,
            tax,
            effective_rate_percent: effective_rate(tax, amount),
            marginal_rate_percent,
            bracket_breakdown,
        }
    }

    /// Federal income tax after the standard or itemized deduction
    pub fn income_tax(tables: &TaxTables, input: &IncomeTaxInput) -> IncomeTaxResult {
        let gross = sanitize_amount(input.gross_income);
        let standard = *tables.standard_deduction.get(input.filing_status);
        let itemized = input.itemized_deductions.map(sanitize_amount).unwrap_or(0.0);
        let (deduction, used_itemized) = if itemized > standard {
            (itemized, true)
        } else {
            (standard, false)
        };

        let taxable = (gross - deduction).max(0.0);
        let tax = Self::calculate(tables.ordinary.get(input.filing_status), taxable);

        IncomeTaxResult {
            gross_income: gross,
            filing_status: input.filing_status,
            deduction,
            itemized: used_itemized,
            effective_rate_on_gross_percent: effective_rate(tax.tax, gross),
            after_tax_income: gross - tax.tax,
            tax,
        }
    }

    /// Walk the brackets over income `[from, to)`, returning tax, marginal rate and breakdown
    fn apply_range(table: &BracketTable, from: f64, to: f64) -> (f64, f64, Vec<BracketAmount>) {
        let mut tax = 0.0;
        let mut marginal = 0.0;
        let mut breakdown = Vec::new();

        for bracket in table.brackets() {
            if bracket.lower_bound >= to {
                break;
            }
            let portion = bracket.upper().min(to) - bracket.lower_bound.max(from);
            if portion <= 0.0 {
                continue;
            }

            let amount = portion * bracket.rate_percent / 100.0;
            tax += amount;
            marginal = bracket.rate_percent;
            breakdown.push(BracketAmount {
                label: bracket.label(),
                rate_percent: bracket.rate_percent,
                taxable_amount: portion,
                amount,
            });
        }

        (tax, marginal, breakdown)
    }
}

fn effective_rate(tax: f64, income: f64) -> f64 {
    if income > 0.0 {
        100.0 * tax / income
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn single() -> BracketTable {
        TaxTables::federal_2024().ordinary.single
    }

    #[test]
    fn test_first_bracket_only() {
        let result = ProgressiveTaxCalculator::calculate(&single(), 10_000.0);
        assert_abs_diff_eq!(result.tax, 1_000.0, epsilon = 1e-9);
        assert_eq!(result.marginal_rate_percent, 10.0);
        assert_eq!(result.bracket_breakdown.len(), 1);
    }

    #[test]
    fn test_multiple_brackets() {
        // 11,600 @ 10% + 35,550 @ 12% + 2,850 @ 22%
        let result = ProgressiveTaxCalculator::calculate(&single(), 50_000.0);
        assert_abs_diff_eq!(result.tax, 1_160.0 + 4_266.0 + 627.0, epsilon = 1e-6);
        assert_eq!(result.marginal_rate_percent, 22.0);
        assert_abs_diff_eq!(result.effective_rate_percent, 100.0 * 6_053.0 / 50_000.0, epsilon = 1e-9);
    }

    #[test]
    fn test_bracket_boundary() {
        let result = ProgressiveTaxCalculator::calculate(&single(), 11_600.0);
        assert_eq!(result.marginal_rate_percent, 10.0);
        assert_eq!(result.bracket_breakdown.len(), 1);
        assert_abs_diff_eq!(result.tax, 1_160.0, epsilon = 1e-9);
    }

    #[test]
    fn test_zero_income() {
        let result = ProgressiveTaxCalculator::calculate(&single(), 0.0);
        assert_eq!(result.tax, 0.0);
        assert_eq!(result.effective_rate_percent, 0.0);
        assert_eq!(result.marginal_rate_percent, 0.0);
        assert!(result.bracket_breakdown.is_empty());
    }

    #[test]
    fn test_top_bracket() {
        let result = ProgressiveTaxCalculator::calculate(&single(), 1_000_000.0);
        assert_eq!(result.marginal_rate_percent, 37.0);
        assert_eq!(result.bracket_breakdown.len(), 7);
    }

    #[test]
    fn test_tax_monotonic_and_breakdown_sums() {
        let tables = TaxTables::federal_2024();
        for status in FilingStatus::ALL {
            let table = tables.ordinary.get(status);
            let mut previous = 0.0;
            let mut income = 0.0;
            while income <= 800_000.0 {
                let result = ProgressiveTaxCalculator::calculate(table, income);
                assert!(result.tax >= previous, "{:?} tax fell at {}", status, income);
                let summed: f64 = result.bracket_breakdown.iter().map(|b| b.amount).sum();
                assert_abs_diff_eq!(summed, result.tax, epsilon = 1e-6);
                previous = result.tax;
                income += 2_537.0;
            }
        }
    }

    #[test]
    fn test_stacked_income_starts_in_higher_bracket() {
        let result = ProgressiveTaxCalculator::stacked(&single(), 40_000.0, 10_000.0);
        // 7,150 @ 12% + 2,850 @ 22%
        assert_abs_diff_eq!(result.tax, 858.0 + 627.0, epsilon = 1e-6);
        assert_eq!(result.taxable_income, 10_000.0);
        assert_eq!(result.bracket_breakdown[0].rate_percent, 12.0);
    }

    #[test]
    fn test_income_tax_standard_deduction() {
        let tables = TaxTables::federal_2024();
        let result = ProgressiveTaxCalculator::income_tax(
            &tables,
            &IncomeTaxInput {
                gross_income: 64_600.0,
                filing_status: FilingStatus::Single,
                itemized_deductions: None,
            },
        );
        assert_eq!(result.deduction, 14_600.0);
        assert!(!result.itemized);
        assert_eq!(result.tax.taxable_income, 50_000.0);
        assert_abs_diff_eq!(result.tax.tax, 6_053.0, epsilon = 1e-6);
        assert_abs_diff_eq!(result.after_tax_income, 64_600.0 - 6_053.0, epsilon = 1e-6);
    }

    #[test]
    fn test_income_tax_itemized_when_larger() {
        let tables = TaxTables::federal_2024();
        let result = ProgressiveTaxCalculator::income_tax(
            &tables,
            &IncomeTaxInput {
                gross_income: 120_000.0,
                filing_status: FilingStatus::MarriedFilingJointly,
                itemized_deductions: Some(35_000.0),
            },
        );
        assert!(result.itemized);
        assert_eq!(result.tax.taxable_income, 85_000.0);
    }

    #[test]
    fn test_income_below_deduction() {
        let tables = TaxTables::federal_2024();
        let result = ProgressiveTaxCalculator::income_tax(
            &tables,
            &IncomeTaxInput {
                gross_income: 9_000.0,
                filing_status: FilingStatus::HeadOfHousehold,
                itemized_deductions: None,
            },
        );
        assert_eq!(result.tax.tax, 0.0);
        assert_eq!(result.effective_rate_on_gross_percent, 0.0);
    }
}
