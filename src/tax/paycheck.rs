//! Paycheck withholding estimate
//!
//! Federal income tax is withheld with the annualized method: the annual tax
//! on salary net of pre-tax deductions and the standard deduction, spread
//! evenly over pay periods. Social Security and Medicare apply to gross pay.

use serde::{Deserialize, Serialize};

use super::brackets::{FilingStatus, TaxTables};
use super::calculator::{ProgressiveTaxCalculator, TaxResult};
use crate::schedule::sanitize_amount;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum PayFrequency {
    Weekly,
    #[default]
    Biweekly,
    SemiMonthly,
    Monthly,
}

impl PayFrequency {
    pub fn periods_per_year(&self) -> u32 {
        match self {
            PayFrequency::Weekly => 52,
            PayFrequency::Biweekly => 26,
            PayFrequency::SemiMonthly => 24,
            PayFrequency::Monthly => 12,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaycheckInput {
    pub annual_salary: f64,
    #[serde(default)]
    pub pay_frequency: PayFrequency,
    #[serde(default)]
    pub filing_status: FilingStatus,
    /// Retirement and other pre-tax deductions for the year
    #[serde(default)]
    pub pre_tax_deductions_annual: f64,
}

/// Amounts for a single pay period, or for the whole year
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PayBreakdown {
    pub gross: f64,
    pub pre_tax_deductions: f64,
    pub federal_income_tax: f64,
    pub social_security: f64,
    pub medicare: f64,
    pub net: f64,
}

impl PayBreakdown {
    fn per_period(&self, periods: f64) -> Self {
        Self {
            gross: self.gross / periods,
            pre_tax_deductions: self.pre_tax_deductions / periods,
            federal_income_tax: self.federal_income_tax / periods,
            social_security: self.social_security / periods,
            medicare: self.medicare / periods,
            net: self.net / periods,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaycheckResult {
    pub periods_per_year: u32,
    pub per_period: PayBreakdown,
    pub annual: PayBreakdown,
    pub income_tax: TaxResult,
    /// All withholding as a percent of gross pay
    pub total_tax_rate_percent: f64,
}

impl PaycheckInput {
    pub fn calculate(&self, tables: &TaxTables) -> PaycheckResult {
        let gross = sanitize_amount(self.annual_salary);
        let pre_tax = sanitize_amount(self.pre_tax_deductions_annual).min(gross);
        let standard = *tables.standard_deduction.get(self.filing_status);

        let taxable = (gross - pre_tax - standard).max(0.0);
        let income_tax =
            ProgressiveTaxCalculator::calculate(tables.ordinary.get(self.filing_status), taxable);

        let payroll = &tables.payroll;
        let social_security =
            gross.min(payroll.social_security_wage_base) * payroll.social_security_rate_percent / 100.0;
        let threshold = *payroll.additional_medicare_threshold.get(self.filing_status);
        let medicare = gross * payroll.medicare_rate_percent / 100.0
            + (gross - threshold).max(0.0) * payroll.additional_medicare_rate_percent / 100.0;

        let withheld = income_tax.tax + social_security + medicare;
        let annual = PayBreakdown {
            gross,
            pre_tax_deductions: pre_tax,
            federal_income_tax: income_tax.tax,
            social_security,
            medicare,
            net: gross - pre_tax - withheld,
        };

        let periods = self.pay_frequency.periods_per_year();
        PaycheckResult {
            periods_per_year: periods,
            per_period: annual.per_period(periods as f64),
            annual,
            income_tax,
            total_tax_rate_percent: if gross > 0.0 { 100.0 * withheld / gross } else { 0.0 },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn paycheck(salary: f64) -> PaycheckInput {
        PaycheckInput {
            annual_salary: salary,
            pay_frequency: PayFrequency::Biweekly,
            filing_status: FilingStatus::Single,
            pre_tax_deductions_annual: 0.0,
        }
    }

    #[test]
    fn test_basic_withholding() {
        let result = paycheck(64_600.0).calculate(&TaxTables::federal_2024());
        assert_abs_diff_eq!(result.annual.federal_income_tax, 6_053.0, epsilon = 1e-6);
        assert_abs_diff_eq!(result.annual.social_security, 64_600.0 * 0.062, epsilon = 1e-6);
        assert_abs_diff_eq!(result.annual.medicare, 64_600.0 * 0.0145, epsilon = 1e-6);
        assert_abs_diff_eq!(result.per_period.gross, 64_600.0 / 26.0, epsilon = 1e-9);
        assert_abs_diff_eq!(
            result.per_period.net * 26.0,
            result.annual.net,
            epsilon = 1e-6
        );
    }

    #[test]
    fn test_social_security_wage_base_cap() {
        let result = paycheck(250_000.0).calculate(&TaxTables::federal_2024());
        assert_abs_diff_eq!(result.annual.social_security, 168_600.0 * 0.062, epsilon = 1e-6);
        // 1.45% on everything plus 0.9% above 200k
        assert_abs_diff_eq!(
            result.annual.medicare,
            250_000.0 * 0.0145 + 50_000.0 * 0.009,
            epsilon = 1e-6
        );
    }

    #[test]
    fn test_pre_tax_deductions_reduce_income_tax_only() {
        let tables = TaxTables::federal_2024();
        let base = paycheck(80_000.0).calculate(&tables);
        let mut with_401k = paycheck(80_000.0);
        with_401k.pre_tax_deductions_annual = 10_000.0;
        let reduced = with_401k.calculate(&tables);

        assert!(reduced.annual.federal_income_tax < base.annual.federal_income_tax);
        assert_eq!(reduced.annual.social_security, base.annual.social_security);
        assert_abs_diff_eq!(
            reduced.annual.net,
            80_000.0 - 10_000.0 - reduced.annual.federal_income_tax
                - reduced.annual.social_security
                - reduced.annual.medicare,
            epsilon = 1e-6
        );
    }

    #[test]
    fn test_periods_per_year() {
        assert_eq!(PayFrequency::Weekly.periods_per_year(), 52);
        assert_eq!(PayFrequency::SemiMonthly.periods_per_year(), 24);
    }

    #[test]
    fn test_zero_salary() {
        let result = paycheck(0.0).calculate(&TaxTables::federal_2024());
        assert_eq!(result.annual.net, 0.0);
        assert_eq!(result.total_tax_rate_percent, 0.0);
    }
}
