//! Loan products that derive their financed principal from purchase inputs

use serde::{Deserialize, Serialize};

use super::amortization::{AmortizationEngine, AmortizationResult, LoanTerms};
use crate::schedule::{sanitize_amount, sanitize_percent, MONTHS_PER_YEAR};

/// Down payment share below which private mortgage insurance applies
pub const PMI_DOWN_PAYMENT_THRESHOLD: f64 = 0.20;

/// Home purchase financed with a mortgage
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MortgageInput {
    pub home_price: f64,
    pub down_payment: f64,
    pub annual_rate_percent: f64,
    pub term_years: u32,
    #[serde(default)]
    pub property_tax_annual: f64,
    #[serde(default)]
    pub insurance_annual: f64,
    #[serde(default)]
    pub hoa_monthly: f64,
    /// Annual PMI premium as a percent of the loan amount
    #[serde(default)]
    pub pmi_rate_percent: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MortgageResult {
    pub loan_amount: f64,
    pub loan_to_value_percent: f64,
    /// Principal and interest
    pub loan: AmortizationResult,
    pub monthly_property_tax: f64,
    pub monthly_insurance: f64,
    pub monthly_pmi: f64,
    pub monthly_hoa: f64,
    /// Principal, interest, taxes, insurance, PMI and HOA
    pub total_monthly_payment: f64,
}

impl MortgageInput {
    /// Financed amount over the term, at least one year
    pub fn loan_terms(&self) -> LoanTerms {
        let price = sanitize_amount(self.home_price);
        let down = sanitize_amount(self.down_payment).min(price);
        LoanTerms::from_years(price - down, self.annual_rate_percent, self.term_years.max(1))
    }

    pub fn calculate(&self) -> MortgageResult {
        let price = sanitize_amount(self.home_price);
        let terms = self.loan_terms();
        let loan = AmortizationEngine::amortize(&terms);

        let ltv = if price > 0.0 { terms.principal / price } else { 0.0 };
        let months = MONTHS_PER_YEAR as f64;
        let down_share = if price > 0.0 { (price - terms.principal) / price } else { 1.0 };
        let monthly_pmi = if terms.principal > 0.0 && down_share < PMI_DOWN_PAYMENT_THRESHOLD {
            terms.principal * sanitize_percent(self.pmi_rate_percent, 100.0) / 100.0 / months
        } else {
            0.0
        };
        let monthly_property_tax = sanitize_amount(self.property_tax_annual) / months;
        let monthly_insurance = sanitize_amount(self.insurance_annual) / months;
        let monthly_hoa = sanitize_amount(self.hoa_monthly);

        MortgageResult {
            loan_amount: terms.principal,
            loan_to_value_percent: ltv * 100.0,
            total_monthly_payment: loan.payment
                + monthly_property_tax
                + monthly_insurance
                + monthly_pmi
                + monthly_hoa,
            loan,
            monthly_property_tax,
            monthly_insurance,
            monthly_pmi,
            monthly_hoa,
        }
    }
}

/// Vehicle purchase financed with an auto loan
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AutoLoanInput {
    pub vehicle_price: f64,
    #[serde(default)]
    pub down_payment: f64,
    #[serde(default)]
    pub trade_in_value: f64,
    /// Sales tax applied to the price net of trade-in
    #[serde(default)]
    pub sales_tax_percent: f64,
    pub annual_rate_percent: f64,
    pub term_months: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AutoLoanResult {
    pub sales_tax: f64,
    pub amount_financed: f64,
    pub loan: AmortizationResult,
    /// Everything paid for the vehicle: down payment, trade-in and loan payments
    pub total_cost: f64,
}

impl AutoLoanInput {
    pub fn calculate(&self) -> AutoLoanResult {
        let price = sanitize_amount(self.vehicle_price);
        let trade_in = sanitize_amount(self.trade_in_value);
        let down = sanitize_amount(self.down_payment);

        let sales_tax =
            (price - trade_in).max(0.0) * sanitize_percent(self.sales_tax_percent, 100.0) / 100.0;
        let amount_financed = (price + sales_tax - trade_in - down).max(0.0);

        let loan = AmortizationEngine::amortize(&LoanTerms::new(
            amount_financed,
            self.annual_rate_percent,
            self.term_months.max(1),
        ));

        AutoLoanResult {
            sales_tax,
            amount_financed,
            total_cost: loan.total_payment + down + trade_in,
            loan,
        }
    }
}
