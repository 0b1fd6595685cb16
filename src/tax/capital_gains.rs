//! Capital gains tax on the sale of an asset
//!
//! Short-term gains are ordinary income; long-term gains use the preferential
//! table. Either way the gain sits on top of the seller's other taxable income.

use serde::{Deserialize, Serialize};

use super::brackets::{FilingStatus, TaxTables};
use super::calculator::{ProgressiveTaxCalculator, TaxResult};
use crate::schedule::sanitize_amount;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum HoldingPeriod {
    /// Held one year or less
    ShortTerm,
    /// Held more than one year
    #[default]
    LongTerm,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CapitalGainsInput {
    pub purchase_price: f64,
    pub sale_price: f64,
    /// Taxable income other than this gain
    #[serde(default)]
    pub other_taxable_income: f64,
    #[serde(default)]
    pub filing_status: FilingStatus,
    #[serde(default)]
    pub holding_period: HoldingPeriod,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CapitalGainsResult {
    /// Sale minus purchase price; negative for a loss
    pub gain: f64,
    pub holding_period: HoldingPeriod,
    /// Tax on the gain only, with the gain as taxable income
    pub tax: TaxResult,
    pub net_proceeds: f64,
}

impl CapitalGainsInput {
    pub fn calculate(&self, tables: &TaxTables) -> CapitalGainsResult {
        let sale = sanitize_amount(self.sale_price);
        let gain = sale - sanitize_amount(self.purchase_price);

        let tax = if gain > 0.0 {
            let table = match self.holding_period {
                HoldingPeriod::ShortTerm => tables.ordinary.get(self.filing_status),
                HoldingPeriod::LongTerm => tables.long_term_gains.get(self.filing_status),
            };
            ProgressiveTaxCalculator::stacked(table, self.other_taxable_income, gain)
        } else {
            TaxResult::zero()
        };

        CapitalGainsResult {
            gain,
            holding_period: self.holding_period,
            net_proceeds: sale - tax.tax,
            tax,
        }
    }
}
