//! Fundamentals and financial statement models.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Valuation ratios for a symbol, as reported by the quote source.
///
/// Every field is optional: providers routinely omit ratios for small caps,
/// recent listings, and loss-making companies. An all-`None` profile is a
/// valid result, not an error.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FundamentalsProfile {
    /// Trailing twelve-month price-to-earnings ratio
    pub trailing_pe: Option<f64>,

    /// Forward price-to-earnings ratio
    pub forward_pe: Option<f64>,

    /// Price/earnings-to-growth ratio
    pub peg_ratio: Option<f64>,

    /// Total debt to shareholder equity, in percent
    pub debt_to_equity: Option<f64>,

    /// Market capitalization in the listing currency
    pub market_cap: Option<f64>,
}

/// One fiscal-year observation from an annual statement.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnnualValue {
    /// Fiscal period end date
    pub as_of: NaiveDate,

    /// Reported value in the statement currency
    pub value: f64,
}

/// Annual revenue and net-income series for a symbol.
///
/// Both series are ordered most recent first; growth-rate math indexes them
/// as `values[0]` = latest fiscal year.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FinancialHistory {
    /// Total revenue per fiscal year, most recent first
    pub revenue: Vec<AnnualValue>,

    /// Net income (common stockholders) per fiscal year, most recent first
    pub net_income: Vec<AnnualValue>,
}

impl FinancialHistory {
    /// Build a history from unordered observations, sorting each series
    /// most recent first.
    pub fn new(mut revenue: Vec<AnnualValue>, mut net_income: Vec<AnnualValue>) -> Self {
        revenue.sort_by(|a, b| b.as_of.cmp(&a.as_of));
        net_income.sort_by(|a, b| b.as_of.cmp(&a.as_of));
        Self { revenue, net_income }
    }
}
