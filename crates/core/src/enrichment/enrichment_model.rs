//! Output models of the enrichment read path.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use foliotrack_market_data::{FinancialHistory, FundamentalsProfile};

use super::cagr::cagr;
use super::rules::HoldingState;
use crate::constants::CAGR_SPANS_YEARS;
use crate::holdings::Holding;

/// Fundamental ratios attached to an enriched holding.
///
/// All fields optional; an all-`None` value is what a failed fetch caches,
/// so a flaky symbol is not re-queried on every read within the TTL.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FundamentalRatios {
    pub pe_ratio: Option<f64>,
    pub peg_ratio: Option<f64>,
    pub debt_to_equity: Option<f64>,
    pub market_cap: Option<f64>,
    pub sales_growth_3y: Option<f64>,
    pub sales_growth_5y: Option<f64>,
    pub sales_growth_7y: Option<f64>,
    pub eps_growth_3y: Option<f64>,
    pub eps_growth_5y: Option<f64>,
    pub eps_growth_7y: Option<f64>,
}

impl FundamentalRatios {
    /// Derives the ratio set from a provider profile and annual statements.
    ///
    /// P/E prefers the trailing ratio, falling back to forward. When the
    /// source carries no PEG but P/E and a positive 3-year earnings growth
    /// are both known, PEG is derived as P/E divided by that growth.
    pub fn derive(profile: &FundamentalsProfile, financials: &FinancialHistory) -> Self {
        let revenue: Vec<f64> = financials.revenue.iter().map(|v| v.value).collect();
        let net_income: Vec<f64> = financials.net_income.iter().map(|v| v.value).collect();

        let [sales_3, sales_5, sales_7] = CAGR_SPANS_YEARS.map(|years| cagr(&revenue, years));
        let [eps_3, eps_5, eps_7] = CAGR_SPANS_YEARS.map(|years| cagr(&net_income, years));

        let pe_ratio = profile.trailing_pe.or(profile.forward_pe);
        let peg_ratio = profile.peg_ratio.or_else(|| match (pe_ratio, eps_3) {
            (Some(pe), Some(growth)) if growth > 0.0 => Some(pe / growth),
            _ => None,
        });

        Self {
            pe_ratio,
            peg_ratio,
            debt_to_equity: profile.debt_to_equity,
            market_cap: profile.market_cap,
            sales_growth_3y: sales_3,
            sales_growth_5y: sales_5,
            sales_growth_7y: sales_7,
            eps_growth_3y: eps_3,
            eps_growth_5y: eps_5,
            eps_growth_7y: eps_7,
        }
    }
}

/// One holding with its computed-at-read fields attached.
///
/// The computed fields are never durable truth; they are recomputed or
/// defaulted on every read.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EnrichedHolding {
    #[serde(flatten)]
    pub holding: Holding,
    pub current_price: Option<Decimal>,
    pub day_change_amount: Option<Decimal>,
    pub day_change_percent: Option<Decimal>,
    pub total_return_percent: Option<Decimal>,
    pub state: HoldingState,
    pub state_reason: String,
    /// True when the displayed price came from the persisted snapshot
    /// rather than a live or cached quote.
    pub is_cached: bool,
    #[serde(flatten)]
    pub fundamentals: FundamentalRatios,
}

impl EnrichedHolding {
    /// A holding with every computed field defaulted (no price resolved).
    pub fn defaulted(holding: Holding) -> Self {
        Self {
            holding,
            current_price: None,
            day_change_amount: None,
            day_change_percent: None,
            total_return_percent: None,
            state: HoldingState::Hold,
            state_reason: String::new(),
            is_cached: false,
            fundamentals: FundamentalRatios::default(),
        }
    }
}

/// The holdings-read response: enriched holdings plus the market-open flag
/// for client display.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EnrichedHoldings {
    pub holdings: Vec<EnrichedHolding>,
    pub is_market_open: bool,
}
