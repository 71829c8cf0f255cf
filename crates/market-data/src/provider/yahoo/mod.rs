//! Yahoo Finance market data provider.
//!
//! This provider uses the Yahoo Finance API to fetch:
//! - Trailing price history per symbol (chart API)
//! - Batched close-only history for many symbols (spark API, one round trip)
//! - Symbol search
//! - Valuation ratios (quoteSummary API)
//! - Annual financial statements (fundamentals-timeseries API)

mod models;

use std::collections::HashMap;
use std::sync::RwLock;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{NaiveDate, TimeZone, Utc};
use lazy_static::lazy_static;
use num_traits::FromPrimitive;
use reqwest::header;
use rust_decimal::Decimal;
use serde::de::DeserializeOwned;
use tracing::{debug, warn};
use urlencoding::encode;
use yahoo_finance_api as yahoo;

use crate::errors::MarketDataError;
use crate::models::{
    AnnualValue, Candle, FinancialHistory, FundamentalsProfile, HistoryRange, SymbolMatch,
};
use crate::provider::MarketDataProvider;

use models::{
    YahooQuoteSummaryResponse, YahooQuoteSummaryResult, YahooSparkResponse,
    YahooTimeseriesPoint, YahooTimeseriesResponse, YahooTimeseriesResult,
};

/// Browser user agent expected by the raw Yahoo endpoints.
const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36";

/// Per-request timeout; applies to the connector and the raw endpoints
/// alike so no outbound call can hang a caller.
const HTTP_TIMEOUT: Duration = Duration::from_secs(5);

/// Annual statement lookback; 7-year growth needs eight fiscal years.
const STATEMENT_YEARS: i64 = 8;

/// Timeseries keys for the annual statement series.
const REVENUE_SERIES: &str = "annualTotalRevenue";
const NET_INCOME_SERIES: &str = "annualNetIncomeCommonStockholders";

// ============================================================================
// Crumb/Cookie Authentication
// ============================================================================

/// Cached Yahoo authentication data
#[derive(Debug, Clone)]
struct CrumbData {
    cookie: String,
    crumb: String,
}

lazy_static! {
    /// Global cache for Yahoo authentication crumb
    static ref YAHOO_CRUMB: RwLock<Option<CrumbData>> = RwLock::default();
}

// ============================================================================
// Yahoo Provider
// ============================================================================

/// Yahoo Finance market data provider.
pub struct YahooProvider {
    connector: yahoo::YahooConnector,
}

impl YahooProvider {
    /// Create a new Yahoo Finance provider.
    pub fn new() -> Result<Self, MarketDataError> {
        let connector = yahoo::YahooConnector::builder()
            .timeout(HTTP_TIMEOUT)
            .build()
            .map_err(|e| MarketDataError::ProviderError {
                provider: "YAHOO".to_string(),
                message: format!("Failed to initialize Yahoo connector: {}", e),
            })?;
        Ok(Self { connector })
    }

    fn http_client(&self) -> Result<reqwest::Client, MarketDataError> {
        reqwest::Client::builder()
            .timeout(HTTP_TIMEOUT)
            .build()
            .map_err(MarketDataError::Network)
    }

    // ========================================================================
    // Crumb/Cookie Authentication
    // ========================================================================

    /// Ensure we have a valid Yahoo authentication crumb.
    async fn ensure_crumb(&self) -> Result<CrumbData, MarketDataError> {
        // Check if we have a cached crumb
        {
            let guard = YAHOO_CRUMB.read().unwrap();
            if let Some(crumb) = guard.as_ref() {
                return Ok(crumb.clone());
            }
        }

        // Fetch new crumb
        self.fetch_crumb().await
    }

    /// Fetch a new Yahoo authentication crumb.
    async fn fetch_crumb(&self) -> Result<CrumbData, MarketDataError> {
        let client = self.http_client()?;

        // Step 1: Get cookie from fc.yahoo.com
        let response = client.get("https://fc.yahoo.com").send().await.map_err(|e| {
            MarketDataError::ProviderError {
                provider: "YAHOO".to_string(),
                message: format!("Failed to get cookie: {}", e),
            }
        })?;

        let cookie = response
            .headers()
            .get(header::SET_COOKIE)
            .and_then(|h| h.to_str().ok())
            .and_then(|s| s.split_once(';').map(|(v, _)| v.to_string()))
            .ok_or_else(|| MarketDataError::ProviderError {
                provider: "YAHOO".to_string(),
                message: "Failed to parse Yahoo cookie".to_string(),
            })?;

        // Step 2: Get crumb using cookie
        let crumb = client
            .get("https://query1.finance.yahoo.com/v1/test/getcrumb")
            .header(header::USER_AGENT, USER_AGENT)
            .header(header::COOKIE, &cookie)
            .send()
            .await
            .map_err(|e| MarketDataError::ProviderError {
                provider: "YAHOO".to_string(),
                message: format!("Failed to get crumb: {}", e),
            })?
            .text()
            .await
            .map_err(|e| MarketDataError::ProviderError {
                provider: "YAHOO".to_string(),
                message: format!("Failed to read crumb: {}", e),
            })?;

        let crumb_data = CrumbData { cookie, crumb };

        // Cache it
        let mut guard = YAHOO_CRUMB.write().unwrap();
        *guard = Some(crumb_data.clone());

        Ok(crumb_data)
    }

    /// Clear the cached crumb (used when authentication fails)
    fn clear_crumb(&self) {
        let mut guard = YAHOO_CRUMB.write().unwrap();
        *guard = None;
    }

    /// GET an authenticated endpoint and decode the JSON body.
    ///
    /// Handles the shared failure cases: 401 invalidates the cached crumb,
    /// 429 surfaces as `RateLimited`.
    async fn authed_json<T: DeserializeOwned>(
        &self,
        url: &str,
        cookie: &str,
    ) -> Result<T, MarketDataError> {
        let client = self.http_client()?;
        let response = client
            .get(url)
            .header(header::USER_AGENT, USER_AGENT)
            .header(header::COOKIE, cookie)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    MarketDataError::Timeout {
                        provider: "YAHOO".to_string(),
                    }
                } else {
                    MarketDataError::Network(e)
                }
            })?;

        if response.status() == reqwest::StatusCode::UNAUTHORIZED {
            self.clear_crumb();
            return Err(MarketDataError::ProviderError {
                provider: "YAHOO".to_string(),
                message: "Yahoo authentication expired".to_string(),
            });
        }

        if response.status() == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return Err(MarketDataError::RateLimited {
                provider: "YAHOO".to_string(),
            });
        }

        response
            .json::<T>()
            .await
            .map_err(|e| MarketDataError::ProviderError {
                provider: "YAHOO".to_string(),
                message: format!("Failed to parse response: {}", e),
            })
    }

    // ========================================================================
    // Conversions
    // ========================================================================

    /// Convert a Yahoo chart quote to a Candle.
    fn yahoo_quote_to_candle(&self, yahoo_quote: yahoo::Quote) -> Result<Candle, MarketDataError> {
        // Validate timestamp
        let timestamp = Utc
            .timestamp_opt(yahoo_quote.timestamp as i64, 0)
            .single()
            .ok_or_else(|| MarketDataError::ValidationFailed {
                message: format!("Invalid timestamp: {}", yahoo_quote.timestamp),
            })?;

        // Close price is required
        let close = Decimal::from_f64_retain(yahoo_quote.close).ok_or_else(|| {
            MarketDataError::ValidationFailed {
                message: format!(
                    "Failed to convert close price {} to Decimal",
                    yahoo_quote.close
                ),
            }
        })?;

        Ok(Candle {
            timestamp,
            open: Decimal::from_f64_retain(yahoo_quote.open),
            high: Decimal::from_f64_retain(yahoo_quote.high),
            low: Decimal::from_f64_retain(yahoo_quote.low),
            close,
            volume: Decimal::from_u64(yahoo_quote.volume),
        })
    }
}

// ============================================================================
// MarketDataProvider Implementation
// ============================================================================

#[async_trait]
impl MarketDataProvider for YahooProvider {
    fn id(&self) -> &'static str {
        "YAHOO"
    }

    async fn history(
        &self,
        symbol: &str,
        range: HistoryRange,
    ) -> Result<Vec<Candle>, MarketDataError> {
        debug!("Fetching {} history for {} from Yahoo", range.range_token(), symbol);

        let response = self
            .connector
            .get_quote_range(symbol, "1d", &range.range_token())
            .await
            .map_err(|e| {
                if matches!(e, yahoo::YahooError::NoQuotes | yahoo::YahooError::NoResult) {
                    MarketDataError::SymbolNotFound(symbol.to_string())
                } else {
                    MarketDataError::ProviderError {
                        provider: "YAHOO".to_string(),
                        message: e.to_string(),
                    }
                }
            })?;

        match response.quotes() {
            Ok(yahoo_quotes) => {
                let candles: Vec<Candle> = yahoo_quotes
                    .into_iter()
                    .filter_map(|q| match self.yahoo_quote_to_candle(q) {
                        Ok(candle) => Some(candle),
                        Err(e) => {
                            warn!("Skipping candle due to conversion error: {:?}", e);
                            None
                        }
                    })
                    .collect();

                if candles.is_empty() {
                    return Err(MarketDataError::NoDataForRange);
                }

                Ok(candles)
            }
            Err(yahoo::YahooError::NoQuotes) => {
                warn!("No history returned for '{}'", symbol);
                Err(MarketDataError::NoDataForRange)
            }
            Err(e) => Err(MarketDataError::ProviderError {
                provider: "YAHOO".to_string(),
                message: e.to_string(),
            }),
        }
    }

    async fn batch_history(
        &self,
        symbols: &[String],
        range: HistoryRange,
    ) -> Result<HashMap<String, Vec<Candle>>, MarketDataError> {
        if symbols.is_empty() {
            return Ok(HashMap::new());
        }

        debug!(
            "Fetching {} history for {} symbols from Yahoo spark",
            range.range_token(),
            symbols.len()
        );

        let crumb = self.ensure_crumb().await?;
        let joined = symbols
            .iter()
            .map(|s| encode(s).into_owned())
            .collect::<Vec<_>>()
            .join(",");
        let url = format!(
            "https://query1.finance.yahoo.com/v7/finance/spark?symbols={}&range={}&interval=1d&crumb={}",
            joined,
            range.range_token(),
            encode(&crumb.crumb)
        );

        let data: YahooSparkResponse = self.authed_json(&url, &crumb.cookie).await?;
        Ok(spark_to_candles(data))
    }

    async fn search(&self, query: &str) -> Result<Vec<SymbolMatch>, MarketDataError> {
        let encoded_query = encode(query);

        debug!("Searching Yahoo for '{}'", query);

        let result = self
            .connector
            .search_ticker(&encoded_query)
            .await
            .map_err(|e| MarketDataError::ProviderError {
                provider: "YAHOO".to_string(),
                message: e.to_string(),
            })?;

        let matches = result
            .quotes
            .iter()
            .map(|item| {
                let name = if item.long_name.is_empty() {
                    &item.short_name
                } else {
                    &item.long_name
                };
                SymbolMatch::new(&item.symbol, name, &item.exchange, &item.quote_type)
            })
            .collect();

        Ok(matches)
    }

    async fn fundamentals(&self, symbol: &str) -> Result<FundamentalsProfile, MarketDataError> {
        debug!("Fetching fundamentals for {} from Yahoo", symbol);

        let crumb = self.ensure_crumb().await?;
        let url = format!(
            "https://query1.finance.yahoo.com/v10/finance/quoteSummary/{}?modules=summaryDetail,defaultKeyStatistics,financialData&crumb={}",
            encode(symbol),
            encode(&crumb.crumb)
        );

        let data: YahooQuoteSummaryResponse = self.authed_json(&url, &crumb.cookie).await?;

        let result = data
            .quote_summary
            .result
            .into_iter()
            .next()
            .ok_or_else(|| MarketDataError::SymbolNotFound(symbol.to_string()))?;

        Ok(profile_from_summary(result))
    }

    async fn financials(&self, symbol: &str) -> Result<FinancialHistory, MarketDataError> {
        debug!("Fetching annual statements for {} from Yahoo", symbol);

        let crumb = self.ensure_crumb().await?;
        let period2 = Utc::now().timestamp();
        let period1 = (Utc::now() - chrono::Duration::days(366 * STATEMENT_YEARS)).timestamp();
        let url = format!(
            "https://query1.finance.yahoo.com/ws/fundamentals-timeseries/v1/finance/timeseries/{}?symbol={}&type={},{}&period1={}&period2={}&crumb={}",
            encode(symbol),
            encode(symbol),
            REVENUE_SERIES,
            NET_INCOME_SERIES,
            period1,
            period2,
            encode(&crumb.crumb)
        );

        let data: YahooTimeseriesResponse = self.authed_json(&url, &crumb.cookie).await?;
        Ok(financials_from_timeseries(data))
    }
}

// ============================================================================
// Helper Functions
// ============================================================================

/// Flatten a spark response into per-symbol close-only candles.
///
/// Symbols with no usable series are dropped from the map; null closes
/// (holidays, halts) are skipped within a series.
fn spark_to_candles(data: YahooSparkResponse) -> HashMap<String, Vec<Candle>> {
    let mut out = HashMap::new();

    for entry in data.spark.result.unwrap_or_default() {
        let Some(chart) = entry.response.and_then(|charts| charts.into_iter().next()) else {
            continue;
        };
        let timestamps = chart.timestamp.unwrap_or_default();
        let closes = chart
            .indicators
            .and_then(|i| i.quote.into_iter().next())
            .and_then(|q| q.close)
            .unwrap_or_default();

        let candles: Vec<Candle> = timestamps
            .into_iter()
            .zip(closes)
            .filter_map(|(ts, close)| {
                let close = Decimal::from_f64_retain(close?)?;
                let timestamp = Utc.timestamp_opt(ts, 0).single()?;
                Some(Candle::new(timestamp, close))
            })
            .collect();

        if !candles.is_empty() {
            out.insert(entry.symbol, candles);
        }
    }

    out
}

/// Map a quoteSummary result onto the ratio profile.
fn profile_from_summary(result: YahooQuoteSummaryResult) -> FundamentalsProfile {
    let detail = result.summary_detail.as_ref();
    let stats = result.default_key_statistics.as_ref();
    let financial = result.financial_data.as_ref();

    FundamentalsProfile {
        trailing_pe: detail
            .and_then(|d| d.trailing_pe.as_ref())
            .and_then(|v| v.raw),
        forward_pe: detail
            .and_then(|d| d.forward_pe.as_ref())
            .and_then(|v| v.raw)
            .or_else(|| stats.and_then(|s| s.forward_pe.as_ref()).and_then(|v| v.raw)),
        peg_ratio: stats.and_then(|s| s.peg_ratio.as_ref()).and_then(|v| v.raw),
        debt_to_equity: financial
            .and_then(|f| f.debt_to_equity.as_ref())
            .and_then(|v| v.raw),
        market_cap: detail
            .and_then(|d| d.market_cap.as_ref())
            .and_then(|v| v.raw),
    }
}

/// Decode the observations stored under `key` in a timeseries result.
fn series_points(result: &YahooTimeseriesResult, key: &str) -> Vec<AnnualValue> {
    let Some(raw) = result.series.get(key) else {
        return Vec::new();
    };

    let points: Vec<Option<YahooTimeseriesPoint>> = match serde_json::from_value(raw.clone()) {
        Ok(points) => points,
        Err(e) => {
            warn!("Unparseable {} series: {}", key, e);
            return Vec::new();
        }
    };

    points
        .into_iter()
        .flatten()
        .filter_map(|p| {
            let as_of = p
                .as_of_date
                .as_deref()
                .and_then(|d| NaiveDate::parse_from_str(d, "%Y-%m-%d").ok())?;
            let value = p.reported_value.and_then(|v| v.raw)?;
            Some(AnnualValue { as_of, value })
        })
        .collect()
}

/// Split a timeseries response into revenue and net-income series.
fn financials_from_timeseries(data: YahooTimeseriesResponse) -> FinancialHistory {
    let mut revenue = Vec::new();
    let mut net_income = Vec::new();

    for result in data.timeseries.result.unwrap_or_default() {
        match result.meta.series_type.first().map(String::as_str) {
            Some(REVENUE_SERIES) => revenue = series_points(&result, REVENUE_SERIES),
            Some(NET_INCOME_SERIES) => net_income = series_points(&result, NET_INCOME_SERIES),
            _ => {}
        }
    }

    FinancialHistory::new(revenue, net_income)
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_spark_to_candles() {
        let json = r#"{
            "spark": {
                "result": [
                    {
                        "symbol": "RELIANCE.NS",
                        "response": [{
                            "timestamp": [1755225000, 1755311400, 1755397800],
                            "indicators": {"quote": [{"close": [1401.5, null, 1410.0]}]}
                        }]
                    },
                    {
                        "symbol": "BADSYM.NS",
                        "response": [{
                            "timestamp": [],
                            "indicators": {"quote": [{"close": []}]}
                        }]
                    }
                ]
            }
        }"#;
        let data: YahooSparkResponse = serde_json::from_str(json).unwrap();
        let candles = spark_to_candles(data);

        assert_eq!(candles.len(), 1);
        let series = &candles["RELIANCE.NS"];
        assert_eq!(series.len(), 2);
        assert_eq!(series[0].close, dec!(1401.5));
        assert_eq!(series[1].close, dec!(1410.0));
        assert!(series[0].open.is_none());
    }

    #[test]
    fn test_spark_missing_symbol_absent_from_map() {
        let json = r#"{"spark": {"result": [{"symbol": "NOPE.NS", "response": null}]}}"#;
        let data: YahooSparkResponse = serde_json::from_str(json).unwrap();
        let candles = spark_to_candles(data);
        assert!(candles.is_empty());
    }

    #[test]
    fn test_profile_from_summary_prefers_trailing_pe() {
        let json = r#"{
            "summaryDetail": {
                "trailingPE": {"raw": 27.4},
                "forwardPE": {"raw": 24.1},
                "marketCap": {"raw": 1.7e12}
            },
            "defaultKeyStatistics": {"pegRatio": {"raw": 1.8}, "forwardPE": {"raw": 23.0}},
            "financialData": {"debtToEquity": {"raw": 41.2}}
        }"#;
        let result: YahooQuoteSummaryResult = serde_json::from_str(json).unwrap();
        let profile = profile_from_summary(result);

        assert_eq!(profile.trailing_pe, Some(27.4));
        assert_eq!(profile.forward_pe, Some(24.1));
        assert_eq!(profile.peg_ratio, Some(1.8));
        assert_eq!(profile.debt_to_equity, Some(41.2));
        assert_eq!(profile.market_cap, Some(1.7e12));
    }

    #[test]
    fn test_profile_forward_pe_falls_back_to_key_statistics() {
        let json = r#"{
            "summaryDetail": {"marketCap": {"raw": 5.0e10}},
            "defaultKeyStatistics": {"forwardPE": {"raw": 19.5}},
            "financialData": {}
        }"#;
        let result: YahooQuoteSummaryResult = serde_json::from_str(json).unwrap();
        let profile = profile_from_summary(result);

        assert_eq!(profile.trailing_pe, None);
        assert_eq!(profile.forward_pe, Some(19.5));
        assert_eq!(profile.peg_ratio, None);
    }

    #[test]
    fn test_financials_from_timeseries() {
        let json = r#"{
            "timeseries": {
                "result": [
                    {
                        "meta": {"symbol": ["X.NS"], "type": ["annualTotalRevenue"]},
                        "timestamp": [1617148800, 1648684800],
                        "annualTotalRevenue": [
                            {"asOfDate": "2021-03-31", "reportedValue": {"raw": 100.0}},
                            {"asOfDate": "2022-03-31", "reportedValue": {"raw": 110.0}}
                        ]
                    },
                    {
                        "meta": {"symbol": ["X.NS"], "type": ["annualNetIncomeCommonStockholders"]},
                        "timestamp": [1617148800, 1648684800],
                        "annualNetIncomeCommonStockholders": [
                            {"asOfDate": "2021-03-31", "reportedValue": {"raw": 10.0}},
                            null
                        ]
                    }
                ]
            }
        }"#;
        let data: YahooTimeseriesResponse = serde_json::from_str(json).unwrap();
        let history = financials_from_timeseries(data);

        // Most recent first after FinancialHistory::new
        let revenue: Vec<f64> = history.revenue.iter().map(|v| v.value).collect();
        assert_eq!(revenue, vec![110.0, 100.0]);

        assert_eq!(history.net_income.len(), 1);
        assert_eq!(history.net_income[0].value, 10.0);
    }

    #[test]
    fn test_financials_empty_response() {
        let json = r#"{"timeseries": {"result": null}}"#;
        let data: YahooTimeseriesResponse = serde_json::from_str(json).unwrap();
        let history = financials_from_timeseries(data);
        assert!(history.revenue.is_empty());
        assert!(history.net_income.is_empty());
    }
}
