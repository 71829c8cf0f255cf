//! Yahoo Finance API response models.
//!
//! These models parse the quoteSummary, spark, and fundamentals-timeseries
//! payloads, which carry richer data than the standard chart endpoints.

use std::collections::HashMap;

use serde::Deserialize;

/// Numeric leaf; Yahoo nests values as {"raw": 123.45, "fmt": "123.45"}
/// or an empty object {} when no data is available. Only `raw` is used.
#[derive(Debug, Deserialize, Clone)]
pub struct YahooRawValue {
    pub raw: Option<f64>,
}

// ============================================================================
// quoteSummary
// ============================================================================

/// Main response wrapper for the quoteSummary API
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct YahooQuoteSummaryResponse {
    pub quote_summary: YahooQuoteSummary,
}

/// Quote summary container
#[derive(Debug, Deserialize)]
pub struct YahooQuoteSummary {
    pub result: Vec<YahooQuoteSummaryResult>,
    // Note: error field exists in the API but errors are handled via HTTP
    // status / empty results
}

/// Individual result from the quoteSummary API
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct YahooQuoteSummaryResult {
    pub summary_detail: Option<YahooSummaryDetail>,
    pub default_key_statistics: Option<YahooKeyStatistics>,
    pub financial_data: Option<YahooFinancialData>,
}

/// Valuation figures from the summaryDetail module
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct YahooSummaryDetail {
    #[serde(rename = "trailingPE")]
    pub trailing_pe: Option<YahooRawValue>,
    #[serde(rename = "forwardPE")]
    pub forward_pe: Option<YahooRawValue>,
    pub market_cap: Option<YahooRawValue>,
}

/// Statistics from the defaultKeyStatistics module
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct YahooKeyStatistics {
    pub peg_ratio: Option<YahooRawValue>,
    #[serde(rename = "forwardPE")]
    pub forward_pe: Option<YahooRawValue>,
}

/// Ratios from the financialData module
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct YahooFinancialData {
    pub debt_to_equity: Option<YahooRawValue>,
}

// ============================================================================
// spark (batched close-only history)
// ============================================================================

/// Main response wrapper for the spark API
#[derive(Debug, Deserialize)]
pub struct YahooSparkResponse {
    pub spark: YahooSparkEnvelope,
}

/// Spark result container
#[derive(Debug, Deserialize)]
pub struct YahooSparkEnvelope {
    pub result: Option<Vec<YahooSparkSymbol>>,
}

/// Per-symbol entry in a spark response
#[derive(Debug, Deserialize)]
pub struct YahooSparkSymbol {
    pub symbol: String,
    pub response: Option<Vec<YahooSparkChart>>,
}

/// One chart series inside a spark symbol entry
#[derive(Debug, Deserialize)]
pub struct YahooSparkChart {
    pub timestamp: Option<Vec<i64>>,
    pub indicators: Option<YahooSparkIndicators>,
}

/// Indicator block carrying the close series
#[derive(Debug, Deserialize)]
pub struct YahooSparkIndicators {
    pub quote: Vec<YahooSparkQuote>,
}

/// Close series; holidays and halts appear as nulls
#[derive(Debug, Deserialize)]
pub struct YahooSparkQuote {
    pub close: Option<Vec<Option<f64>>>,
}

// ============================================================================
// fundamentals-timeseries (annual statements)
// ============================================================================

/// Main response wrapper for the fundamentals-timeseries API
#[derive(Debug, Deserialize)]
pub struct YahooTimeseriesResponse {
    pub timeseries: YahooTimeseriesEnvelope,
}

/// Timeseries result container
#[derive(Debug, Deserialize)]
pub struct YahooTimeseriesEnvelope {
    pub result: Option<Vec<YahooTimeseriesResult>>,
}

/// One series in a timeseries response.
///
/// The observations live under a key named after the requested type
/// (e.g. "annualTotalRevenue"), so they are captured as raw JSON and
/// decoded once the key is known from `meta`.
#[derive(Debug, Deserialize)]
pub struct YahooTimeseriesResult {
    pub meta: YahooTimeseriesMeta,
    #[serde(flatten)]
    pub series: HashMap<String, serde_json::Value>,
}

/// Metadata identifying a timeseries entry
#[derive(Debug, Deserialize)]
pub struct YahooTimeseriesMeta {
    #[serde(rename = "type")]
    pub series_type: Vec<String>,
}

/// One observation in an annual statement series
#[derive(Debug, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct YahooTimeseriesPoint {
    pub as_of_date: Option<String>,
    pub reported_value: Option<YahooRawValue>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_raw_value() {
        let json = r#"{"raw": 150.25, "fmt": "150.25"}"#;
        let value: YahooRawValue = serde_json::from_str(json).unwrap();
        assert_eq!(value.raw, Some(150.25));
    }

    #[test]
    fn test_deserialize_raw_value_empty_object() {
        let json = r#"{}"#;
        let value: YahooRawValue = serde_json::from_str(json).unwrap();
        assert_eq!(value.raw, None);
    }

    #[test]
    fn test_deserialize_summary_detail_pe_keys() {
        let json = r#"{
            "trailingPE": {"raw": 27.4, "fmt": "27.40"},
            "forwardPE": {"raw": 24.1, "fmt": "24.10"},
            "marketCap": {"raw": 1.7e12, "fmt": "1.7T"}
        }"#;
        let detail: YahooSummaryDetail = serde_json::from_str(json).unwrap();
        assert_eq!(detail.trailing_pe.unwrap().raw, Some(27.4));
        assert_eq!(detail.forward_pe.unwrap().raw, Some(24.1));
        assert_eq!(detail.market_cap.unwrap().raw, Some(1.7e12));
    }

    #[test]
    fn test_deserialize_spark_symbol() {
        let json = r#"{
            "symbol": "RELIANCE.NS",
            "response": [{
                "timestamp": [1755225000, 1755311400],
                "indicators": {"quote": [{"close": [1401.5, null]}]}
            }]
        }"#;
        let entry: YahooSparkSymbol = serde_json::from_str(json).unwrap();
        assert_eq!(entry.symbol, "RELIANCE.NS");
        let chart = &entry.response.unwrap()[0];
        assert_eq!(chart.timestamp.as_ref().unwrap().len(), 2);
        let closes = chart.indicators.as_ref().unwrap().quote[0]
            .close
            .as_ref()
            .unwrap();
        assert_eq!(closes[0], Some(1401.5));
        assert_eq!(closes[1], None);
    }

    #[test]
    fn test_deserialize_timeseries_result() {
        let json = r#"{
            "meta": {"symbol": ["RELIANCE.NS"], "type": ["annualTotalRevenue"]},
            "timestamp": [1680220800],
            "annualTotalRevenue": [
                {"asOfDate": "2023-03-31", "reportedValue": {"raw": 8.9e12, "fmt": "8.9T"}},
                null
            ]
        }"#;
        let result: YahooTimeseriesResult = serde_json::from_str(json).unwrap();
        assert_eq!(result.meta.series_type, vec!["annualTotalRevenue"]);

        let points: Vec<Option<YahooTimeseriesPoint>> =
            serde_json::from_value(result.series["annualTotalRevenue"].clone()).unwrap();
        assert_eq!(points.len(), 2);
        let first = points[0].as_ref().unwrap();
        assert_eq!(first.as_of_date.as_deref(), Some("2023-03-31"));
        assert_eq!(first.reported_value.as_ref().unwrap().raw, Some(8.9e12));
        assert!(points[1].is_none());
    }
}
