//! The enrichment engine: decides which tickers need fresh data, fetches it
//! in one batch (with a per-ticker fallback), resolves a display price per
//! holding through the three-tier order (cache, persisted snapshot, none),
//! and writes refreshed prices back to the store best-effort.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use log::{debug, error, warn};
use rust_decimal::Decimal;

use foliotrack_market_data::{Candle, FailureClass, HistoryRange};

use super::cache::{FundamentalsCache, PriceCache, PriceTick};
use super::enrichment_model::{EnrichedHolding, EnrichedHoldings, FundamentalRatios};
use super::market_hours;
use super::rules;
use crate::constants::{FUNDAMENTALS_CACHE_TTL, HISTORY_WINDOW_DAYS, PRICE_CACHE_TTL};
use crate::errors::{Error, Result};
use crate::holdings::{Holding, HoldingRepositoryTrait, HoldingSnapshot};
use crate::market_data::MarketDataClient;

/// Trait for the holdings enrichment read path.
#[async_trait]
pub trait HoldingsEnrichmentServiceTrait: Send + Sync {
    /// Enriches the given holdings with market data.
    ///
    /// Never fails: on total market-data failure the holdings come back
    /// with defaulted computed fields.
    async fn enrich(&self, holdings: Vec<Holding>) -> EnrichedHoldings;
}

/// Service implementing the enrichment read path.
///
/// Owns the two process-local caches; they live as long as the service and
/// are not shared across process instances. Concurrent requests may race on
/// a ticker's cache entry (last writer wins) - entries are idempotent
/// snapshots, so no locking beyond the map's own.
pub struct HoldingsEnrichmentService {
    client: Arc<MarketDataClient>,
    repository: Arc<dyn HoldingRepositoryTrait>,
    pub(crate) price_cache: PriceCache,
    pub(crate) fundamentals_cache: FundamentalsCache,
}

impl HoldingsEnrichmentService {
    /// Creates a new enrichment service with empty caches.
    pub fn new(client: Arc<MarketDataClient>, repository: Arc<dyn HoldingRepositoryTrait>) -> Self {
        Self {
            client,
            repository,
            price_cache: PriceCache::new(),
            fundamentals_cache: FundamentalsCache::new(),
        }
    }

    /// Enrichment pinned to an explicit instant, for testability.
    pub(crate) async fn enrich_at(
        &self,
        holdings: Vec<Holding>,
        now: DateTime<Utc>,
    ) -> EnrichedHoldings {
        let is_open = market_hours::is_market_open_at(now);

        let to_fetch = self.tickers_needing_fetch(&holdings, is_open);
        let refreshed = self.refresh_prices(to_fetch).await;

        let mut enriched = Vec::with_capacity(holdings.len());
        let mut snapshots: Vec<HoldingSnapshot> = Vec::new();
        let mut ratios_by_ticker: HashMap<String, FundamentalRatios> = HashMap::new();

        for holding in holdings {
            let mut out = EnrichedHolding::defaulted(holding);

            if let Some(ticker) = out.holding.ticker.clone() {
                // Fundamentals attach independently of price freshness.
                let ratios = match ratios_by_ticker.get(&ticker) {
                    Some(ratios) => ratios.clone(),
                    None => {
                        let ratios = self.ratios_for(&ticker).await;
                        ratios_by_ticker.insert(ticker.clone(), ratios.clone());
                        ratios
                    }
                };
                out.fundamentals = ratios;

                // Three-tier price resolution: usable cache entry, then the
                // persisted snapshot, then nothing.
                let usable = self
                    .price_cache
                    .get(&ticker)
                    .filter(|(_, age)| !is_open || *age < PRICE_CACHE_TTL);
                if let Some((tick, _)) = usable {
                    out.current_price = Some(tick.price);
                    out.day_change_amount = Some(tick.day_change_amount);
                    out.day_change_percent = Some(tick.day_change_percent);

                    if refreshed.contains(&ticker) {
                        snapshots.push(HoldingSnapshot {
                            portfolio_id: out.holding.portfolio_id.clone(),
                            isin: out.holding.isin.clone(),
                            last_price: tick.price,
                            last_day_change_amount: tick.day_change_amount,
                            last_day_change_percent: tick.day_change_percent,
                            market_data_updated_at: now,
                        });
                    }
                } else if let Some(last_price) = out.holding.last_price {
                    out.current_price = Some(last_price);
                    out.day_change_amount = out.holding.last_day_change_amount;
                    out.day_change_percent = out.holding.last_day_change_percent;
                    out.is_cached = true;
                }
            }

            if let Some(current_price) = out.current_price {
                let buy_price = out.holding.average_buy_price;
                if buy_price > Decimal::ZERO {
                    out.total_return_percent =
                        Some((current_price - buy_price) / buy_price * Decimal::from(100));
                }
                let (state, reason) = rules::evaluate(
                    current_price,
                    out.holding.target,
                    out.holding.stop_loss,
                    out.total_return_percent,
                );
                out.state = state;
                out.state_reason = reason;
            }

            enriched.push(out);
        }

        if !snapshots.is_empty() {
            // Best-effort write-back; the response carries the in-memory
            // results either way.
            if let Err(e) = self.repository.save_snapshots(snapshots).await {
                error!("Snapshot write-back failed: {}", e);
            }
        }

        EnrichedHoldings {
            holdings: enriched,
            is_market_open: is_open,
        }
    }

    /// Distinct tickers whose cached price is no longer usable.
    fn tickers_needing_fetch(&self, holdings: &[Holding], is_open: bool) -> Vec<String> {
        let mut seen = HashSet::new();
        let mut to_fetch = Vec::new();
        for holding in holdings {
            let Some(ticker) = &holding.ticker else {
                continue;
            };
            let needs_fetch = match (self.price_cache.get(ticker), is_open) {
                (Some((_, age)), true) => age >= PRICE_CACHE_TTL,
                // Closed market: any cached price is usable indefinitely.
                (Some(_), false) => false,
                (None, true) => true,
                // Closed market with no cache: only fetch when there is no
                // persisted price at all.
                (None, false) => holding.last_price.is_none(),
            };
            if needs_fetch && seen.insert(ticker.clone()) {
                to_fetch.push(ticker.clone());
            }
        }
        to_fetch
    }

    /// Fetches fresh prices for the given tickers and updates the price
    /// cache. Returns the set of tickers actually refreshed.
    ///
    /// One batched call covers the whole set; a ticker absent from the
    /// batch result gets exactly one individual attempt before being given
    /// up on for this cycle.
    async fn refresh_prices(&self, tickers: Vec<String>) -> HashSet<String> {
        let mut refreshed = HashSet::new();
        if tickers.is_empty() {
            return refreshed;
        }

        let range = HistoryRange::days(HISTORY_WINDOW_DAYS);
        let mut batch = match self.client.batch_history(&tickers, range).await {
            Ok(batch) => batch,
            Err(e) => {
                warn!("Batch price fetch failed: {}", e);
                HashMap::new()
            }
        };

        for ticker in tickers {
            let candles = match batch.remove(&ticker) {
                Some(candles) => candles,
                None => match self.client.history(&ticker, range).await {
                    Ok(candles) => candles,
                    // A symbol the source simply does not know is expected
                    // (delistings, stale tickers); only transient and
                    // permanent failures are worth a warning.
                    Err(Error::MarketData(e))
                        if e.failure_class() == FailureClass::NoData =>
                    {
                        debug!("Quote source has no data for {}: {}", ticker, e);
                        continue;
                    }
                    Err(e) => {
                        warn!("No price data for {} this cycle: {}", ticker, e);
                        continue;
                    }
                },
            };
            if let Some(tick) = tick_from_candles(&candles) {
                self.price_cache.put(&ticker, tick);
                refreshed.insert(ticker);
            }
        }
        refreshed
    }

    /// Fundamentals for one ticker, served from the long-TTL cache.
    ///
    /// A failed fetch yields (and caches) an all-null ratio set, trading a
    /// day of missing ratios against hammering a failing endpoint.
    async fn ratios_for(&self, ticker: &str) -> FundamentalRatios {
        if let Some((ratios, age)) = self.fundamentals_cache.get(ticker) {
            if age < FUNDAMENTALS_CACHE_TTL {
                return ratios;
            }
        }

        let ratios = match self.fetch_ratios(ticker).await {
            Ok(ratios) => ratios,
            Err(e) => {
                warn!("Fundamentals fetch failed for {}: {}", ticker, e);
                FundamentalRatios::default()
            }
        };
        self.fundamentals_cache.put(ticker, ratios.clone());
        ratios
    }

    async fn fetch_ratios(&self, ticker: &str) -> Result<FundamentalRatios> {
        let profile = self.client.fundamentals(ticker).await?;
        let financials = self.client.financials(ticker).await?;
        debug!(
            "Fetched fundamentals for {} ({} revenue years)",
            ticker,
            financials.revenue.len()
        );
        Ok(FundamentalRatios::derive(&profile, &financials))
    }
}

/// Derives a price tick from ascending candles.
///
/// Day change is latest close minus previous close, zero with a single
/// session; the percentage is guarded against a zero previous close.
fn tick_from_candles(candles: &[Candle]) -> Option<PriceTick> {
    let latest = candles.last()?;
    let price = latest.close;

    let (day_change_amount, day_change_percent) = match candles.len().checked_sub(2) {
        Some(prev_idx) => {
            let previous_close = candles[prev_idx].close;
            let amount = price - previous_close;
            let percent = if previous_close.is_zero() {
                Decimal::ZERO
            } else {
                amount / previous_close * Decimal::from(100)
            };
            (amount, percent)
        }
        None => (Decimal::ZERO, Decimal::ZERO),
    };

    Some(PriceTick {
        price,
        day_change_amount,
        day_change_percent,
    })
}

#[async_trait]
impl HoldingsEnrichmentServiceTrait for HoldingsEnrichmentService {
    async fn enrich(&self, holdings: Vec<Holding>) -> EnrichedHoldings {
        self.enrich_at(holdings, Utc::now()).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use rust_decimal_macros::dec;

    fn candle(close: Decimal) -> Candle {
        Candle::new(Utc.with_ymd_and_hms(2025, 8, 25, 10, 0, 0).unwrap(), close)
    }

    #[test]
    fn test_tick_from_two_sessions() {
        let tick = tick_from_candles(&[candle(dec!(100)), candle(dec!(110))]).unwrap();
        assert_eq!(tick.price, dec!(110));
        assert_eq!(tick.day_change_amount, dec!(10));
        assert_eq!(tick.day_change_percent, dec!(10));
    }

    #[test]
    fn test_tick_from_single_session() {
        let tick = tick_from_candles(&[candle(dec!(100))]).unwrap();
        assert_eq!(tick.price, dec!(100));
        assert_eq!(tick.day_change_amount, dec!(0));
        assert_eq!(tick.day_change_percent, dec!(0));
    }

    #[test]
    fn test_tick_zero_previous_close_guard() {
        let tick = tick_from_candles(&[candle(dec!(0)), candle(dec!(5))]).unwrap();
        assert_eq!(tick.day_change_amount, dec!(5));
        assert_eq!(tick.day_change_percent, dec!(0));
    }

    #[test]
    fn test_tick_empty_candles() {
        assert!(tick_from_candles(&[]).is_none());
    }
}
