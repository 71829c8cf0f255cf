//! Best-guess ticker resolution through the provider's symbol search.

use std::sync::Arc;

use async_trait::async_trait;
use log::{debug, info, warn};

use foliotrack_market_data::SymbolMatch;

use super::discovery_model::DiscoveryOutcome;
use super::discovery_traits::TickerDiscoveryServiceTrait;
use crate::constants::DISCOVERY_PACING;
use crate::errors::Result;
use crate::holdings::HoldingRepositoryTrait;
use crate::market_data::MarketDataClient;

/// Exchange suffix preferred when a search returns several listings.
const PREFERRED_SUFFIX: &str = ".NS";

/// Corporate-suffix tokens stripped from a stock name before the name-based
/// retry.
const NAME_NOISE_TOKENS: [&str; 3] = ["LIMITED", "LTD", "LTD."];

pub struct TickerDiscoveryService {
    client: Arc<MarketDataClient>,
    repository: Arc<dyn HoldingRepositoryTrait>,
}

impl TickerDiscoveryService {
    pub fn new(client: Arc<MarketDataClient>, repository: Arc<dyn HoldingRepositoryTrait>) -> Self {
        Self { client, repository }
    }

    /// One search attempt. Errors and empty result sets both come back as
    /// `None`; the caller decides whether to retry with a different query.
    async fn search_once(&self, query: &str) -> Option<String> {
        let matches = match self.client.search(query).await {
            Ok(matches) => matches,
            Err(e) => {
                warn!("Symbol search failed for '{}': {}", query, e);
                return None;
            }
        };
        pick_symbol(&matches)
    }
}

/// Prefers the first match on the national exchange, else the first match.
fn pick_symbol(matches: &[SymbolMatch]) -> Option<String> {
    matches
        .iter()
        .find(|m| m.symbol.ends_with(PREFERRED_SUFFIX))
        .or_else(|| matches.first())
        .map(|m| m.symbol.clone())
}

/// Drops corporate-suffix tokens from a stock name, case-insensitively.
fn clean_name(name: &str) -> String {
    name.split_whitespace()
        .filter(|word| {
            let upper = word.to_uppercase();
            !NAME_NOISE_TOKENS.contains(&upper.as_str())
        })
        .collect::<Vec<_>>()
        .join(" ")
}

#[async_trait]
impl TickerDiscoveryServiceTrait for TickerDiscoveryService {
    async fn resolve(&self, code: &str, name: &str) -> Option<String> {
        if let Some(symbol) = self.search_once(code).await {
            return Some(symbol);
        }
        let cleaned = clean_name(name);
        if cleaned.is_empty() {
            return None;
        }
        self.search_once(&cleaned).await
    }

    async fn discover_all(&self, portfolio_id: &str) -> Result<DiscoveryOutcome> {
        let missing: Vec<_> = self
            .repository
            .list_by_portfolio(portfolio_id)?
            .into_iter()
            .filter(|h| h.ticker.is_none())
            .collect();

        let total = missing.len();
        let mut updated = 0;
        for (i, holding) in missing.into_iter().enumerate() {
            if i > 0 {
                // Stay polite to the search endpoint.
                tokio::time::sleep(DISCOVERY_PACING).await;
            }
            match self.resolve(&holding.isin, &holding.stock_name).await {
                Some(ticker) => {
                    debug!("Resolved {} -> {}", holding.isin, ticker);
                    self.repository
                        .set_ticker(holding.portfolio_id, holding.isin, ticker)
                        .await?;
                    updated += 1;
                }
                None => {
                    debug!("No ticker found for {} ({})", holding.isin, holding.stock_name);
                }
            }
        }

        info!(
            "Ticker discovery for portfolio {}: {}/{} resolved",
            portfolio_id, updated, total
        );
        Ok(DiscoveryOutcome { updated, total })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::sync::Mutex;

    use foliotrack_market_data::{
        Candle, FinancialHistory, FundamentalsProfile, HistoryRange, MarketDataError,
        MarketDataProvider,
    };

    use crate::holdings::{
        Holding, HoldingSettingsUpdate, HoldingSnapshot, HoldingUpsert, NewHolding,
    };
    use chrono::Utc;
    use rust_decimal::Decimal;

    /// Search-only provider scripted per query; unknown queries error.
    #[derive(Default)]
    struct SearchScript {
        results: HashMap<String, Vec<SymbolMatch>>,
        queries: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl MarketDataProvider for SearchScript {
        fn id(&self) -> &'static str {
            "SEARCH_SCRIPT"
        }

        async fn history(
            &self,
            symbol: &str,
            _range: HistoryRange,
        ) -> std::result::Result<Vec<Candle>, MarketDataError> {
            Err(MarketDataError::SymbolNotFound(symbol.to_string()))
        }

        async fn batch_history(
            &self,
            _symbols: &[String],
            _range: HistoryRange,
        ) -> std::result::Result<HashMap<String, Vec<Candle>>, MarketDataError> {
            Ok(HashMap::new())
        }

        async fn search(
            &self,
            query: &str,
        ) -> std::result::Result<Vec<SymbolMatch>, MarketDataError> {
            self.queries.lock().unwrap().push(query.to_string());
            self.results
                .get(query)
                .cloned()
                .ok_or_else(|| MarketDataError::ProviderError {
                    provider: "SEARCH_SCRIPT".to_string(),
                    message: "search unavailable".to_string(),
                })
        }

        async fn fundamentals(
            &self,
            symbol: &str,
        ) -> std::result::Result<FundamentalsProfile, MarketDataError> {
            Err(MarketDataError::SymbolNotFound(symbol.to_string()))
        }

        async fn financials(
            &self,
            symbol: &str,
        ) -> std::result::Result<FinancialHistory, MarketDataError> {
            Err(MarketDataError::SymbolNotFound(symbol.to_string()))
        }
    }

    #[derive(Default)]
    struct TickerStore {
        holdings: Vec<Holding>,
        set: Mutex<Vec<(String, String)>>,
    }

    #[async_trait]
    impl HoldingRepositoryTrait for TickerStore {
        fn list_by_portfolio(&self, _portfolio_id: &str) -> Result<Vec<Holding>> {
            Ok(self.holdings.clone())
        }

        async fn add(&self, _new_holding: NewHolding) -> Result<Holding> {
            unimplemented!("not exercised by discovery")
        }

        async fn upsert_many(&self, _rows: Vec<HoldingUpsert>) -> Result<usize> {
            Ok(0)
        }

        async fn update_settings(&self, _update: HoldingSettingsUpdate) -> Result<Holding> {
            unimplemented!("not exercised by discovery")
        }

        async fn set_ticker(
            &self,
            _portfolio_id: String,
            isin: String,
            ticker: String,
        ) -> Result<()> {
            self.set.lock().unwrap().push((isin, ticker));
            Ok(())
        }

        async fn delete_bulk(&self, _portfolio_id: String, _isins: Vec<String>) -> Result<usize> {
            Ok(0)
        }

        async fn save_snapshots(&self, _snapshots: Vec<HoldingSnapshot>) -> Result<usize> {
            Ok(0)
        }
    }

    fn holding(isin: &str, name: &str, ticker: Option<&str>) -> Holding {
        Holding {
            portfolio_id: "p1".to_string(),
            isin: isin.to_string(),
            stock_name: name.to_string(),
            ticker: ticker.map(String::from),
            quantity: 1,
            average_buy_price: Decimal::from(100),
            target: None,
            stop_loss: None,
            date_of_exit: None,
            last_price: None,
            last_day_change_amount: None,
            last_day_change_percent: None,
            market_data_updated_at: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn service(
        provider: SearchScript,
        store: TickerStore,
    ) -> (Arc<SearchScript>, Arc<TickerStore>, TickerDiscoveryService) {
        let provider = Arc::new(provider);
        let store = Arc::new(store);
        let client = Arc::new(MarketDataClient::new(provider.clone()));
        let service = TickerDiscoveryService::new(client, store.clone());
        (provider, store, service)
    }

    #[tokio::test]
    async fn test_resolve_by_code() {
        let mut provider = SearchScript::default();
        provider.results.insert(
            "INE002A01018".to_string(),
            vec![SymbolMatch::new(
                "RELIANCE.NS",
                "Reliance Industries",
                "NSI",
                "EQUITY",
            )],
        );
        let (_, _, service) = service(provider, TickerStore::default());

        let ticker = service.resolve("INE002A01018", "Reliance Industries").await;
        assert_eq!(ticker, Some("RELIANCE.NS".to_string()));
    }

    #[tokio::test]
    async fn test_resolve_retries_with_cleaned_name() {
        let mut provider = SearchScript::default();
        provider.results.insert("INE467B01029".to_string(), vec![]);
        provider.results.insert(
            "Tata Consultancy Services".to_string(),
            vec![SymbolMatch::new("TCS.NS", "TCS", "NSI", "EQUITY")],
        );
        let (provider, _, service) = service(provider, TickerStore::default());

        let ticker = service
            .resolve("INE467B01029", "Tata Consultancy Services Limited")
            .await;
        assert_eq!(ticker, Some("TCS.NS".to_string()));
        assert_eq!(
            *provider.queries.lock().unwrap(),
            vec!["INE467B01029", "Tata Consultancy Services"]
        );
    }

    #[tokio::test]
    async fn test_search_errors_resolve_to_none() {
        // Unknown queries make the scripted provider error on both attempts.
        let (_, _, service) = service(SearchScript::default(), TickerStore::default());
        assert_eq!(service.resolve("INE000A", "Anything Ltd").await, None);
    }

    #[tokio::test]
    async fn test_discover_all_persists_only_resolved() {
        let mut provider = SearchScript::default();
        provider.results.insert(
            "INE002A01018".to_string(),
            vec![SymbolMatch::new("RELIANCE.NS", "Reliance", "NSI", "EQUITY")],
        );
        let store = TickerStore {
            holdings: vec![
                holding("INE002A01018", "Reliance Industries", None),
                holding("INE467B01029", "TCS", None),
                holding("INE040A01034", "HDFC Bank", Some("HDFCBANK.NS")),
            ],
            ..Default::default()
        };
        let (_, store, service) = service(provider, store);

        let outcome = service.discover_all("p1").await.unwrap();
        assert_eq!(outcome, DiscoveryOutcome { updated: 1, total: 2 });
        assert_eq!(
            *store.set.lock().unwrap(),
            vec![("INE002A01018".to_string(), "RELIANCE.NS".to_string())]
        );
    }

    #[test]
    fn test_pick_prefers_national_exchange_listing() {
        let matches = vec![
            SymbolMatch::new("RELIANCE.BO", "Reliance Industries", "BSE", "EQUITY"),
            SymbolMatch::new("RELIANCE.NS", "Reliance Industries", "NSI", "EQUITY"),
        ];
        assert_eq!(pick_symbol(&matches), Some("RELIANCE.NS".to_string()));
    }

    #[test]
    fn test_pick_falls_back_to_first_match() {
        let matches = vec![
            SymbolMatch::new("RELIANCE.BO", "Reliance Industries", "BSE", "EQUITY"),
            SymbolMatch::new("RIGD.IL", "Reliance Industries GDR", "LSE", "EQUITY"),
        ];
        assert_eq!(pick_symbol(&matches), Some("RELIANCE.BO".to_string()));
    }

    #[test]
    fn test_pick_empty_is_none() {
        assert_eq!(pick_symbol(&[]), None);
    }

    #[test]
    fn test_clean_name_strips_corporate_suffixes() {
        assert_eq!(clean_name("Tata Motors Limited"), "Tata Motors");
        assert_eq!(clean_name("Infosys Ltd."), "Infosys");
        assert_eq!(clean_name("HDFC Bank LTD"), "HDFC Bank");
        assert_eq!(clean_name("Plain Name"), "Plain Name");
    }
}
