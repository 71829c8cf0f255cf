use crate::discovery::discovery_model::DiscoveryOutcome;
use crate::errors::Result;
use async_trait::async_trait;

/// Trait for ticker discovery operations
#[async_trait]
pub trait TickerDiscoveryServiceTrait: Send + Sync {
    /// Resolves a best-guess exchange ticker for one holding.
    async fn resolve(&self, code: &str, name: &str) -> Option<String>;
    /// Resolves and persists tickers for every holding in the portfolio
    /// that lacks one.
    async fn discover_all(&self, portfolio_id: &str) -> Result<DiscoveryOutcome>;
}
