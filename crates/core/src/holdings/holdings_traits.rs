use crate::errors::Result;
use crate::holdings::holdings_model::{
    Holding, HoldingSettingsUpdate, HoldingSnapshot, HoldingUpsert, NewHolding,
};
use async_trait::async_trait;

/// Trait for holding repository operations
#[async_trait]
pub trait HoldingRepositoryTrait: Send + Sync {
    fn list_by_portfolio(&self, portfolio_id: &str) -> Result<Vec<Holding>>;
    async fn add(&self, new_holding: NewHolding) -> Result<Holding>;
    /// Upserts rows keyed by (portfolio_id, isin); returns the row count.
    async fn upsert_many(&self, rows: Vec<HoldingUpsert>) -> Result<usize>;
    async fn update_settings(&self, update: HoldingSettingsUpdate) -> Result<Holding>;
    async fn set_ticker(&self, portfolio_id: String, isin: String, ticker: String) -> Result<()>;
    async fn delete_bulk(&self, portfolio_id: String, isins: Vec<String>) -> Result<usize>;
    /// Updates only the snapshot columns of the named holdings.
    async fn save_snapshots(&self, snapshots: Vec<HoldingSnapshot>) -> Result<usize>;
}

/// Trait for holding service operations
#[async_trait]
pub trait HoldingServiceTrait: Send + Sync {
    fn get_holdings(&self, portfolio_id: &str) -> Result<Vec<Holding>>;
    async fn add_holding(&self, new_holding: NewHolding) -> Result<Holding>;
    async fn update_settings(&self, update: HoldingSettingsUpdate) -> Result<Holding>;
    async fn delete_holdings(&self, portfolio_id: String, isins: Vec<String>) -> Result<usize>;
}
