use crate::errors::Result;
use crate::portfolios::portfolios_model::{NewPortfolio, Portfolio};
use async_trait::async_trait;

/// Trait for portfolio repository operations
#[async_trait]
pub trait PortfolioRepositoryTrait: Send + Sync {
    fn list(&self) -> Result<Vec<Portfolio>>;
    fn get_by_id(&self, portfolio_id: &str) -> Result<Portfolio>;
    async fn create(&self, new_portfolio: NewPortfolio) -> Result<Portfolio>;
    async fn rename(&self, portfolio_id: String, name: String) -> Result<Portfolio>;
    /// Deletes the portfolio and all of its holdings in one write.
    async fn delete(&self, portfolio_id: String) -> Result<usize>;
}

/// Trait for portfolio service operations
#[async_trait]
pub trait PortfolioServiceTrait: Send + Sync {
    fn get_portfolios(&self) -> Result<Vec<Portfolio>>;
    fn get_portfolio(&self, portfolio_id: &str) -> Result<Portfolio>;
    async fn create_portfolio(&self, new_portfolio: NewPortfolio) -> Result<Portfolio>;
    async fn rename_portfolio(&self, portfolio_id: String, name: String) -> Result<Portfolio>;
    async fn delete_portfolio(&self, portfolio_id: String) -> Result<usize>;
}
