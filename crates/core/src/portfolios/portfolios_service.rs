use log::debug;
use std::sync::Arc;

use super::portfolios_model::{NewPortfolio, Portfolio};
use super::portfolios_traits::{PortfolioRepositoryTrait, PortfolioServiceTrait};
use crate::errors::{Result, ValidationError};

/// Service for managing portfolios
pub struct PortfolioService {
    repository: Arc<dyn PortfolioRepositoryTrait>,
}

impl PortfolioService {
    /// Creates a new PortfolioService instance
    pub fn new(repository: Arc<dyn PortfolioRepositoryTrait>) -> Self {
        Self { repository }
    }
}

#[async_trait::async_trait]
impl PortfolioServiceTrait for PortfolioService {
    fn get_portfolios(&self) -> Result<Vec<Portfolio>> {
        self.repository.list()
    }

    fn get_portfolio(&self, portfolio_id: &str) -> Result<Portfolio> {
        self.repository.get_by_id(portfolio_id)
    }

    async fn create_portfolio(&self, new_portfolio: NewPortfolio) -> Result<Portfolio> {
        if new_portfolio.name.trim().is_empty() {
            return Err(ValidationError::MissingField("name".to_string()).into());
        }
        debug!("Creating portfolio '{}'", new_portfolio.name);
        self.repository.create(new_portfolio).await
    }

    async fn rename_portfolio(&self, portfolio_id: String, name: String) -> Result<Portfolio> {
        if name.trim().is_empty() {
            return Err(ValidationError::MissingField("name".to_string()).into());
        }
        self.repository.rename(portfolio_id, name).await
    }

    async fn delete_portfolio(&self, portfolio_id: String) -> Result<usize> {
        debug!("Deleting portfolio {} and its holdings", portfolio_id);
        self.repository.delete(portfolio_id).await
    }
}
