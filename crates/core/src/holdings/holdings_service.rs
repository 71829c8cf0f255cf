use log::debug;
use std::sync::Arc;

use super::holdings_model::{Holding, HoldingSettingsUpdate, NewHolding};
use super::holdings_traits::{HoldingRepositoryTrait, HoldingServiceTrait};
use crate::errors::{Result, ValidationError};

/// Service for managing holdings
pub struct HoldingService {
    repository: Arc<dyn HoldingRepositoryTrait>,
}

impl HoldingService {
    /// Creates a new HoldingService instance
    pub fn new(repository: Arc<dyn HoldingRepositoryTrait>) -> Self {
        Self { repository }
    }

    fn validate_new_holding(new_holding: &NewHolding) -> Result<()> {
        for (field, value) in [
            ("portfolioId", &new_holding.portfolio_id),
            ("isin", &new_holding.isin),
            ("stockName", &new_holding.stock_name),
        ] {
            if value.trim().is_empty() {
                return Err(ValidationError::MissingField(field.to_string()).into());
            }
        }
        Ok(())
    }
}

#[async_trait::async_trait]
impl HoldingServiceTrait for HoldingService {
    fn get_holdings(&self, portfolio_id: &str) -> Result<Vec<Holding>> {
        self.repository.list_by_portfolio(portfolio_id)
    }

    async fn add_holding(&self, new_holding: NewHolding) -> Result<Holding> {
        Self::validate_new_holding(&new_holding)?;
        debug!(
            "Adding holding {} to portfolio {}",
            new_holding.isin, new_holding.portfolio_id
        );
        self.repository.add(new_holding).await
    }

    async fn update_settings(&self, update: HoldingSettingsUpdate) -> Result<Holding> {
        self.repository.update_settings(update).await
    }

    async fn delete_holdings(&self, portfolio_id: String, isins: Vec<String>) -> Result<usize> {
        debug!(
            "Deleting {} holdings from portfolio {}",
            isins.len(),
            portfolio_id
        );
        self.repository.delete_bulk(portfolio_id, isins).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::Error;

    #[test]
    fn test_new_holding_requires_identity_fields() {
        let new_holding = NewHolding {
            portfolio_id: "p1".to_string(),
            isin: "  ".to_string(),
            stock_name: "Reliance Industries".to_string(),
            ticker: None,
            quantity: 0,
            average_buy_price: Default::default(),
        };
        let err = HoldingService::validate_new_holding(&new_holding).unwrap_err();
        assert!(matches!(err, Error::Validation(_)));
    }
}
