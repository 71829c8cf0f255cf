use foliotrack_core::portfolios::{NewPortfolio, Portfolio, PortfolioRepositoryTrait};
use foliotrack_core::Result;

use super::model::PortfolioDB;
use crate::db::{get_connection, WriteHandle};
use crate::errors::StorageError;
use crate::schema::holdings;
use crate::schema::portfolios;
use crate::schema::portfolios::dsl::*;
use async_trait::async_trait;
use chrono::Utc;
use diesel::prelude::*;
use diesel::r2d2::{self, Pool};
use diesel::SqliteConnection;

use std::sync::Arc;
use uuid::Uuid;

pub struct PortfolioRepository {
    pool: Arc<Pool<r2d2::ConnectionManager<SqliteConnection>>>,
    writer: WriteHandle,
}

impl PortfolioRepository {
    pub fn new(
        pool: Arc<Pool<r2d2::ConnectionManager<SqliteConnection>>>,
        writer: WriteHandle,
    ) -> Self {
        PortfolioRepository { pool, writer }
    }

    pub fn list_impl(&self) -> Result<Vec<Portfolio>> {
        let mut conn = get_connection(&self.pool)?;
        let portfolios_db = portfolios
            .order(created_at.asc())
            .load::<PortfolioDB>(&mut conn)
            .map_err(StorageError::from)?;
        Ok(portfolios_db.into_iter().map(Portfolio::from).collect())
    }

    pub fn get_by_id_impl(&self, portfolio_id: &str) -> Result<Portfolio> {
        let mut conn = get_connection(&self.pool)?;
        let portfolio_db = portfolios
            .find(portfolio_id)
            .first::<PortfolioDB>(&mut conn)
            .map_err(StorageError::from)?;
        Ok(Portfolio::from(portfolio_db))
    }
}

#[async_trait]
impl PortfolioRepositoryTrait for PortfolioRepository {
    fn list(&self) -> Result<Vec<Portfolio>> {
        self.list_impl()
    }

    fn get_by_id(&self, portfolio_id: &str) -> Result<Portfolio> {
        self.get_by_id_impl(portfolio_id)
    }

    async fn create(&self, new_portfolio: NewPortfolio) -> Result<Portfolio> {
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<Portfolio> {
                let now = Utc::now().naive_utc();
                let portfolio_db = PortfolioDB {
                    id: Uuid::new_v4().to_string(),
                    name: new_portfolio.name,
                    created_at: now,
                    updated_at: now,
                };

                let result_db = diesel::insert_into(portfolios::table)
                    .values(&portfolio_db)
                    .returning(PortfolioDB::as_returning())
                    .get_result(conn)
                    .map_err(StorageError::from)?;
                Ok(Portfolio::from(result_db))
            })
            .await
    }

    async fn rename(&self, portfolio_id: String, new_name: String) -> Result<Portfolio> {
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<Portfolio> {
                diesel::update(portfolios.find(portfolio_id.clone()))
                    .set((name.eq(new_name), updated_at.eq(Utc::now().naive_utc())))
                    .execute(conn)
                    .map_err(StorageError::from)?;
                let result_db = portfolios
                    .find(portfolio_id)
                    .first::<PortfolioDB>(conn)
                    .map_err(StorageError::from)?;
                Ok(Portfolio::from(result_db))
            })
            .await
    }

    async fn delete(&self, portfolio_id: String) -> Result<usize> {
        // Holdings go first so the delete also works when foreign keys are
        // enforced without cascade support.
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<usize> {
                diesel::delete(
                    holdings::table.filter(holdings::portfolio_id.eq(portfolio_id.clone())),
                )
                .execute(conn)
                .map_err(StorageError::from)?;
                Ok(diesel::delete(portfolios.find(portfolio_id))
                    .execute(conn)
                    .map_err(StorageError::from)?)
            })
            .await
    }
}
