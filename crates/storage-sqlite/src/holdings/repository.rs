use foliotrack_core::holdings::{
    Holding, HoldingRepositoryTrait, HoldingSettingsUpdate, HoldingSnapshot, HoldingUpsert,
    NewHolding,
};
use foliotrack_core::Result;

use super::model::{HoldingDB, HoldingSettingsDB};
use crate::db::{get_connection, WriteHandle};
use crate::errors::StorageError;
use crate::schema::holdings;
use crate::schema::holdings::dsl::*;
use async_trait::async_trait;
use chrono::Utc;
use diesel::prelude::*;
use diesel::r2d2::{self, Pool};
use diesel::upsert::excluded;
use diesel::SqliteConnection;

use std::sync::Arc;

/// Upsert batch size; SQLite limits the number of bound variables per
/// statement.
const UPSERT_CHUNK_SIZE: usize = 1_000;

pub struct HoldingRepository {
    pool: Arc<Pool<r2d2::ConnectionManager<SqliteConnection>>>,
    writer: WriteHandle,
}

impl HoldingRepository {
    pub fn new(
        pool: Arc<Pool<r2d2::ConnectionManager<SqliteConnection>>>,
        writer: WriteHandle,
    ) -> Self {
        HoldingRepository { pool, writer }
    }

    pub fn list_by_portfolio_impl(&self, portfolio: &str) -> Result<Vec<Holding>> {
        let mut conn = get_connection(&self.pool)?;
        let holdings_db = holdings
            .filter(portfolio_id.eq(portfolio))
            .order(stock_name.asc())
            .load::<HoldingDB>(&mut conn)
            .map_err(StorageError::from)?;
        Ok(holdings_db.into_iter().map(Holding::from).collect())
    }
}

#[async_trait]
impl HoldingRepositoryTrait for HoldingRepository {
    fn list_by_portfolio(&self, portfolio: &str) -> Result<Vec<Holding>> {
        self.list_by_portfolio_impl(portfolio)
    }

    async fn add(&self, new_holding: NewHolding) -> Result<Holding> {
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<Holding> {
                let holding_db = HoldingDB::from_new(new_holding);
                let result_db = diesel::insert_into(holdings::table)
                    .values(&holding_db)
                    .returning(HoldingDB::as_returning())
                    .get_result(conn)
                    .map_err(StorageError::from)?;
                Ok(Holding::from(result_db))
            })
            .await
    }

    async fn upsert_many(&self, rows: Vec<HoldingUpsert>) -> Result<usize> {
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<usize> {
                let rows_db: Vec<HoldingDB> =
                    rows.into_iter().map(HoldingDB::from_upsert).collect();

                let mut affected_rows = 0;
                for chunk in rows_db.chunks(UPSERT_CHUNK_SIZE) {
                    // The conflict path updates the imported columns only;
                    // snapshot columns and created_at keep their stored
                    // values.
                    affected_rows += diesel::insert_into(holdings::table)
                        .values(chunk)
                        .on_conflict((portfolio_id, isin))
                        .do_update()
                        .set((
                            stock_name.eq(excluded(stock_name)),
                            ticker.eq(excluded(ticker)),
                            quantity.eq(excluded(quantity)),
                            average_buy_price.eq(excluded(average_buy_price)),
                            target.eq(excluded(target)),
                            stop_loss.eq(excluded(stop_loss)),
                            date_of_exit.eq(excluded(date_of_exit)),
                            updated_at.eq(excluded(updated_at)),
                        ))
                        .execute(conn)
                        .map_err(StorageError::from)?;
                }
                Ok(affected_rows)
            })
            .await
    }

    async fn update_settings(&self, update: HoldingSettingsUpdate) -> Result<Holding> {
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<Holding> {
                let key = (update.portfolio_id.clone(), update.isin.clone());
                let changeset = HoldingSettingsDB {
                    ticker: update.ticker,
                    date_of_exit: update.date_of_exit,
                    target: update.target.map(|d| d.to_string()),
                    stop_loss: update.stop_loss.map(|d| d.to_string()),
                    quantity: update.quantity,
                    average_buy_price: update.average_buy_price.map(|d| d.to_string()),
                    updated_at: Utc::now().naive_utc(),
                };

                diesel::update(holdings.find(key.clone()))
                    .set(&changeset)
                    .execute(conn)
                    .map_err(StorageError::from)?;
                let result_db = holdings
                    .find(key)
                    .first::<HoldingDB>(conn)
                    .map_err(StorageError::from)?;
                Ok(Holding::from(result_db))
            })
            .await
    }

    async fn set_ticker(
        &self,
        portfolio: String,
        holding_isin: String,
        new_ticker: String,
    ) -> Result<()> {
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<()> {
                diesel::update(holdings.find((portfolio, holding_isin)))
                    .set((
                        ticker.eq(new_ticker),
                        updated_at.eq(Utc::now().naive_utc()),
                    ))
                    .execute(conn)
                    .map_err(StorageError::from)?;
                Ok(())
            })
            .await
    }

    async fn delete_bulk(&self, portfolio: String, isins: Vec<String>) -> Result<usize> {
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<usize> {
                Ok(diesel::delete(
                    holdings
                        .filter(portfolio_id.eq(portfolio))
                        .filter(isin.eq_any(isins)),
                )
                .execute(conn)
                .map_err(StorageError::from)?)
            })
            .await
    }

    async fn save_snapshots(&self, snapshots: Vec<HoldingSnapshot>) -> Result<usize> {
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<usize> {
                let mut affected_rows = 0;
                for snapshot in snapshots {
                    // Snapshot columns only; manual fields and updated_at
                    // stay as the user left them.
                    affected_rows += diesel::update(
                        holdings.find((snapshot.portfolio_id, snapshot.isin)),
                    )
                    .set((
                        last_price.eq(snapshot.last_price.to_string()),
                        last_day_change_amount.eq(snapshot.last_day_change_amount.to_string()),
                        last_day_change_percent.eq(snapshot.last_day_change_percent.to_string()),
                        market_data_updated_at.eq(snapshot.market_data_updated_at.naive_utc()),
                    ))
                    .execute(conn)
                    .map_err(StorageError::from)?;
                }
                Ok(affected_rows)
            })
            .await
    }
}
