//! Spreadsheet importer for broker holding statements.
//!
//! Broker exports carry preamble rows above the real header, and different
//! brokers label the same columns differently. The importer sniffs the
//! header row, reads each data row through alternate column names, and
//! merges previously curated settings so a re-upload never erases them.

use std::collections::HashMap;
use std::io::Cursor;
use std::str::FromStr;
use std::sync::Arc;

use async_trait::async_trait;
use calamine::{open_workbook_auto_from_rs, Data, DataType, Reader};
use log::info;
use rust_decimal::prelude::FromPrimitive;
use rust_decimal::Decimal;

use super::import_traits::HoldingsImportServiceTrait;
use crate::errors::{Error, Result};
use crate::holdings::{Holding, HoldingRepositoryTrait, HoldingUpsert};

/// Tokens that mark the header row; a case-sensitive substring match, as
/// broker sheets write these labels consistently.
const HEADER_MARKERS: [&str; 2] = ["ISIN", "Symbol"];

const STOCK_NAME_COLUMNS: [&str; 2] = ["Stock Name", "Security Name"];
const QUANTITY_COLUMNS: [&str; 2] = ["Quantity", "Qty"];
const BUY_PRICE_COLUMNS: [&str; 2] = ["Average buy price", "Avg Price"];

pub struct HoldingsImportService {
    repository: Arc<dyn HoldingRepositoryTrait>,
}

impl HoldingsImportService {
    pub fn new(repository: Arc<dyn HoldingRepositoryTrait>) -> Self {
        Self { repository }
    }
}

#[async_trait]
impl HoldingsImportServiceTrait for HoldingsImportService {
    async fn import_xlsx(&self, portfolio_id: &str, bytes: &[u8]) -> Result<usize> {
        let mut workbook = open_workbook_auto_from_rs(Cursor::new(bytes))
            .map_err(|e| Error::Import(format!("Could not open workbook: {}", e)))?;
        let range = workbook
            .worksheet_range_at(0)
            .ok_or_else(|| Error::Import("Workbook has no sheets".to_string()))?
            .map_err(|e| Error::Import(format!("Could not read sheet: {}", e)))?;

        let rows: Vec<Vec<Data>> = range.rows().map(|r| r.to_vec()).collect();
        let parsed = parse_rows(&rows)?;

        let existing = self.repository.list_by_portfolio(portfolio_id)?;
        let upserts = merge_with_existing(portfolio_id, parsed, &existing);

        let imported = self.repository.upsert_many(upserts).await?;
        info!(
            "Imported {} holdings into portfolio {}",
            imported, portfolio_id
        );
        Ok(imported)
    }
}

/// One row extracted from the sheet, before the settings merge.
#[derive(Debug, Clone, PartialEq)]
struct ImportedRow {
    isin: String,
    stock_name: String,
    quantity: i32,
    average_buy_price: Decimal,
}

/// Extracts holding rows from the raw sheet grid.
fn parse_rows(rows: &[Vec<Data>]) -> Result<Vec<ImportedRow>> {
    let header_idx = rows
        .iter()
        .position(|row| {
            row.iter().any(|cell| {
                let text = cell_text(cell);
                HEADER_MARKERS.iter().any(|marker| text.contains(marker))
            })
        })
        .ok_or_else(|| Error::Import("Could not find header row in sheet".to_string()))?;

    let columns: HashMap<String, usize> = rows[header_idx]
        .iter()
        .enumerate()
        .map(|(i, cell)| (cell_text(cell), i))
        .collect();

    let isin_col = find_column(&columns, &["ISIN"]);
    let name_col = find_column(&columns, &STOCK_NAME_COLUMNS);
    let quantity_col = find_column(&columns, &QUANTITY_COLUMNS);
    let price_col = find_column(&columns, &BUY_PRICE_COLUMNS);

    let mut parsed = Vec::new();
    for row in &rows[header_idx + 1..] {
        let isin = isin_col.map(|i| cell_at(row, i)).unwrap_or_default();
        if isin.is_empty() || isin == "nan" {
            continue;
        }
        parsed.push(ImportedRow {
            isin,
            stock_name: name_col.map(|i| cell_at(row, i)).unwrap_or_default(),
            quantity: quantity_col
                .and_then(|i| row.get(i))
                .and_then(cell_integer)
                .unwrap_or(0),
            average_buy_price: price_col
                .and_then(|i| row.get(i))
                .and_then(cell_decimal)
                .unwrap_or_default(),
        });
    }
    Ok(parsed)
}

/// Joins parsed rows with settings already curated for their ISINs, so a
/// re-upload never erases a manually set ticker, target, stop-loss or exit
/// date.
fn merge_with_existing(
    portfolio_id: &str,
    parsed: Vec<ImportedRow>,
    existing: &[Holding],
) -> Vec<HoldingUpsert> {
    let by_isin: HashMap<&str, &Holding> =
        existing.iter().map(|h| (h.isin.as_str(), h)).collect();

    parsed
        .into_iter()
        .map(|row| {
            let prior = by_isin.get(row.isin.as_str());
            HoldingUpsert {
                portfolio_id: portfolio_id.to_string(),
                isin: row.isin,
                stock_name: row.stock_name,
                ticker: prior.and_then(|h| h.ticker.clone()),
                quantity: row.quantity,
                average_buy_price: row.average_buy_price,
                target: prior.and_then(|h| h.target),
                stop_loss: prior.and_then(|h| h.stop_loss),
                date_of_exit: prior.and_then(|h| h.date_of_exit),
            }
        })
        .collect()
}

/// First matching column index among the alternate names.
fn find_column(columns: &HashMap<String, usize>, names: &[&str]) -> Option<usize> {
    names.iter().find_map(|name| columns.get(*name).copied())
}

fn cell_text(cell: &Data) -> String {
    cell.as_string().unwrap_or_default().trim().to_string()
}

fn cell_at(row: &[Data], idx: usize) -> String {
    row.get(idx).map(cell_text).unwrap_or_default()
}

fn cell_integer(cell: &Data) -> Option<i32> {
    cell.as_i64()
        .or_else(|| cell.as_f64().map(|f| f as i64))
        .and_then(|v| i32::try_from(v).ok())
}

fn cell_decimal(cell: &Data) -> Option<Decimal> {
    match cell {
        Data::String(s) => Decimal::from_str(s.trim()).ok(),
        _ => cell.as_f64().and_then(Decimal::from_f64),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use chrono::{NaiveDate, Utc};
    use rust_decimal_macros::dec;

    fn s(text: &str) -> Data {
        Data::String(text.to_string())
    }

    fn f(value: f64) -> Data {
        Data::Float(value)
    }

    fn sheet_with_preamble() -> Vec<Vec<Data>> {
        vec![
            vec![s("Holdings statement"), Data::Empty, Data::Empty, Data::Empty],
            vec![Data::Empty, Data::Empty, Data::Empty, Data::Empty],
            vec![s("ISIN"), s("Stock Name"), s("Quantity"), s("Average buy price")],
            vec![s("INE002A01018"), s("Reliance Industries"), f(10.0), f(2450.5)],
            vec![s("nan"), s("Ghost Row"), f(1.0), f(1.0)],
            vec![s(""), s("Blank Row"), f(1.0), f(1.0)],
            vec![s("INE467B01029"), s("TCS"), f(5.0), f(3900.0)],
        ]
    }

    #[test]
    fn test_parse_skips_preamble_and_junk_rows() {
        let parsed = parse_rows(&sheet_with_preamble()).unwrap();
        assert_eq!(parsed.len(), 2);
        assert_eq!(parsed[0].isin, "INE002A01018");
        assert_eq!(parsed[0].quantity, 10);
        assert_eq!(parsed[0].average_buy_price, dec!(2450.5));
        assert_eq!(parsed[1].stock_name, "TCS");
    }

    #[test]
    fn test_parse_alternate_column_names() {
        let rows = vec![
            vec![s("ISIN"), s("Security Name"), s("Qty"), s("Avg Price")],
            vec![s("INE040A01034"), s("HDFC Bank"), f(12.0), s("1650.25")],
        ];
        let parsed = parse_rows(&rows).unwrap();
        assert_eq!(parsed[0].stock_name, "HDFC Bank");
        assert_eq!(parsed[0].quantity, 12);
        assert_eq!(parsed[0].average_buy_price, dec!(1650.25));
    }

    #[test]
    fn test_parse_missing_optional_columns_default() {
        let rows = vec![
            vec![s("ISIN")],
            vec![s("INE002A01018")],
        ];
        let parsed = parse_rows(&rows).unwrap();
        assert_eq!(parsed[0].quantity, 0);
        assert_eq!(parsed[0].average_buy_price, Decimal::ZERO);
    }

    #[test]
    fn test_parse_without_header_row_fails() {
        let rows = vec![
            vec![s("just"), s("some"), s("text")],
            vec![f(1.0), f(2.0), f(3.0)],
        ];
        let err = parse_rows(&rows).unwrap_err();
        assert!(matches!(err, Error::Import(_)));
    }

    fn curated_holding() -> Holding {
        Holding {
            portfolio_id: "p1".to_string(),
            isin: "INE002A01018".to_string(),
            stock_name: "Reliance Industries".to_string(),
            ticker: Some("RELIANCE.NS".to_string()),
            quantity: 8,
            average_buy_price: dec!(2300),
            target: Some(dec!(3000)),
            stop_loss: Some(dec!(2000)),
            date_of_exit: NaiveDate::from_ymd_opt(2026, 3, 31),
            last_price: None,
            last_day_change_amount: None,
            last_day_change_percent: None,
            market_data_updated_at: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_reimport_preserves_curated_settings() {
        let parsed = vec![
            ImportedRow {
                isin: "INE002A01018".to_string(),
                stock_name: "Reliance Industries".to_string(),
                quantity: 10,
                average_buy_price: dec!(2450.5),
            },
            ImportedRow {
                isin: "INE467B01029".to_string(),
                stock_name: "TCS".to_string(),
                quantity: 5,
                average_buy_price: dec!(3900),
            },
        ];
        let existing = vec![curated_holding()];

        let upserts = merge_with_existing("p1", parsed, &existing);

        let reliance = upserts.iter().find(|u| u.isin == "INE002A01018").unwrap();
        assert_eq!(reliance.quantity, 10);
        assert_eq!(reliance.average_buy_price, dec!(2450.5));
        assert_eq!(reliance.ticker, Some("RELIANCE.NS".to_string()));
        assert_eq!(reliance.target, Some(dec!(3000)));
        assert_eq!(reliance.stop_loss, Some(dec!(2000)));
        assert_eq!(reliance.date_of_exit, NaiveDate::from_ymd_opt(2026, 3, 31));

        let tcs = upserts.iter().find(|u| u.isin == "INE467B01029").unwrap();
        assert_eq!(tcs.ticker, None);
        assert_eq!(tcs.target, None);
    }
}
