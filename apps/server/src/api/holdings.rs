use std::sync::Arc;

use crate::{error::ApiResult, main_lib::AppState};
use axum::{
    extract::{Query, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;

use foliotrack_core::discovery::DiscoveryOutcome;
use foliotrack_core::enrichment::EnrichedHoldings;
use foliotrack_core::holdings::{Holding, HoldingSettingsUpdate, NewHolding};

#[derive(Deserialize)]
struct HoldingsQuery {
    portfolio_id: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct DeleteBulkRequest {
    portfolio_id: String,
    isins: Vec<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct DiscoverRequest {
    portfolio_id: String,
}

/// The main read path: stored holdings plus live enrichment.
async fn get_holdings(
    Query(query): Query<HoldingsQuery>,
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<EnrichedHoldings>> {
    let holdings = state.holding_service.get_holdings(&query.portfolio_id)?;
    let enriched = state.enrichment_service.enrich(holdings).await;
    Ok(Json(enriched))
}

async fn add_holding(
    State(state): State<Arc<AppState>>,
    Json(new_holding): Json<NewHolding>,
) -> ApiResult<Json<Holding>> {
    let h = state.holding_service.add_holding(new_holding).await?;
    Ok(Json(h))
}

async fn delete_holdings(
    State(state): State<Arc<AppState>>,
    Json(body): Json<DeleteBulkRequest>,
) -> ApiResult<StatusCode> {
    let _ = state
        .holding_service
        .delete_holdings(body.portfolio_id, body.isins)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn update_settings(
    State(state): State<Arc<AppState>>,
    Json(update): Json<HoldingSettingsUpdate>,
) -> ApiResult<Json<Holding>> {
    let h = state.holding_service.update_settings(update).await?;
    Ok(Json(h))
}

async fn discover_tickers(
    State(state): State<Arc<AppState>>,
    Json(body): Json<DiscoverRequest>,
) -> ApiResult<Json<DiscoveryOutcome>> {
    let outcome = state
        .discovery_service
        .discover_all(&body.portfolio_id)
        .await?;
    Ok(Json(outcome))
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/holdings", get(get_holdings))
        .route("/holdings/add", post(add_holding))
        .route("/holdings/delete-bulk", post(delete_holdings))
        .route("/settings", post(update_settings))
        .route("/discover", post(discover_tickers))
}
