use std::sync::Arc;

use crate::{error::ApiResult, main_lib::AppState};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, put},
    Json, Router,
};
use foliotrack_core::portfolios::{NewPortfolio, Portfolio};

async fn get_portfolios(State(state): State<Arc<AppState>>) -> ApiResult<Json<Vec<Portfolio>>> {
    let portfolios = state.portfolio_service.get_portfolios()?;
    Ok(Json(portfolios))
}

async fn create_portfolio(
    State(state): State<Arc<AppState>>,
    Json(new_portfolio): Json<NewPortfolio>,
) -> ApiResult<Json<Portfolio>> {
    let p = state.portfolio_service.create_portfolio(new_portfolio).await?;
    Ok(Json(p))
}

async fn rename_portfolio(
    Path(id): Path<String>,
    State(state): State<Arc<AppState>>,
    Json(body): Json<NewPortfolio>,
) -> ApiResult<Json<Portfolio>> {
    let p = state.portfolio_service.rename_portfolio(id, body.name).await?;
    Ok(Json(p))
}

async fn delete_portfolio(
    Path(id): Path<String>,
    State(state): State<Arc<AppState>>,
) -> ApiResult<StatusCode> {
    // A delete of an unknown id is indistinguishable from a repeat delete;
    // both end with the portfolio gone.
    let _ = state.portfolio_service.delete_portfolio(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/portfolios", get(get_portfolios).post(create_portfolio))
        .route(
            "/portfolios/{id}",
            put(rename_portfolio).delete(delete_portfolio),
        )
}
