use std::sync::Arc;

use crate::{
    error::{ApiError, ApiResult},
    main_lib::AppState,
};
use axum::{
    extract::{Multipart, Query, State},
    routing::post,
    Json, Router,
};
use serde::Deserialize;
use serde_json::{json, Value};

#[derive(Deserialize)]
struct UploadQuery {
    portfolio_id: String,
}

fn is_spreadsheet(filename: &str) -> bool {
    let lower = filename.to_lowercase();
    lower.ends_with(".xlsx") || lower.ends_with(".xls")
}

/// Multipart spreadsheet upload. The filename extension is checked before
/// any bytes are parsed so a wrong file fails fast.
async fn upload_holdings(
    Query(query): Query<UploadQuery>,
    State(state): State<Arc<AppState>>,
    mut multipart: Multipart,
) -> ApiResult<Json<Value>> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::bad_request(e.to_string()))?
    {
        let Some(filename) = field.file_name().map(String::from) else {
            continue;
        };
        if !is_spreadsheet(&filename) {
            return Err(ApiError::bad_request(format!(
                "Unsupported file type: {}. Expected .xlsx or .xls",
                filename
            )));
        }

        let bytes = field
            .bytes()
            .await
            .map_err(|e| ApiError::bad_request(e.to_string()))?;
        let imported = state
            .import_service
            .import_xlsx(&query.portfolio_id, &bytes)
            .await?;
        return Ok(Json(json!({
            "imported": imported,
            "portfolioId": query.portfolio_id,
        })));
    }

    Err(ApiError::bad_request("No file in upload"))
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new().route("/upload", post(upload_holdings))
}
