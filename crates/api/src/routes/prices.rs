//! Current price endpoint.

use axum::extract::State;
use axum::routing::get;
use axum::{Json, Router};

use loanguard_common::error::AppError;
use loanguard_common::types::PriceQuote;

use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new().route("/api/prices/current", get(current_price))
}

/// GET /api/prices/current — Latest quote from the live feed.
///
/// The feed itself never errors; absence surfaces here as a 502 because
/// this endpoint has no caller-supplied fallback to fall back on.
async fn current_price(State(state): State<AppState>) -> Result<Json<PriceQuote>, AppError> {
    state
        .feed
        .current_quote()
        .await
        .map(Json)
        .ok_or_else(|| AppError::Feed("live price unavailable".to_string()))
}
