pub mod health;
pub mod loans;
pub mod prices;

use axum::Router;

use crate::state::AppState;

/// Build the complete API router with all routes.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .merge(health::router())
        .merge(prices::router())
        .merge(loans::router())
        .with_state(state)
}
