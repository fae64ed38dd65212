//! Shared application state for the Axum API server.

use loanguard_common::config::AppConfig;
use loanguard_feed::PriceFeed;

/// Application state shared across all route handlers via Axum `State`.
#[derive(Clone)]
pub struct AppState {
    pub feed: PriceFeed,
    pub config: AppConfig,
}

impl AppState {
    pub fn new(feed: PriceFeed, config: AppConfig) -> Self {
        Self { feed, config }
    }
}
