//! External price collaborator.
//!
//! The live feed is strictly best-effort: every failure mode (transport,
//! status, parse, junk payload) collapses to `None` and is logged, never
//! raised. Callers that need a number supply their own fallback.

pub mod http;
pub mod source;

use chrono::Utc;

use loanguard_common::config::AppConfig;
use loanguard_common::types::PriceQuote;

use crate::http::HttpPriceFeed;

/// Where current prices come from.
///
/// `Fixed` and `Offline` back tests and network-less operation; the API
/// binary runs `Http`.
#[derive(Debug, Clone)]
pub enum PriceFeed {
    Http(HttpPriceFeed),
    Fixed(f64),
    Offline,
}

impl PriceFeed {
    /// Build the live HTTP feed from application configuration.
    pub fn from_config(config: &AppConfig) -> anyhow::Result<Self> {
        Ok(Self::Http(HttpPriceFeed::new(
            &config.price_feed_url,
            config.price_feed_timeout_ms,
        )?))
    }

    /// Current price, or `None` when the feed has nothing usable.
    pub async fn current_price(&self) -> Option<f64> {
        self.current_quote().await.map(|quote| quote.price)
    }

    /// Current quote with provenance, or `None` when unavailable.
    pub async fn current_quote(&self) -> Option<PriceQuote> {
        match self {
            PriceFeed::Http(feed) => feed.fetch().await,
            PriceFeed::Fixed(price) => Some(PriceQuote {
                price: *price,
                pair: "BTC/EUR".to_string(),
                source: "fixed".to_string(),
                fetched_at: Utc::now(),
            }),
            PriceFeed::Offline => None,
        }
    }
}
