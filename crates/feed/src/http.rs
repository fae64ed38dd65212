//! Live price retrieval over HTTP.
//!
//! Defaults to the CoinGecko simple-price shape
//! (`{"bitcoin": {"eur": 12345.67}}`) but tolerates any response whose
//! first numeric leaf is the price, so alternative endpoints keep working.

use std::time::Duration;

use chrono::Utc;
use serde_json::Value;

use loanguard_common::types::PriceQuote;

/// Best-effort HTTP price feed.
#[derive(Debug, Clone)]
pub struct HttpPriceFeed {
    client: reqwest::Client,
    url: reqwest::Url,
    source: String,
}

impl HttpPriceFeed {
    pub fn new(url: &str, timeout_ms: u64) -> anyhow::Result<Self> {
        let url = reqwest::Url::parse(url)
            .map_err(|e| anyhow::anyhow!("invalid price feed URL: {e}"))?;
        let source = url.host_str().unwrap_or("price-feed").to_string();
        let client = reqwest::Client::builder()
            .timeout(Duration::from_millis(timeout_ms))
            .build()?;

        Ok(Self {
            client,
            url,
            source,
        })
    }

    /// Fetch the current quote. Any failure is logged and becomes `None`;
    /// errors never cross this boundary.
    pub async fn fetch(&self) -> Option<PriceQuote> {
        let response = match self.client.get(self.url.clone()).send().await {
            Ok(response) => response,
            Err(e) => {
                tracing::warn!(error = %e, "Price feed request failed");
                return None;
            }
        };

        if !response.status().is_success() {
            tracing::warn!(status = %response.status(), "Price feed returned an error status");
            return None;
        }

        let body: Value = match response.json().await {
            Ok(body) => body,
            Err(e) => {
                tracing::warn!(error = %e, "Price feed response was not valid JSON");
                return None;
            }
        };

        match extract_price(&body) {
            Some(price) if price.is_finite() && price > 0.0 => Some(PriceQuote {
                price,
                pair: "BTC/EUR".to_string(),
                source: self.source.clone(),
                fetched_at: Utc::now(),
            }),
            _ => {
                tracing::warn!("Price feed response contained no usable price");
                None
            }
        }
    }
}

/// Extract the price from a feed response: the value itself if numeric,
/// otherwise the first numeric leaf found walking nested objects.
fn extract_price(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::Object(map) => map.values().find_map(extract_price),
        _ => None,
    }
}
