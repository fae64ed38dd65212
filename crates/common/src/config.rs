use serde::Deserialize;

/// Default live price endpoint (CoinGecko simple price, BTC in EUR).
const DEFAULT_PRICE_FEED_URL: &str =
    "https://api.coingecko.com/api/v3/simple/price?ids=bitcoin&vs_currencies=eur";

/// Global application configuration loaded from environment variables.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// URL of the live price feed endpoint
    pub price_feed_url: String,

    /// Price feed request timeout in milliseconds (default: 5000)
    pub price_feed_timeout_ms: u64,

    /// Port the API server listens on (default: 3000)
    pub api_port: u16,
}

impl AppConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        Ok(Self {
            price_feed_url: std::env::var("PRICE_FEED_URL")
                .unwrap_or_else(|_| DEFAULT_PRICE_FEED_URL.to_string()),
            price_feed_timeout_ms: std::env::var("PRICE_FEED_TIMEOUT_MS")
                .unwrap_or_else(|_| "5000".to_string())
                .parse()
                .map_err(|_| anyhow::anyhow!("PRICE_FEED_TIMEOUT_MS must be a valid u64"))?,
            api_port: std::env::var("API_PORT")
                .unwrap_or_else(|_| "3000".to_string())
                .parse()
                .map_err(|_| anyhow::anyhow!("API_PORT must be a valid u16"))?,
        })
    }
}
