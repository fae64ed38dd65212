//! Price-source strategies.
//!
//! The engine never does I/O; callers pick how each evaluation's price is
//! obtained: typed in manually, pulled from the live feed with a fallback,
//! or derived as "the price at which the loan sits at X% LTV" against the
//! current state of a chain.

use serde::{Deserialize, Serialize};

use loanguard_common::error::AppError;
use loanguard_common::types::LoanState;
use loanguard_engine::ltv;

use crate::PriceFeed;

/// How to obtain the price for one evaluation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PriceSource {
    /// Use this price as-is.
    Manual { price: f64 },
    /// Ask the live feed; use `fallback` when it returns absence.
    Live { fallback: f64 },
    /// Price at which the loan sits at `ltv` percent, derived from the
    /// state the step is evaluated against.
    AtLtv { ltv: f64 },
}

impl PriceSource {
    /// Resolve this source to a concrete price for `state`.
    pub async fn resolve(&self, feed: &PriceFeed, state: &LoanState) -> Result<f64, AppError> {
        match self {
            PriceSource::Manual { price } => Ok(*price),
            PriceSource::Live { fallback } => match feed.current_price().await {
                Some(price) => Ok(price),
                None => {
                    tracing::warn!(fallback, "Live price unavailable, using fallback");
                    Ok(*fallback)
                }
            },
            PriceSource::AtLtv { ltv } => {
                ltv::price_at_ltv(state.principal, state.collateral_amount, *ltv)
            }
        }
    }
}
