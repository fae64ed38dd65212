//! Price projections — critical price levels and purchase requirements.
//!
//! Answers the forward-looking questions around a position: what does it
//! cost to reach a safer LTV, at what price does the loan hit a given LTV
//! without buying, and what does a forced liquidation look like.

use serde::{Deserialize, Serialize};

use loanguard_common::error::AppError;
use loanguard_common::types::LoanState;

use crate::ltv;

/// Purchase requirements to bring a position to one target LTV.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TargetLtvPlan {
    pub target_ltv: f64,
    /// Collateral units to buy at `at_price` to reach the target.
    pub collateral_needed: f64,
    /// Cash value of that purchase at `at_price`.
    pub cash_value_needed: f64,
    /// Price at which the loan sits at the target without buying anything.
    pub price_at_target: f64,
    /// Drop from `initial_price` down to `price_at_target`.
    pub price_drop_pct: f64,
}

/// Purchase plans for a set of safer target LTVs, priced at `at_price`.
///
/// `initial_price` anchors the reported price drops (normally the chain's
/// origination price).
pub fn purchase_targets(
    state: &LoanState,
    at_price: f64,
    targets: &[f64],
    initial_price: f64,
) -> Result<Vec<TargetLtvPlan>, AppError> {
    state.validate()?;
    if !(at_price.is_finite() && at_price > 0.0) {
        return Err(AppError::InvalidInput(format!(
            "at_price must be positive, got {at_price}"
        )));
    }

    let mut plans = Vec::with_capacity(targets.len());
    for &target in targets {
        if !target.is_finite() || target <= 0.0 || target > 100.0 {
            return Err(AppError::InvalidInput(format!(
                "target LTV must be in (0, 100], got {target}"
            )));
        }
        let collateral_needed =
            state.principal / (at_price * (target / 100.0)) - state.collateral_amount;
        let price_at_target =
            ltv::price_at_ltv(state.principal, state.collateral_amount, target)?;
        plans.push(TargetLtvPlan {
            target_ltv: target,
            collateral_needed,
            cash_value_needed: collateral_needed * at_price,
            price_at_target,
            price_drop_pct: ltv::price_drop_percent(initial_price, price_at_target)?,
        });
    }
    Ok(plans)
}

/// What a forced liquidation at a given LTV level would look like.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LiquidationProjection {
    pub liquidation_ltv: f64,
    /// Price at which the loan reaches the liquidation LTV.
    pub trigger_price: f64,
    /// Drop from `initial_price` down to the trigger price.
    pub price_drop_pct: f64,
    /// Collateral sold at the trigger price to repay the principal.
    pub collateral_sold: f64,
    /// Sale proceeds (equals the principal by construction).
    pub sale_proceeds: f64,
    pub collateral_remaining: f64,
    /// Value of the remaining collateral at the trigger price.
    pub remaining_value: f64,
}

/// Project a liquidation at `liquidation_ltv` (e.g. 80%).
pub fn liquidation_projection(
    state: &LoanState,
    liquidation_ltv: f64,
    initial_price: f64,
) -> Result<LiquidationProjection, AppError> {
    state.validate()?;

    let trigger_price =
        ltv::price_at_ltv(state.principal, state.collateral_amount, liquidation_ltv)?;
    let collateral_sold = state.principal / trigger_price;
    let collateral_remaining = state.collateral_amount - collateral_sold;

    Ok(LiquidationProjection {
        liquidation_ltv,
        trigger_price,
        price_drop_pct: ltv::price_drop_percent(initial_price, trigger_price)?,
        collateral_sold,
        sale_proceeds: collateral_sold * trigger_price,
        collateral_remaining,
        remaining_value: collateral_remaining * trigger_price,
    })
}
