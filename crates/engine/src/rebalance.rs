//! Rebalance decision engine.
//!
//! Given a loan state, a hypothetical new price, and an LTV trigger, decides
//! whether rebalancing is required and how much collateral the cash reserve
//! can fund. The trigger only detects the need to act; the restoration
//! target is always the loan's original target ratio, since rebalancing to
//! the trigger itself would immediately re-trigger on the next tick.

use loanguard_common::error::AppError;
use loanguard_common::types::{LoanState, RebalanceResult};

use crate::ltv;

/// Pure rebalancing calculator. Evaluates what a rebalance WOULD do;
/// it never commits the outcome into a new state.
pub struct RebalanceEngine;

impl RebalanceEngine {
    /// Evaluate a loan state against a new price and LTV trigger.
    ///
    /// Insufficient cash is a normal outcome (`can_fully_rebalance = false`),
    /// not an error; errors are reserved for structurally invalid inputs.
    pub fn evaluate(
        state: &LoanState,
        new_price: f64,
        ltv_trigger: f64,
    ) -> Result<RebalanceResult, AppError> {
        state.validate()?;
        if !(new_price.is_finite() && new_price > 0.0) {
            return Err(AppError::InvalidInput(format!(
                "new_price must be positive, got {new_price}"
            )));
        }
        if !ltv_trigger.is_finite() || ltv_trigger <= 0.0 || ltv_trigger > 100.0 {
            return Err(AppError::InvalidInput(format!(
                "ltv_trigger must be in (0, 100], got {ltv_trigger}"
            )));
        }

        let new_collateral_value = state.collateral_amount * new_price;
        let current_ltv = ltv::current_ltv(state.principal, state.collateral_amount, new_price)?;

        if current_ltv < ltv_trigger {
            return Ok(Self::no_action(state, current_ltv));
        }

        // Restore the original target ratio, not the trigger level.
        let target_collateral_value = state.principal / (state.target_ltv_ratio / 100.0);
        let additional_value_needed = target_collateral_value - new_collateral_value;

        // Reachable when the trigger is looser than the target ratio: the
        // trigger fires while the loan already sits at or under the target.
        if additional_value_needed <= 0.0 {
            return Ok(Self::no_action(state, current_ltv));
        }

        let total_collateral_needed = additional_value_needed / new_price;
        // Recomputed from the quantity so quantity and cost stay auditable.
        let total_cash_required = total_collateral_needed * new_price;

        let can_fully_rebalance = total_cash_required <= state.remaining_cash;
        let (collateral_to_buy, cash_used) = if can_fully_rebalance {
            (total_collateral_needed, total_cash_required)
        } else {
            // Greedy partial rebalance: spend everything available and buy
            // as much as it affords.
            (state.remaining_cash / new_price, state.remaining_cash)
        };

        let new_collateral_total = state.collateral_amount + collateral_to_buy;
        let new_ltv = state.principal / (new_collateral_total * new_price) * 100.0;

        Ok(RebalanceResult {
            needs_rebalance: true,
            current_ltv,
            collateral_to_buy,
            cash_used,
            cash_remaining: state.remaining_cash - cash_used,
            can_fully_rebalance,
            new_collateral_total,
            new_ltv,
            total_cash_required,
            total_collateral_needed,
        })
    }

    /// Result shape for "nothing to do": cash and collateral untouched.
    fn no_action(state: &LoanState, current_ltv: f64) -> RebalanceResult {
        RebalanceResult {
            needs_rebalance: false,
            current_ltv,
            collateral_to_buy: 0.0,
            cash_used: 0.0,
            cash_remaining: state.remaining_cash,
            can_fully_rebalance: true,
            new_collateral_total: state.collateral_amount,
            new_ltv: current_ltv,
            total_cash_required: 0.0,
            total_collateral_needed: 0.0,
        }
    }
}
