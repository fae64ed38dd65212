//! Translates rebalance results into human-readable assessment payloads.
//!
//! The engine-side boundary for presentation: renderers (API responses,
//! CLIs, dashboards) format these payloads however they like, the numbers
//! travel in `metadata`.

use serde_json::json;

use loanguard_common::types::{AssessmentPayload, LoanState, RebalanceResult, Severity};

/// Maps a `RebalanceResult` onto a titled, severity-graded payload.
pub struct RebalanceAssessor;

impl RebalanceAssessor {
    pub fn assess(state: &LoanState, result: &RebalanceResult) -> AssessmentPayload {
        if !result.needs_rebalance {
            return AssessmentPayload {
                title: "No Rebalancing Needed".to_string(),
                body: format!(
                    "Current LTV {:.2}% is below the trigger, no action required",
                    result.current_ltv
                ),
                severity: Severity::Info,
                metadata: json!({
                    "current_ltv": result.current_ltv,
                    "cash_remaining": result.cash_remaining,
                }),
            };
        }

        if result.can_fully_rebalance {
            AssessmentPayload {
                title: "Rebalancing Needed".to_string(),
                body: format!(
                    "LTV reached {:.2}%: buy {:.6} BTC for {:.2} to restore {:.2}% LTV, leaving {:.2} in cash",
                    result.current_ltv,
                    result.collateral_to_buy,
                    result.cash_used,
                    result.new_ltv,
                    result.cash_remaining
                ),
                severity: Severity::Warning,
                metadata: json!({
                    "current_ltv": result.current_ltv,
                    "collateral_to_buy": result.collateral_to_buy,
                    "cash_used": result.cash_used,
                    "cash_remaining": result.cash_remaining,
                    "new_ltv": result.new_ltv,
                }),
            }
        } else {
            let shortfall = result.total_cash_required - state.remaining_cash;
            AssessmentPayload {
                title: "Insufficient Cash for Full Rebalancing".to_string(),
                body: format!(
                    "LTV reached {:.2}%: spending all {:.2} remaining cash buys {:.6} BTC and only lowers LTV to {:.2}%; a full rebalance would need {:.2} more cash",
                    result.current_ltv,
                    result.cash_used,
                    result.collateral_to_buy,
                    result.new_ltv,
                    shortfall
                ),
                severity: Severity::Critical,
                metadata: json!({
                    "current_ltv": result.current_ltv,
                    "collateral_to_buy": result.collateral_to_buy,
                    "cash_used": result.cash_used,
                    "new_ltv": result.new_ltv,
                    "total_cash_required": result.total_cash_required,
                    "cash_shortfall": shortfall,
                }),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rebalance::RebalanceEngine;

    fn base_state() -> LoanState {
        LoanState::originate(1.0, 20_000.0, 50.0).unwrap()
    }

    #[test]
    fn test_no_rebalance_is_info() {
        let state = base_state();
        let result = RebalanceEngine::evaluate(&state, 15_000.0, 70.0).unwrap();
        let payload = RebalanceAssessor::assess(&state, &result);

        assert_eq!(payload.severity, Severity::Info);
        assert_eq!(payload.title, "No Rebalancing Needed");
        assert!(payload.body.contains("66.67"));
    }

    #[test]
    fn test_full_rebalance_is_warning() {
        let state = base_state();
        let result = RebalanceEngine::evaluate(&state, 10_000.0, 70.0).unwrap();
        let payload = RebalanceAssessor::assess(&state, &result);

        assert_eq!(payload.severity, Severity::Warning);
        assert!(payload.body.contains("1.000000"));
        assert!(payload.body.contains("50.00"));
        assert_eq!(payload.metadata["new_ltv"], 50.0);
    }

    #[test]
    fn test_constrained_rebalance_is_critical_with_shortfall() {
        let state = LoanState::new(1.0, 20_000.0, 50.0, 10_000.0, 4_000.0, 4_000.0).unwrap();
        let result = RebalanceEngine::evaluate(&state, 10_000.0, 70.0).unwrap();
        let payload = RebalanceAssessor::assess(&state, &result);

        assert_eq!(payload.severity, Severity::Critical);
        // 10000 required minus 4000 available
        assert!(payload.body.contains("6000.00"));
        assert_eq!(payload.metadata["cash_shortfall"], 6_000.0);
    }
}
