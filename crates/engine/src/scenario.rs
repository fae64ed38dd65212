//! Scenario chaining — sequential "what-if" evaluation over a loan state.
//!
//! Each step evaluates the state produced by the prior step against its own
//! price and trigger. The engine only computes what WOULD happen; whether a
//! result is committed into the next state is the caller's `CommitPolicy`.
//! Price drops are always measured against the chain's original price.

use serde::{Deserialize, Serialize};

use loanguard_common::error::AppError;
use loanguard_common::types::{LoanState, RebalanceResult};

use crate::ltv;
use crate::rebalance::RebalanceEngine;

/// When a step's evaluated rebalance is folded into the next state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CommitPolicy {
    /// Commit whenever a rebalance occurred, even a partial one.
    Always,
    /// Commit only when cash covered the full restoration.
    IfFullyFunded,
    /// Never commit; evaluate only.
    Never,
}

/// One link of a what-if chain: a candidate price, a trigger, and the
/// policy for carrying the outcome forward.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScenarioStep {
    pub price: f64,
    pub ltv_trigger: f64,
    pub commit: CommitPolicy,
}

/// What one step produced: the evaluation itself plus the state the next
/// step will see.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StepOutcome {
    /// Price the step was evaluated at.
    pub price: f64,
    /// Drop from the chain's original price to this step's price.
    pub price_drop_pct: f64,
    pub result: RebalanceResult,
    /// Whether the result was folded into `state_after`.
    pub committed: bool,
    pub state_after: LoanState,
}

impl ScenarioStep {
    /// Evaluate this step against `state`.
    ///
    /// `initial_price` is the chain's original reference price, used for
    /// the reported price drop.
    pub fn execute(
        &self,
        state: &LoanState,
        initial_price: f64,
    ) -> Result<StepOutcome, AppError> {
        let result = RebalanceEngine::evaluate(state, self.price, self.ltv_trigger)?;
        let price_drop_pct = ltv::price_drop_percent(initial_price, self.price)?;

        let committed = result.needs_rebalance
            && match self.commit {
                CommitPolicy::Always => true,
                CommitPolicy::IfFullyFunded => result.can_fully_rebalance,
                CommitPolicy::Never => false,
            };

        let state_after = if committed {
            commit_rebalance(state, self.price, &result)
        } else {
            state.clone()
        };

        Ok(StepOutcome {
            price: self.price,
            price_drop_pct,
            result,
            committed,
            state_after,
        })
    }
}

/// Fold an evaluated rebalance into the next loan state.
///
/// `principal`, `target_ltv_ratio`, and `initial_cash` carry forward
/// unchanged; collateral and cash come from the result, and the new price
/// becomes the snapshot's reference price.
pub fn commit_rebalance(
    state: &LoanState,
    new_price: f64,
    result: &RebalanceResult,
) -> LoanState {
    LoanState {
        collateral_amount: result.new_collateral_total,
        reference_price: new_price,
        target_ltv_ratio: state.target_ltv_ratio,
        principal: state.principal,
        initial_cash: state.initial_cash,
        remaining_cash: result.cash_remaining,
    }
}

/// Where a chain of scenarios left the loan.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PositionSummary {
    pub collateral_amount: f64,
    pub collateral_value: f64,
    pub remaining_cash: f64,
    pub current_ltv: f64,
    /// Portion of the original cash reserve spent across the chain.
    pub cash_spent: f64,
}

impl PositionSummary {
    pub fn of(state: &LoanState) -> Self {
        Self {
            collateral_amount: state.collateral_amount,
            collateral_value: state.collateral_value(),
            remaining_cash: state.remaining_cash,
            current_ltv: state.principal / state.collateral_value() * 100.0,
            cash_spent: state.initial_cash - state.remaining_cash,
        }
    }
}

/// Full record of a scenario chain run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScenarioReport {
    /// Reference price of the chain's starting state.
    pub initial_price: f64,
    pub outcomes: Vec<StepOutcome>,
    pub final_state: LoanState,
}

impl ScenarioReport {
    pub fn summary(&self) -> PositionSummary {
        PositionSummary::of(&self.final_state)
    }
}

/// Run a chain of scenario steps, threading each step's resulting state
/// into the next.
pub fn run(initial: &LoanState, steps: &[ScenarioStep]) -> Result<ScenarioReport, AppError> {
    initial.validate()?;

    let initial_price = initial.reference_price;
    let mut state = initial.clone();
    let mut outcomes = Vec::with_capacity(steps.len());

    for step in steps {
        let outcome = step.execute(&state, initial_price)?;
        tracing::debug!(
            price = step.price,
            ltv_trigger = step.ltv_trigger,
            needs_rebalance = outcome.result.needs_rebalance,
            committed = outcome.committed,
            "Scenario step evaluated"
        );
        state = outcome.state_after.clone();
        outcomes.push(outcome);
    }

    Ok(ScenarioReport {
        initial_price,
        outcomes,
        final_state: state,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base_state() -> LoanState {
        LoanState::originate(1.0, 20_000.0, 50.0).unwrap()
    }

    fn assert_close(actual: f64, expected: f64) {
        let tolerance = 1e-9 * expected.abs().max(1.0);
        assert!(
            (actual - expected).abs() <= tolerance,
            "expected {expected}, got {actual}"
        );
    }

    #[test]
    fn test_commit_carries_fixed_fields_forward() {
        let state = base_state();
        let result = RebalanceEngine::evaluate(&state, 10_000.0, 70.0).unwrap();
        let next = commit_rebalance(&state, 10_000.0, &result);

        assert_eq!(next.principal, state.principal);
        assert_eq!(next.target_ltv_ratio, state.target_ltv_ratio);
        assert_eq!(next.initial_cash, state.initial_cash);
        assert_eq!(next.reference_price, 10_000.0);
        assert_close(next.collateral_amount, 2.0);
        assert_close(next.remaining_cash, 0.0);
    }

    #[test]
    fn test_step_without_trigger_leaves_state_untouched() {
        let state = base_state();
        let step = ScenarioStep {
            price: 15_000.0,
            ltv_trigger: 70.0,
            commit: CommitPolicy::Always,
        };
        let outcome = step.execute(&state, state.reference_price).unwrap();

        assert!(!outcome.result.needs_rebalance);
        assert!(!outcome.committed);
        assert_eq!(outcome.state_after, state);
        assert_eq!(outcome.price_drop_pct, 25.0);
    }

    #[test]
    fn test_if_fully_funded_skips_constrained_commit() {
        let state = LoanState::new(1.0, 20_000.0, 50.0, 10_000.0, 4_000.0, 4_000.0).unwrap();
        let step = ScenarioStep {
            price: 10_000.0,
            ltv_trigger: 70.0,
            commit: CommitPolicy::IfFullyFunded,
        };
        let outcome = step.execute(&state, 20_000.0).unwrap();

        assert!(outcome.result.needs_rebalance);
        assert!(!outcome.result.can_fully_rebalance);
        assert!(!outcome.committed);
        assert_eq!(outcome.state_after, state);
    }

    #[test]
    fn test_always_commits_constrained_rebalance() {
        let state = LoanState::new(1.0, 20_000.0, 50.0, 10_000.0, 4_000.0, 4_000.0).unwrap();
        let step = ScenarioStep {
            price: 10_000.0,
            ltv_trigger: 70.0,
            commit: CommitPolicy::Always,
        };
        let outcome = step.execute(&state, 20_000.0).unwrap();

        assert!(outcome.committed);
        assert_close(outcome.state_after.collateral_amount, 1.4);
        assert_eq!(outcome.state_after.remaining_cash, 0.0);
    }

    #[test]
    fn test_never_policy_only_evaluates() {
        let state = base_state();
        let step = ScenarioStep {
            price: 10_000.0,
            ltv_trigger: 70.0,
            commit: CommitPolicy::Never,
        };
        let outcome = step.execute(&state, 20_000.0).unwrap();

        assert!(outcome.result.needs_rebalance);
        assert!(!outcome.committed);
        assert_eq!(outcome.state_after, state);
    }

    #[test]
    fn test_run_threads_state_between_steps() {
        let state = base_state();
        let steps = vec![
            ScenarioStep {
                price: 15_000.0,
                ltv_trigger: 70.0,
                commit: CommitPolicy::Always,
            },
            ScenarioStep {
                price: 10_000.0,
                ltv_trigger: 70.0,
                commit: CommitPolicy::Always,
            },
        ];
        let report = run(&state, &steps).unwrap();

        assert_eq!(report.initial_price, 20_000.0);
        assert_eq!(report.outcomes.len(), 2);
        // First drop is below the trigger, second triggers a full rebalance
        assert!(!report.outcomes[0].result.needs_rebalance);
        assert!(report.outcomes[1].committed);
        assert_close(report.final_state.collateral_amount, 2.0);
        assert_close(report.final_state.remaining_cash, 0.0);

        // Drops are measured from the chain's original price
        assert_eq!(report.outcomes[0].price_drop_pct, 25.0);
        assert_eq!(report.outcomes[1].price_drop_pct, 50.0);
    }

    #[test]
    fn test_remaining_cash_never_increases_along_chain() {
        let state = base_state();
        let steps = vec![
            ScenarioStep {
                price: 14_000.0,
                ltv_trigger: 70.0,
                commit: CommitPolicy::Always,
            },
            ScenarioStep {
                price: 11_000.0,
                ltv_trigger: 65.0,
                commit: CommitPolicy::Always,
            },
            ScenarioStep {
                price: 9_000.0,
                ltv_trigger: 60.0,
                commit: CommitPolicy::Always,
            },
        ];
        let report = run(&state, &steps).unwrap();

        let mut cash = state.remaining_cash;
        for outcome in &report.outcomes {
            assert!(outcome.state_after.remaining_cash <= cash);
            assert_eq!(outcome.state_after.principal, state.principal);
            assert_eq!(outcome.state_after.initial_cash, state.initial_cash);
            cash = outcome.state_after.remaining_cash;
        }
    }

    #[test]
    fn test_summary_reflects_final_position() {
        let state = base_state();
        let steps = vec![ScenarioStep {
            price: 10_000.0,
            ltv_trigger: 70.0,
            commit: CommitPolicy::Always,
        }];
        let report = run(&state, &steps).unwrap();
        let summary = report.summary();

        assert_close(summary.collateral_amount, 2.0);
        assert_close(summary.collateral_value, 20_000.0);
        assert_close(summary.current_ltv, 50.0);
        assert_close(summary.cash_spent, 10_000.0);
        assert_close(summary.remaining_cash, 0.0);
    }
}
