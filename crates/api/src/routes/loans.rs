//! Loan evaluation routes.
//!
//! These handlers are callers of the core: they resolve prices, thread
//! state through scenario chains, and attach assessments. All decision
//! logic stays in `loanguard-engine`.

use axum::extract::State;
use axum::routing::post;
use axum::{Json, Router};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use loanguard_common::error::AppError;
use loanguard_common::types::{AssessmentPayload, LoanState, RebalanceResult};
use loanguard_engine::assessor::RebalanceAssessor;
use loanguard_engine::rebalance::RebalanceEngine;
use loanguard_engine::scenario::{CommitPolicy, PositionSummary, ScenarioStep, StepOutcome};
use loanguard_feed::source::PriceSource;

use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/loans/evaluate", post(evaluate_loan))
        .route("/api/loans/scenarios", post(run_scenarios))
}

#[derive(Debug, Deserialize)]
pub struct EvaluateRequest {
    pub state: LoanState,
    pub price: PriceSource,
    pub ltv_trigger: f64,
}

#[derive(Debug, Serialize)]
pub struct EvaluateResponse {
    pub id: Uuid,
    pub evaluated_at: DateTime<Utc>,
    /// Resolved price the evaluation ran at.
    pub price: f64,
    pub result: RebalanceResult,
    pub assessment: AssessmentPayload,
}

/// POST /api/loans/evaluate — Evaluate one loan state against a price
/// and LTV trigger.
async fn evaluate_loan(
    State(state): State<AppState>,
    Json(req): Json<EvaluateRequest>,
) -> Result<Json<EvaluateResponse>, AppError> {
    req.state.validate()?;

    let price = req.price.resolve(&state.feed, &req.state).await?;
    let result = RebalanceEngine::evaluate(&req.state, price, req.ltv_trigger)?;
    let assessment = RebalanceAssessor::assess(&req.state, &result);

    tracing::info!(
        price,
        ltv_trigger = req.ltv_trigger,
        needs_rebalance = result.needs_rebalance,
        can_fully_rebalance = result.can_fully_rebalance,
        "Loan evaluated"
    );

    Ok(Json(EvaluateResponse {
        id: Uuid::new_v4(),
        evaluated_at: Utc::now(),
        price,
        result,
        assessment,
    }))
}

#[derive(Debug, Deserialize)]
pub struct ScenarioStepRequest {
    pub price: PriceSource,
    pub ltv_trigger: f64,
    pub commit: CommitPolicy,
}

#[derive(Debug, Deserialize)]
pub struct ScenariosRequest {
    pub collateral_amount: f64,
    pub initial_price: PriceSource,
    pub target_ltv_ratio: f64,
    pub steps: Vec<ScenarioStepRequest>,
}

#[derive(Debug, Serialize)]
pub struct AssessedOutcome {
    #[serde(flatten)]
    pub outcome: StepOutcome,
    pub assessment: AssessmentPayload,
}

#[derive(Debug, Serialize)]
pub struct ScenariosResponse {
    pub id: Uuid,
    pub evaluated_at: DateTime<Utc>,
    pub initial_price: f64,
    pub initial_state: LoanState,
    pub outcomes: Vec<AssessedOutcome>,
    pub summary: PositionSummary,
}

/// POST /api/loans/scenarios — Originate a loan and run a chain of
/// what-if steps against it.
///
/// Step prices are resolved against the EVOLVING state, so an `at_ltv`
/// source in step 2 sees the collateral bought in step 1.
async fn run_scenarios(
    State(state): State<AppState>,
    Json(req): Json<ScenariosRequest>,
) -> Result<Json<ScenariosResponse>, AppError> {
    let initial_price = match req.initial_price {
        PriceSource::Manual { price } => price,
        PriceSource::Live { fallback } => match state.feed.current_price().await {
            Some(price) => price,
            None => {
                tracing::warn!(fallback, "Live price unavailable, using fallback");
                fallback
            }
        },
        PriceSource::AtLtv { .. } => {
            return Err(AppError::InvalidInput(
                "initial price cannot be derived from an LTV level".to_string(),
            ));
        }
    };

    let initial_state =
        LoanState::originate(req.collateral_amount, initial_price, req.target_ltv_ratio)?;

    let mut loan = initial_state.clone();
    let mut outcomes = Vec::with_capacity(req.steps.len());

    for step_req in &req.steps {
        let price = step_req.price.resolve(&state.feed, &loan).await?;
        let step = ScenarioStep {
            price,
            ltv_trigger: step_req.ltv_trigger,
            commit: step_req.commit,
        };
        let outcome = step.execute(&loan, initial_price)?;
        let assessment = RebalanceAssessor::assess(&loan, &outcome.result);

        loan = outcome.state_after.clone();
        outcomes.push(AssessedOutcome {
            outcome,
            assessment,
        });
    }

    tracing::info!(
        steps = outcomes.len(),
        final_ltv = loan.principal / loan.collateral_value() * 100.0,
        remaining_cash = loan.remaining_cash,
        "Scenario chain evaluated"
    );

    Ok(Json(ScenariosResponse {
        id: Uuid::new_v4(),
        evaluated_at: Utc::now(),
        initial_price,
        initial_state,
        summary: PositionSummary::of(&loan),
        outcomes,
    }))
}
