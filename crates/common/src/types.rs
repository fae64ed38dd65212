use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::AppError;

/// Immutable snapshot of a collateralized loan.
///
/// A state is created once at loan setup; every rebalance that spends cash
/// produces a fresh instance. `principal` and `initial_cash` never change
/// across a chain of derived states, and `remaining_cash` only decreases.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoanState {
    /// Units of collateral asset (BTC) held.
    pub collateral_amount: f64,
    /// Price this snapshot was taken at (not necessarily the live price).
    pub reference_price: f64,
    /// LTV percentage the loan was (re)collateralized to, in (0, 100].
    pub target_ltv_ratio: f64,
    /// Fixed loan amount, set once at origination.
    pub principal: f64,
    /// Cash reserve set aside at origination.
    pub initial_cash: f64,
    /// Cash still available to fund future rebalances.
    pub remaining_cash: f64,
}

impl LoanState {
    /// Build a validated loan state. All six fields are explicit so that
    /// chained scenarios can never silently inherit inconsistent values.
    pub fn new(
        collateral_amount: f64,
        reference_price: f64,
        target_ltv_ratio: f64,
        principal: f64,
        initial_cash: f64,
        remaining_cash: f64,
    ) -> Result<Self, AppError> {
        let state = Self {
            collateral_amount,
            reference_price,
            target_ltv_ratio,
            principal,
            initial_cash,
            remaining_cash,
        };
        state.validate()?;
        Ok(state)
    }

    /// Originate a loan from collateral, price, and target ratio.
    ///
    /// The principal is the collateral value at the target ratio, and the
    /// full principal is held back as the rebalancing cash reserve.
    pub fn originate(
        collateral_amount: f64,
        price: f64,
        target_ltv_ratio: f64,
    ) -> Result<Self, AppError> {
        if !(collateral_amount.is_finite() && collateral_amount > 0.0) {
            return Err(AppError::InvalidInput(format!(
                "collateral_amount must be positive, got {collateral_amount}"
            )));
        }
        if !(price.is_finite() && price > 0.0) {
            return Err(AppError::InvalidInput(format!(
                "price must be positive, got {price}"
            )));
        }
        let principal = collateral_amount * price * (target_ltv_ratio / 100.0);
        Self::new(
            collateral_amount,
            price,
            target_ltv_ratio,
            principal,
            principal,
            principal,
        )
    }

    /// Value of the held collateral at the snapshot's reference price.
    pub fn collateral_value(&self) -> f64 {
        self.collateral_amount * self.reference_price
    }

    /// Check the structural invariants of this state.
    ///
    /// Deserialized states (e.g. from an API request body) bypass `new`,
    /// so the engine re-validates before evaluating.
    pub fn validate(&self) -> Result<(), AppError> {
        let finite = self.collateral_amount.is_finite()
            && self.reference_price.is_finite()
            && self.target_ltv_ratio.is_finite()
            && self.principal.is_finite()
            && self.initial_cash.is_finite()
            && self.remaining_cash.is_finite();
        if !finite {
            return Err(AppError::InvalidInput(
                "loan state contains non-finite values".to_string(),
            ));
        }
        if self.collateral_amount <= 0.0 {
            return Err(AppError::InvalidInput(format!(
                "collateral_amount must be positive, got {}",
                self.collateral_amount
            )));
        }
        if self.reference_price <= 0.0 {
            return Err(AppError::InvalidInput(format!(
                "reference_price must be positive, got {}",
                self.reference_price
            )));
        }
        if self.target_ltv_ratio <= 0.0 || self.target_ltv_ratio > 100.0 {
            return Err(AppError::InvalidInput(format!(
                "target_ltv_ratio must be in (0, 100], got {}",
                self.target_ltv_ratio
            )));
        }
        if self.principal <= 0.0 {
            return Err(AppError::InvalidInput(format!(
                "principal must be positive, got {}",
                self.principal
            )));
        }
        if self.initial_cash < 0.0 {
            return Err(AppError::InvalidInput(format!(
                "initial_cash must be non-negative, got {}",
                self.initial_cash
            )));
        }
        if self.remaining_cash < 0.0 || self.remaining_cash > self.initial_cash {
            return Err(AppError::InvalidInput(format!(
                "remaining_cash must be within [0, {}], got {}",
                self.initial_cash, self.remaining_cash
            )));
        }
        Ok(())
    }
}

/// Outcome of evaluating a loan state against a new price and LTV trigger.
///
/// Purely computed; the engine never commits a result. Callers decide
/// whether to fold it into a new `LoanState`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RebalanceResult {
    /// True iff the LTV at the new price reached the trigger.
    pub needs_rebalance: bool,
    /// LTV at the new price, before any purchase.
    pub current_ltv: f64,
    /// Collateral units actually bought (capped by available cash).
    pub collateral_to_buy: f64,
    /// Cash actually spent on the purchase.
    pub cash_used: f64,
    /// Cash left after the purchase.
    pub cash_remaining: f64,
    /// Whether available cash covers a full restoration of the target ratio.
    pub can_fully_rebalance: bool,
    /// Collateral units held after the (possibly partial) purchase.
    pub new_collateral_total: f64,
    /// LTV after the purchase, at the new price.
    pub new_ltv: f64,
    /// Cash a FULL rebalance would require, independent of availability.
    pub total_cash_required: f64,
    /// Collateral units a FULL rebalance would require.
    pub total_collateral_needed: f64,
}

/// Alert severity levels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Info,
    Warning,
    Critical,
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Severity::Info => write!(f, "info"),
            Severity::Warning => write!(f, "warning"),
            Severity::Critical => write!(f, "critical"),
        }
    }
}

/// Human-readable summary of a rebalance decision, ready for any renderer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssessmentPayload {
    /// Short title (e.g., "Rebalancing Needed")
    pub title: String,
    /// Detailed body message
    pub body: String,
    /// Decision severity
    pub severity: Severity,
    /// Raw figures for renderer-specific formatting
    pub metadata: serde_json::Value,
}

/// A market price obtained from an external feed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PriceQuote {
    pub price: f64,
    /// Trading pair the quote is for (e.g., "BTC/EUR")
    pub pair: String,
    /// Where the quote came from (e.g., "coingecko")
    pub source: String,
    pub fetched_at: DateTime<Utc>,
}
