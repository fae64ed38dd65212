//! LTV and price arithmetic shared by the engine modules.
//!
//! LTV is always expressed as a percentage: `principal / collateral_value * 100`.

use loanguard_common::error::AppError;

/// LTV of a loan at the given price, as a percentage.
pub fn current_ltv(principal: f64, collateral_amount: f64, price: f64) -> Result<f64, AppError> {
    if !(principal.is_finite() && principal > 0.0) {
        return Err(AppError::InvalidInput(format!(
            "principal must be positive, got {principal}"
        )));
    }
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
    Ok(principal / (collateral_amount * price) * 100.0)
}

/// Percentage drop from `initial_price` to `current_price`.
///
/// Positive means the price fell, negative means it rose.
pub fn price_drop_percent(initial_price: f64, current_price: f64) -> Result<f64, AppError> {
    if !(initial_price.is_finite() && initial_price > 0.0) {
        return Err(AppError::InvalidInput(format!(
            "initial_price must be positive, got {initial_price}"
        )));
    }
    if !current_price.is_finite() {
        return Err(AppError::InvalidInput(format!(
            "current_price must be finite, got {current_price}"
        )));
    }
    Ok((initial_price - current_price) / initial_price * 100.0)
}

/// Price at which the loan would sit exactly at `ltv_percent`, without
/// buying or selling collateral.
pub fn price_at_ltv(
    principal: f64,
    collateral_amount: f64,
    ltv_percent: f64,
) -> Result<f64, AppError> {
    if !(principal.is_finite() && principal > 0.0) {
        return Err(AppError::InvalidInput(format!(
            "principal must be positive, got {principal}"
        )));
    }
    if !(collateral_amount.is_finite() && collateral_amount > 0.0) {
        return Err(AppError::InvalidInput(format!(
            "collateral_amount must be positive, got {collateral_amount}"
        )));
    }
    if !ltv_percent.is_finite() || ltv_percent <= 0.0 || ltv_percent > 100.0 {
        return Err(AppError::InvalidInput(format!(
            "ltv_percent must be in (0, 100], got {ltv_percent}"
        )));
    }
    Ok(principal / (collateral_amount * (ltv_percent / 100.0)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_current_ltv() {
        // 10k principal against 1 BTC at 20k → 50%
        assert_eq!(current_ltv(10_000.0, 1.0, 20_000.0).unwrap(), 50.0);
        // Same loan at 10k → 100%
        assert_eq!(current_ltv(10_000.0, 1.0, 10_000.0).unwrap(), 100.0);
    }

    #[test]
    fn test_current_ltv_rejects_invalid() {
        assert!(current_ltv(0.0, 1.0, 20_000.0).is_err());
        assert!(current_ltv(10_000.0, 0.0, 20_000.0).is_err());
        assert!(current_ltv(10_000.0, 1.0, 0.0).is_err());
        assert!(current_ltv(10_000.0, 1.0, -5.0).is_err());
    }

    #[test]
    fn test_price_drop_unchanged_is_zero() {
        assert_eq!(price_drop_percent(20_000.0, 20_000.0).unwrap(), 0.0);
    }

    #[test]
    fn test_price_drop_halved_is_fifty() {
        assert_eq!(price_drop_percent(20_000.0, 10_000.0).unwrap(), 50.0);
    }

    #[test]
    fn test_price_drop_doubled_is_minus_hundred() {
        assert_eq!(price_drop_percent(20_000.0, 40_000.0).unwrap(), -100.0);
    }

    #[test]
    fn test_price_drop_rejects_non_positive_initial() {
        assert!(price_drop_percent(0.0, 10_000.0).is_err());
        assert!(price_drop_percent(-1.0, 10_000.0).is_err());
    }

    #[test]
    fn test_price_at_ltv() {
        // 10k principal, 1 BTC: 50% LTV at 20k, 70% at ~14285.71
        assert_eq!(price_at_ltv(10_000.0, 1.0, 50.0).unwrap(), 20_000.0);
        let p70 = price_at_ltv(10_000.0, 1.0, 70.0).unwrap();
        assert!((p70 - 14_285.714_285_714_286).abs() < 1e-9);
    }

    #[test]
    fn test_price_at_ltv_rejects_out_of_range() {
        assert!(price_at_ltv(10_000.0, 1.0, 0.0).is_err());
        assert!(price_at_ltv(10_000.0, 1.0, 101.0).is_err());
        assert!(price_at_ltv(10_000.0, 0.0, 50.0).is_err());
    }
}
