//! Internal helpers for model validation and conversion.
//!
//! These utilities are **not** part of the public API. They centralize
//! validation and mapping logic so the engine enforces consistent invariants.

use uuid::Uuid;

use crate::{EngineError, ResultEngine};

/// Parse a UUID from storage and return a labeled error on failure.
pub(crate) fn parse_uuid(value: &str, label: &str) -> ResultEngine<Uuid> {
    Uuid::parse_str(value).map_err(|_| EngineError::InvalidId(format!("invalid {label} id")))
}

/// Trim an account key and reject empty ones.
pub(crate) fn normalize_account_key(value: &str) -> ResultEngine<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(EngineError::InvalidId(
            "account key must not be empty".to_string(),
        ));
    }
    Ok(trimmed.to_string())
}

/// Amounts must be finite; `label` names the operation in the error.
pub(crate) fn ensure_finite(amount: f64, label: &str) -> ResultEngine<()> {
    if !amount.is_finite() {
        return Err(EngineError::InvalidAmount(format!(
            "{label} amount must be a finite number"
        )));
    }
    Ok(())
}

/// Deposit/subtract amounts must be finite and not negative.
pub(crate) fn ensure_non_negative(amount: f64, label: &str) -> ResultEngine<()> {
    ensure_finite(amount, label)?;
    if amount < 0.0 {
        return Err(EngineError::InvalidAmount(format!(
            "{label} amount must be >= 0"
        )));
    }
    Ok(())
}
