#![forbid(unsafe_code)]

use gbs_runtime::RuntimeMode;
use thiserror::Error;

pub const EPS: f64 = f64::EPSILON;
/// Smallest error density that is not dominated by roundoff in the table.
pub const MIN_DELTA: f64 = 100.0 * EPS;
/// Row 2 is the first row that carries an error estimate.
pub const MIN_ORDER: usize = 2;
/// Row cap; beyond this the `(n/(n-1))^(2(m-1))` divisors are 1 to roundoff.
pub const MAX_ORDER: usize = 64;

#[derive(Debug, Clone, PartialEq)]
pub enum ToleranceWarning {
    DeltaBelowRoundoff { minimum: f64 },
}

#[derive(Debug, Clone, PartialEq)]
pub struct ValidatedTolerance {
    pub delta: f64,
    pub max_val: f64,
    pub mode: RuntimeMode,
    pub warnings: Vec<ToleranceWarning>,
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum IntegrateValidationError {
    #[error("`t_span` must be finite.")]
    NonFiniteTimeSpan,
    #[error("`t_span` must not be reversed (t0 = {t0}, tf = {tf}).")]
    ReversedTimeSpan { t0: f64, tf: f64 },
    #[error("`y0` must not be empty.")]
    EmptyState,
    #[error("`y0` must be finite (component {index}).")]
    NonFiniteInitialState { index: usize },
    #[error("`delta` must be finite.")]
    DeltaNotFinite,
    #[error("`delta` must be non-negative.")]
    DeltaMustBeNonNegative,
    #[error("`max_val` must be positive.")]
    MaxValMustBePositive,
    #[error("`max_val` must be finite in hardened mode.")]
    MaxValMustBeFinite,
    #[error("`max_order` must be at least {minimum} (got {actual}).")]
    MaxOrderTooSmall { minimum: usize, actual: usize },
    #[error("`max_order` must be at most {maximum} (got {actual}).")]
    MaxOrderTooLarge { maximum: usize, actual: usize },
    #[error("`min_width` must be non-negative.")]
    MinWidthMustBeNonNegative,
}

/// Validate the integration span and return its width.
///
/// A zero-width span is valid; the driver returns the initial sample alone.
pub fn validate_time_span(t0: f64, tf: f64) -> Result<f64, IntegrateValidationError> {
    if !t0.is_finite() || !tf.is_finite() {
        return Err(IntegrateValidationError::NonFiniteTimeSpan);
    }
    if tf < t0 {
        return Err(IntegrateValidationError::ReversedTimeSpan { t0, tf });
    }
    let width = tf - t0;
    if !width.is_finite() {
        return Err(IntegrateValidationError::NonFiniteTimeSpan);
    }
    Ok(width)
}

/// Validate the initial state and return its dimension.
pub fn validate_initial_state(y0: &[f64]) -> Result<usize, IntegrateValidationError> {
    if y0.is_empty() {
        return Err(IntegrateValidationError::EmptyState);
    }
    if let Some(index) = y0.iter().position(|v| !v.is_finite()) {
        return Err(IntegrateValidationError::NonFiniteInitialState { index });
    }
    Ok(y0.len())
}

pub fn validate_tolerance(
    delta: f64,
    max_val: f64,
    mode: RuntimeMode,
) -> Result<ValidatedTolerance, IntegrateValidationError> {
    if delta.is_nan() || delta.is_infinite() {
        return Err(IntegrateValidationError::DeltaNotFinite);
    }
    if delta < 0.0 {
        return Err(IntegrateValidationError::DeltaMustBeNonNegative);
    }

    if max_val.is_nan() || max_val <= 0.0 {
        return Err(IntegrateValidationError::MaxValMustBePositive);
    }
    if mode == RuntimeMode::Hardened && max_val.is_infinite() {
        return Err(IntegrateValidationError::MaxValMustBeFinite);
    }

    let mut warnings = Vec::new();
    if delta > 0.0 && delta < MIN_DELTA {
        warnings.push(ToleranceWarning::DeltaBelowRoundoff { minimum: MIN_DELTA });
    }

    Ok(ValidatedTolerance {
        delta,
        max_val,
        mode,
        warnings,
    })
}

pub fn validate_max_order(max_order: usize) -> Result<usize, IntegrateValidationError> {
    if max_order < MIN_ORDER {
        return Err(IntegrateValidationError::MaxOrderTooSmall {
            minimum: MIN_ORDER,
            actual: max_order,
        });
    }
    if max_order > MAX_ORDER {
        return Err(IntegrateValidationError::MaxOrderTooLarge {
            maximum: MAX_ORDER,
            actual: max_order,
        });
    }
    Ok(max_order)
}

pub fn validate_min_width(min_width: f64) -> Result<f64, IntegrateValidationError> {
    if min_width.is_nan() || min_width < 0.0 {
        return Err(IntegrateValidationError::MinWidthMustBeNonNegative);
    }
    Ok(min_width)
}
