#![forbid(unsafe_code)]

//! Clamped right-hand-side evaluation.
//!
//! Every state handed to the system is first clamped component-wise to
//! `[-max_val, max_val]`, so a transiently large intermediate stage inside
//! the midpoint stepper cannot overflow the derivative and poison the
//! extrapolation table.

use gbs_runtime::RuntimeMode;

use crate::solver::StepFailure;

/// Clamp a value to `[-max_val, max_val]`. NaN passes through unchanged.
#[must_use]
pub fn clamp_component(value: f64, max_val: f64) -> f64 {
    if value > max_val {
        max_val
    } else if value < -max_val {
        -max_val
    } else {
        value
    }
}

/// Wraps the caller's right-hand side with the clamp bound, a dimension
/// check, and an evaluation counter.
pub struct DerivativeEvaluator<F> {
    fun: F,
    max_val: f64,
    dimension: usize,
    mode: RuntimeMode,
    scratch: Vec<f64>,
    nfev: usize,
}

impl<F> DerivativeEvaluator<F>
where
    F: FnMut(f64, &[f64]) -> Vec<f64>,
{
    pub fn new(fun: F, dimension: usize, max_val: f64, mode: RuntimeMode) -> Self {
        Self {
            fun,
            max_val,
            dimension,
            mode,
            scratch: vec![0.0; dimension],
            nfev: 0,
        }
    }

    /// Evaluate `f(t, clamp(y))`.
    pub fn eval(&mut self, t: f64, y: &[f64]) -> Result<Vec<f64>, StepFailure> {
        for (dst, &src) in self.scratch.iter_mut().zip(y.iter()) {
            *dst = clamp_component(src, self.max_val);
        }
        let dydt = (self.fun)(t, &self.scratch);
        self.nfev += 1;

        if dydt.len() != self.dimension {
            return Err(StepFailure::DimensionMismatch {
                expected: self.dimension,
                actual: dydt.len(),
            });
        }
        if self.mode.checks_finite()
            && let Some(index) = dydt.iter().position(|v| !v.is_finite())
        {
            return Err(StepFailure::NonFiniteState { t, index });
        }
        Ok(dydt)
    }

    #[must_use]
    pub fn nfev(&self) -> usize {
        self.nfev
    }

    #[must_use]
    pub fn dimension(&self) -> usize {
        self.dimension
    }

    #[must_use]
    pub fn max_val(&self) -> f64 {
        self.max_val
    }
}
