#![forbid(unsafe_code)]

//! Immutable run configuration for the extrapolation integrator.

use gbs_runtime::RuntimeMode;
use serde::{Deserialize, Serialize};

use crate::validation::{
    IntegrateValidationError, ValidatedTolerance, validate_max_order, validate_min_width,
    validate_tolerance,
};

pub const DEFAULT_DELTA: f64 = 1e-10;
pub const DEFAULT_MAX_VAL: f64 = 1e6;
pub const DEFAULT_MAX_ORDER: usize = 8;
pub const DEFAULT_MAX_DEPTH: usize = 64;
pub const DEFAULT_LEDGER_CAPACITY: usize = 256;

/// What the controller does with an interval that still misses its error
/// target once it can no longer be bisected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ExhaustionPolicy {
    /// Stop the run with `StepFailure::AccuracyUnattainable`.
    #[default]
    Fail,
    /// Accept the highest-order estimate, record a warning, keep going.
    AcceptBestEstimate,
}

/// Configuration for one integration run.
///
/// Every field has a default, so partial JSON fixtures deserialize.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BulirschStoerConfig {
    /// Target local error per unit time; an interval of width `H` must
    /// reach an error estimate below `H * delta`.
    pub delta: f64,
    /// Clamp bound applied to every state component before evaluation.
    pub max_val: f64,
    /// Number of table rows built before the interval is bisected.
    pub max_order: usize,
    /// Maximum bisection depth below the full span.
    pub max_depth: usize,
    /// Intervals whose halves would be narrower than this are not bisected.
    pub min_width: f64,
    pub exhaustion: ExhaustionPolicy,
    pub mode: RuntimeMode,
    /// Capacity of the per-run decision ledger.
    pub ledger_capacity: usize,
}

impl Default for BulirschStoerConfig {
    fn default() -> Self {
        Self {
            delta: DEFAULT_DELTA,
            max_val: DEFAULT_MAX_VAL,
            max_order: DEFAULT_MAX_ORDER,
            max_depth: DEFAULT_MAX_DEPTH,
            min_width: 0.0,
            exhaustion: ExhaustionPolicy::Fail,
            mode: RuntimeMode::Strict,
            ledger_capacity: DEFAULT_LEDGER_CAPACITY,
        }
    }
}

impl BulirschStoerConfig {
    #[must_use]
    pub fn with_delta(mut self, delta: f64) -> Self {
        self.delta = delta;
        self
    }

    #[must_use]
    pub fn with_max_val(mut self, max_val: f64) -> Self {
        self.max_val = max_val;
        self
    }

    #[must_use]
    pub fn with_max_order(mut self, max_order: usize) -> Self {
        self.max_order = max_order;
        self
    }

    #[must_use]
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    #[must_use]
    pub fn with_min_width(mut self, min_width: f64) -> Self {
        self.min_width = min_width;
        self
    }

    #[must_use]
    pub fn with_exhaustion(mut self, exhaustion: ExhaustionPolicy) -> Self {
        self.exhaustion = exhaustion;
        self
    }

    #[must_use]
    pub fn with_mode(mut self, mode: RuntimeMode) -> Self {
        self.mode = mode;
        self
    }

    #[must_use]
    pub fn with_ledger_capacity(mut self, ledger_capacity: usize) -> Self {
        self.ledger_capacity = ledger_capacity;
        self
    }

    /// Check every numeric parameter; returns the validated tolerance with
    /// any non-fatal warnings.
    pub fn validate(&self) -> Result<ValidatedTolerance, IntegrateValidationError> {
        validate_max_order(self.max_order)?;
        validate_min_width(self.min_width)?;
        validate_tolerance(self.delta, self.max_val, self.mode)
    }
}
