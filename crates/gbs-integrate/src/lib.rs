#![forbid(unsafe_code)]

//! Adaptive Bulirsch–Stoer integration for systems of first-order ODEs.
//!
//! The whole span is treated as one interval. Gragg's modified midpoint
//! method is refined by Richardson extrapolation until the error estimate
//! meets `H * delta`; intervals that do not converge within `max_order`
//! rows are bisected.

pub mod api;
pub mod config;
pub mod controller;
pub mod evaluator;
pub mod extrapolation;
pub mod midpoint;
pub mod solver;
pub mod systems;
pub mod trajectory;
pub mod validation;

pub use api::{IntegrateError, IntegrationResult, integrate};
pub use config::{
    BulirschStoerConfig, DEFAULT_DELTA, DEFAULT_LEDGER_CAPACITY, DEFAULT_MAX_DEPTH,
    DEFAULT_MAX_ORDER, DEFAULT_MAX_VAL, ExhaustionPolicy,
};
pub use controller::{
    BulirschStoerSolver, IntegrationStats, StepAction, StepEvidence, StepWarning,
};
pub use evaluator::{DerivativeEvaluator, clamp_component};
pub use extrapolation::{ExtrapolationTable, euclidean_norm, richardson_denominator};
pub use midpoint::{evaluations_per_step, modified_midpoint_step};
pub use solver::{OdeSolver, OdeSolverState, StepFailure, StepOutcome};
pub use systems::{Brusselator, ExponentialDecay, ProjectileWithDrag};
pub use trajectory::{Sample, Trajectory};
pub use validation::{
    EPS, IntegrateValidationError, MAX_ORDER, MIN_DELTA, MIN_ORDER, ToleranceWarning,
    ValidatedTolerance, validate_initial_state, validate_max_order, validate_min_width,
    validate_time_span, validate_tolerance,
};
