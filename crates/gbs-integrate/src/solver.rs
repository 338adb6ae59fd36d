#![forbid(unsafe_code)]

use gbs_runtime::RuntimeMode;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OdeSolverState {
    Running,
    Finished,
    Failed,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepOutcome {
    pub message: Option<String>,
    pub state: OdeSolverState,
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum StepFailure {
    #[error("{0}")]
    RuntimeError(&'static str),
    #[error(
        "accuracy unattainable at t = {t} (width {width:e}): error {error:e} exceeds target {target:e}."
    )]
    AccuracyUnattainable {
        t: f64,
        width: f64,
        error: f64,
        target: f64,
    },
    #[error("non-finite derivative at t = {t} (component {index}).")]
    NonFiniteState { t: f64, index: usize },
    #[error("derivative has wrong dimension: expected {expected}, got {actual}.")]
    DimensionMismatch { expected: usize, actual: usize },
}

pub trait OdeSolver {
    fn mode(&self) -> RuntimeMode;

    fn state(&self) -> OdeSolverState;

    fn step(&mut self) -> Result<StepOutcome, StepFailure>;
}
