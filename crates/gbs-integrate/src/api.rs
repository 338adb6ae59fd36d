#![forbid(unsafe_code)]

use gbs_runtime::EvidenceLedger;
use thiserror::Error;

use crate::config::BulirschStoerConfig;
use crate::controller::{BulirschStoerSolver, StepEvidence, StepWarning};
use crate::solver::{OdeSolver, OdeSolverState, StepFailure};
use crate::trajectory::Trajectory;
use crate::validation::{IntegrateValidationError, ToleranceWarning};

#[derive(Debug, Clone, PartialEq, Error)]
pub enum IntegrateError {
    #[error(transparent)]
    Validation(#[from] IntegrateValidationError),
    #[error(transparent)]
    Step(#[from] StepFailure),
}

#[derive(Debug, Clone, PartialEq)]
pub struct IntegrationResult {
    pub trajectory: Trajectory,
    pub nfev: usize,
    /// Intervals whose estimate was appended to the trajectory.
    pub accepted: usize,
    pub bisections: usize,
    pub max_depth_reached: usize,
    pub tolerance_warnings: Vec<ToleranceWarning>,
    pub warnings: Vec<StepWarning>,
    pub ledger: EvidenceLedger<StepEvidence>,
}

impl IntegrationResult {
    /// Last accepted state, at `t_f`.
    #[must_use]
    pub fn final_state(&self) -> Option<&[f64]> {
        self.trajectory.last().map(|s| s.y.as_slice())
    }

    /// `true` when every interval met its error target.
    #[must_use]
    pub fn tolerance_met(&self) -> bool {
        self.warnings.is_empty()
    }
}

/// Integrate `dy/dt = fun(t, y)` from `y0` over `t_span` with the
/// Bulirsch–Stoer method.
///
/// All input is validated before the first evaluation. The whole span is
/// handed to the controller as one interval; subdivision happens there.
/// A zero-width span returns the initial sample alone.
pub fn integrate<F>(
    fun: F,
    y0: &[f64],
    t_span: (f64, f64),
    config: &BulirschStoerConfig,
) -> Result<IntegrationResult, IntegrateError>
where
    F: FnMut(f64, &[f64]) -> Vec<f64>,
{
    let mut solver = BulirschStoerSolver::new(fun, y0, t_span, config)?;

    while solver.state() == OdeSolverState::Running {
        solver.step()?;
    }

    Ok(solver.into_result())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ExhaustionPolicy;
    use gbs_runtime::RuntimeMode;

    #[test]
    fn integrate_exponential_decay() {
        let config = BulirschStoerConfig::default().with_delta(1e-8);
        let result = integrate(|_t, y| vec![-y[0]], &[1.0], (0.0, 1.0), &config)
            .expect("integrate works");
        let y = result.final_state().expect("non-empty")[0];
        assert!((y - (-1.0_f64).exp()).abs() < 1e-6, "got {y}");
        assert!(result.tolerance_met());
        assert!(result.nfev > 0);
        assert_eq!(result.trajectory.last().map(|s| s.t), Some(1.0));
    }

    #[test]
    fn integrate_harmonic_oscillator() {
        let config = BulirschStoerConfig::default();
        let t_end = 2.0 * std::f64::consts::PI;
        let result = integrate(|_t, y| vec![y[1], -y[0]], &[1.0, 0.0], (0.0, t_end), &config)
            .expect("integrate works");
        let y = result.final_state().expect("non-empty");
        assert!((y[0] - 1.0).abs() < 1e-7, "x = {}", y[0]);
        assert!(y[1].abs() < 1e-7, "v = {}", y[1]);
    }

    #[test]
    fn integrate_zero_width_span() {
        let mut calls = 0;
        let result = integrate(
            |_t, y: &[f64]| {
                calls += 1;
                y.to_vec()
            },
            &[3.0, 4.0],
            (1.5, 1.5),
            &BulirschStoerConfig::default(),
        )
        .expect("zero width is valid");
        assert_eq!(result.trajectory.len(), 1);
        assert_eq!(result.final_state(), Some(&[3.0, 4.0][..]));
        assert_eq!(result.nfev, 0);
        assert_eq!(calls, 0);
        assert!(result.ledger.is_empty());
    }

    #[test]
    fn integrate_rejects_before_evaluating() {
        let mut calls = 0;
        let err = integrate(
            |_t, y: &[f64]| {
                calls += 1;
                y.to_vec()
            },
            &[1.0],
            (1.0, 0.0),
            &BulirschStoerConfig::default(),
        )
        .expect_err("reversed span");
        assert!(matches!(
            err,
            IntegrateError::Validation(IntegrateValidationError::ReversedTimeSpan { .. })
        ));
        assert_eq!(calls, 0);
    }

    #[test]
    fn integrate_rejects_oversized_order_from_fixture() {
        let config: BulirschStoerConfig =
            serde_json::from_str(r#"{"max_order": 18446744073709551615}"#).expect("parses");
        let err = integrate(|_t, y| vec![-y[0]], &[1.0], (0.0, 1.0), &config)
            .expect_err("table would be unallocatable");
        assert_eq!(
            err,
            IntegrateError::Validation(IntegrateValidationError::MaxOrderTooLarge {
                maximum: crate::validation::MAX_ORDER,
                actual: usize::MAX
            })
        );
    }

    #[test]
    fn integrate_surfaces_exhaustion() {
        let config = BulirschStoerConfig::default()
            .with_delta(0.0)
            .with_min_width(0.05);
        let err = integrate(|_t, y| vec![-y[0]], &[1.0], (0.0, 1.0), &config)
            .expect_err("delta = 0 never converges");
        assert!(matches!(
            err,
            IntegrateError::Step(StepFailure::AccuracyUnattainable { .. })
        ));
        assert!(err.to_string().starts_with("accuracy unattainable"));
    }

    #[test]
    fn integrate_best_estimate_covers_span() {
        let config = BulirschStoerConfig::default()
            .with_delta(0.0)
            .with_min_width(0.05)
            .with_exhaustion(ExhaustionPolicy::AcceptBestEstimate);
        let result = integrate(|_t, y| vec![-y[0]], &[1.0], (0.0, 1.0), &config)
            .expect("best estimate accepted");
        // 1 -> 1/16 wide leaves; halves of 0.0625 would be below 0.05
        assert_eq!(result.trajectory.len(), 17);
        assert_eq!(result.accepted, 16);
        assert_eq!(result.bisections, 15);
        assert_eq!(result.max_depth_reached, 4);
        assert_eq!(result.warnings.len(), 16);
        assert!(!result.tolerance_met());
        let y = result.final_state().expect("non-empty")[0];
        assert!((y - (-1.0_f64).exp()).abs() < 1e-10);
    }

    #[test]
    fn integrate_carries_tolerance_warnings() {
        let config = BulirschStoerConfig::default()
            .with_delta(1e-15)
            .with_min_width(1e-3)
            .with_exhaustion(ExhaustionPolicy::AcceptBestEstimate);
        let result = integrate(|_t, y| vec![-y[0]], &[1.0], (0.0, 0.01), &config)
            .expect("best estimate accepted");
        assert_eq!(
            result.tolerance_warnings,
            vec![ToleranceWarning::DeltaBelowRoundoff {
                minimum: crate::validation::MIN_DELTA
            }]
        );
    }

    #[test]
    fn integrate_hardened_non_finite() {
        let config = BulirschStoerConfig::default().with_mode(RuntimeMode::Hardened);
        let err = integrate(|_t, _y| vec![f64::INFINITY], &[0.0], (0.0, 1.0), &config)
            .expect_err("infinite derivative");
        assert_eq!(
            err,
            IntegrateError::Step(StepFailure::NonFiniteState { t: 0.0, index: 0 })
        );
    }
}
