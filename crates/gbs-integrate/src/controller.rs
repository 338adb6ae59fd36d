#![forbid(unsafe_code)]

//! Bulirsch–Stoer step controller.
//!
//! Each pending interval `[t, t + H]` gets a fresh extrapolation table. Rows
//! are added for `n = 2, 3, …, max_order` until the error estimate drops
//! below `H * delta`; the interval is then accepted and `R[n][n]` appended to
//! the trajectory. An interval that does not converge is split in half.
//!
//! Subdivision runs off an explicit LIFO work-list instead of the call stack:
//! the right half is pushed before the left, so the left half is fully
//! resolved before the right half starts from its result. The depth cap
//! bounds the work-list at `max_depth + 1` entries.

use gbs_runtime::{EvidenceLedger, RuntimeMode};
use serde::{Deserialize, Serialize};

use crate::api::IntegrationResult;
use crate::config::{BulirschStoerConfig, ExhaustionPolicy};
use crate::evaluator::DerivativeEvaluator;
use crate::extrapolation::ExtrapolationTable;
use crate::midpoint::modified_midpoint_step;
use crate::solver::{OdeSolver, OdeSolverState, StepFailure, StepOutcome};
use crate::trajectory::Trajectory;
use crate::validation::{
    IntegrateValidationError, ToleranceWarning, validate_initial_state, validate_time_span,
};

#[derive(Debug, Clone, Copy, PartialEq)]
struct PendingInterval {
    t_start: f64,
    t_end: f64,
    depth: usize,
}

impl PendingInterval {
    fn width(&self) -> f64 {
        self.t_end - self.t_start
    }
}

/// Controller decision for one interval.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StepAction {
    Accepted,
    Bisected,
    Exhausted,
}

/// Ledger record of one controller decision.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StepEvidence {
    pub t_start: f64,
    pub t_end: f64,
    pub depth: usize,
    /// Table rows built before the decision.
    pub rows: usize,
    pub error: f64,
    pub target: f64,
    pub action: StepAction,
}

#[derive(Debug, Clone, PartialEq)]
pub enum StepWarning {
    /// An exhausted interval was accepted with its best estimate.
    ToleranceNotMet {
        t_start: f64,
        t_end: f64,
        error: f64,
        target: f64,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct IntegrationStats {
    pub nfev: usize,
    pub accepted: usize,
    pub bisections: usize,
    pub max_depth_reached: usize,
}

/// Adaptive extrapolation solver over a single span.
pub struct BulirschStoerSolver<F> {
    mode: RuntimeMode,
    state: OdeSolverState,
    evaluator: DerivativeEvaluator<F>,
    // Problem definition
    t: f64,
    y: Vec<f64>,
    t_bound: f64,
    // Controller parameters
    delta: f64,
    max_order: usize,
    max_depth: usize,
    min_width: f64,
    exhaustion: ExhaustionPolicy,
    // Controller state
    pending: Vec<PendingInterval>,
    trajectory: Trajectory,
    ledger: EvidenceLedger<StepEvidence>,
    tolerance_warnings: Vec<ToleranceWarning>,
    warnings: Vec<StepWarning>,
    stats: IntegrationStats,
}

impl<F> BulirschStoerSolver<F>
where
    F: FnMut(f64, &[f64]) -> Vec<f64>,
{
    /// Validate the problem and seed the trajectory with `(t0, y0)`.
    ///
    /// A zero-width span yields a solver that is already `Finished`.
    pub fn new(
        fun: F,
        y0: &[f64],
        t_span: (f64, f64),
        config: &BulirschStoerConfig,
    ) -> Result<Self, IntegrateValidationError> {
        let (t0, tf) = t_span;
        let width = validate_time_span(t0, tf)?;
        let n = validate_initial_state(y0)?;
        let tolerance = config.validate()?;

        let evaluator = DerivativeEvaluator::new(fun, n, tolerance.max_val, tolerance.mode);

        let mut pending = Vec::with_capacity(config.max_depth.min(64) + 1);
        let state = if width > 0.0 {
            pending.push(PendingInterval {
                t_start: t0,
                t_end: tf,
                depth: 0,
            });
            OdeSolverState::Running
        } else {
            OdeSolverState::Finished
        };

        Ok(Self {
            mode: tolerance.mode,
            state,
            evaluator,
            t: t0,
            y: y0.to_vec(),
            t_bound: tf,
            delta: tolerance.delta,
            max_order: config.max_order,
            max_depth: config.max_depth,
            min_width: config.min_width,
            exhaustion: config.exhaustion,
            pending,
            trajectory: Trajectory::seeded(t0, y0),
            ledger: EvidenceLedger::new(config.ledger_capacity),
            tolerance_warnings: tolerance.warnings,
            warnings: Vec::new(),
            stats: IntegrationStats::default(),
        })
    }

    /// Time of the latest accepted sample.
    pub fn t(&self) -> f64 {
        self.t
    }

    /// State at [`t()`](Self::t).
    pub fn y(&self) -> &[f64] {
        &self.y
    }

    pub fn t_bound(&self) -> f64 {
        self.t_bound
    }

    /// Intervals still waiting on the work-list.
    pub fn pending(&self) -> usize {
        self.pending.len()
    }

    pub fn trajectory(&self) -> &Trajectory {
        &self.trajectory
    }

    pub fn ledger(&self) -> &EvidenceLedger<StepEvidence> {
        &self.ledger
    }

    pub fn warnings(&self) -> &[StepWarning] {
        &self.warnings
    }

    pub fn stats(&self) -> IntegrationStats {
        IntegrationStats {
            nfev: self.evaluator.nfev(),
            ..self.stats
        }
    }

    /// Process the next pending interval: accept it, bisect it, or
    /// resolve its exhaustion.
    pub fn step_interval(&mut self) -> Result<StepOutcome, StepFailure> {
        if self.state != OdeSolverState::Running {
            return Err(StepFailure::RuntimeError(
                "Attempt to step on a finished or failed solver.",
            ));
        }

        if let Some(interval) = self.pending.pop()
            && let Err(failure) = self.process(interval)
        {
            self.state = OdeSolverState::Failed;
            return Err(failure);
        }

        if self.pending.is_empty() {
            self.state = OdeSolverState::Finished;
        }

        Ok(StepOutcome {
            message: None,
            state: self.state,
        })
    }

    fn process(&mut self, interval: PendingInterval) -> Result<(), StepFailure> {
        let width = interval.width();
        let target = width * self.delta;

        let mut table = ExtrapolationTable::with_capacity(self.max_order);
        let raw = modified_midpoint_step(&mut self.evaluator, interval.t_start, &self.y, width, 1)?;
        let _ = table.push_row(raw);

        for n in 2..=self.max_order {
            let raw =
                modified_midpoint_step(&mut self.evaluator, interval.t_start, &self.y, width, n)?;
            if let Some(error) = table.push_row(raw)
                && error < target
            {
                self.record(interval, &table, target, StepAction::Accepted);
                return self.accept(interval.t_end, &table);
            }
        }

        if let Some((left, right)) = self.bisect(interval) {
            self.record(interval, &table, target, StepAction::Bisected);
            self.pending.push(right);
            self.pending.push(left);
            self.stats.bisections += 1;
            self.stats.max_depth_reached = self.stats.max_depth_reached.max(left.depth);
            return Ok(());
        }

        self.record(interval, &table, target, StepAction::Exhausted);
        let error = table.error().unwrap_or(f64::NAN);
        match self.exhaustion {
            ExhaustionPolicy::Fail => Err(StepFailure::AccuracyUnattainable {
                t: interval.t_start,
                width,
                error,
                target,
            }),
            ExhaustionPolicy::AcceptBestEstimate => {
                self.warnings.push(StepWarning::ToleranceNotMet {
                    t_start: interval.t_start,
                    t_end: interval.t_end,
                    error,
                    target,
                });
                self.accept(interval.t_end, &table)
            }
        }
    }

    /// Split an interval unless that would pass the depth cap, the width
    /// floor, or floating-point resolution.
    fn bisect(&self, interval: PendingInterval) -> Option<(PendingInterval, PendingInterval)> {
        if interval.depth >= self.max_depth {
            return None;
        }
        let half = 0.5 * interval.width();
        if half < self.min_width {
            return None;
        }
        let mid = interval.t_start + half;
        if mid <= interval.t_start || mid >= interval.t_end {
            return None;
        }
        let depth = interval.depth + 1;
        Some((
            PendingInterval {
                t_start: interval.t_start,
                t_end: mid,
                depth,
            },
            PendingInterval {
                t_start: mid,
                t_end: interval.t_end,
                depth,
            },
        ))
    }

    fn accept(&mut self, t_end: f64, table: &ExtrapolationTable) -> Result<(), StepFailure> {
        let best = table
            .best()
            .ok_or(StepFailure::RuntimeError("extrapolation table is empty."))?;
        if let Some(index) = best.iter().position(|v| !v.is_finite()) {
            return Err(StepFailure::NonFiniteState { t: t_end, index });
        }
        self.y = best.to_vec();
        self.t = t_end;
        if !self.trajectory.push(t_end, self.y.clone()) {
            return Err(StepFailure::RuntimeError(
                "accepted sample is not after the previous one.",
            ));
        }
        self.stats.accepted += 1;
        Ok(())
    }

    fn record(
        &mut self,
        interval: PendingInterval,
        table: &ExtrapolationTable,
        target: f64,
        action: StepAction,
    ) {
        self.ledger.record(StepEvidence {
            t_start: interval.t_start,
            t_end: interval.t_end,
            depth: interval.depth,
            rows: table.rows(),
            error: table.error().unwrap_or(f64::NAN),
            target,
            action,
        });
    }

    /// Consume the solver and hand out the trajectory and run summary.
    pub fn into_result(self) -> IntegrationResult {
        let stats = self.stats();
        IntegrationResult {
            trajectory: self.trajectory,
            nfev: stats.nfev,
            accepted: stats.accepted,
            bisections: stats.bisections,
            max_depth_reached: stats.max_depth_reached,
            tolerance_warnings: self.tolerance_warnings,
            warnings: self.warnings,
            ledger: self.ledger,
        }
    }
}

impl<F> OdeSolver for BulirschStoerSolver<F>
where
    F: FnMut(f64, &[f64]) -> Vec<f64>,
{
    fn mode(&self) -> RuntimeMode {
        self.mode
    }

    fn state(&self) -> OdeSolverState {
        self.state
    }

    fn step(&mut self) -> Result<StepOutcome, StepFailure> {
        self.step_interval()
    }
}
