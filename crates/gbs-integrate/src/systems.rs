#![forbid(unsafe_code)]

//! Reference right-hand sides used by tests, benches and fuzzing.
//!
//! Each system is a plain parameter struct; pass `|t, y| system.rhs(t, y)`
//! to [`integrate`](crate::integrate).

use serde::{Deserialize, Serialize};

/// `dy/dt = -rate * y`, component-wise.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ExponentialDecay {
    pub rate: f64,
}

impl ExponentialDecay {
    #[must_use]
    pub fn rhs(&self, _t: f64, y: &[f64]) -> Vec<f64> {
        y.iter().map(|v| -self.rate * v).collect()
    }

    /// `y0 * exp(-rate * t)`
    #[must_use]
    pub fn exact(&self, y0: f64, t: f64) -> f64 {
        y0 * (-self.rate * t).exp()
    }
}

/// Two-species reaction model with state `[x, y]`:
///
/// ```text
/// dx/dt = 1 - (b + 1) x + a x² y
/// dy/dt = b x - a x² y
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Brusselator {
    pub a: f64,
    pub b: f64,
}

impl Default for Brusselator {
    fn default() -> Self {
        Self { a: 1.0, b: 3.0 }
    }
}

impl Brusselator {
    /// Derivative of `[x, y]`; any other length yields an empty vector,
    /// which the evaluator reports as a dimension mismatch.
    #[must_use]
    pub fn rhs(&self, _t: f64, y: &[f64]) -> Vec<f64> {
        let &[x, c] = y else {
            return Vec::new();
        };
        let growth = self.a * x * x * c;
        vec![1.0 - (self.b + 1.0) * x + growth, self.b * x - growth]
    }

    /// Steady state `(1, b / a)`.
    #[must_use]
    pub fn fixed_point(&self) -> [f64; 2] {
        [1.0, self.b / self.a]
    }
}

/// Point mass under gravity with quadratic air drag; state `[x, vx, y, vy]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ProjectileWithDrag {
    pub mass: f64,
    pub radius: f64,
    pub air_density: f64,
    pub drag_coefficient: f64,
    pub gravity: f64,
}

impl Default for ProjectileWithDrag {
    /// 1 kg cannonball of radius 8 cm in sea-level air.
    fn default() -> Self {
        Self {
            mass: 1.0,
            radius: 0.08,
            air_density: 1.22,
            drag_coefficient: 0.47,
            gravity: 9.81,
        }
    }
}

impl ProjectileWithDrag {
    /// `π R² ρ C / (2 m)`
    #[must_use]
    pub fn drag_factor(&self) -> f64 {
        std::f64::consts::PI * self.radius * self.radius * self.air_density * self.drag_coefficient
            / (2.0 * self.mass)
    }

    /// Derivative of `[x, vx, y, vy]`; other lengths yield an empty vector.
    #[must_use]
    pub fn rhs(&self, _t: f64, y: &[f64]) -> Vec<f64> {
        let &[_, vx, _, vy] = y else {
            return Vec::new();
        };
        let speed = vx.hypot(vy);
        let k = self.drag_factor();
        vec![vx, -k * vx * speed, vy, -self.gravity - k * vy * speed]
    }

    /// Launch state from the origin; `angle` in radians above horizontal.
    #[must_use]
    pub fn launch(speed: f64, angle: f64) -> [f64; 4] {
        [0.0, speed * angle.cos(), 0.0, speed * angle.sin()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{BulirschStoerConfig, integrate};

    #[test]
    fn decay_rhs_scales_every_component() {
        let decay = ExponentialDecay { rate: 2.0 };
        assert_eq!(decay.rhs(0.0, &[1.0, -0.5]), vec![-2.0, 1.0]);
        assert!((decay.exact(3.0, 0.5) - 3.0 * (-1.0_f64).exp()).abs() < 1e-15);
    }

    #[test]
    fn brusselator_fixed_point_is_stationary() {
        for (a, b) in [(1.0, 3.0), (2.0, 1.5), (0.5, 0.25)] {
            let system = Brusselator { a, b };
            let dydt = system.rhs(0.0, &system.fixed_point());
            assert!(dydt.iter().all(|d| d.abs() < 1e-12), "{dydt:?}");
        }
    }

    #[test]
    fn brusselator_origin_derivative() {
        assert_eq!(Brusselator::default().rhs(0.0, &[0.0, 0.0]), vec![1.0, 0.0]);
    }

    #[test]
    fn wrong_length_state_reports_mismatch() {
        use crate::{IntegrateError, StepFailure};

        let system = Brusselator::default();
        assert!(system.rhs(0.0, &[1.0, 2.0, 3.0]).is_empty());
        let err = integrate(
            |t, y| system.rhs(t, y),
            &[0.0, 0.0, 0.0],
            (0.0, 1.0),
            &BulirschStoerConfig::default(),
        )
        .expect_err("three components for a two-species model");
        assert_eq!(
            err,
            IntegrateError::Step(StepFailure::DimensionMismatch {
                expected: 3,
                actual: 0
            })
        );

        let projectile = ProjectileWithDrag::default();
        assert!(projectile.rhs(0.0, &[1.0, 2.0]).is_empty());
    }

    #[test]
    fn drag_factor_matches_cannonball() {
        let k = ProjectileWithDrag::default().drag_factor();
        // pi * 0.0064 * 1.22 * 0.47 / 2
        assert!((k - 0.005_764_1).abs() < 1e-6, "k = {k}");
    }

    #[test]
    fn vacuum_projectile_follows_parabola() {
        let vacuum = ProjectileWithDrag {
            air_density: 0.0,
            ..ProjectileWithDrag::default()
        };
        let angle = 30.0_f64.to_radians();
        let y0 = ProjectileWithDrag::launch(100.0, angle);
        let t_end = 7.0;
        let result = integrate(
            |t, y| vacuum.rhs(t, y),
            &y0,
            (0.0, t_end),
            &BulirschStoerConfig::default(),
        )
        .expect("vacuum flight integrates");
        let y = result.final_state().expect("non-empty");
        let x_exact = y0[1] * t_end;
        let h_exact = y0[3] * t_end - 0.5 * 9.81 * t_end * t_end;
        assert!((y[0] - x_exact).abs() < 1e-6, "x = {}", y[0]);
        assert!((y[2] - h_exact).abs() < 1e-6, "y = {}", y[2]);
    }

    #[test]
    fn drag_shortens_flight() {
        let y0 = ProjectileWithDrag::launch(100.0, 30.0_f64.to_radians());
        let config = BulirschStoerConfig::default();
        let drag = ProjectileWithDrag::default();
        let vacuum = ProjectileWithDrag {
            air_density: 0.0,
            ..drag
        };
        let with_drag = integrate(|t, y| drag.rhs(t, y), &y0, (0.0, 5.0), &config)
            .expect("drag flight integrates");
        let without = integrate(|t, y| vacuum.rhs(t, y), &y0, (0.0, 5.0), &config)
            .expect("vacuum flight integrates");
        let x_drag = with_drag.final_state().expect("non-empty")[0];
        let x_vac = without.final_state().expect("non-empty")[0];
        assert!(x_drag < x_vac, "{x_drag} vs {x_vac}");
        assert!(x_drag > 0.0);
    }
}
