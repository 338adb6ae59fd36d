#![forbid(unsafe_code)]

//! Gragg's modified midpoint method.
//!
//! Advances a state over a macro-interval `H` with `n` leapfrog substeps of
//! width `h = H / n`. The global error has an expansion in even powers of
//! `h` only, which is what makes Richardson extrapolation in `h²` effective.

use crate::evaluator::DerivativeEvaluator;
use crate::solver::StepFailure;

/// Derivative evaluations spent by one call with `n` substeps.
#[must_use]
pub const fn evaluations_per_step(n: usize) -> usize {
    2 * n + 1
}

/// Estimate `y(t + H)` from `y(t)` using `n` substeps (`n = 0` is treated as 1).
///
/// `y` is copied; the caller's state is never written.
pub fn modified_midpoint_step<F>(
    evaluator: &mut DerivativeEvaluator<F>,
    t: f64,
    y: &[f64],
    big_h: f64,
    n: usize,
) -> Result<Vec<f64>, StepFailure>
where
    F: FnMut(f64, &[f64]) -> Vec<f64>,
{
    let n = n.max(1);
    let h = big_h / n as f64;
    let half_h = 0.5 * h;

    let mut r = y.to_vec();

    // k lives on the half grid t + (i + 1/2) h, r on the full grid t + i h.
    let f = evaluator.eval(t, &r)?;
    let mut k: Vec<f64> = r.iter().zip(&f).map(|(ri, fi)| ri + half_h * fi).collect();
    let f = evaluator.eval(t + half_h, &k)?;
    axpy(&mut r, h, &f);

    for i in 1..n {
        let t_full = t + i as f64 * h;
        let f = evaluator.eval(t_full, &r)?;
        axpy(&mut k, h, &f);
        let f = evaluator.eval(t_full + half_h, &k)?;
        axpy(&mut r, h, &f);
    }

    let f = evaluator.eval(t + big_h, &r)?;
    Ok(r
        .iter()
        .zip(&k)
        .zip(&f)
        .map(|((ri, ki), fi)| 0.5 * (ri + ki + half_h * fi))
        .collect())
}

/// `y += a * x`
fn axpy(y: &mut [f64], a: f64, x: &[f64]) {
    for (yi, xi) in y.iter_mut().zip(x) {
        *yi += a * xi;
    }
}
