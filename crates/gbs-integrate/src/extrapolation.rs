#![forbid(unsafe_code)]

//! Richardson extrapolation table (Neville-type recurrence in `h²`).
//!
//! Row `n` is built from the midpoint estimate with `n` substeps:
//!
//! ```text
//! R[n][1] = midpoint(H, n)
//! R[n][m] = R[n][m-1] + (R[n][m-1] - R[n-1][m-1]) / ((n/(n-1))^(2(m-1)) - 1)
//! ```
//!
//! `R[n][n]` is the best estimate of row `n`; the norm of its last correction
//! `R[n][n] - R[n][n-1]` is the error estimate.

/// `(n / (n-1))^(2(m-1)) - 1`, the divisor of the correction for order `m` in row `n`.
#[must_use]
pub fn richardson_denominator(n: usize, m: usize) -> f64 {
    let ratio = n as f64 / (n - 1) as f64;
    let exponent = m
        .checked_sub(1)
        .and_then(|k| k.checked_mul(2))
        .and_then(|k| i32::try_from(k).ok());
    match exponent {
        Some(k) => ratio.powi(k) - 1.0,
        None => ratio.powf(2.0 * (m as f64 - 1.0)) - 1.0,
    }
}

/// Euclidean norm.
#[must_use]
pub fn euclidean_norm(x: &[f64]) -> f64 {
    x.iter().map(|v| v * v).sum::<f64>().sqrt()
}

/// Triangular table; row `n` (1-based) holds exactly `n` states.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExtrapolationTable {
    rows: Vec<Vec<Vec<f64>>>,
    error: Option<f64>,
}

impl ExtrapolationTable {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_capacity(max_order: usize) -> Self {
        Self {
            rows: Vec::with_capacity(max_order),
            error: None,
        }
    }

    /// Append row `n = rows() + 1` from its raw midpoint estimate.
    ///
    /// Returns the row's error estimate, or `None` for row 1. A row whose
    /// length differs from the previous one is refused: nothing is stored
    /// and `None` is returned.
    pub fn push_row(&mut self, raw: Vec<f64>) -> Option<f64> {
        if let Some(prev) = self.rows.last()
            && prev[0].len() != raw.len()
        {
            return None;
        }
        let n = self.rows.len() + 1;
        let mut row = Vec::with_capacity(n);
        row.push(raw);

        if let Some(prev) = self.rows.last() {
            for m in 2..=n {
                let denom = richardson_denominator(n, m);
                let lower = &row[m - 2];
                let refined: Vec<f64> = lower
                    .iter()
                    .zip(&prev[m - 2])
                    .map(|(cur, old)| cur + (cur - old) / denom)
                    .collect();
                row.push(refined);
            }
            let correction: Vec<f64> = row[n - 1]
                .iter()
                .zip(&row[n - 2])
                .map(|(top, below)| top - below)
                .collect();
            self.error = Some(euclidean_norm(&correction));
        }

        self.rows.push(row);
        self.error
    }

    /// Number of rows built so far (the current substep count `n`).
    #[must_use]
    pub fn rows(&self) -> usize {
        self.rows.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Row `n` (1-based), `n` entries ordered by extrapolation order.
    #[must_use]
    pub fn row(&self, n: usize) -> Option<&[Vec<f64>]> {
        n.checked_sub(1)
            .and_then(|idx| self.rows.get(idx))
            .map(Vec::as_slice)
    }

    /// `R[n][n]` of the latest row.
    #[must_use]
    pub fn best(&self) -> Option<&[f64]> {
        self.rows
            .last()
            .and_then(|row| row.last())
            .map(Vec::as_slice)
    }

    /// Error estimate of the latest row.
    #[must_use]
    pub fn error(&self) -> Option<f64> {
        self.error
    }
}
