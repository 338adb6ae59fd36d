#![forbid(unsafe_code)]

//! Runtime mode definitions for Strict (baseline) and Hardened operation.

use serde::{Deserialize, Serialize};

/// Operational mode governing compatibility/safety trade-offs.
///
/// - **Strict**: Baseline extrapolation semantics. Overflow is absorbed by the
///   clamp bound, an unbounded clamp (`max_val = inf`) is allowed, and the
///   derivative output is trusted as returned.
/// - **Hardened**: Extra safety layer on top of the baseline; rejects
///   non-finite derivatives during stepping and requires a finite clamp bound.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum RuntimeMode {
    #[default]
    Strict,
    Hardened,
}

impl RuntimeMode {
    /// Whether per-evaluation finite checks are enabled.
    #[must_use]
    pub const fn checks_finite(self) -> bool {
        matches!(self, Self::Hardened)
    }
}
