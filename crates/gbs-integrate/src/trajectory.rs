#![forbid(unsafe_code)]

//! Append-only log of accepted `(time, state)` samples.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sample {
    pub t: f64,
    pub y: Vec<f64>,
}

/// Ordered samples with strictly increasing times.
///
/// Samples that would break the ordering are refused by [`Trajectory::push`],
/// which keeps the invariant local to this type rather than to its callers.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Trajectory {
    samples: Vec<Sample>,
}

impl Trajectory {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a trajectory with its initial sample.
    #[must_use]
    pub fn seeded(t0: f64, y0: &[f64]) -> Self {
        Self {
            samples: vec![Sample {
                t: t0,
                y: y0.to_vec(),
            }],
        }
    }

    /// Append a sample; returns `false` (and stores nothing) when `t` does
    /// not strictly exceed the last stored time.
    pub fn push(&mut self, t: f64, y: Vec<f64>) -> bool {
        if let Some(last) = self.samples.last()
            && (t.is_nan() || t <= last.t)
        {
            return false;
        }
        self.samples.push(Sample { t, y });
        true
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    #[must_use]
    pub fn samples(&self) -> &[Sample] {
        &self.samples
    }

    #[must_use]
    pub fn first(&self) -> Option<&Sample> {
        self.samples.first()
    }

    #[must_use]
    pub fn last(&self) -> Option<&Sample> {
        self.samples.last()
    }

    /// Sample times, in order.
    #[must_use]
    pub fn times(&self) -> Vec<f64> {
        self.samples.iter().map(|s| s.t).collect()
    }

    /// States, in order.
    #[must_use]
    pub fn states(&self) -> Vec<Vec<f64>> {
        self.samples.iter().map(|s| s.y.clone()).collect()
    }

    /// One state component across all samples (a plot column).
    #[must_use]
    pub fn component(&self, index: usize) -> Option<Vec<f64>> {
        self.samples
            .iter()
            .map(|s| s.y.get(index).copied())
            .collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Sample> {
        self.samples.iter()
    }

    #[must_use]
    pub fn into_samples(self) -> Vec<Sample> {
        self.samples
    }
}
