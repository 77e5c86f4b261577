//! Series sources for the trend chart template.
//!
//! When only an aggregate total is known the chart can still be drawn from a
//! *synthetic* series. That series is a visual approximation shaped like a
//! plausible trend; it is not analytics data and must never be presented as
//! such. Callers pick the source explicitly through [`SeriesStrategy`].

use std::f64::consts::PI;

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::model::Period;

/// Lower and upper bound of the per-bucket variance factor.
const VARIANCE_RANGE: (f64, f64) = (0.3, 0.7);
/// Amplitude of the single sine cycle laid over the period.
const TREND_AMPLITUDE: f64 = 0.2;

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(tag = "source", content = "values", rename_all = "lowercase")]
pub enum SeriesStrategy {
    /// Measured values, one per bucket.
    Real(Vec<f64>),
    /// Values synthesized from the aggregate total.
    #[default]
    Synthetic,
}

impl SeriesStrategy {
    pub fn is_synthetic(&self) -> bool {
        matches!(self, SeriesStrategy::Synthetic)
    }

    /// Produces the series to plot. Non-finite or negative real values are
    /// clamped to zero so they cannot leak into coordinates.
    pub fn resolve<R: Rng + ?Sized>(&self, total: f64, period: Period, rng: &mut R) -> Vec<f64> {
        match self {
            SeriesStrategy::Real(values) => values
                .iter()
                .map(|v| if v.is_finite() { v.max(0.0) } else { 0.0 })
                .collect(),
            SeriesStrategy::Synthetic => synthesize_trend(total, period, rng),
        }
    }
}

/// Synthetic (non-authoritative) series of `period.points()` buckets whose
/// sum lands roughly around half of `total`.
///
/// Each bucket is `round(total / n * variance * (0.2 * sin(2πi/n) + 1))`,
/// with `variance` drawn uniformly from `[0.3, 0.7)`.
pub fn synthesize_trend<R: Rng + ?Sized>(total: f64, period: Period, rng: &mut R) -> Vec<f64> {
    let points = period.points();
    let total = if total.is_finite() { total } else { 0.0 };
    let average = total / points as f64;
    (0..points)
        .map(|i| {
            let variance = rng.gen_range(VARIANCE_RANGE.0..VARIANCE_RANGE.1);
            let trend = (i as f64 / points as f64 * PI * 2.0).sin() * TREND_AMPLITUDE + 1.0;
            (average * variance * trend).round().max(0.0)
        })
        .collect()
}
