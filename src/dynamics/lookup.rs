//! Piecewise-linear lookup tables
//!
//! A table is an ordered set of (x, y) knots. Queries between knots are
//! linearly interpolated; queries outside the domain clamp to the nearest
//! end knot, so the table never extrapolates.

use serde::{Deserialize, Serialize};

use crate::core::error::{InsurgencyError, Result};

/// Immutable piecewise-linear curve
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LookupTable {
    name: String,
    points: Vec<(f64, f64)>,
}

impl LookupTable {
    /// Build a table, rejecting empty, non-finite or non-increasing x sequences
    pub fn new(name: impl Into<String>, points: Vec<(f64, f64)>) -> Result<Self> {
        let name = name.into();

        if points.is_empty() {
            return Err(InsurgencyError::invalid_table(name, "table has no points"));
        }

        for (i, &(x, y)) in points.iter().enumerate() {
            if !x.is_finite() || !y.is_finite() {
                return Err(InsurgencyError::invalid_table(
                    name,
                    format!("point {} ({}, {}) is not finite", i, x, y),
                ));
            }
        }

        for (i, pair) in points.windows(2).enumerate() {
            if pair[1].0 <= pair[0].0 {
                return Err(InsurgencyError::invalid_table(
                    name,
                    format!(
                        "x values must be strictly increasing (x[{}] = {}, x[{}] = {})",
                        i,
                        pair[0].0,
                        i + 1,
                        pair[1].0
                    ),
                ));
            }
        }

        Ok(Self { name, points })
    }

    /// Convenience constructor from `[x, y]` pairs as they appear in scenario files
    pub fn from_pairs(name: impl Into<String>, pairs: &[[f64; 2]]) -> Result<Self> {
        Self::new(name, pairs.iter().map(|p| (p[0], p[1])).collect())
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn points(&self) -> &[(f64, f64)] {
        &self.points
    }

    /// (first x, last x)
    pub fn domain(&self) -> (f64, f64) {
        let first = self.points[0].0;
        let last = self.points[self.points.len() - 1].0;
        (first, last)
    }

    /// Evaluate the curve at `x`
    ///
    /// NaN clamps low, so the function is total.
    pub fn evaluate(&self, x: f64) -> f64 {
        let (x_first, y_first) = self.points[0];
        let (x_last, y_last) = self.points[self.points.len() - 1];

        if x.is_nan() || x <= x_first {
            return y_first;
        }
        if x >= x_last {
            return y_last;
        }

        // First knot strictly greater than x; guaranteed to be in 1..len
        let upper = self.points.partition_point(|&(px, _)| px <= x);
        let (x0, y0) = self.points[upper - 1];
        let (x1, y1) = self.points[upper];

        y0 + (x - x0) / (x1 - x0) * (y1 - y0)
    }
}
