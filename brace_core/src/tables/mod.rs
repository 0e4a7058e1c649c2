//! # Reference Tables
//!
//! Static, read-only code tables consumed by the calculation stages.
//!
//! - [`seismic`] - NZS 1170.5 spectral shape, return periods, Ru, hazard factors
//! - [`wind`] - NZS 3604 wind zones and Cpe,r,h; NZS 1170.2 Cp,w leeward and Cp,r
//! - [`bracing`] - Bracing system ratings (BU/m or BU per item)
//!
//! Every lookup has a deterministic fallback. Tables are never edited at
//! runtime.

pub mod bracing;
pub mod seismic;
pub mod wind;

/// Piecewise-linear interpolation over `(key, value)` points sorted by key.
///
/// Keys below the first point or above the last clamp to the endpoint value.
/// An empty table yields 0.0.
///
/// # Example
/// ```rust
/// use brace_core::tables::interpolate;
///
/// let points = [(0.0, 1.0), (1.0, 3.0)];
/// assert_eq!(interpolate(&points, 0.5), 2.0);
/// assert_eq!(interpolate(&points, -4.0), 1.0);
/// assert_eq!(interpolate(&points, 9.0), 3.0);
/// ```
pub fn interpolate(points: &[(f64, f64)], x: f64) -> f64 {
    let (first, last) = match (points.first(), points.last()) {
        (Some(first), Some(last)) => (*first, *last),
        _ => return 0.0,
    };
    if points.len() < 2 {
        return first.1;
    }
    if x <= first.0 {
        return first.1;
    }
    if x >= last.0 {
        return last.1;
    }

    // first.0 < x < last.0, so an upper index > 0 always exists
    let upper = points.iter().position(|(k, _)| *k >= x).unwrap_or(points.len() - 1);
    let (k_lo, v_lo) = points[upper - 1];
    let (k_hi, v_hi) = points[upper];
    if k_hi == k_lo {
        return v_hi;
    }
    v_lo + (x - k_lo) / (k_hi - k_lo) * (v_hi - v_lo)
}
