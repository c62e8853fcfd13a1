//! Time offset search between estimate and reference clocks.
//!
//! Mean RPE as a function of the estimate clock offset is assumed unimodal
//! over the search bracket. A 3-point bracketing search evaluates the error at
//! `[lower, mid, upper]` each iteration, then moves the bracket toward the
//! lowest point and away from the highest. The best offset seen over all
//! evaluations is returned.
//!
//! The rules are checked in order, so the bracket extends below `lower`
//! whenever the lower end is best, but only extends above `upper` when the
//! middle point is the worst. Callers should pick a bracket whose upper end
//! lies above the expected minimum.
//!
//! # Example
//!
//! ```rust,ignore
//! use pariksha::evaluation::{OffsetSearchConfig, find_time_offset};
//!
//! let result = find_time_offset(&reference, &estimate, &OffsetSearchConfig::default())?;
//! println!("best offset: {:.4} s (mean RPE {:.4})", result.offset, result.error);
//! ```

use serde::{Deserialize, Serialize};

use super::accuracy::{RelativePoseError, RpeSettings};
use crate::core::Trajectory;
use crate::error::{Error, Result};
use crate::sync::associate;

/// Configuration for the offset search.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct OffsetSearchConfig {
    /// Lower end of the initial bracket (seconds).
    ///
    /// Default: -3.0
    #[serde(default = "default_lower")]
    pub lower: f64,

    /// Upper end of the initial bracket (seconds).
    ///
    /// Default: 3.0
    #[serde(default = "default_upper")]
    pub upper: f64,

    /// Number of bracket updates.
    ///
    /// Default: 10
    #[serde(default = "default_iterations")]
    pub iterations: usize,

    /// Association tolerance at each candidate offset (seconds).
    ///
    /// Default: 0.05
    #[serde(default = "default_max_diff")]
    pub max_diff: f64,

    /// RPE used as the objective.
    ///
    /// Default: point distance over 0.1 m, all pairs
    #[serde(default = "RpeSettings::offset_search")]
    pub rpe: RpeSettings,
}

fn default_lower() -> f64 {
    -3.0
}
fn default_upper() -> f64 {
    3.0
}
fn default_iterations() -> usize {
    10
}
fn default_max_diff() -> f64 {
    0.05
}

impl Default for OffsetSearchConfig {
    fn default() -> Self {
        Self {
            lower: -3.0,
            upper: 3.0,
            iterations: 10,
            max_diff: 0.05,
            rpe: RpeSettings::offset_search(),
        }
    }
}

/// Outcome of an offset search.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct OffsetSearchResult {
    /// Best offset found (seconds), to be added to estimate timestamps
    pub offset: f64,

    /// Objective value at `offset`
    pub error: f64,

    /// Number of objective evaluations
    pub evaluations: usize,
}

/// Minimize a unimodal function over `[lower, upper]` with the 3-point
/// bracketing rules.
///
/// Non-finite objective values are treated as `+inf`.
pub fn minimize<F>(lower: f64, upper: f64, iterations: usize, mut f: F) -> OffsetSearchResult
where
    F: FnMut(f64) -> f64,
{
    let (mut lower, mut upper) = if lower <= upper {
        (lower, upper)
    } else {
        (upper, lower)
    };
    let mut mid = (lower + upper) / 2.0;

    let mut best = OffsetSearchResult {
        offset: mid,
        error: f64::INFINITY,
        evaluations: 0,
    };

    for iteration in 0..iterations {
        let points = [lower, mid, upper];
        let mut errors = [f64::INFINITY; 3];
        for (k, &x) in points.iter().enumerate() {
            let e = f(x);
            best.evaluations += 1;
            errors[k] = if e.is_finite() { e } else { f64::INFINITY };
            if errors[k] < best.error {
                best.error = errors[k];
                best.offset = x;
            }
        }

        let (argmin, argmax) = extremes(&errors);
        if argmin == 0 {
            // Minimum at the lower end: extend downward.
            upper = mid;
            lower -= 0.5 * (mid - lower);
            mid = (lower + mid) / 2.0;
        } else if argmax == 2 {
            upper = mid;
            mid = (lower + mid) / 2.0;
        } else if argmax == 0 {
            lower = mid;
            mid = (mid + upper) / 2.0;
        } else if argmin == 2 {
            // Minimum at the upper end: extend upward.
            upper += 0.5 * (upper - mid);
            lower = mid;
            mid = (upper + mid) / 2.0;
        }

        log::debug!(
            "Offset search iteration {}: points {:?}, errors {:?}, best {:.5}",
            iteration,
            points,
            errors,
            best.offset
        );
    }

    best
}

/// First index of the minimum and first index of the maximum.
fn extremes(values: &[f64; 3]) -> (usize, usize) {
    let mut argmin = 0;
    let mut argmax = 0;
    for k in 1..3 {
        if values[k] < values[argmin] {
            argmin = k;
        }
        if values[k] > values[argmax] {
            argmax = k;
        }
    }
    (argmin, argmax)
}

/// Find the estimate clock offset minimizing mean RPE against `reference`.
///
/// Candidate offsets where association or RPE fails count as infinite error.
/// Inputs that violate trajectory invariants fail with
/// [`Error::DataIntegrity`] before the search starts. Fails with
/// [`Error::Metric`] if no candidate could be evaluated.
pub fn find_time_offset(
    reference: &Trajectory,
    estimate: &Trajectory,
    config: &OffsetSearchConfig,
) -> Result<OffsetSearchResult> {
    reference.validate("reference")?;
    estimate.validate("estimate")?;

    let mut fatal = None;
    let result = minimize(config.lower, config.upper, config.iterations, |offset| {
        match mean_rpe_at_offset(reference, estimate, offset, config) {
            Ok(mean) => mean,
            Err(Error::Association { .. } | Error::Metric(_)) => f64::INFINITY,
            Err(e) => {
                fatal.get_or_insert(e);
                f64::INFINITY
            }
        }
    });
    if let Some(e) = fatal {
        return Err(e);
    }

    if !result.error.is_finite() {
        return Err(Error::Metric(format!(
            "no offset in [{}, {}] produced an RPE ({} evaluations)",
            config.lower, config.upper, result.evaluations
        )));
    }

    log::info!(
        "Best time offset: {:.5} s (mean RPE {:.5}, {} evaluations)",
        result.offset,
        result.error,
        result.evaluations
    );
    Ok(result)
}

/// Mean RPE after associating with the estimate shifted by `offset`.
pub fn mean_rpe_at_offset(
    reference: &Trajectory,
    estimate: &Trajectory,
    offset: f64,
    config: &OffsetSearchConfig,
) -> Result<f64> {
    let assoc = associate(reference, estimate, config.max_diff, offset)?;
    let rpe = RelativePoseError::compute(&assoc.reference, &assoc.estimate, &config.rpe)?;
    Ok(rpe.statistics.mean)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_minimize_parabola_inside_bracket() {
        let result = minimize(-3.0, 3.0, 10, |x| (x - 0.7).powi(2));
        assert!((result.offset - 0.7).abs() < 0.01, "offset {}", result.offset);
        assert_eq!(result.evaluations, 30);
    }

    #[test]
    fn test_minimize_more_iterations_tightens() {
        let result = minimize(-3.0, 3.0, 20, |x| (x + 1.3).abs());
        assert!((result.offset + 1.3).abs() < 1e-3, "offset {}", result.offset);
    }

    #[test]
    fn test_minimize_extends_bracket_downward() {
        let result = minimize(-1.0, 1.0, 10, |x| (x + 1.8).powi(2));
        assert!((result.offset + 1.8).abs() < 0.01, "offset {}", result.offset);
    }

    #[test]
    fn test_minimize_does_not_extend_upward_on_monotone_error() {
        let result = minimize(-1.0, 1.0, 10, |x| (x - 1.8).powi(2));
        assert_eq!(result.offset, 1.0);
    }

    #[test]
    fn test_minimize_ignores_failed_points() {
        let result = minimize(-3.0, 3.0, 10, |x| {
            if x < -2.0 { f64::NAN } else { (x - 0.5).powi(2) }
        });
        assert!(result.error.is_finite());
        assert!((result.offset - 0.5).abs() < 0.05);
    }

    #[test]
    fn test_extremes_first_index_wins() {
        assert_eq!(extremes(&[1.0, 1.0, 1.0]), (0, 0));
        assert_eq!(extremes(&[2.0, 1.0, 3.0]), (1, 2));
    }
}
