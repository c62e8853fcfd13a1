//! Index pair selection for relative pose error.
//!
//! A delta in frames maps directly to index strides. A delta in meters or
//! seconds is resolved on a monotone coordinate (accumulated path length or
//! timestamp): with `all_pairs`, every pose is paired with the later pose whose
//! coordinate difference is closest to the delta, within a relative
//! tolerance; otherwise poses are picked greedily each time the coordinate
//! advanced by at least the delta, and consecutive picks are paired.

use super::metrics::DeltaUnit;
use crate::core::Trajectory;
use crate::error::{Error, Result};

/// Index pairs `(i, j)`, `i < j`, separated by `delta` in `unit`.
///
/// # Errors
///
/// [`Error::Metric`] for a non-positive delta, or when no pair satisfies the
/// delta.
pub fn id_pairs_from_delta(
    trajectory: &Trajectory,
    delta: f64,
    unit: DeltaUnit,
    rel_tol: f64,
    all_pairs: bool,
) -> Result<Vec<(usize, usize)>> {
    if !delta.is_finite() || delta <= 0.0 {
        return Err(Error::Metric(format!("delta must be positive, got {}", delta)));
    }

    let pairs = match unit {
        DeltaUnit::Frames => {
            if delta.fract() != 0.0 {
                return Err(Error::Metric(format!(
                    "delta in frames must be an integer, got {}",
                    delta
                )));
            }
            pairs_by_index(trajectory.len(), delta as usize, all_pairs)
        }
        DeltaUnit::Meters => pairs_by_coordinate(
            &trajectory.accumulated_distances(),
            delta,
            delta * rel_tol,
            all_pairs,
        ),
        DeltaUnit::Seconds => {
            pairs_by_coordinate(trajectory.timestamps(), delta, delta * rel_tol, all_pairs)
        }
    };

    if pairs.is_empty() {
        return Err(Error::Metric(format!(
            "no pose pairs found for delta {} {} over {} poses",
            delta,
            unit,
            trajectory.len()
        )));
    }
    Ok(pairs)
}

fn pairs_by_index(len: usize, delta: usize, all_pairs: bool) -> Vec<(usize, usize)> {
    if all_pairs {
        (0..len.saturating_sub(delta)).map(|i| (i, i + delta)).collect()
    } else {
        let ids: Vec<usize> = (0..len).step_by(delta).collect();
        ids.windows(2).map(|w| (w[0], w[1])).collect()
    }
}

/// Pairs on a non-decreasing coordinate series.
fn pairs_by_coordinate(
    coords: &[f64],
    delta: f64,
    tol: f64,
    all_pairs: bool,
) -> Vec<(usize, usize)> {
    if coords.len() < 2 {
        return Vec::new();
    }

    if all_pairs {
        let mut pairs = Vec::new();
        for i in 0..coords.len() - 1 {
            let target = coords[i] + delta;
            // First index at or beyond the target; the best match is it or its predecessor.
            let k = i + 1 + coords[i + 1..].partition_point(|&c| c < target);
            let candidates = [k - 1, k];
            let best = candidates
                .into_iter()
                .filter(|&j| j > i && j < coords.len())
                .min_by(|&a, &b| {
                    let da = (coords[a] - target).abs();
                    let db = (coords[b] - target).abs();
                    da.total_cmp(&db)
                });
            if let Some(j) = best
                && (coords[j] - target).abs() <= tol
            {
                pairs.push((i, j));
            }
        }
        pairs
    } else {
        let mut ids = Vec::new();
        let mut anchor = coords[0];
        for (i, &c) in coords.iter().enumerate() {
            if c - anchor >= delta {
                ids.push(i);
                anchor = c;
            }
        }
        ids.windows(2).map(|w| (w[0], w[1])).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::{UnitQuaternion, Vector3};

    fn line(n: usize, step: f64, dt: f64) -> Trajectory {
        Trajectory::new(
            (0..n).map(|i| i as f64 * dt).collect(),
            (0..n).map(|i| Vector3::new(i as f64 * step, 0.0, 0.0)).collect(),
            vec![UnitQuaternion::identity(); n],
        )
        .unwrap()
    }

    #[test]
    fn test_frames_all_pairs() {
        let traj = line(10, 1.0, 1.0);
        let pairs = id_pairs_from_delta(&traj, 3.0, DeltaUnit::Frames, 0.1, true).unwrap();
        assert_eq!(pairs.len(), 7);
        assert_eq!(pairs[0], (0, 3));
        assert_eq!(pairs[6], (6, 9));
    }

    #[test]
    fn test_frames_stride() {
        let traj = line(10, 1.0, 1.0);
        let pairs = id_pairs_from_delta(&traj, 3.0, DeltaUnit::Frames, 0.1, false).unwrap();
        assert_eq!(pairs, vec![(0, 3), (3, 6), (6, 9)]);
    }

    #[test]
    fn test_meters_all_pairs_within_tolerance() {
        let traj = line(20, 0.05, 0.1);
        let pairs = id_pairs_from_delta(&traj, 0.1, DeltaUnit::Meters, 0.1, true).unwrap();
        assert!(pairs.iter().all(|(i, j)| j - i == 2));
        assert_eq!(pairs.len(), 18);
    }

    #[test]
    fn test_meters_rejects_out_of_tolerance() {
        // Steps of 0.3 m can never match a 0.1 m delta.
        let traj = line(20, 0.3, 0.1);
        let result = id_pairs_from_delta(&traj, 0.1, DeltaUnit::Meters, 0.1, true);
        assert!(matches!(result, Err(Error::Metric(_))));
    }

    #[test]
    fn test_seconds_stride() {
        let traj = line(11, 1.0, 0.5);
        let pairs = id_pairs_from_delta(&traj, 1.0, DeltaUnit::Seconds, 0.1, false).unwrap();
        assert_eq!(pairs, vec![(2, 4), (4, 6), (6, 8), (8, 10)]);
    }

    #[test]
    fn test_delta_larger_than_trajectory() {
        let traj = line(5, 1.0, 1.0);
        assert!(id_pairs_from_delta(&traj, 60.0, DeltaUnit::Frames, 0.1, true).is_err());
    }
}
