//! Trajectory: ordered sequence of timestamped 6-DoF poses.
//!
//! Storage is structure-of-arrays (timestamps, positions, orientations) so that
//! slicing, index selection and per-step kinematics are cheap. Per-step speeds
//! are derived lazily and cached; every mutating operation drops the cache.
//!
//! Trajectories have value semantics. Operations that produce an aligned,
//! shifted, or reduced variant return a new `Trajectory` and leave `self`
//! untouched. The only in-place operations are the two ground-truth cleanup
//! passes ([`Trajectory::remove_non_monotonic`] and
//! [`Trajectory::remove_abnormal_steps`]), which callers run on their own copy.

use std::ops::Range;
use std::sync::OnceLock;

use nalgebra::{Isometry3, UnitQuaternion, Vector3};

use super::{Pose3D, Sim3};
use crate::error::{Error, Result};

/// Ordered pose sequence with derived kinematics.
#[derive(Clone, Debug, Default)]
pub struct Trajectory {
    timestamps: Vec<f64>,
    positions: Vec<Vector3<f64>>,
    orientations: Vec<UnitQuaternion<f64>>,
    /// speeds[i] is attached to the edge between pose i and pose i+1
    speeds: OnceLock<Vec<f64>>,
}

impl Trajectory {
    /// Create a trajectory from parallel arrays.
    ///
    /// Fails when the arrays differ in length or contain non-finite values.
    /// Timestamps are not required to be sorted here; use
    /// [`Trajectory::is_strictly_increasing`] and
    /// [`Trajectory::remove_non_monotonic`] to check and repair them.
    pub fn new(
        timestamps: Vec<f64>,
        positions: Vec<Vector3<f64>>,
        orientations: Vec<UnitQuaternion<f64>>,
    ) -> Result<Self> {
        if timestamps.len() != positions.len() || timestamps.len() != orientations.len() {
            return Err(Error::DataIntegrity(format!(
                "array lengths differ: {} timestamps, {} positions, {} orientations",
                timestamps.len(),
                positions.len(),
                orientations.len()
            )));
        }
        if let Some(i) = timestamps.iter().position(|t| !t.is_finite()) {
            return Err(Error::DataIntegrity(format!(
                "non-finite timestamp at index {}",
                i
            )));
        }
        if let Some(i) = positions.iter().position(|p| !p.iter().all(|v| v.is_finite())) {
            return Err(Error::DataIntegrity(format!(
                "non-finite position at index {}",
                i
            )));
        }

        Ok(Self::from_parts(timestamps, positions, orientations))
    }

    /// Build from parts already known to be consistent.
    fn from_parts(
        timestamps: Vec<f64>,
        positions: Vec<Vector3<f64>>,
        orientations: Vec<UnitQuaternion<f64>>,
    ) -> Self {
        debug_assert_eq!(timestamps.len(), positions.len());
        debug_assert_eq!(timestamps.len(), orientations.len());
        Self {
            timestamps,
            positions,
            orientations,
            speeds: OnceLock::new(),
        }
    }

    /// Create a trajectory from a list of poses.
    pub fn from_poses(poses: &[Pose3D]) -> Self {
        Self::from_parts(
            poses.iter().map(|p| p.timestamp).collect(),
            poses.iter().map(|p| p.position).collect(),
            poses.iter().map(|p| p.orientation).collect(),
        )
    }

    /// Number of poses
    pub fn len(&self) -> usize {
        self.timestamps.len()
    }

    /// Whether the trajectory has no poses
    pub fn is_empty(&self) -> bool {
        self.timestamps.is_empty()
    }

    /// Timestamps in seconds
    pub fn timestamps(&self) -> &[f64] {
        &self.timestamps
    }

    /// Positions in meters
    pub fn positions(&self) -> &[Vector3<f64>] {
        &self.positions
    }

    /// Orientations
    pub fn orientations(&self) -> &[UnitQuaternion<f64>] {
        &self.orientations
    }

    /// Pose at index `i`. Panics if out of range.
    pub fn pose(&self, i: usize) -> Pose3D {
        Pose3D::new(self.timestamps[i], self.positions[i], self.orientations[i])
    }

    /// Iterate over all poses in order.
    pub fn poses(&self) -> impl Iterator<Item = Pose3D> + '_ {
        (0..self.len()).map(move |i| self.pose(i))
    }

    /// Rigid transform of pose `i`. Panics if out of range.
    pub fn isometry(&self, i: usize) -> Isometry3<f64> {
        self.pose(i).to_isometry()
    }

    /// Time span covered by the trajectory (seconds).
    pub fn duration(&self) -> f64 {
        match (self.timestamps.first(), self.timestamps.last()) {
            (Some(first), Some(last)) => last - first,
            _ => 0.0,
        }
    }

    /// Per-step speeds (meters per second), length `len() - 1`.
    ///
    /// Derived on first access and cached. A zero or negative time step yields
    /// an infinite speed unless the two positions coincide, in which case the
    /// speed is zero.
    pub fn speeds(&self) -> &[f64] {
        self.speeds.get_or_init(|| {
            self.timestamps
                .windows(2)
                .zip(self.positions.windows(2))
                .map(|(t, p)| {
                    let dist = (p[1] - p[0]).norm();
                    let dt = t[1] - t[0];
                    if dist == 0.0 {
                        0.0
                    } else if dt <= 0.0 {
                        f64::INFINITY
                    } else {
                        dist / dt
                    }
                })
                .collect()
        })
    }

    /// Path length accumulated up to each pose (first entry is zero).
    pub fn accumulated_distances(&self) -> Vec<f64> {
        let mut acc = Vec::with_capacity(self.len());
        let mut total = 0.0;
        for (i, p) in self.positions.iter().enumerate() {
            if i > 0 {
                total += (p - self.positions[i - 1]).norm();
            }
            acc.push(total);
        }
        acc
    }

    /// Total path length (meters).
    pub fn path_length(&self) -> f64 {
        self.accumulated_distances().last().copied().unwrap_or(0.0)
    }

    /// Whether every timestamp is strictly greater than its predecessor.
    pub fn is_strictly_increasing(&self) -> bool {
        self.timestamps.windows(2).all(|w| w[1] > w[0])
    }

    /// Check the invariants required before evaluation: at least two poses
    /// and strictly increasing timestamps.
    pub fn validate(&self, name: &str) -> Result<()> {
        if self.len() < 2 {
            return Err(Error::DataIntegrity(format!(
                "{} trajectory has {} poses, need at least 2",
                name,
                self.len()
            )));
        }
        if !self.is_strictly_increasing() {
            return Err(Error::DataIntegrity(format!(
                "{} trajectory timestamps are not strictly increasing",
                name
            )));
        }
        Ok(())
    }

    // =========================================================================
    // IN-PLACE CLEANUP
    // =========================================================================

    /// Drop every pose whose timestamp is not strictly greater than its
    /// predecessor's, repeating until the sequence is stable.
    ///
    /// Returns the number of poses removed.
    pub fn remove_non_monotonic(&mut self) -> usize {
        let mut removed = 0;
        loop {
            let mut keep = vec![true; self.len()];
            let mut found = 0;
            for i in 1..self.len() {
                if self.timestamps[i] <= self.timestamps[i - 1] {
                    keep[i] = false;
                    found += 1;
                }
            }
            if found == 0 {
                break;
            }
            self.retain_mask(&keep);
            removed += found;
        }
        removed
    }

    /// Drop poses around steps whose speed is at or above `threshold`,
    /// together with their immediate neighbors, repeating to a fixed point.
    ///
    /// Used only on ground truth, to scrub motion-capture marker glitches.
    /// Returns the number of abnormal steps found over all passes. Fails if
    /// the cleanup would leave fewer than two poses.
    pub fn remove_abnormal_steps(&mut self, threshold: f64) -> Result<usize> {
        let mut total = 0;
        loop {
            let abnormal: Vec<usize> = self
                .speeds()
                .iter()
                .enumerate()
                .filter(|(_, s)| **s >= threshold)
                .map(|(i, _)| i)
                .collect();
            if abnormal.is_empty() {
                break;
            }

            let n = self.len();
            let mut keep = vec![true; n];
            for &k in &abnormal {
                let lo = k.saturating_sub(1);
                let hi = (k + 1).min(n - 1);
                for flag in &mut keep[lo..=hi] {
                    *flag = false;
                }
            }

            let remaining = keep.iter().filter(|k| **k).count();
            if remaining < 2 {
                return Err(Error::DataIntegrity(format!(
                    "abnormal step cleanup (threshold {} m/s) would leave {} poses",
                    threshold, remaining
                )));
            }

            total += abnormal.len();
            self.retain_mask(&keep);
        }
        Ok(total)
    }

    fn retain_mask(&mut self, keep: &[bool]) {
        let mut flags = keep.iter();
        self.timestamps.retain(|_| *flags.next().unwrap_or(&true));
        let mut flags = keep.iter();
        self.positions.retain(|_| *flags.next().unwrap_or(&true));
        let mut flags = keep.iter();
        self.orientations.retain(|_| *flags.next().unwrap_or(&true));
        self.speeds = OnceLock::new();
    }

    // =========================================================================
    // DERIVED TRAJECTORIES
    // =========================================================================

    /// New trajectory containing only the poses at `ids`, in the given order.
    pub fn select(&self, ids: &[usize]) -> Self {
        Self::from_parts(
            ids.iter().map(|&i| self.timestamps[i]).collect(),
            ids.iter().map(|&i| self.positions[i]).collect(),
            ids.iter().map(|&i| self.orientations[i]).collect(),
        )
    }

    /// New trajectory covering the index range `range`.
    pub fn slice(&self, range: Range<usize>) -> Self {
        Self::from_parts(
            self.timestamps[range.clone()].to_vec(),
            self.positions[range.clone()].to_vec(),
            self.orientations[range].to_vec(),
        )
    }

    /// Copy of this trajectory with every timestamp shifted by `offset`.
    pub fn with_time_offset(&self, offset: f64) -> Self {
        Self::from_parts(
            self.timestamps.iter().map(|t| t + offset).collect(),
            self.positions.clone(),
            self.orientations.clone(),
        )
    }

    /// Copy of this trajectory mapped through `transform` (left-multiplied):
    /// positions become `s * R * p + t`, orientations become `R * q`.
    pub fn transformed(&self, transform: &Sim3) -> Self {
        Self::from_parts(
            self.timestamps.clone(),
            self.positions
                .iter()
                .map(|p| transform.transform_point(p))
                .collect(),
            self.orientations
                .iter()
                .map(|q| transform.transform_orientation(q))
                .collect(),
        )
    }

    /// Copy of this trajectory with every pose right-multiplied by a fixed
    /// body-frame offset (e.g. marker-to-device extrinsics).
    pub fn with_local_transform(&self, local: &Isometry3<f64>) -> Self {
        let (positions, orientations) = self
            .positions
            .iter()
            .zip(self.orientations.iter())
            .map(|(p, q)| (p + q * local.translation.vector, q * local.rotation))
            .unzip();
        Self::from_parts(self.timestamps.clone(), positions, orientations)
    }

    /// Copy of this trajectory with the first and last poses replaced by
    /// their inner neighbours (timestamps unchanged).
    ///
    /// Trajectories shorter than three poses have no interior sample and are
    /// returned unchanged.
    pub fn with_smoothed_edges(&self) -> Self {
        let mut out = self.clone();
        let n = out.len();
        if n >= 3 {
            out.positions[0] = out.positions[1];
            out.orientations[0] = out.orientations[1];
            out.positions[n - 1] = out.positions[n - 2];
            out.orientations[n - 1] = out.orientations[n - 2];
            out.speeds = OnceLock::new();
        }
        out
    }

    /// Concatenate trajectories in order.
    ///
    /// Each part must start strictly after the previous part ends; parts are
    /// not re-sorted. Empty parts are skipped.
    pub fn concat(parts: &[Trajectory]) -> Result<Self> {
        let total = parts.iter().map(|p| p.len()).sum();
        let mut timestamps = Vec::with_capacity(total);
        let mut positions = Vec::with_capacity(total);
        let mut orientations = Vec::with_capacity(total);

        for (k, part) in parts.iter().enumerate() {
            if let (Some(&last), Some(&first)) = (timestamps.last(), part.timestamps.first())
                && first <= last
            {
                return Err(Error::DataIntegrity(format!(
                    "part {} starts at t = {} which is not after previous end t = {}",
                    k, first, last
                )));
            }
            timestamps.extend_from_slice(&part.timestamps);
            positions.extend_from_slice(&part.positions);
            orientations.extend_from_slice(&part.orientations);
        }

        Ok(Self::from_parts(timestamps, positions, orientations))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::f64::consts::FRAC_PI_2;

    fn line(n: usize, step: f64, dt: f64) -> Trajectory {
        let poses: Vec<Pose3D> = (0..n)
            .map(|i| {
                Pose3D::new(
                    i as f64 * dt,
                    Vector3::new(i as f64 * step, 0.0, 0.0),
                    UnitQuaternion::identity(),
                )
            })
            .collect();
        Trajectory::from_poses(&poses)
    }

    fn with_timestamps(stamps: &[f64]) -> Trajectory {
        let n = stamps.len();
        Trajectory::new(
            stamps.to_vec(),
            (0..n).map(|i| Vector3::new(i as f64, 0.0, 0.0)).collect(),
            vec![UnitQuaternion::identity(); n],
        )
        .unwrap()
    }

    #[test]
    fn test_new_rejects_mismatched_lengths() {
        let result = Trajectory::new(
            vec![0.0, 1.0],
            vec![Vector3::zeros()],
            vec![UnitQuaternion::identity(); 2],
        );
        assert!(matches!(result, Err(Error::DataIntegrity(_))));
    }

    #[test]
    fn test_speeds_length_and_value() {
        let traj = line(5, 0.2, 0.1);
        let speeds = traj.speeds();
        assert_eq!(speeds.len(), 4);
        for s in speeds {
            assert_relative_eq!(*s, 2.0, epsilon = 1e-12);
        }
    }

    #[test]
    fn test_speeds_zero_for_stationary() {
        let mut traj = line(4, 0.0, 0.1);
        assert!(traj.speeds().iter().all(|s| *s == 0.0));
        // Mutation must invalidate the cache.
        traj.remove_non_monotonic();
        assert_eq!(traj.speeds().len(), 3);
    }

    #[test]
    fn test_remove_non_monotonic_drops_successors() {
        let mut traj = with_timestamps(&[0.0, 1.0, 2.0, 3.0, 1.5, 1.6, 4.0, 4.0, 5.0]);
        let removed = traj.remove_non_monotonic();
        assert_eq!(removed, 3);
        assert_eq!(traj.timestamps(), &[0.0, 1.0, 2.0, 3.0, 4.0, 5.0]);
        assert!(traj.is_strictly_increasing());
    }

    #[test]
    fn test_remove_non_monotonic_noop() {
        let mut traj = line(10, 0.1, 0.1);
        assert_eq!(traj.remove_non_monotonic(), 0);
        assert_eq!(traj.len(), 10);
    }

    #[test]
    fn test_remove_abnormal_steps_scrubs_glitch() {
        // Pose 5 jumps 10m away and back.
        let mut positions: Vec<Vector3<f64>> = (0..10)
            .map(|i| Vector3::new(i as f64 * 0.01, 0.0, 0.0))
            .collect();
        positions[5].y = 10.0;
        let mut traj = Trajectory::new(
            (0..10).map(|i| i as f64 * 0.01).collect(),
            positions,
            vec![UnitQuaternion::identity(); 10],
        )
        .unwrap();

        let found = traj.remove_abnormal_steps(6.0).unwrap();
        assert_eq!(found, 2);
        assert!(traj.speeds().iter().all(|s| *s < 6.0));
        assert!(traj.positions().iter().all(|p| p.y == 0.0));
        // Steps 4 and 5 are abnormal: poses 3..=6 are dropped.
        assert_eq!(traj.len(), 6);
    }

    #[test]
    fn test_remove_abnormal_steps_refuses_to_empty() {
        let mut traj = Trajectory::new(
            vec![0.0, 0.01, 0.02],
            vec![
                Vector3::zeros(),
                Vector3::new(10.0, 0.0, 0.0),
                Vector3::zeros(),
            ],
            vec![UnitQuaternion::identity(); 3],
        )
        .unwrap();
        assert!(traj.remove_abnormal_steps(6.0).is_err());
    }

    #[test]
    fn test_select_and_slice() {
        let traj = line(10, 1.0, 1.0);
        let sel = traj.select(&[1, 4, 7]);
        assert_eq!(sel.timestamps(), &[1.0, 4.0, 7.0]);
        let sl = traj.slice(2..5);
        assert_eq!(sl.len(), 3);
        assert_eq!(sl.timestamps()[0], 2.0);
    }

    #[test]
    fn test_transformed_does_not_mutate_source() {
        let traj = line(3, 1.0, 1.0);
        let sim = Sim3 {
            rotation: UnitQuaternion::from_axis_angle(&Vector3::z_axis(), FRAC_PI_2),
            translation: Vector3::new(0.0, 0.0, 1.0),
            scale: 2.0,
        };
        let out = traj.transformed(&sim);
        assert_relative_eq!(out.positions()[1], Vector3::new(0.0, 2.0, 1.0), epsilon = 1e-12);
        assert_relative_eq!(traj.positions()[1], Vector3::new(1.0, 0.0, 0.0));
    }

    #[test]
    fn test_local_transform_uses_body_frame() {
        let rot = UnitQuaternion::from_axis_angle(&Vector3::z_axis(), FRAC_PI_2);
        let traj = Trajectory::new(vec![0.0], vec![Vector3::zeros()], vec![rot]).unwrap();
        let local = Isometry3::translation(1.0, 0.0, 0.0);
        let out = traj.with_local_transform(&local);
        assert_relative_eq!(out.positions()[0], Vector3::new(0.0, 1.0, 0.0), epsilon = 1e-12);
    }

    #[test]
    fn test_smoothed_edges() {
        let traj = line(5, 1.0, 1.0);
        let smoothed = traj.with_smoothed_edges();
        assert_eq!(smoothed.positions()[0], traj.positions()[1]);
        assert_eq!(smoothed.positions()[4], traj.positions()[3]);
        assert_eq!(smoothed.positions()[2], traj.positions()[2]);
        assert_eq!(smoothed.timestamps(), traj.timestamps());
    }

    #[test]
    fn test_concat_checks_boundaries() {
        let traj = line(10, 1.0, 1.0);
        let joined = Trajectory::concat(&[traj.slice(0..4), traj.slice(4..10)]).unwrap();
        assert_eq!(joined.len(), 10);

        let overlapping = Trajectory::concat(&[traj.slice(0..5), traj.slice(4..10)]);
        assert!(matches!(overlapping, Err(Error::DataIntegrity(_))));
    }

    #[test]
    fn test_path_length() {
        let traj = line(11, 0.5, 1.0);
        assert_relative_eq!(traj.path_length(), 5.0, epsilon = 1e-12);
        assert_relative_eq!(traj.duration(), 10.0);
    }
}
