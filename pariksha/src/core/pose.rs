//! Timestamped 6-DoF pose.

use nalgebra::{Isometry3, Quaternion, Translation3, UnitQuaternion, Vector3};

use crate::error::{Error, Result};

/// A single pose sample: timestamp, position and orientation.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Pose3D {
    /// Timestamp in seconds
    pub timestamp: f64,
    /// Position in meters
    pub position: Vector3<f64>,
    /// Orientation as a unit quaternion
    pub orientation: UnitQuaternion<f64>,
}

impl Pose3D {
    /// Create a pose from already-normalized components.
    pub fn new(timestamp: f64, position: Vector3<f64>, orientation: UnitQuaternion<f64>) -> Self {
        Self {
            timestamp,
            position,
            orientation,
        }
    }

    /// Create a pose from a TUM row `t x y z qx qy qz qw`.
    ///
    /// The quaternion is normalized on ingestion. A zero-norm or non-finite
    /// quaternion is rejected.
    pub fn from_tum_row(row: [f64; 8]) -> Result<Self> {
        let [t, x, y, z, qx, qy, qz, qw] = row;
        if row.iter().any(|v| !v.is_finite()) {
            return Err(Error::DataIntegrity(format!(
                "non-finite value in pose at t = {}",
                t
            )));
        }

        let quat = Quaternion::new(qw, qx, qy, qz);
        let norm = quat.norm();
        if norm < 1e-12 {
            return Err(Error::DataIntegrity(format!(
                "zero-norm quaternion at t = {}",
                t
            )));
        }

        Ok(Self {
            timestamp: t,
            position: Vector3::new(x, y, z),
            orientation: UnitQuaternion::from_quaternion(quat),
        })
    }

    /// Convert back to a TUM row `t x y z qx qy qz qw`.
    pub fn to_tum_row(&self) -> [f64; 8] {
        let q = self.orientation.quaternion();
        [
            self.timestamp,
            self.position.x,
            self.position.y,
            self.position.z,
            q.i,
            q.j,
            q.k,
            q.w,
        ]
    }

    /// Rigid transform of this pose (world from body).
    pub fn to_isometry(&self) -> Isometry3<f64> {
        Isometry3::from_parts(Translation3::from(self.position), self.orientation)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_tum_row_normalizes_quaternion() {
        let pose = Pose3D::from_tum_row([1.0, 1.0, 2.0, 3.0, 0.0, 0.0, 0.0, 2.0]).unwrap();
        assert_relative_eq!(pose.orientation.quaternion().norm(), 1.0, epsilon = 1e-12);
        assert_relative_eq!(pose.orientation.quaternion().w, 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_tum_row_rejects_zero_quaternion() {
        let result = Pose3D::from_tum_row([0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0]);
        assert!(matches!(result, Err(Error::DataIntegrity(_))));
    }

    #[test]
    fn test_tum_row_roundtrip_order() {
        let row = [5.0, 1.0, 2.0, 3.0, 0.0, 0.0, 0.70710678, 0.70710678];
        let pose = Pose3D::from_tum_row(row).unwrap();
        let back = pose.to_tum_row();
        for (a, b) in row.iter().zip(back.iter()) {
            assert_relative_eq!(*a, *b, epsilon = 1e-6);
        }
    }
}
