//! Sim3: 7-DOF similarity transformation (rotation + translation + scale).
//!
//! Maps estimate coordinates into the reference frame as `p' = s * R * p + t`.
//! With scale correction disabled the fit produces `s = 1`, i.e. a plain SE3.

use nalgebra::{Matrix3, Rotation3, UnitQuaternion, Vector3};
use serde::{Deserialize, Serialize};

/// 7-DOF similarity transformation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Sim3 {
    /// Rotation part
    pub rotation: UnitQuaternion<f64>,
    /// Translation part
    pub translation: Vector3<f64>,
    /// Uniform scale
    pub scale: f64,
}

impl Default for Sim3 {
    fn default() -> Self {
        Self::identity()
    }
}

impl Sim3 {
    /// Identity transformation (no rotation, no translation, scale = 1).
    pub fn identity() -> Self {
        Self {
            rotation: UnitQuaternion::identity(),
            translation: Vector3::zeros(),
            scale: 1.0,
        }
    }

    /// Construct from rotation matrix, translation, and scale.
    pub fn from_rts(rotation: Matrix3<f64>, translation: Vector3<f64>, scale: f64) -> Self {
        let rot3 = Rotation3::from_matrix_unchecked(rotation);
        Self {
            rotation: UnitQuaternion::from_rotation_matrix(&rot3),
            translation,
            scale,
        }
    }

    /// Transform a single point: p' = s * R * p + t.
    pub fn transform_point(&self, p: &Vector3<f64>) -> Vector3<f64> {
        self.scale * (self.rotation * p) + self.translation
    }

    /// Rotate an orientation into the target frame (scale does not apply).
    pub fn transform_orientation(&self, q: &UnitQuaternion<f64>) -> UnitQuaternion<f64> {
        self.rotation * q
    }

    /// Rotation angle of the rotation part (radians).
    pub fn rotation_angle(&self) -> f64 {
        self.rotation.angle()
    }

    /// Whether this transform is within the given tolerances of identity.
    pub fn is_near_identity(&self, angle_tol: f64, translation_tol: f64, scale_tol: f64) -> bool {
        self.rotation_angle() <= angle_tol
            && self.translation.norm() <= translation_tol
            && (self.scale - 1.0).abs() <= scale_tol
    }
}
