//! Reference cleanup configuration section.

use nalgebra::{Isometry3, Quaternion, Translation3, UnitQuaternion, Vector3};
use serde::{Deserialize, Serialize};

use super::defaults;
use super::error::ConfigLoadError;

/// Ground-truth cleanup settings
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CleanupSection {
    /// Drop reference rows whose timestamp does not increase
    #[serde(default = "defaults::enabled")]
    pub remove_non_monotonic: bool,

    /// Drop reference poses around steps at or above this speed (m/s).
    /// Disabled when absent.
    #[serde(default)]
    pub abnormal_step_threshold: Option<f64>,

    /// Body-frame translation applied to every reference pose (meters)
    #[serde(default)]
    pub local_translation: [f64; 3],

    /// Body-frame rotation applied to every reference pose (x, y, z, w)
    #[serde(default = "defaults::local_rotation")]
    pub local_rotation: [f64; 4],
}

impl Default for CleanupSection {
    fn default() -> Self {
        Self {
            remove_non_monotonic: true,
            abnormal_step_threshold: None,
            local_translation: [0.0; 3],
            local_rotation: [0.0, 0.0, 0.0, 1.0],
        }
    }
}

impl CleanupSection {
    /// Body-frame offset as an isometry, or `None` when it is the identity.
    pub fn local_transform(&self) -> Result<Option<Isometry3<f64>>, ConfigLoadError> {
        let [tx, ty, tz] = self.local_translation;
        let [qx, qy, qz, qw] = self.local_rotation;

        let quat = Quaternion::new(qw, qx, qy, qz);
        let norm = quat.norm();
        if !norm.is_finite() || norm < 1e-12 {
            return Err(ConfigLoadError::Invalid(format!(
                "cleanup.local_rotation must be a non-zero quaternion, got {:?}",
                self.local_rotation
            )));
        }
        let rotation = UnitQuaternion::from_quaternion(quat);
        let translation = Vector3::new(tx, ty, tz);

        if translation == Vector3::zeros() && rotation.angle() == 0.0 {
            return Ok(None);
        }
        Ok(Some(Isometry3::from_parts(
            Translation3::from(translation),
            rotation,
        )))
    }
}
