//! Pose relations and delta units shared by APE and RPE.

use nalgebra::Isometry3;
use serde::{Deserialize, Serialize};

/// Scalar extracted from a pair of poses.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum PoseRelation {
    /// Norm of the translation of the error transform
    #[default]
    TranslationPart,
    /// Euclidean distance between the compared positions
    PointDistance,
    /// Rotation angle of the error transform (radians)
    RotationAngleRad,
    /// Rotation angle of the error transform (degrees)
    RotationAngleDeg,
}

impl PoseRelation {
    /// Unit of the produced error values
    pub fn unit(&self) -> &'static str {
        match self {
            PoseRelation::TranslationPart | PoseRelation::PointDistance => "m",
            PoseRelation::RotationAngleRad => "rad",
            PoseRelation::RotationAngleDeg => "deg",
        }
    }

    /// Human-readable name
    pub fn name(&self) -> &'static str {
        match self {
            PoseRelation::TranslationPart => "translation part",
            PoseRelation::PointDistance => "point distance",
            PoseRelation::RotationAngleRad => "rotation angle (rad)",
            PoseRelation::RotationAngleDeg => "rotation angle (deg)",
        }
    }

    /// Error value of `error`, the transform `inv(reference) * estimate`.
    ///
    /// `PointDistance` is not defined on the error transform alone and is
    /// handled by the callers.
    pub(crate) fn error_of(&self, error: &Isometry3<f64>) -> f64 {
        match self {
            PoseRelation::TranslationPart | PoseRelation::PointDistance => {
                error.translation.vector.norm()
            }
            PoseRelation::RotationAngleRad => error.rotation.angle(),
            PoseRelation::RotationAngleDeg => error.rotation.angle().to_degrees(),
        }
    }
}

impl std::fmt::Display for PoseRelation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Unit in which the RPE delta is expressed.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum DeltaUnit {
    /// Number of poses
    #[default]
    Frames,
    /// Travelled path length
    Meters,
    /// Elapsed time
    Seconds,
}

impl DeltaUnit {
    /// Short unit suffix
    pub fn suffix(&self) -> &'static str {
        match self {
            DeltaUnit::Frames => "frames",
            DeltaUnit::Meters => "m",
            DeltaUnit::Seconds => "s",
        }
    }
}

impl std::fmt::Display for DeltaUnit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.suffix())
    }
}
