//! Metrics configuration section.

use serde::{Deserialize, Serialize};

use super::defaults;
use crate::evaluation::{PoseRelation, RpeSettings};

/// APE / RPE settings
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct MetricsSection {
    /// Pose relation for APE
    #[serde(default = "defaults::ape_relation")]
    pub ape_relation: PoseRelation,

    /// RPE relation and delta window
    #[serde(default)]
    pub rpe: RpeSettings,

    /// Longest RPE gap filled by interpolation in the error table
    #[serde(default = "defaults::max_null_length")]
    pub max_null_length: usize,
}

impl Default for MetricsSection {
    fn default() -> Self {
        Self {
            ape_relation: PoseRelation::PointDistance,
            rpe: RpeSettings::default(),
            max_null_length: 10,
        }
    }
}
