//! Alignment configuration section.

use serde::{Deserialize, Serialize};

use super::defaults;

/// Per-region alignment settings
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct AlignmentSection {
    /// Estimate a uniform scale (monocular SLAM)
    #[serde(default = "defaults::enabled")]
    pub correct_scale: bool,

    /// Replace region edge poses with their inner neighbours
    #[serde(default = "defaults::enabled")]
    pub smooth_edges: bool,
}

impl Default for AlignmentSection {
    fn default() -> Self {
        Self {
            correct_scale: true,
            smooth_edges: true,
        }
    }
}
