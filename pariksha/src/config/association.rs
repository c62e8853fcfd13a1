//! Association configuration section.

use serde::{Deserialize, Serialize};

use super::defaults;

/// Timestamp association settings
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct AssociationSection {
    /// Maximum timestamp gap for a pose pair (seconds)
    #[serde(default = "defaults::max_diff")]
    pub max_diff: f64,

    /// Offset added to estimate timestamps (seconds)
    #[serde(default)]
    pub offset: f64,
}

impl Default for AssociationSection {
    fn default() -> Self {
        Self {
            max_diff: 0.05,
            offset: 0.0,
        }
    }
}
