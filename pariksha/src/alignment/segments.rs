//! Per-region alignment of an estimated trajectory against a reference.
//!
//! Each region is sliced out of the estimate, associated against the full
//! reference, and fitted with its own similarity transform. A region whose fit
//! fails still contributes its associated poses, unaligned, so one bad region
//! degrades only itself.

use serde::{Deserialize, Serialize};

use super::umeyama::umeyama_alignment;
use crate::core::{Sim3, Trajectory};
use crate::error::Result;
use crate::segmentation::AlignmentRegion;
use crate::sync::associate;

/// Configuration for segment alignment.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SegmentAlignerConfig {
    /// Maximum timestamp gap for association (seconds).
    ///
    /// Default: 0.05
    #[serde(default = "default_max_diff")]
    pub max_diff: f64,

    /// Offset added to estimate timestamps before association (seconds).
    ///
    /// Default: 0.0
    #[serde(default)]
    pub offset: f64,

    /// Estimate a uniform scale in addition to rotation and translation.
    ///
    /// Default: true
    #[serde(default = "default_true")]
    pub correct_scale: bool,

    /// Replace the first and last pose of each region with their inner
    /// neighbours before fitting.
    ///
    /// Default: true
    #[serde(default = "default_true")]
    pub smooth_edges: bool,
}

fn default_max_diff() -> f64 {
    0.05
}
fn default_true() -> bool {
    true
}

impl Default for SegmentAlignerConfig {
    fn default() -> Self {
        Self {
            max_diff: 0.05,
            offset: 0.0,
            correct_scale: true,
            smooth_edges: true,
        }
    }
}

/// How a region ended up in the stitched estimate.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum SegmentStatus {
    /// Fitted and transformed into the reference frame
    Aligned {
        /// Fitted estimate-to-reference transform
        transform: Sim3,
    },
    /// Associated but left in the estimate frame
    Unaligned {
        /// Why the fit failed
        reason: String,
    },
    /// Not part of the output
    Dropped {
        /// Why the region could not be associated
        reason: String,
    },
}

/// Result of aligning one region.
#[derive(Clone, Debug)]
pub struct SegmentOutcome {
    /// Region in estimate indices
    pub region: AlignmentRegion,
    /// Alignment status
    pub status: SegmentStatus,
    /// Poses contributed to the stitched estimate (absent when dropped)
    pub trajectory: Option<Trajectory>,
}

impl SegmentOutcome {
    /// Whether the region was fitted successfully
    pub fn is_aligned(&self) -> bool {
        matches!(self.status, SegmentStatus::Aligned { .. })
    }

    /// Number of poses contributed to the stitched estimate
    pub fn num_poses(&self) -> usize {
        self.trajectory.as_ref().map_or(0, Trajectory::len)
    }
}

/// Aligns estimate regions independently.
#[derive(Clone, Debug, Default)]
pub struct SegmentAligner {
    config: SegmentAlignerConfig,
}

impl SegmentAligner {
    /// Create an aligner with the given configuration.
    pub fn new(config: SegmentAlignerConfig) -> Self {
        Self { config }
    }

    /// Get the configuration.
    pub fn config(&self) -> &SegmentAlignerConfig {
        &self.config
    }

    /// Align every region in order.
    pub fn align_regions(
        &self,
        reference: &Trajectory,
        estimate: &Trajectory,
        regions: &[AlignmentRegion],
    ) -> Vec<SegmentOutcome> {
        regions
            .iter()
            .map(|region| self.align_region(reference, estimate, *region))
            .collect()
    }

    /// Align a single region of `estimate` against the whole `reference`.
    ///
    /// Never fails: association failures drop the region, fit failures fall
    /// back to the associated but unaligned poses. Both are logged.
    pub fn align_region(
        &self,
        reference: &Trajectory,
        estimate: &Trajectory,
        region: AlignmentRegion,
    ) -> SegmentOutcome {
        let end = region.end.min(estimate.len());
        let start = region.start.min(end);
        let mut segment = estimate.slice(start..end);
        if self.config.smooth_edges {
            segment = segment.with_smoothed_edges();
        }

        let assoc = match associate(reference, &segment, self.config.max_diff, self.config.offset)
        {
            Ok(assoc) => assoc,
            Err(e) => {
                log::warn!(
                    "Region [{}, {}) dropped, association failed: {}",
                    region.start,
                    region.end,
                    e
                );
                return SegmentOutcome {
                    region,
                    status: SegmentStatus::Dropped {
                        reason: e.to_string(),
                    },
                    trajectory: None,
                };
            }
        };

        match umeyama_alignment(
            assoc.estimate.positions(),
            assoc.reference.positions(),
            self.config.correct_scale,
        ) {
            Ok(transform) => {
                log::debug!(
                    "Region [{}, {}) aligned: {} pairs, scale {:.4}, rotation {:.4} rad",
                    region.start,
                    region.end,
                    assoc.len(),
                    transform.scale,
                    transform.rotation_angle()
                );
                SegmentOutcome {
                    region,
                    trajectory: Some(assoc.estimate.transformed(&transform)),
                    status: SegmentStatus::Aligned { transform },
                }
            }
            Err(e) => {
                log::warn!(
                    "Region [{}, {}) alignment failed, keeping unaligned poses: {}",
                    region.start,
                    region.end,
                    e
                );
                SegmentOutcome {
                    region,
                    status: SegmentStatus::Unaligned {
                        reason: e.to_string(),
                    },
                    trajectory: Some(assoc.estimate),
                }
            }
        }
    }
}

/// Align a whole estimate to a reference with a single transform.
///
/// Used for diagnostics and calibration checks where segmenting is not
/// wanted, typically with `correct_scale = false` and a tight `max_diff`.
/// Returns the associated reference, the aligned associated estimate and
/// the fitted transform.
pub fn align_trajectory(
    reference: &Trajectory,
    estimate: &Trajectory,
    max_diff: f64,
    offset: f64,
    correct_scale: bool,
) -> Result<(Trajectory, Trajectory, Sim3)> {
    let assoc = associate(reference, estimate, max_diff, offset)?;
    let transform = umeyama_alignment(
        assoc.estimate.positions(),
        assoc.reference.positions(),
        correct_scale,
    )?;
    let aligned = assoc.estimate.transformed(&transform);
    Ok((assoc.reference, aligned, transform))
}
