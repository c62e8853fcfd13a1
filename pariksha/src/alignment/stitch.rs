//! Merging aligned segments back into one estimate.

use super::segments::SegmentOutcome;
use crate::core::Trajectory;
use crate::error::{Error, Result};
use crate::sync::{Association, associate};

/// Concatenates per-region outcomes and re-associates against the reference.
#[derive(Clone, Debug)]
pub struct Stitcher {
    max_diff: f64,
    offset: f64,
}

impl Default for Stitcher {
    fn default() -> Self {
        Self::new(0.05, 0.0)
    }
}

impl Stitcher {
    /// Create a stitcher with the association tolerance and time offset.
    pub fn new(max_diff: f64, offset: f64) -> Self {
        Self { max_diff, offset }
    }

    /// Concatenate the trajectories of `outcomes` in region order.
    ///
    /// Dropped regions contribute nothing. Fails with
    /// [`Error::DataIntegrity`] if nothing survived or a boundary timestamp is
    /// not increasing.
    pub fn merge(&self, outcomes: &[SegmentOutcome]) -> Result<Trajectory> {
        let parts: Vec<Trajectory> = outcomes
            .iter()
            .filter_map(|o| o.trajectory.clone())
            .collect();
        if parts.is_empty() {
            return Err(Error::DataIntegrity(
                "no region produced poses to stitch".into(),
            ));
        }
        Trajectory::concat(&parts)
    }

    /// Merge outcomes and associate the result with the full `reference`.
    ///
    /// The returned association is the final `(reference, estimate)` pair
    /// used for error computation.
    pub fn stitch(
        &self,
        reference: &Trajectory,
        outcomes: &[SegmentOutcome],
    ) -> Result<Association> {
        let merged = self.merge(outcomes)?;
        let assoc = associate(reference, &merged, self.max_diff, self.offset)?;
        log::info!(
            "Stitched {} segments: {} poses, {} associated with reference",
            outcomes.iter().filter(|o| o.trajectory.is_some()).count(),
            merged.len(),
            assoc.len()
        );
        Ok(assoc)
    }
}
