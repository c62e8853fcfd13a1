//! Alignment region detection from per-step speed.
//!
//! An estimated trajectory from a visual SLAM system carries two numeric
//! signatures of tracking trouble:
//!
//! 1. **Lost tracking**: the pose stops updating, so consecutive speeds are
//!    exactly zero for several steps.
//! 2. **Relocalization / map switch**: the pose jumps, so a single step shows
//!    a speed far above anything the device can physically reach.
//!
//! Both break the assumption that one rigid transform maps the whole estimate
//! onto the reference. The detector turns these events into checkpoints and
//! splits the trajectory at them, producing disjoint `[start, end)` regions
//! that are each aligned independently.
//!
//! # Checkpoint merging
//!
//! Checkpoints one index apart are absorbed into the same region, except when
//! a lost-run boundary is immediately followed by a jump: the stall and the
//! jump are distinct events and the region boundary moves to the jump.
//! Adjacent jump checkpoints stay merged as a single event.
//!
//! # Example
//!
//! ```rust,ignore
//! use pariksha::segmentation::{RegionDetector, RegionDetectorConfig};
//!
//! let detector = RegionDetector::new(RegionDetectorConfig::default());
//! let detection = detector.detect(&estimate)?;
//! for region in &detection.regions {
//!     println!("[{}, {})", region.start, region.end);
//! }
//! ```

use serde::{Deserialize, Serialize};

use crate::core::Trajectory;
use crate::error::{Error, Result};

/// Configuration for region detection.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RegionDetectorConfig {
    /// Speed above which a step is treated as a jump (m/s).
    ///
    /// Default: 3.0
    #[serde(default = "default_speed_threshold")]
    pub speed_threshold: f64,

    /// Maximum region length in indices before auxiliary checkpoints are
    /// inserted.
    ///
    /// Default: 5,000,000 (effectively never triggers)
    #[serde(default = "default_rescale_threshold")]
    pub rescale_threshold: usize,

    /// Minimum number of consecutive zero speeds that counts as lost tracking.
    ///
    /// Default: 3
    #[serde(default = "default_min_lost_run")]
    pub min_lost_run: usize,
}

fn default_speed_threshold() -> f64 {
    3.0
}
fn default_rescale_threshold() -> usize {
    5_000_000
}
fn default_min_lost_run() -> usize {
    3
}

impl Default for RegionDetectorConfig {
    fn default() -> Self {
        Self {
            speed_threshold: 3.0,
            rescale_threshold: 5_000_000,
            min_lost_run: 3,
        }
    }
}

/// Pose index interval `[start, end)` aligned as one rigid unit.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlignmentRegion {
    /// First pose index (inclusive)
    pub start: usize,
    /// Last pose index (exclusive)
    pub end: usize,
}

impl AlignmentRegion {
    /// Create a region.
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    /// Number of poses in the region
    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    /// Whether the region contains no poses
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Maximal run of zero speeds, as inclusive speed indices `[start, end]`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LostRegion {
    /// First zero-speed index
    pub start: usize,
    /// Last zero-speed index (inclusive)
    pub end: usize,
}

/// Output of [`RegionDetector::detect`].
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct RegionDetection {
    /// Disjoint, ascending alignment regions covering the trajectory
    pub regions: Vec<AlignmentRegion>,
    /// Lost-tracking runs
    pub lost_regions: Vec<LostRegion>,
    /// Speed indices above the jump threshold
    pub shift_checkpoints: Vec<usize>,
    /// Checkpoints inserted to bound region length
    pub aux_checkpoints: Vec<usize>,
}

/// Splits a trajectory into alignment regions.
#[derive(Clone, Debug, Default)]
pub struct RegionDetector {
    config: RegionDetectorConfig,
}

impl RegionDetector {
    /// Create a detector with the given configuration.
    pub fn new(config: RegionDetectorConfig) -> Self {
        Self { config }
    }

    /// Get the configuration.
    pub fn config(&self) -> &RegionDetectorConfig {
        &self.config
    }

    /// Detect alignment regions on `trajectory`.
    ///
    /// Fails with [`Error::DataIntegrity`] if the trajectory has fewer than two
    /// poses.
    pub fn detect(&self, trajectory: &Trajectory) -> Result<RegionDetection> {
        if trajectory.len() < 2 {
            return Err(Error::DataIntegrity(format!(
                "region detection needs at least 2 poses, got {}",
                trajectory.len()
            )));
        }

        let detection = self.detect_from_speeds(trajectory.speeds());

        log::info!(
            "Detected {} alignment regions ({} lost, {} shifts, {} auxiliary)",
            detection.regions.len(),
            detection.lost_regions.len(),
            detection.shift_checkpoints.len(),
            detection.aux_checkpoints.len()
        );
        log::debug!("Alignment regions: {:?}", detection.regions);

        Ok(detection)
    }

    /// Detect regions from a speed series of length `N - 1`.
    pub fn detect_from_speeds(&self, speeds: &[f64]) -> RegionDetection {
        let num_poses = speeds.len() + 1;
        let last = num_poses - 1;

        let lost_regions = self.find_lost_regions(speeds);
        let shift_checkpoints: Vec<usize> = speeds
            .iter()
            .enumerate()
            .filter(|(_, s)| **s > self.config.speed_threshold)
            .map(|(i, _)| i)
            .collect();

        let mut lost_checkpoints: Vec<usize> = lost_regions
            .iter()
            .flat_map(|r| [r.start, r.end])
            .collect();
        lost_checkpoints.sort_unstable();
        lost_checkpoints.dedup();

        let mut checkpoints = vec![0, last];
        checkpoints.extend_from_slice(&lost_checkpoints);
        checkpoints.extend_from_slice(&shift_checkpoints);
        checkpoints.sort_unstable();
        checkpoints.dedup();

        let aux_checkpoints = self.auxiliary_checkpoints(&checkpoints);
        if !aux_checkpoints.is_empty() {
            checkpoints.extend_from_slice(&aux_checkpoints);
            checkpoints.sort_unstable();
            checkpoints.dedup();
        }

        let regions = build_regions(&checkpoints, &lost_checkpoints, &shift_checkpoints, last);

        RegionDetection {
            regions,
            lost_regions,
            shift_checkpoints,
            aux_checkpoints,
        }
    }

    fn find_lost_regions(&self, speeds: &[f64]) -> Vec<LostRegion> {
        let min_run = self.config.min_lost_run.max(1);
        let mut regions = Vec::new();
        let mut run_start: Option<usize> = None;

        for (i, &s) in speeds.iter().enumerate() {
            match (s == 0.0, run_start) {
                (true, None) => run_start = Some(i),
                (false, Some(start)) => {
                    if i - start >= min_run {
                        regions.push(LostRegion { start, end: i - 1 });
                    }
                    run_start = None;
                }
                _ => {}
            }
        }
        if let Some(start) = run_start
            && speeds.len() - start >= min_run
        {
            regions.push(LostRegion {
                start,
                end: speeds.len() - 1,
            });
        }

        regions
    }

    fn auxiliary_checkpoints(&self, checkpoints: &[usize]) -> Vec<usize> {
        let step = self.config.rescale_threshold.max(1);
        let mut aux = Vec::new();
        for pair in checkpoints.windows(2) {
            let mut cursor = pair[0];
            while pair[1] - cursor > step {
                cursor += step;
                aux.push(cursor);
            }
        }
        aux
    }
}

/// Turn sorted checkpoints into `[start, end)` regions covering `[0, last]`.
fn build_regions(
    checkpoints: &[usize],
    lost_checkpoints: &[usize],
    shift_checkpoints: &[usize],
    last: usize,
) -> Vec<AlignmentRegion> {
    let is_lost = |i: usize| lost_checkpoints.binary_search(&i).is_ok();
    let is_shift = |i: usize| shift_checkpoints.binary_search(&i).is_ok();

    let mut regions = Vec::new();
    let Some((&first, rest)) = checkpoints.split_first() else {
        return vec![AlignmentRegion::new(0, last)];
    };

    let mut start = first;
    for &cp in rest {
        if cp - start <= 1 {
            // Stall followed directly by a jump: the jump opens the next region.
            if is_lost(start) && is_shift(cp) {
                start = cp;
            }
        } else {
            regions.push(AlignmentRegion::new(start, cp));
            start = cp;
        }
    }

    if regions.is_empty() {
        return vec![AlignmentRegion::new(0, last)];
    }

    regions[0].start = 0;
    for k in 1..regions.len() {
        regions[k - 1].end = regions[k].start;
    }
    if let Some(tail) = regions.last_mut() {
        tail.end = last;
    }

    regions
}
